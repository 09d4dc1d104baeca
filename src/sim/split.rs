//! Proportional sharing of an energy amount across storage assets.

/// Splits `amount` across assets in proportion to their `capacities`.
///
/// Each entry is `amount × cap_i / Σ cap`. When the capacities sum to zero
/// (or less) every asset receives zero rather than dividing by zero.
///
/// # Examples
///
/// ```
/// use gridsim::sim::split::proportional_split;
///
/// assert_eq!(proportional_split(10.0, &[1.0, 3.0]), vec![2.5, 7.5]);
/// assert_eq!(proportional_split(10.0, &[0.0, 0.0]), vec![0.0, 0.0]);
/// ```
pub fn proportional_split(amount: f64, capacities: &[f64]) -> Vec<f64> {
    let total: f64 = capacities.iter().sum();
    if total <= 0.0 {
        return vec![0.0; capacities.len()];
    }
    capacities.iter().map(|cap| amount * cap / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shares_sum_to_amount() {
        let shares = proportional_split(12.0, &[2.5, 7.0, 0.5]);
        let sum: f64 = shares.iter().sum();
        assert!((sum - 12.0).abs() < 1e-12);
        assert!((shares[1] - 8.4).abs() < 1e-12);
    }

    #[test]
    fn zero_total_capacity_yields_zero_everywhere() {
        let shares = proportional_split(5.0, &[0.0, 0.0, 0.0]);
        assert_eq!(shares, vec![0.0, 0.0, 0.0]);
        assert!(shares.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn zero_capacity_asset_gets_nothing() {
        let shares = proportional_split(4.0, &[0.0, 2.0]);
        assert_eq!(shares, vec![0.0, 4.0]);
    }

    #[test]
    fn empty_fleet() {
        assert!(proportional_split(4.0, &[]).is_empty());
    }
}
