//! Pre-allocation output of each source for one hour.

use serde::{Deserialize, Serialize};

use super::source::{Source, SourceMap, get_or_zero};

/// Daylight arc that shapes solar output over the day.
///
/// Output follows a half sine between `start_hour` (inclusive) and
/// `start_hour + hours` (exclusive), peaking at the window midpoint, and is
/// zero outside the window.
///
/// # Examples
///
/// ```
/// use gridsim::fleet::DaylightWindow;
///
/// let window = DaylightWindow::new(8.0, 8.0);
/// assert_eq!(window.fraction(3), 0.0);
/// assert!((window.fraction(12) - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DaylightWindow {
    /// First daylight hour of the day.
    pub start_hour: f64,
    /// Length of the daylight window in hours (> 0).
    pub hours: f64,
}

impl DaylightWindow {
    pub fn new(start_hour: f64, hours: f64) -> Self {
        Self { start_hour, hours }
    }

    /// Fraction of peak solar output at the given hour of day (0.0 to 1.0).
    pub fn fraction(&self, hour_of_day: usize) -> f64 {
        if self.hours <= 0.0 {
            return 0.0;
        }
        let since_start = hour_of_day as f64 - self.start_hour;
        if since_start < 0.0 || since_start >= self.hours {
            return 0.0;
        }
        (since_start * std::f64::consts::PI / self.hours).sin().max(0.0)
    }
}

/// Computes each source's potential output (GW) for one hour.
///
/// Solar uses `capacity × peak_factor × daylight fraction`; every other
/// source uses `capacity × availability`. Sources without a capacity entry
/// are left out of the result.
pub fn potential_output(
    hour_of_day: usize,
    capacities: &SourceMap,
    availability: &SourceMap,
    daylight: &DaylightWindow,
) -> SourceMap {
    capacities
        .iter()
        .map(|(&source, &capacity)| {
            let factor = get_or_zero(availability, source);
            let gw = match source {
                Source::Solar => capacity * factor * daylight.fraction(hour_of_day),
                _ => capacity * factor,
            };
            (source, gw)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> DaylightWindow {
        DaylightWindow::new(5.0, 16.0)
    }

    #[test]
    fn no_solar_outside_window() {
        let w = window();
        for h in (0..5).chain(21..24) {
            assert_eq!(w.fraction(h), 0.0, "hour {h}");
        }
    }

    #[test]
    fn solar_peaks_at_midpoint_and_is_symmetric() {
        let w = window();
        assert!((w.fraction(13) - 1.0).abs() < 1e-12);
        assert!((w.fraction(9) - w.fraction(17)).abs() < 1e-12);
        assert_eq!(w.fraction(5), 0.0);
    }

    #[test]
    fn short_window_has_no_second_arc() {
        // sin() turns positive again one full window later; the window check must cut it.
        let w = DaylightWindow::new(8.0, 6.0);
        for h in 14..24 {
            assert_eq!(w.fraction(h), 0.0, "hour {h}");
        }
    }

    #[test]
    fn zero_length_window_is_dark() {
        let w = DaylightWindow::new(8.0, 0.0);
        assert_eq!(w.fraction(10), 0.0);
    }

    #[test]
    fn potential_scales_capacity_by_factor() {
        let caps = SourceMap::from([(Source::Nuclear, 10.0), (Source::Solar, 20.0)]);
        let lfs = SourceMap::from([(Source::Nuclear, 0.9), (Source::Solar, 0.5)]);
        let pot = potential_output(13, &caps, &lfs, &window());
        assert!((pot[&Source::Nuclear] - 9.0).abs() < 1e-12);
        assert!((pot[&Source::Solar] - 10.0).abs() < 1e-12);

        let night = potential_output(0, &caps, &lfs, &window());
        assert_eq!(night[&Source::Solar], 0.0);
    }

    #[test]
    fn absent_sources_are_not_reported() {
        let caps = SourceMap::from([(Source::GasCcgt, 5.0)]);
        let lfs = SourceMap::from([(Source::GasCcgt, 1.0), (Source::Nuclear, 0.9)]);
        let pot = potential_output(0, &caps, &lfs, &window());
        assert_eq!(pot.len(), 1);
        assert_eq!(pot[&Source::GasCcgt], 5.0);
    }
}
