//! CSV export for simulation traces.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::SimResult;
use crate::fleet::source::get_or_zero;
use crate::fleet::{Source, StorageKind};
use crate::sim::types::SimulationTrace;

const LEADING: [&str; 4] = ["step", "hour_of_day", "demand_gw", "regime"];
const TRAILING: [&str; 6] = [
    "generation_excess_gw",
    "charged_gw",
    "discharged_gw",
    "residual_excess_gw",
    "wasted_gw",
    "renewable_curtailment_gw",
];

/// Sources with a column: those in the fleet, in merit order.
fn sources_in(trace: &SimulationTrace) -> Vec<Source> {
    let Some(first) = trace.steps.first() else {
        return Vec::new();
    };
    Source::MERIT_ORDER
        .into_iter()
        .filter(|s| first.potential.contains_key(s))
        .collect()
}

fn storage_in(trace: &SimulationTrace) -> Vec<StorageKind> {
    trace
        .steps
        .first()
        .map(|r| r.storage.iter().map(|f| f.kind).collect())
        .unwrap_or_default()
}

/// Column header for a trace: fixed leading columns, one generation column
/// per source, three columns per storage asset, then the balance columns.
pub fn header(trace: &SimulationTrace) -> Vec<String> {
    let mut cols: Vec<String> = LEADING.iter().map(|c| c.to_string()).collect();
    cols.extend(sources_in(trace).iter().map(|s| format!("{s}_gw")));
    for kind in storage_in(trace) {
        cols.push(format!("{kind}_charge_gw"));
        cols.push(format!("{kind}_discharge_gw"));
        cols.push(format!("{kind}_soc_gwh"));
    }
    cols.extend(TRAILING.iter().map(|c| c.to_string()));
    cols
}

/// Exports a trace to a CSV file at the given path.
///
/// Produces deterministic output for identical traces.
///
/// # Errors
///
/// Returns `SimError::Io` if the file cannot be created and `SimError::Csv`
/// if writing fails.
pub fn export_trace_csv(trace: &SimulationTrace, path: &Path) -> SimResult<()> {
    let file = File::create(path)?;
    write_trace_csv(trace, io::BufWriter::new(file))
}

/// Writes a trace as CSV to any writer.
///
/// # Errors
///
/// Returns `SimError::Csv` or `SimError::Io` if writing fails.
pub fn write_trace_csv(trace: &SimulationTrace, writer: impl Write) -> SimResult<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(header(trace))?;

    let sources = sources_in(trace);
    for r in &trace.steps {
        let mut row = vec![
            r.step.to_string(),
            r.hour_of_day.to_string(),
            format!("{:.4}", r.demand_gw),
            r.regime.to_string(),
        ];
        row.extend(
            sources
                .iter()
                .map(|&s| format!("{:.4}", get_or_zero(&r.generation, s))),
        );
        for flow in &r.storage {
            row.push(format!("{:.4}", flow.charge_gw));
            row.push(format!("{:.4}", flow.discharge_gw));
            row.push(format!("{:.4}", flow.soc_gwh));
        }
        row.extend(
            [
                r.generation_excess_gw,
                r.charged_gw,
                r.discharged_gw,
                r.residual_excess_gw,
                r.wasted_gw,
                r.renewable_curtailment_gw,
            ]
            .iter()
            .map(|v| format!("{v:.4}")),
        );
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::{DaylightWindow, SourceMap, StorageAsset};
    use crate::sim::engine::run_dispatch;
    use crate::sim::types::{DispatchInputs, Horizon};

    fn sample_trace() -> SimulationTrace {
        let inputs = DispatchInputs {
            capacities: SourceMap::from([(Source::Nuclear, 10.0), (Source::GasCcgt, 5.0)]),
            availability: SourceMap::from([(Source::Nuclear, 1.0), (Source::GasCcgt, 1.0)]),
            daylight: DaylightWindow::new(8.0, 8.0),
            storage: vec![
                StorageAsset::new(StorageKind::Batteries, 2.0, 2.0, 4.0, 0.9).unwrap(),
            ],
            demand_gw: vec![12.0; 24],
        };
        run_dispatch(inputs, Horizon::new(1)).unwrap()
    }

    fn render(trace: &SimulationTrace) -> String {
        let mut buf = Vec::new();
        write_trace_csv(trace, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn header_lists_sources_then_storage() {
        let out = render(&sample_trace());
        let first_line = out.lines().next().unwrap_or("");
        assert_eq!(
            first_line,
            "step,hour_of_day,demand_gw,regime,Nuclear_gw,Gas_CCGT_gw,\
             Batteries_charge_gw,Batteries_discharge_gw,Batteries_soc_gwh,\
             generation_excess_gw,charged_gw,discharged_gw,residual_excess_gw,\
             wasted_gw,renewable_curtailment_gw"
        );
    }

    #[test]
    fn row_count_matches_step_count() {
        let out = render(&sample_trace());
        assert_eq!(out.lines().count(), 25);
    }

    #[test]
    fn rows_carry_dispatch() {
        let out = render(&sample_trace());
        let row: Vec<&str> = out.lines().nth(1).unwrap_or("").split(',').collect();
        assert_eq!(row[0], "0");
        assert_eq!(row[3], "surplus");
        assert_eq!(row[4], "10.0000");
        // Battery starts full, so gas only covers the remaining demand.
        assert_eq!(row[5], "2.0000");
    }

    #[test]
    fn empty_trace_writes_fixed_header() {
        let trace = SimulationTrace {
            steps: Vec::new(),
            storage_energy_gwh: 0.0,
            renewable_curtailed_gwh: 0.0,
            wasted_gwh: 0.0,
        };
        let out = render(&trace);
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with("step,hour_of_day,demand_gw,regime,generation_excess_gw"));
    }

    #[test]
    fn export_to_file() {
        let path = std::env::temp_dir().join("gridsim_export_test.csv");
        export_trace_csv(&sample_trace(), &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("step,"));
        std::fs::remove_file(&path).ok();
    }
}
