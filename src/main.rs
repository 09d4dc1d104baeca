//! Grid simulator entry point: CLI wiring and config-driven engine construction.

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;

use gridsim::cli::Args;
use gridsim::config::ScenarioConfig;
use gridsim::io::export::export_trace_csv;
use gridsim::logging;
use gridsim::sim::engine::DispatchEngine;
use gridsim::sim::kpi::RunSummary;

fn load_scenario(args: &Args) -> Result<ScenarioConfig> {
    // --scenario takes priority, then --preset, then the baseline
    let mut scenario = if let Some(path) = &args.scenario {
        ScenarioConfig::from_toml_file(path)?
    } else if let Some(name) = &args.preset {
        ScenarioConfig::from_preset(name)?
    } else {
        ScenarioConfig::baseline()
    };
    args.apply_overrides(&mut scenario);
    Ok(scenario)
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let scenario = load_scenario(&args)?;
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        bail!("scenario has {} configuration error(s)", errors.len());
    }

    let (inputs, horizon) = scenario.resolve()?;
    info!(
        year = scenario.simulation.year,
        weather = %scenario.simulation.weather,
        days = horizon.days,
        "resolved scenario"
    );
    let mut engine = DispatchEngine::new(inputs, horizon)?;
    let trace = engine.run()?;
    let summary = RunSummary::from_trace(&trace);

    if !args.quiet {
        for r in &trace.steps {
            println!("{r}");
        }
        println!();
    }
    println!("{summary}");

    if let Some(path) = &args.trace_out {
        export_trace_csv(&trace, path)
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        info!(path = %path.display(), "trace written");
    }

    #[cfg(feature = "api")]
    if args.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(gridsim::api::AppState {
            scenario,
            summary,
            trace,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
        let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
        rt.block_on(gridsim::api::serve(state, addr))
            .with_context(|| format!("API server on {addr} failed"))?;
    }

    Ok(())
}
