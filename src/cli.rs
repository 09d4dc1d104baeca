use std::path::PathBuf;

use clap::Parser;

use crate::config::ScenarioConfig;
use crate::weather::Weather;

/// Hourly dispatch and storage simulator for a national grid.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Load scenario from a TOML file
    #[arg(long, conflicts_with = "preset")]
    pub scenario: Option<PathBuf>,

    /// Use a built-in preset (baseline, dunkelflaute_2035, summer_windy_2035)
    #[arg(long)]
    pub preset: Option<String>,

    /// Override the roadmap year
    #[arg(long)]
    pub year: Option<u16>,

    /// Override the weather pattern
    #[arg(long, value_parser = parse_weather)]
    pub weather: Option<Weather>,

    /// Override the number of simulated days
    #[arg(long)]
    pub days: Option<usize>,

    /// Export the per-step trace to CSV
    #[arg(long)]
    pub trace_out: Option<PathBuf>,

    /// Suppress per-step lines
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Start the REST API after the run
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = false)]
    pub serve: bool,

    /// API server port
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    pub port: u16,
}

fn parse_weather(s: &str) -> Result<Weather, String> {
    Weather::ALL
        .into_iter()
        .find(|w| w.name() == s)
        .ok_or_else(|| {
            let names: Vec<&str> = Weather::ALL.iter().map(|w| w.name()).collect();
            format!("unknown weather \"{s}\", expected one of: {}", names.join(", "))
        })
}

impl Args {
    /// Applies the command-line overrides on top of a loaded scenario.
    pub fn apply_overrides(&self, cfg: &mut ScenarioConfig) {
        if let Some(year) = self.year {
            cfg.simulation.year = year;
        }
        if let Some(weather) = self.weather {
            cfg.simulation.weather = weather;
        }
        if let Some(days) = self.days {
            cfg.simulation.days = days;
        }
    }
}
