//! Hour-by-hour dispatch and storage simulator for a national grid.

#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod config;
/// Demand suppliers and component-based demand.
pub mod demand;
pub mod error;
/// Generation sources and storage assets.
pub mod fleet;
pub mod io;
pub mod logging;
pub mod roadmap;
/// Dispatch engine, split policy, and run accounting.
pub mod sim;
pub mod weather;
