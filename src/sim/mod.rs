/// Merit-order dispatch engine.
pub mod engine;
pub mod kpi;
/// Proportional storage split policy.
pub mod split;
pub mod types;
