//! Fault demonstrator
//!
//! Runs a fixed sequence of scenarios, each of which deliberately triggers one
//! category of runtime fault, catches it, and prints a one-line report.
//!
//! The process takes no arguments. `RUST_LOG` and `NO_COLOR` never change the
//! text written to stdout: the first only filters stderr logging, the second
//! only strips colour, which is applied on a terminal anyway.
//! An optional `fault-demo.toml` (see [`config`]) changes only the inputs the
//! triggers operate on.

pub mod config;
pub mod error;
pub mod fault;
pub mod scenario;
pub mod triggers;

#[cfg(test)]
mod test_support;

pub use config::DemoConfig;
pub use error::DemoError;
pub use fault::{Fault, FaultKind};
pub use scenario::{Demonstrator, FaultReport, RunSummary, Scenario, BANNER};

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging to stderr so stdout carries only the report transcript.
///
/// Use `RUST_LOG` to override the default `warn` filter. Nothing it selects
/// reaches stdout.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
