use crate::fault::Fault;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the demonstrator itself, as opposed to the faults it demonstrates.
#[derive(Error, Debug)]
pub enum DemoError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Scenario '{scenario}' raised a fault it does not handle ({}): {fault}", .fault.kind())]
    Uncaught {
        scenario: &'static str,
        #[source]
        fault: Fault,
    },

    #[error("Scenario '{scenario}' completed without raising a fault")]
    NoFault { scenario: &'static str },

    #[error("Unknown scenario: '{0}'")]
    UnknownScenario(String),

    #[error("Failed to write report: {0}")]
    Output(#[from] io::Error),
}
