//! Scenario registry and the driver that runs it.

use crate::config::DemoConfig;
use crate::error::DemoError;
use crate::fault::{Fault, FaultKind};
use crate::triggers;
use colored::Colorize;
use std::io::Write;
use std::ops::{Deref, DerefMut};

pub const BANNER: &str = "===== Exception Handling Demonstration =====";

pub type Trigger = fn(&DemoConfig, &mut Cleanup) -> Result<(), Fault>;

// =============================================================================
// Scoped cleanup
// =============================================================================

/// Cleanup lines recorded while a trigger runs, written after its primary report.
#[derive(Debug, Default)]
pub struct Cleanup {
    lines: Vec<String>,
}

impl Cleanup {
    pub fn record(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Tie `resource` to a release step that runs when the returned guard is
    /// dropped, on every exit path. The step's outcome becomes a cleanup line.
    pub fn defer<T, F>(&mut self, resource: T, release: F) -> Scoped<'_, T, F>
    where
        F: FnOnce(T) -> String,
    {
        Scoped {
            resource: Some(resource),
            release: Some(release),
            cleanup: self,
        }
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

pub struct Scoped<'a, T, F>
where
    F: FnOnce(T) -> String,
{
    resource: Option<T>,
    release: Option<F>,
    cleanup: &'a mut Cleanup,
}

impl<T, F> Deref for Scoped<'_, T, F>
where
    F: FnOnce(T) -> String,
{
    type Target = T;

    fn deref(&self) -> &T {
        // Only taken in drop.
        self.resource.as_ref().unwrap_or_else(|| unreachable!())
    }
}

impl<T, F> DerefMut for Scoped<'_, T, F>
where
    F: FnOnce(T) -> String,
{
    fn deref_mut(&mut self) -> &mut T {
        self.resource.as_mut().unwrap_or_else(|| unreachable!())
    }
}

impl<T, F> Drop for Scoped<'_, T, F>
where
    F: FnOnce(T) -> String,
{
    fn drop(&mut self) {
        if let (Some(resource), Some(release)) = (self.resource.take(), self.release.take()) {
            let line = release(resource);
            self.cleanup.record(line);
        }
    }
}

// =============================================================================
// Registry
// =============================================================================

/// A trigger together with the fault handlers that guard it.
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    /// Handlers in dispatch order, most specific first.
    pub catches: &'static [FaultKind],
    pub trigger: Trigger,
}

pub static SCENARIOS: [Scenario; 11] = [
    Scenario {
        name: "restricted-write",
        catches: &[FaultKind::IoFailure],
        trigger: triggers::restricted_write,
    },
    Scenario {
        name: "missing-file-read",
        catches: &[FaultKind::FileNotFound],
        trigger: triggers::missing_file_read,
    },
    Scenario {
        name: "premature-end-of-stream",
        catches: &[FaultKind::EndOfStream, FaultKind::IoFailure],
        trigger: triggers::premature_end_of_stream,
    },
    Scenario {
        name: "unreachable-database",
        catches: &[FaultKind::DatabaseFailure],
        trigger: triggers::unreachable_database,
    },
    Scenario {
        name: "missing-class-load",
        catches: &[FaultKind::ClassNotFound],
        trigger: triggers::missing_class_load,
    },
    Scenario {
        name: "divide-by-zero",
        catches: &[FaultKind::Arithmetic],
        trigger: triggers::divide_by_zero,
    },
    Scenario {
        name: "null-dereference",
        catches: &[FaultKind::NullReference],
        trigger: triggers::null_dereference,
    },
    Scenario {
        name: "out-of-range-index",
        catches: &[FaultKind::IndexOutOfBounds],
        trigger: triggers::out_of_range_index,
    },
    Scenario {
        name: "invalid-type-cast",
        catches: &[FaultKind::InvalidCast],
        trigger: triggers::invalid_type_cast,
    },
    Scenario {
        name: "negative-size-allocation",
        catches: &[FaultKind::IllegalArgument],
        trigger: triggers::negative_size_allocation,
    },
    Scenario {
        name: "malformed-numeric-parse",
        catches: &[FaultKind::NumberFormat],
        trigger: triggers::malformed_numeric_parse,
    },
];

impl Scenario {
    pub fn registry() -> &'static [Scenario] {
        &SCENARIOS
    }

    #[cfg(test)]
    pub(crate) fn find(name: &str) -> Option<&'static Scenario> {
        SCENARIOS.iter().find(|s| s.name == name)
    }

    /// Dispatch `fault` to the first handler that accepts it.
    pub fn catch(&self, fault: Fault) -> Result<FaultReport, DemoError> {
        let raised = fault.kind();
        match self.catches.iter().copied().find(|handler| raised.is_a(*handler)) {
            Some(handler) => Ok(FaultReport {
                scenario: self.name,
                handler,
                raised,
                message: fault.to_string(),
                cleanup: Vec::new(),
            }),
            None => Err(DemoError::Uncaught {
                scenario: self.name,
                fault,
            }),
        }
    }
}

// =============================================================================
// Reports
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct FaultReport {
    pub scenario: &'static str,
    /// Kind of the handler that caught the fault; this is what gets printed.
    pub handler: FaultKind,
    pub raised: FaultKind,
    pub message: String,
    pub cleanup: Vec<String>,
}

impl FaultReport {
    pub fn line(&self) -> String {
        format!("{} caught: {}", self.handler, self.message)
    }
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<FaultReport>,
}

impl RunSummary {
    pub fn scenario_count(&self) -> usize {
        self.reports.len()
    }

    #[cfg(test)]
    pub(crate) fn handlers(&self) -> Vec<FaultKind> {
        self.reports.iter().map(|r| r.handler).collect()
    }

    pub fn cleanup_count(&self) -> usize {
        self.reports.iter().map(|r| r.cleanup.len()).sum()
    }
}

// =============================================================================
// Driver
// =============================================================================

pub struct Demonstrator {
    config: DemoConfig,
    scenarios: &'static [Scenario],
    colors: bool,
}

impl Demonstrator {
    pub fn new(config: DemoConfig) -> Self {
        Self {
            config,
            scenarios: Scenario::registry(),
            colors: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_scenarios(mut self, scenarios: &'static [Scenario]) -> Self {
        self.scenarios = scenarios;
        self
    }

    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    /// Write the banner, then run every scenario in registration order.
    ///
    /// Stops at the first scenario whose fault escapes its handlers.
    pub fn run_all<W: Write>(&self, out: &mut W) -> Result<RunSummary, DemoError> {
        if self.colors {
            writeln!(out, "{}", BANNER.bold())?;
        } else {
            writeln!(out, "{BANNER}")?;
        }

        let mut summary = RunSummary::default();
        for scenario in self.scenarios {
            summary.reports.push(self.run_scenario(scenario, out)?);
        }
        Ok(summary)
    }

    pub fn run_one<W: Write>(&self, name: &str, out: &mut W) -> Result<FaultReport, DemoError> {
        let scenario = self
            .scenarios
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| DemoError::UnknownScenario(name.to_string()))?;
        self.run_scenario(scenario, out)
    }

    fn run_scenario<W: Write>(&self, scenario: &Scenario, out: &mut W) -> Result<FaultReport, DemoError> {
        tracing::debug!(scenario = scenario.name, "running scenario");

        let mut cleanup = Cleanup::default();
        let caught = match (scenario.trigger)(&self.config, &mut cleanup) {
            Ok(()) => Err(DemoError::NoFault {
                scenario: scenario.name,
            }),
            Err(fault) => scenario.catch(fault),
        };

        if let Ok(report) = &caught {
            writeln!(out, "{}", self.format_line(report))?;
        }
        let cleanup = cleanup.into_lines();
        for line in &cleanup {
            writeln!(out, "{line}")?;
        }

        let mut report = caught.map_err(|err| {
            tracing::warn!(scenario = scenario.name, error = %err, "scenario failed");
            err
        })?;
        tracing::debug!(
            scenario = scenario.name,
            handler = %report.handler,
            raised = %report.raised,
            "fault caught"
        );
        report.cleanup = cleanup;
        Ok(report)
    }

    fn format_line(&self, report: &FaultReport) -> String {
        if self.colors {
            format!("{} caught: {}", report.handler.label().red(), report.message)
        } else {
            report.line()
        }
    }
}
