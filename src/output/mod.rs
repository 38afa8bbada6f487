//! Output formatting for pomodesk.
//!
//! This module renders command results as colored text or JSON.

mod json;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::cli::commands::SimulationReport;
use crate::error::PomodeskError;

pub use json::*;
pub use pretty::*;

/// Format a simulation report based on output format
///
/// # Errors
///
/// Returns `PomodeskError::Parse` if JSON serialization fails.
pub fn format_simulation(
    report: &SimulationReport,
    format: OutputFormat,
) -> Result<String, PomodeskError> {
    match format {
        OutputFormat::Pretty => Ok(format_simulation_pretty(report)),
        OutputFormat::Json => to_json(report),
    }
}
