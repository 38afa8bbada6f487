//! Configuration file commands.

use colored::Colorize;
use serde_json::json;

use crate::cli::args::OutputFormat;
use crate::config::{Config, Paths};
use crate::error::PomodeskError;
use crate::output::to_json;

/// Show the effective configuration.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn config_show(config: &Config, paths: &Paths, format: OutputFormat) -> Result<String, PomodeskError> {
    match format {
        OutputFormat::Json => to_json(config),
        OutputFormat::Pretty => {
            let source = if paths.config_file.exists() {
                paths.config_file.display().to_string()
            } else {
                format!("{} (not found, using defaults)", paths.config_file.display())
            };
            let yaml = config.to_yaml()?;
            Ok(format!("{}\n{}", format!("# {source}").dimmed(), yaml.trim_end()))
        }
    }
}

/// Print the configuration and data paths.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn config_path(paths: &Paths, format: OutputFormat) -> Result<String, PomodeskError> {
    match format {
        OutputFormat::Json => to_json(&json!({
            "root": paths.root,
            "config_file": paths.config_file,
            "log_file": paths.log_file,
            "sounds": paths.sounds,
        })),
        OutputFormat::Pretty => Ok(paths.config_file.display().to_string()),
    }
}

/// Write a configuration file holding the default values.
///
/// # Errors
///
/// Returns an error if the file exists and `force` is not set, or if it
/// cannot be written.
pub fn config_init(paths: &Paths, force: bool, format: OutputFormat) -> Result<String, PomodeskError> {
    if paths.config_file.exists() && !force {
        return Err(PomodeskError::Config(format!(
            "{} already exists. Use --force to overwrite.",
            paths.config_file.display()
        )));
    }

    paths.ensure_dirs()?;
    Config::default().save_to_path(&paths.config_file)?;
    tracing::info!(path = %paths.config_file.display(), "wrote default configuration");

    match format {
        OutputFormat::Json => to_json(&json!({
            "written": paths.config_file,
        })),
        OutputFormat::Pretty => Ok(format!(
            "{} {}",
            "Wrote".green(),
            paths.config_file.display()
        )),
    }
}
