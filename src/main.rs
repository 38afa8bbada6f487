use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use pomodesk::cli::args::{Cli, Commands, ConfigCommands, RunArgs};
use pomodesk::cli::commands;
use pomodesk::config::{Config, Paths};
use pomodesk::logging;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let paths = Paths::new()?;
    let _log_guard = logging::init(&paths, cli.verbose);

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Run(RunArgs::default()));

    // These must work even when the config file is broken.
    let output = match command {
        Commands::Completions { shell } => commands::completions(shell)?,
        Commands::Config(args) => match args.command {
            ConfigCommands::Path => commands::config_path(&paths, cli.output.unwrap_or_default())?,
            ConfigCommands::Init { force } => {
                commands::config_init(&paths, force, cli.output.unwrap_or_default())?
            }
            ConfigCommands::Show => {
                let config = Config::load_from_path(&paths.config_file)?;
                let format = cli.output.unwrap_or(config.general.default_output);
                commands::config_show(&config, &paths, format)?
            }
        },
        Commands::Run(args) => {
            let config = Config::load_from_path(&paths.config_file)?;
            commands::run(&config, &paths, &args)?
        }
        Commands::Simulate(args) => {
            let config = Config::load_from_path(&paths.config_file)?;
            let format = cli.output.unwrap_or(config.general.default_output);
            commands::simulate(&config, &args, format)?
        }
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
