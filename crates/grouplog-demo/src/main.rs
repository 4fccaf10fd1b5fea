use std::collections::BTreeMap;
use std::process;

use clap::{Parser, Subcommand};
use grouplog::{ConfigUpdate, Level, LoggerError, Result};
use tracing::debug;

mod diagnostics;
mod showcase;

use diagnostics::{DiagnosticsFormat, init_diagnostics};

/// Walk-through of the grouplog console logger.
#[derive(Parser, Debug)]
#[command(name = "grouplog-demo")]
#[command(version)]
#[command(about = "Walk-through of the grouplog console logger", long_about = None)]
struct Cli
{
    /// Global configuration as KEY=VALUE (repeatable), e.g. `--config icons=true`
    #[arg(short, long = "config", value_name = "KEY=VALUE", global = true)]
    config: Vec<String>,

    /// Print grouplog's internal diagnostics to stderr (filtered by RUST_LOG)
    #[arg(long, default_value_t = false, global = true)]
    diagnostics: bool,

    /// Diagnostics format: `pretty` or `compact`
    #[arg(long, default_value = "pretty", global = true)]
    diagnostics_format: DiagnosticsFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands
{
    /// Show every output option one section at a time
    Showcase,
    /// Emit a single message
    Emit
    {
        /// Logger group
        #[arg(short, long, default_value = "app")]
        group: String,
        /// Message level
        #[arg(short, long, default_value = "info")]
        level: Level,
        /// Data to dump after the line, as KEY=VALUE (repeatable)
        #[arg(short, long = "data", value_name = "KEY=VALUE")]
        data: Vec<String>,
        /// Message text
        message: String,
    },
    /// List the level catalog
    Levels,
}

fn main()
{
    let cli = Cli::parse();

    let diagnostics = if cli.diagnostics {
        init_diagnostics(cli.diagnostics_format)
    } else {
        Ok(())
    };
    if let Err(e) = diagnostics {
        eprintln!("Failed to initialize diagnostics: {e}");
        process::exit(1);
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()>
{
    grouplog::init_from_env()?;
    for pair in &cli.config {
        grouplog::configure(pair.parse::<ConfigUpdate>()?);
    }

    match cli.command {
        Commands::Showcase => showcase::run(),
        Commands::Emit {
            group,
            level,
            data,
            message,
        } => {
            let data = parse_data(&data)?;
            let logger = grouplog::logger(group.as_str())?;
            let emitted = if data.is_empty() {
                logger.log(level, &message, None)?
            } else {
                logger.log(level, &message, Some(&data))?
            };
            if !emitted {
                debug!(%level, group = %group, "message filtered out");
            }
            Ok(())
        }
        Commands::Levels => {
            print_levels();
            Ok(())
        }
    }
}

fn parse_data(pairs: &[String]) -> Result<BTreeMap<String, String>>
{
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .ok_or_else(|| LoggerError::InvalidArgument(format!("--data expects KEY=VALUE, got `{pair}`")))
        })
        .collect()
}

fn print_levels()
{
    let config = grouplog::registry().config();
    for (level, def) in config.levels.iter() {
        let name = format!("{:<10} {:>3}  {}", level.as_str(), def.severity, def.icon);
        match def.palette.filter(|_| config.color) {
            Some(palette) => println!("{}", palette.paint(&name)),
            None => println!("{name}"),
        }
    }
}
