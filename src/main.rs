use chargefield::config::Config;
use chargefield::error::FieldResult;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with region/solver/render settings
    #[arg(global = true, long = "config")]
    config_file: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Solve one charge set, write the plot and print the field report
    Solve(cmd::solve::SolveArgs),
    /// Solve several charge files in parallel
    Batch(cmd::batch::BatchArgs),
    /// List the built-in charge arrangements
    Presets,
}

/// Defaults, then the JSON file, then whatever was typed on the command line.
fn resolve_config(
    path: Option<&str>,
    cli_config: &Config,
    sub_matches: Option<&ArgMatches>,
) -> FieldResult<Config> {
    let Some(path) = path else {
        return Ok(cli_config.clone());
    };

    info!("⚙️  Loading configuration from: {}", path);
    let mut config = Config::load_from_file(path)?;
    if let Some(matches) = sub_matches {
        config.merge_from_cli(cli_config, matches);
    }
    Ok(config)
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Solve(args) => {
            resolve_config(
                cli.config_file.as_deref(),
                &args.config,
                matches.subcommand_matches("solve"),
            )
            .and_then(|config| cmd::solve::run(args, &config))
        }
        Commands::Batch(args) => {
            resolve_config(
                cli.config_file.as_deref(),
                &args.config,
                matches.subcommand_matches("batch"),
            )
            .and_then(|config| cmd::batch::run(args, &config))
        }
        Commands::Presets => {
            reports::print_presets_table();
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
