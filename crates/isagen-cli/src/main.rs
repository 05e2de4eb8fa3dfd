//! isagen CLI - generates instruction-set tables and enums for every target language

use anyhow::Result;
use clap::{Parser, Subcommand};
use isagen_core::{OutputMode, TargetLanguage, CONFIG_FILE};
use std::path::PathBuf;
use std::process::ExitCode;

mod generate;
mod list;

#[derive(Parser)]
#[command(name = "isagen")]
#[command(version = isagen_core::VERSION)]
#[command(about = "Source generator for instruction-set metadata", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and write every selected unit
    Generate {
        /// Only run units of this language (rust, csharp)
        #[arg(long)]
        lang: Option<TargetLanguage>,

        /// Only run this unit
        unit: Option<String>,
    },

    /// Report generated files that are out of date without writing them
    Check {
        /// Only check units of this language (rust, csharp)
        #[arg(long)]
        lang: Option<TargetLanguage>,

        /// Only check this unit
        unit: Option<String>,
    },

    /// List the registered generator units
    List {
        /// Only list units of this language (rust, csharp)
        #[arg(long)]
        lang: Option<TargetLanguage>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Generate { lang, unit } => {
            generate::run(&cli.config, lang, unit.as_deref(), OutputMode::Write)
        }
        Commands::Check { lang, unit } => {
            generate::run(&cli.config, lang, unit.as_deref(), OutputMode::Check)
        }
        Commands::List { lang } => {
            list::print_units(lang);
            Ok(true)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
