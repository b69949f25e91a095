mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

use commands::CompileArgs;

#[derive(Parser)]
#[command(name = "s2c")]
#[command(about = "Turn a scraped university timetable into an iCalendar file")]
struct Cli {
    /// Log pipeline decisions to stderr (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a scraped schedule into an .ics file
    Compile {
        #[command(flatten)]
        args: CompileArgs,

        /// Where to write the .ics file (defaults to output_dir from config, then the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List every class occurrence without writing anything
    Preview {
        #[command(flatten)]
        args: CompileArgs,

        /// Print the compiled events as JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Show the config file location
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match cli.command {
        Commands::Compile { args, output } => commands::compile::run(&args, output),
        Commands::Preview { args, json } => commands::preview::run(&args, json),
        Commands::Config => commands::config::run(),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
