use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use manifesto_core::{ExportFormat, Year};

mod commands;
mod logging;

#[derive(Parser, Debug)]
#[command(name = "manifesto")]
#[command(about = "Compare the impact of UK party manifestos on households and the population")]
struct Args {
    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Trim the log file once it grows past this many megabytes
    #[arg(long, default_value_t = 5, global = true)]
    log_max_mb: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every configured reform over the population and export snapshots
    Batch {
        /// Simulation recording (JSON)
        #[arg(short, long)]
        recording: PathBuf,

        /// Batch configuration (YAML); defaults to 2025-2028, all parties, both scopes
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "snapshots")]
        out: PathBuf,

        #[arg(short, long, value_enum, default_value_t = FormatArg::Both)]
        format: FormatArg,
    },

    /// Compute every party's impact on one household
    Household {
        /// Simulation recording (JSON)
        #[arg(short, long)]
        recording: PathBuf,

        /// Household form input (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Leave out indirect budget-incidence effects
        #[arg(long)]
        direct_only: bool,

        /// Print the impact rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print exported snapshots for one year
    Show {
        /// Directory holding manifesto_impact and decile_impact tables
        #[arg(short, long, default_value = "snapshots")]
        snapshots: PathBuf,

        #[arg(short, long, default_value_t = 2028)]
        year: Year,

        /// Show direct impacts only
        #[arg(long)]
        direct_only: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum FormatArg {
    Csv,
    Json,
    Both,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Both => ExportFormat::Both,
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    logging::init_logging(
        args.log_file.as_deref(),
        &args.log_level,
        logging::Rotation::from_megabytes(args.log_max_mb),
    )?;

    match args.command {
        Command::Batch {
            recording,
            config,
            out,
            format,
        } => commands::batch(&recording, config.as_deref(), &out, format.into()),
        Command::Household {
            recording,
            input,
            direct_only,
            json,
        } => commands::household(&recording, &input, direct_only, json),
        Command::Show {
            snapshots,
            year,
            direct_only,
        } => commands::show(&snapshots, year, direct_only),
    }
}
