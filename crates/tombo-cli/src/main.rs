mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tombo",
    version,
    about = "Extract inventory tables from PDF documents into Excel or CSV"
)]
struct Cli {
    /// Log pipeline progress to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract tables from a PDF, show a summary and export the records
    Extract {
        /// Path to the PDF file
        input_file: PathBuf,

        /// Export format (default: from --out extension, else xlsx)
        #[arg(short, long, value_parser = ["xlsx", "csv"])]
        format: Option<String>,

        /// Export destination: a file, or a directory for dados_extraidos.<ext>
        #[arg(short = 'O', long = "out", value_name = "PATH")]
        out: Option<PathBuf>,

        /// Only show the summary, do not write an export file
        #[arg(long)]
        no_export: bool,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Also print every extracted record
        #[arg(long)]
        records: bool,

        /// Pages to scan, e.g. "1,3-5" (default: all)
        #[arg(long, default_value = "all")]
        pages: String,

        /// Table detection flavor
        #[arg(long, default_value = "lattice", value_parser = ["lattice", "stream"])]
        flavor: String,

        /// Ruling-line sensitivity for lattice detection
        #[arg(long, default_value_t = 40)]
        line_scale: u32,

        /// Do not split text that spans several cells
        #[arg(long)]
        no_split_text: bool,

        /// Keep line breaks inside cells when extracting
        #[arg(long)]
        keep_linebreaks: bool,

        /// camelot executable
        #[arg(long, env = "TOMBO_CAMELOT", default_value = "camelot")]
        camelot: PathBuf,
    },
    /// Summarize a previously exported xlsx or csv file
    Summarize {
        /// Path to a dados_extraidos.xlsx or .csv file
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Also print every record
        #[arg(long)]
        records: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "error,tombo_core=debug,tombo=debug"
    } else {
        "error"
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Extract {
            input_file,
            format,
            out,
            no_export,
            output,
            records,
            pages,
            flavor,
            line_scale,
            no_split_text,
            keep_linebreaks,
            camelot,
        } => commands::extract::run(commands::extract::ExtractArgs {
            input_file,
            format,
            out,
            no_export,
            output_format: output,
            show_records: records,
            pages,
            flavor,
            line_scale,
            split_text: !no_split_text,
            strip_linebreaks: !keep_linebreaks,
            camelot,
        }),
        Commands::Summarize {
            input_file,
            output,
            records,
        } => commands::summarize::run(input_file, &output, records),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
