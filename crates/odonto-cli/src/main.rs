mod commands;
mod output;
mod server;

use clap::{Args, Parser, Subcommand};
use odonto_core::extraction::TextMode;
use odonto_core::report::ReportLayout;
use odonto_core::ProcessOptions;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "odonto_cli=info,odonto_core=info,tower_http=info";

#[derive(Parser)]
#[command(
    name = "odonto",
    version,
    about = "Billing summaries from dental-insurance claim PDFs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every command that reads a claim document.
#[derive(Args, Clone, Copy)]
struct ExtractArgs {
    /// Scan each page on its own instead of the whole document at once
    #[arg(long)]
    per_page: bool,

    /// Produce an empty report instead of failing when nothing is found
    #[arg(long)]
    allow_empty: bool,
}

impl ExtractArgs {
    fn options(self) -> ProcessOptions {
        ProcessOptions {
            mode: if self.per_page {
                TextMode::PerPage
            } else {
                TextMode::Concatenated
            },
            allow_empty: self.allow_empty,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract billing records from a claim PDF and print the tables
    Parse {
        /// Path to the claim PDF
        input_file: PathBuf,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        #[command(flatten)]
        extract: ExtractArgs,
    },
    /// Write the billing summary spreadsheet for a claim PDF
    Report {
        /// Path to the claim PDF
        input_file: PathBuf,

        /// Where to write the xlsx file
        #[arg(short = 'O', long = "out", value_name = "FILE", default_value = "resultado.xlsx")]
        out: PathBuf,

        /// Workbook layout: summary (default) or flat
        #[arg(short, long, default_value = "summary")]
        layout: ReportLayout,

        #[command(flatten)]
        extract: ExtractArgs,
    },
    /// Serve the POST /process_pdf endpoint
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = "127.0.0.1:5000")]
        bind: SocketAddr,

        /// Directory where uploads are staged while they are processed
        #[arg(long, value_name = "DIR", default_value = "uploads")]
        upload_dir: PathBuf,

        /// Largest accepted request body, in MiB
        #[arg(long, value_name = "MIB", default_value_t = 50)]
        max_upload_mb: usize,

        #[command(flatten)]
        extract: ExtractArgs,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            input_file,
            output,
            extract,
        } => commands::parse::run(input_file, &output, extract.options()),
        Commands::Report {
            input_file,
            out,
            layout,
            extract,
        } => commands::report::run(input_file, out, layout, extract.options()),
        Commands::Serve {
            bind,
            upload_dir,
            max_upload_mb,
            extract,
        } => commands::serve::run(server::ServerConfig {
            bind,
            upload_dir,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            options: extract.options(),
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
