//! Gallery CLI - manage the image catalogue from the command line.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod exit_codes;

#[derive(Parser)]
#[command(name = "gallery")]
#[command(author, version, about = "Catalogue images by their dominant color", long_about = None)]
#[command(after_help = "Exit codes:\n  0   success\n  1   general error\n  64  invalid title or URL\n  69  image could not be fetched\n  74  image store could not be written")]
struct Cli {
    /// Path of the JSON image store
    #[arg(long, global = true, env = "DATA_FILE", default_value = "images.json")]
    data_file: PathBuf,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every catalogued image
    List,

    /// List images whose title contains a keyword (case-insensitive)
    Search {
        /// Keyword to look for
        #[arg(value_name = "KEYWORD")]
        keyword: String,
    },

    /// Fetch an image, extract its dominant color and catalogue it
    Add {
        /// Title: up to 30 letters, digits, underscores or spaces
        #[arg(value_name = "TITLE")]
        title: String,

        /// Image URL (http or https)
        #[arg(value_name = "URL")]
        url: String,

        /// Give up on the download after this many seconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,
    },

    /// Remove an image by id
    Remove {
        /// Id of the image
        #[arg(value_name = "ID")]
        id: u64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::List => commands::list::execute(&cli.data_file, None),
        Commands::Search { keyword } => commands::list::execute(&cli.data_file, Some(&keyword)),
        Commands::Add {
            title,
            url,
            timeout,
        } => commands::add::execute(&cli.data_file, &title, &url, timeout).await,
        Commands::Remove { id } => commands::remove::execute(&cli.data_file, id),
    };

    match result {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS),
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::from(exit_codes::classify(&err))
        }
    }
}
