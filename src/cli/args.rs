use clap::Parser;
use std::env;
use std::path::PathBuf;

use crate::cli::command::Command;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Provision the SWA MongoDB database: collections, indexes and an optional admin user",
    long_about = "Creates the users, promo_codes, games, sessions, stats, devices and slots collections with their unique and TTL indexes. Safe to run repeatedly against the same database.",
    subcommand_required = false,
    arg_required_else_help = false
)]
pub struct Cli {
    #[arg(
        long,
        env = "MONGODB_URI",
        default_value = "mongodb://localhost:27017/swa_database",
        value_name = "URI",
        help = "MongoDB connection string"
    )]
    pub mongodb_uri: String,

    #[arg(
        long,
        env = "SWA_DATABASE",
        value_name = "NAME",
        help = "Target database (defaults to the one named in the URI, then swa_database)"
    )]
    pub database: Option<String>,

    #[arg(
        long,
        env = "SWA_SERVER_SELECTION_TIMEOUT_MS",
        default_value_t = 5000u64,
        value_name = "MS",
        help = "How long to wait for a reachable server before giving up"
    )]
    pub server_selection_timeout_ms: u64,

    #[arg(
        long = "log-file",
        env = "SWA_LOG_FILE",
        value_name = "PATH",
        help = "Write logs to PATH (in addition to stderr)"
    )]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

pub fn parse() -> Cli {
    let dotenv_path = env::var("DOTENV_PATH").unwrap_or(".env".into());
    if dotenvy::from_filename(&dotenv_path).is_ok() {
        eprintln!("Loaded env from {}", dotenv_path);
    }
    Cli::parse()
}
