use anyhow::{Context as _, Result};

use crate::cli::{self, Command};
use crate::context::Context;

/// Parse the command line, configure logging and run the selected command.
/// Without a subcommand the database is initialized with default options.
pub fn run() -> Result<()> {
    let cli = cli::parse();

    crate::tracing::set_log_file(cli.log_file.as_deref()).context("opening log file")?;

    let ctx = Context::from_cli(&cli);
    log_startup_info(&ctx);

    let cmd = cli
        .cmd
        .clone()
        .unwrap_or_else(|| Command::Init(cli::InitArgs::default()));
    cmd.run(&ctx)
}

fn log_startup_info(ctx: &Context) {
    log::info!("🚀 Starting swa-db-init");
    log::info!("🔗 MongoDB URI: {}", ctx.redacted_uri());
    if let Some(db) = ctx.database.as_deref() {
        log::info!("🗄️  Database override: {}", db);
    }
    if let Some(path) = ctx.log_file.as_deref() {
        log::info!("📝 Log file: {}", path.display());
    }
}
