use anyhow::Result;

use crate::cli::Command;
use crate::context::Context;
use crate::storage::MongoStore;

pub mod init;
pub mod status;

pub trait CommandRunner {
    fn run(&self, ctx: &Context) -> Result<()>;
}

impl Command {
    pub fn run(&self, ctx: &Context) -> Result<()> {
        match self {
            Command::Init(args) => args.run(ctx),
            Command::Status { json } => status::run(ctx, *json),
        }
    }
}

/// Open the database handle for one command; it is released when dropped.
fn open_store(ctx: &Context) -> Result<MongoStore> {
    MongoStore::connect(ctx).map_err(|e| {
        if e.is_connection() {
            log::error!(
                "❌ Could not reach MongoDB at {} (timeout {:?})",
                ctx.redacted_uri(),
                ctx.server_selection_timeout
            );
        }
        anyhow::Error::new(e).context("opening database connection")
    })
}
