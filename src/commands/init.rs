use anyhow::{Context as _, Result};

use super::{open_store, CommandRunner};
use crate::cli::InitArgs;
use crate::context::Context;
use crate::provision::{Initializer, ProvisionReport};
use crate::schema::SWA_SCHEMA;
use crate::seed::{self, AdminSeed};
use crate::storage::SchemaStore;

impl CommandRunner for InitArgs {
    fn run(&self, ctx: &Context) -> Result<()> {
        // Credential problems should fail before anything touches the database.
        let admin = self.admin_seed().context("preparing admin seed")?;

        let store = open_store(ctx)?;

        let report = Initializer::new(&store, SWA_SCHEMA)
            .initialize(admin.as_ref())
            .with_context(|| format!("initializing database '{}'", store.database_name()))?;

        log_summary(&report);
        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Ok(())
    }
}

impl InitArgs {
    fn admin_seed(&self) -> Result<Option<AdminSeed>> {
        if !self.seed_admin {
            return Ok(None);
        }
        let password = seed::resolve_password(self.admin_password.clone())?;
        let admin = AdminSeed::build(
            self.admin_id.clone(),
            &self.admin_username,
            &self.admin_email,
            &password,
        )?;
        Ok(Some(admin))
    }
}

fn log_summary(report: &ProvisionReport) {
    log::info!(
        "📊 Collections: {} created, {} already present",
        report.collections_created.len(),
        report.collections_existing.len()
    );
    log::info!(
        "📊 Indexes: {} created, {} already present",
        report.indexes_created.len(),
        report.indexes_existing.len()
    );
}
