use clap::{Args, Subcommand};

use crate::seed::{DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_USERNAME};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(
        about = "Create collections and indexes (default command)",
        long_about = "Create any missing collections and indexes. Existing collections and matching indexes are left untouched; an incompatible pre-existing index aborts the run. Optionally seeds one admin user into an empty users collection."
    )]
    Init(InitArgs),
    #[command(
        about = "Compare the database with the expected layout",
        long_about = "Read-only check that reports missing collections, missing indexes and indexes whose definition conflicts with the expected one. Exits non-zero unless everything is in place."
    )]
    Status {
        #[arg(long, default_value_t = false, help = "Print the report as JSON")]
        json: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    #[arg(
        long,
        default_value_t = false,
        help = "Insert an admin user if the users collection is empty"
    )]
    pub seed_admin: bool,

    #[arg(
        long,
        value_name = "ID",
        requires = "seed_admin",
        help = "Admin user id (random UUID when omitted)"
    )]
    pub admin_id: Option<String>,

    #[arg(
        long,
        value_name = "NAME",
        default_value = DEFAULT_ADMIN_USERNAME,
        help = "Admin username"
    )]
    pub admin_username: String,

    #[arg(
        long,
        value_name = "EMAIL",
        default_value = DEFAULT_ADMIN_EMAIL,
        help = "Admin email"
    )]
    pub admin_email: String,

    #[arg(
        long,
        env = "SWA_ADMIN_PASSWORD",
        value_name = "PASSWORD",
        hide_env_values = true,
        help = "Admin password; prompted for when omitted on a terminal"
    )]
    pub admin_password: Option<String>,

    #[arg(long, default_value_t = false, help = "Print the provisioning report as JSON")]
    pub json: bool,
}

impl Default for InitArgs {
    fn default() -> Self {
        Self {
            seed_admin: false,
            admin_id: None,
            admin_username: DEFAULT_ADMIN_USERNAME.to_string(),
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            admin_password: None,
            json: false,
        }
    }
}
