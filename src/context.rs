use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration resolved from the command line and environment.
#[derive(Clone, Debug)]
pub struct Context {
    pub mongodb_uri: String,
    pub database: Option<String>,
    pub server_selection_timeout: Duration,
    pub log_file: Option<PathBuf>,
}

impl Context {
    pub fn from_cli(cli: &crate::cli::Cli) -> Self {
        Self {
            mongodb_uri: cli.mongodb_uri.clone(),
            database: cli.database.clone(),
            server_selection_timeout: Duration::from_millis(cli.server_selection_timeout_ms),
            log_file: cli.log_file.clone(),
        }
    }

    /// The connection string with any password masked, for logging.
    pub fn redacted_uri(&self) -> String {
        redact_uri(&self.mongodb_uri)
    }
}

fn redact_uri(uri: &str) -> String {
    match url::Url::parse(uri) {
        Ok(mut parsed) => {
            if parsed.password().is_some() && parsed.set_password(Some("****")).is_err() {
                return "<unparseable connection string>".to_string();
            }
            parsed.to_string()
        }
        Err(_) => "<unparseable connection string>".to_string(),
    }
}
