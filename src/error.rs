use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("connection error: {0}")]
    Connection(String),
    #[error("permission denied during {operation}: {message}")]
    Permission { operation: String, message: String },
    #[error("index conflict on collection '{collection}': requested {requested}, found existing {existing}")]
    IndexConflict {
        collection: String,
        requested: String,
        existing: String,
    },
    #[error("duplicate key in collection '{collection}': {message}")]
    DuplicateKey { collection: String, message: String },
    #[error("credential error: {0}")]
    Credential(String),
    #[error("failed to encode document: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),
    #[error("database error during {operation}: {source}")]
    Store {
        operation: String,
        #[source]
        source: mongodb::error::Error,
    },
}

impl ProvisionError {
    /// Whether the failure means the store could not be reached at all.
    pub fn is_connection(&self) -> bool {
        matches!(self, ProvisionError::Connection(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_conflict_message_names_collection_and_both_definitions() {
        let err = ProvisionError::IndexConflict {
            collection: "users".into(),
            requested: "username_1 { username: 1 } unique".into(),
            existing: "username_1 { username: 1 }".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'users'"));
        assert!(msg.contains("requested username_1 { username: 1 } unique"));
        assert!(msg.contains("found existing username_1 { username: 1 }"));
    }

    #[test]
    fn connection_errors_are_flagged() {
        assert!(ProvisionError::Connection("timed out".into()).is_connection());
        assert!(!ProvisionError::Credential("empty".into()).is_connection());
    }
}
