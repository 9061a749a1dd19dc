use mongodb::{
    bson::{doc, Document},
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{ClientOptions, Collation, IndexOptions},
    sync::{Client, Collection, Database},
    IndexModel,
};

use super::traits::{IndexDefinition, SchemaStore};
use crate::{context::Context, error::ProvisionError, schema::DEFAULT_DATABASE};

const APP_NAME: &str = "swa-db-init";

// Server error codes the store reacts to.
const CODE_UNAUTHORIZED: i32 = 13;
const CODE_AUTHENTICATION_FAILED: i32 = 18;
const CODE_NAMESPACE_EXISTS: i32 = 48;
const CODE_INDEX_ALREADY_EXISTS: i32 = 68;
const CODE_INDEX_OPTIONS_CONFLICT: i32 = 85;
const CODE_INDEX_KEY_SPECS_CONFLICT: i32 = 86;
const CODE_DUPLICATE_KEY: i32 = 11000;

/// MongoDB-backed [`SchemaStore`]. The database handle keeps the client alive;
/// dropping the store releases the connection pool.
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Parse the connection string, select the target database and ping the server.
    pub fn connect(ctx: &Context) -> Result<Self, ProvisionError> {
        let mut options = ClientOptions::parse(ctx.mongodb_uri.as_str())
            .run()
            .map_err(|e| {
                ProvisionError::Connection(format!("invalid connection string: {e}"))
            })?;
        options.server_selection_timeout = Some(ctx.server_selection_timeout);
        options.app_name = Some(APP_NAME.to_string());

        let db_name = resolve_database_name(
            ctx.database.as_deref(),
            options.default_database.as_deref(),
        );

        let client = Client::with_options(options).map_err(|e| classify("connect", e))?;
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .run()
            .map_err(|e| classify("ping", e))?;

        log::info!("🔌 Connected to MongoDB database '{}'", db_name);
        let db = client.database(&db_name);
        Ok(Self { db })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }

    fn index_conflict(
        &self,
        collection: &str,
        requested: &IndexDefinition,
        err: MongoError,
    ) -> ProvisionError {
        let existing = self
            .list_indexes(collection)
            .ok()
            .and_then(|indexes| {
                indexes
                    .into_iter()
                    .find(|i| i.name == requested.name || i.same_keys(requested))
            })
            .map(|i| i.to_string())
            .unwrap_or_else(|| format!("unknown definition ({err})"));
        ProvisionError::IndexConflict {
            collection: collection.to_string(),
            requested: requested.to_string(),
            existing,
        }
    }
}

impl SchemaStore for MongoStore {
    fn database_name(&self) -> &str {
        self.db.name()
    }

    fn collection_names(&self) -> Result<Vec<String>, ProvisionError> {
        self.db
            .list_collection_names()
            .run()
            .map_err(|e| classify("listCollections", e))
    }

    fn create_collection(&self, name: &str) -> Result<bool, ProvisionError> {
        match self.db.create_collection(name).run() {
            Ok(()) => Ok(true),
            Err(e) if server_code(&e) == Some(CODE_NAMESPACE_EXISTS) => Ok(false),
            Err(e) => Err(classify(&format!("create collection '{name}'"), e)),
        }
    }

    fn list_indexes(&self, collection: &str) -> Result<Vec<IndexDefinition>, ProvisionError> {
        let cursor = self
            .collection(collection)
            .list_indexes()
            .run()
            .map_err(|e| classify(&format!("list indexes of '{collection}'"), e))?;

        cursor
            .map(|model| {
                model
                    .map(definition_from_model)
                    .map_err(|e| classify(&format!("list indexes of '{collection}'"), e))
            })
            .collect()
    }

    fn create_index(
        &self,
        collection: &str,
        index: &IndexDefinition,
    ) -> Result<(), ProvisionError> {
        let model = model_from_definition(index);
        match self.collection(collection).create_index(model).run() {
            Ok(_) => Ok(()),
            Err(e)
                if matches!(
                    server_code(&e),
                    Some(CODE_INDEX_ALREADY_EXISTS)
                        | Some(CODE_INDEX_OPTIONS_CONFLICT)
                        | Some(CODE_INDEX_KEY_SPECS_CONFLICT)
                ) =>
            {
                Err(self.index_conflict(collection, index, e))
            }
            Err(e) => Err(classify(
                &format!("create index '{}' on '{collection}'", index.name),
                e,
            )),
        }
    }

    fn count_documents(&self, collection: &str) -> Result<u64, ProvisionError> {
        self.collection(collection)
            .count_documents(doc! {})
            .run()
            .map_err(|e| classify(&format!("count documents in '{collection}'"), e))
    }

    fn contains_id(&self, collection: &str, id: &str) -> Result<bool, ProvisionError> {
        let found = self
            .collection(collection)
            .find_one(doc! { "id": id })
            .run()
            .map_err(|e| classify(&format!("look up id in '{collection}'"), e))?;
        Ok(found.is_some())
    }

    fn insert_document(&self, collection: &str, document: Document) -> Result<(), ProvisionError> {
        match self.collection(collection).insert_one(document).run() {
            Ok(_) => Ok(()),
            Err(e) if server_code(&e) == Some(CODE_DUPLICATE_KEY) => {
                Err(ProvisionError::DuplicateKey {
                    collection: collection.to_string(),
                    message: e.to_string(),
                })
            }
            Err(e) => Err(classify(&format!("insert into '{collection}'"), e)),
        }
    }
}

/// `--database` wins, then the database named in the URI, then the default.
pub(crate) fn resolve_database_name(explicit: Option<&str>, from_uri: Option<&str>) -> String {
    explicit
        .filter(|s| !s.is_empty())
        .or(from_uri.filter(|s| !s.is_empty()))
        .unwrap_or(DEFAULT_DATABASE)
        .to_string()
}

fn model_from_definition(index: &IndexDefinition) -> IndexModel {
    let options = IndexOptions::builder()
        .name(Some(index.name.clone()))
        .unique(index.unique.then_some(true))
        .expire_after(index.expire_after)
        .sparse(index.sparse.then_some(true))
        .partial_filter_expression(index.partial_filter.clone())
        .collation(
            index
                .collation
                .as_ref()
                .map(|locale| Collation::builder().locale(locale.clone()).build()),
        )
        .build();
    IndexModel::builder()
        .keys(index.keys.clone())
        .options(Some(options))
        .build()
}

fn definition_from_model(model: IndexModel) -> IndexDefinition {
    let options = model.options.unwrap_or_default();
    IndexDefinition {
        name: options.name.unwrap_or_default(),
        keys: model.keys,
        unique: options.unique.unwrap_or(false),
        expire_after: options.expire_after,
        partial_filter: options.partial_filter_expression,
        sparse: options.sparse.unwrap_or(false),
        collation: options.collation.map(|c| c.locale),
    }
}

fn server_code(err: &MongoError) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Command(cmd) => Some(cmd.code),
        ErrorKind::Write(WriteFailure::WriteError(write)) => Some(write.code),
        _ => None,
    }
}

fn classify(operation: &str, err: MongoError) -> ProvisionError {
    match err.kind.as_ref() {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::DnsResolve { .. }
        | ErrorKind::ConnectionPoolCleared { .. } => {
            ProvisionError::Connection(format!("{operation}: {err}"))
        }
        ErrorKind::Authentication { .. } => ProvisionError::Permission {
            operation: operation.to_string(),
            message: err.to_string(),
        },
        _ => match server_code(&err) {
            Some(code) if is_permission_code(code) => ProvisionError::Permission {
                operation: operation.to_string(),
                message: err.to_string(),
            },
            _ => ProvisionError::Store {
                operation: operation.to_string(),
                source: err,
            },
        },
    }
}

fn is_permission_code(code: i32) -> bool {
    code == CODE_UNAUTHORIZED || code == CODE_AUTHENTICATION_FAILED
}
