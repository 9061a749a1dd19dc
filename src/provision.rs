use serde::Serialize;

use crate::error::ProvisionError;
use crate::schema::{CollectionSpec, USERS};
use crate::seed::AdminSeed;
use crate::storage::{IndexDefinition, SchemaStore};

pub const CONFIRMATION: &str = "SWA Database initialized successfully with collections and indexes";

/// How a declared index relates to what the store already has.
#[derive(Clone, Debug, PartialEq)]
pub enum IndexState {
    Missing,
    Present,
    Conflict(IndexDefinition),
}

/// Compare one declared index with the indexes already on its collection.
///
/// Several indexes may share keys when their collation or partial filter
/// differ; any equivalent one counts as present. Otherwise same keys with
/// different options, or the same name over different keys, is a conflict and
/// the existing definition is returned so it can be reported.
pub fn index_state(wanted: &IndexDefinition, existing: &[IndexDefinition]) -> IndexState {
    if existing.iter().any(|i| i.is_equivalent(wanted)) {
        return IndexState::Present;
    }
    if let Some(found) = existing
        .iter()
        .find(|i| i.same_keys(wanted) || i.name == wanted.name)
    {
        return IndexState::Conflict(found.clone());
    }
    IndexState::Missing
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedOutcome {
    Inserted { id: String },
    /// A user with the same id already exists.
    AlreadyPresent { id: String },
    /// `users` already has documents; the seed only runs on an empty collection.
    CollectionNotEmpty { existing: u64 },
    /// Another run inserted a conflicting user between the checks and the insert.
    ConcurrentInsert,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProvisionReport {
    pub database: String,
    pub collections_created: Vec<String>,
    pub collections_existing: Vec<String>,
    /// `collection.index_name`
    pub indexes_created: Vec<String>,
    pub indexes_existing: Vec<String>,
    pub seed: Option<SeedOutcome>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IndexStatus {
    pub name: String,
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CollectionStatus {
    pub name: String,
    pub exists: bool,
    pub indexes: Vec<IndexStatus>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SchemaStatus {
    pub database: String,
    pub collections: Vec<CollectionStatus>,
}

impl SchemaStatus {
    pub fn is_complete(&self) -> bool {
        self.collections
            .iter()
            .all(|c| c.exists && c.indexes.iter().all(|i| i.state == "present"))
    }
}

/// Brings a database to the declared layout. Works on an explicitly passed store handle.
pub struct Initializer<'a, S: SchemaStore + ?Sized> {
    store: &'a S,
    schema: &'a [CollectionSpec],
}

impl<'a, S: SchemaStore + ?Sized> Initializer<'a, S> {
    pub fn new(store: &'a S, schema: &'a [CollectionSpec]) -> Self {
        Self { store, schema }
    }

    /// Ensure every collection and index exists, then optionally seed the admin record.
    ///
    /// Safe to re-run: existing collections and equivalent indexes are left as they are.
    pub fn initialize(&self, seed: Option<&AdminSeed>) -> Result<ProvisionReport, ProvisionError> {
        let mut report = ProvisionReport {
            database: self.store.database_name().to_string(),
            ..ProvisionReport::default()
        };

        self.ensure_collections(&mut report)?;
        for spec in self.schema {
            let _span = ::tracing::info_span!("collection", name = spec.name).entered();
            self.ensure_indexes(spec, &mut report)?;
        }
        log::info!("{}", CONFIRMATION);

        if let Some(seed) = seed {
            report.seed = Some(self.seed_admin(seed)?);
        }
        Ok(report)
    }

    /// Read-only comparison of the store against the declared layout.
    pub fn verify(&self) -> Result<SchemaStatus, ProvisionError> {
        let present = self.store.collection_names()?;
        let mut collections = Vec::with_capacity(self.schema.len());

        for spec in self.schema {
            let exists = present.iter().any(|n| n == spec.name);
            let existing = if exists {
                self.store.list_indexes(spec.name)?
            } else {
                Vec::new()
            };
            let indexes = spec
                .indexes
                .iter()
                .map(|index| {
                    let wanted = index.definition();
                    let (state, existing) = match index_state(&wanted, &existing) {
                        IndexState::Present => ("present", None),
                        IndexState::Missing => ("missing", None),
                        IndexState::Conflict(found) => ("conflict", Some(found.to_string())),
                    };
                    IndexStatus {
                        name: wanted.name,
                        state,
                        existing,
                    }
                })
                .collect();
            collections.push(CollectionStatus {
                name: spec.name.to_string(),
                exists,
                indexes,
            });
        }

        Ok(SchemaStatus {
            database: self.store.database_name().to_string(),
            collections,
        })
    }

    fn ensure_collections(&self, report: &mut ProvisionReport) -> Result<(), ProvisionError> {
        let present = self.store.collection_names()?;
        for spec in self.schema {
            let created = if present.iter().any(|n| n == spec.name) {
                false
            } else {
                self.store.create_collection(spec.name)?
            };
            if created {
                log::info!("📁 Created collection '{}'", spec.name);
                report.collections_created.push(spec.name.to_string());
            } else {
                log::debug!("collection '{}' already exists", spec.name);
                report.collections_existing.push(spec.name.to_string());
            }
        }
        Ok(())
    }

    fn ensure_indexes(
        &self,
        spec: &CollectionSpec,
        report: &mut ProvisionReport,
    ) -> Result<(), ProvisionError> {
        let existing = self.store.list_indexes(spec.name)?;

        for index in spec.indexes {
            let wanted = index.definition();
            let label = format!("{}.{}", spec.name, wanted.name);
            match index_state(&wanted, &existing) {
                IndexState::Present => {
                    log::debug!("index {} already present", label);
                    report.indexes_existing.push(label);
                }
                IndexState::Missing => {
                    self.store.create_index(spec.name, &wanted)?;
                    log::info!("🔑 Created index {} ({})", label, wanted);
                    report.indexes_created.push(label);
                }
                IndexState::Conflict(found) => {
                    return Err(ProvisionError::IndexConflict {
                        collection: spec.name.to_string(),
                        requested: wanted.to_string(),
                        existing: found.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn seed_admin(&self, seed: &AdminSeed) -> Result<SeedOutcome, ProvisionError> {
        if self.store.contains_id(USERS, seed.id())? {
            log::info!("👤 Admin seed skipped: user id '{}' already exists", seed.id());
            return Ok(SeedOutcome::AlreadyPresent {
                id: seed.id().to_string(),
            });
        }

        let existing = self.store.count_documents(USERS)?;
        if existing > 0 {
            log::info!(
                "👤 Admin seed skipped: '{}' already holds {} document(s)",
                USERS,
                existing
            );
            return Ok(SeedOutcome::CollectionNotEmpty { existing });
        }

        match self.store.insert_document(USERS, seed.to_document()?) {
            Ok(()) => {
                log::info!("👤 Admin user '{}' created", seed.username());
                Ok(SeedOutcome::Inserted {
                    id: seed.id().to_string(),
                })
            }
            Err(ProvisionError::DuplicateKey { .. }) => {
                log::warn!("👤 Admin seed skipped: a concurrent insert won the race");
                Ok(SeedOutcome::ConcurrentInsert)
            }
            Err(e) => Err(e),
        }
    }
}
