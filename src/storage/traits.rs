use std::fmt;
use std::time::Duration;

use mongodb::bson::{Bson, Document};

use crate::error::ProvisionError;

/// Store-independent view of one index: what it covers and the constraints it enforces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndexDefinition {
    pub name: String,
    pub keys: Document,
    pub unique: bool,
    pub expire_after: Option<Duration>,
    /// Restricts the index, and any uniqueness it enforces, to matching documents.
    pub partial_filter: Option<Document>,
    /// Documents missing an indexed field are left out of the index.
    pub sparse: bool,
    /// Collation locale; string comparison differs from the binary default.
    pub collation: Option<String>,
}

impl IndexDefinition {
    /// True when both indexes cover the same fields in the same order and direction.
    pub fn same_keys(&self, other: &IndexDefinition) -> bool {
        if self.keys.len() != other.keys.len() {
            return false;
        }
        self.keys
            .iter()
            .zip(other.keys.iter())
            .all(|((field_a, dir_a), (field_b, dir_b))| {
                field_a == field_b && key_direction(dir_a) == key_direction(dir_b)
            })
    }

    /// Same keys and the same constraints: uniqueness, expiry, partial filter,
    /// sparseness and collation. Names are not compared.
    pub fn is_equivalent(&self, other: &IndexDefinition) -> bool {
        self.same_keys(other)
            && self.unique == other.unique
            && self.expire_after.map(|d| d.as_secs()) == other.expire_after.map(|d| d.as_secs())
            && self.partial_filter == other.partial_filter
            && self.sparse == other.sparse
            && self.collation == other.collation
    }
}

impl fmt::Display for IndexDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.keys)?;
        if self.unique {
            write!(f, " unique")?;
        }
        if let Some(ttl) = self.expire_after {
            write!(f, " expireAfterSeconds={}", ttl.as_secs())?;
        }
        if self.sparse {
            write!(f, " sparse")?;
        }
        if let Some(filter) = &self.partial_filter {
            write!(f, " partialFilterExpression={}", filter)?;
        }
        if let Some(locale) = &self.collation {
            write!(f, " collation={}", locale)?;
        }
        Ok(())
    }
}

// Shells may send `1` as a double; the server echoes whatever numeric type it got.
fn key_direction(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(v) => Some(i64::from(*v)),
        Bson::Int64(v) => Some(*v),
        Bson::Double(v) if v.fract() == 0.0 => Some(*v as i64),
        _ => None,
    }
}

/// The database handle the initializer works against.
///
/// Every method maps driver failures into [`ProvisionError`] so callers can
/// tell connection, permission and conflict failures apart.
pub trait SchemaStore {
    /// Name of the database this handle targets.
    fn database_name(&self) -> &str;

    fn collection_names(&self) -> Result<Vec<String>, ProvisionError>;

    /// Returns `true` if the collection was created, `false` if it already existed.
    fn create_collection(&self, name: &str) -> Result<bool, ProvisionError>;

    fn list_indexes(&self, collection: &str) -> Result<Vec<IndexDefinition>, ProvisionError>;

    fn create_index(
        &self,
        collection: &str,
        index: &IndexDefinition,
    ) -> Result<(), ProvisionError>;

    fn count_documents(&self, collection: &str) -> Result<u64, ProvisionError>;

    /// Whether a document whose `id` field equals `id` exists.
    fn contains_id(&self, collection: &str, id: &str) -> Result<bool, ProvisionError>;

    fn insert_document(&self, collection: &str, document: Document) -> Result<(), ProvisionError>;
}
