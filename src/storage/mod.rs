pub mod mongo;
pub mod traits;

pub use mongo::MongoStore;
pub use traits::{IndexDefinition, SchemaStore};
