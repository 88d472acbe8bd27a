mod config;
mod error;
mod model;
pub mod naming;
mod record;
mod repository;
mod store;

pub use config::{StoreConfig, STORAGE_PATH_ENV};
pub use error::{StoreError, StoreResult};
pub use model::{Getter, Model, ModelType, Relation, RelationKind, Setter};
pub use record::{Attribute, Changes, Matches, Record, Related, SetOutcome};
pub use repository::{Records, RecordsExt};
pub use store::{json_eq, matcher, matches, DocumentStore, InMemoryStore, JsonFileStore, Row};

// Re-export the derive macro for model declarations
pub use docrecord_macros::Model;
