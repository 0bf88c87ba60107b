pub mod repo;
pub mod repo_types;

pub use repo_types::{LogEntry, ACTION_CREATED, ENTITY_USER};
