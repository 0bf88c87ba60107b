use serde::Serialize;
use sqlx::FromRow;

pub const ENTITY_USER: &str = "user";
pub const ACTION_CREATED: &str = "created";

/// Audit record. Written alongside user creation, read only for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct LogEntry {
    pub entity: String,
    pub action: String,
}
