use sqlx::{Executor, Postgres, Transaction};
use tracing::{debug, error};

use super::repo_types::LogEntry;
use crate::users::error::RepoError;

/// Insert a log entry within the caller's transaction.
pub async fn insert_log_tx(
    tx: &mut Transaction<'_, Postgres>,
    entity: &str,
    action: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO logs (entity, action)
        VALUES ($1, $2)
        "#,
    )
    .bind(entity)
    .bind(action)
    .execute(&mut **tx)
    .await?;

    debug!(entity, action, "log entry written");
    Ok(())
}

/// Return every log entry, oldest first.
pub async fn list_logs<'e, E>(db: E) -> Result<Vec<LogEntry>, RepoError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as::<_, LogEntry>(
        r#"
        SELECT entity, action
          FROM logs
         ORDER BY id ASC
        "#,
    )
    .fetch_all(db)
    .await
    .map_err(|e| {
        error!(error = %e, "list logs failed");
        RepoError::classify(e, RepoError::Query)
    })
}
