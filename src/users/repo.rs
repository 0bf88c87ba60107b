use sqlx::{Executor, Postgres, Transaction};
use tracing::{debug, error, info, instrument, warn};

use super::error::RepoError;
use super::repo_types::{NewUser, User, UserChanges};
use crate::logs::{repo::insert_log_tx, ACTION_CREATED, ENTITY_USER};

// ---- Queries ----

/// Return every user in whatever order the server produces.
#[instrument(skip(db))]
pub async fn list_users<'e, E>(db: E) -> Result<Vec<User>, RepoError>
where
    E: Executor<'e, Database = Postgres>,
{
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password, registered_at
          FROM users
        "#,
    )
    .fetch_all(db)
    .await
    .map_err(|e| {
        error!(error = %e, "list users failed");
        RepoError::classify(e, RepoError::Query)
    })?;

    debug!(count = users.len(), "users listed");
    Ok(users)
}

/// Fetch a single user by primary key.
#[instrument(skip(db))]
pub async fn get_user_by_id<'e, E>(db: E, id: i64) -> Result<User, RepoError>
where
    E: Executor<'e, Database = Postgres>,
{
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password, registered_at
          FROM users
         WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
    .map_err(|e| {
        error!(error = %e, "get user failed");
        RepoError::classify(e, RepoError::Query)
    })?;

    user.ok_or_else(|| {
        warn!(id, "user not found");
        RepoError::NotFound { id }
    })
}

// ---- Writes ----

/// Create a user and its `("user", "created")` log entry atomically.
///
/// `db` may be a pool, a connection, or a connection already inside a
/// transaction; in the last case the work runs on a savepoint. Either both
/// rows are committed or neither is.
#[instrument(skip(db, draft), fields(email = %draft.email))]
pub async fn insert_user<'a, A>(db: A, draft: &NewUser) -> Result<(), RepoError>
where
    A: sqlx::Acquire<'a, Database = Postgres>,
{
    let mut tx = db.begin().await.map_err(|e| {
        error!(error = %e, "begin tx failed");
        RepoError::classify(e, RepoError::Transaction)
    })?;

    if let Err(e) = insert_user_tx(&mut tx, draft).await {
        error!(error = %e, "create user failed; rolling back");
        if let Err(rb) = tx.rollback().await {
            error!(error = %rb, "rollback failed");
            return Err(RepoError::classify(rb, RepoError::Transaction));
        }
        return Err(RepoError::classify(e, RepoError::Transaction));
    }

    tx.commit().await.map_err(|e| {
        error!(error = %e, "commit tx failed");
        RepoError::classify(e, RepoError::Transaction)
    })?;

    info!("user created");
    Ok(())
}

async fn insert_user_tx(
    tx: &mut Transaction<'_, Postgres>,
    draft: &NewUser,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO users (name, email, password)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(&draft.name)
    .bind(&draft.email)
    .bind(&draft.password)
    .execute(&mut **tx)
    .await?;

    insert_log_tx(tx, ENTITY_USER, ACTION_CREATED).await
}

/// Set name and email for `id`. A missing row is not an error.
#[instrument(skip(db, changes))]
pub async fn update_user<'e, E>(db: E, id: i64, changes: &UserChanges) -> Result<(), RepoError>
where
    E: Executor<'e, Database = Postgres>,
{
    let res = sqlx::query(
        r#"
        UPDATE users
           SET name = $1, email = $2
         WHERE id = $3
        "#,
    )
    .bind(&changes.name)
    .bind(&changes.email)
    .bind(id)
    .execute(db)
    .await
    .map_err(|e| {
        error!(error = %e, "update user failed");
        RepoError::classify(e, RepoError::Update)
    })?;

    debug!(rows = res.rows_affected(), "user updated");
    Ok(())
}

/// Remove the row for `id`. Deleting a missing row is a no-op.
#[instrument(skip(db))]
pub async fn delete_user<'e, E>(db: E, id: i64) -> Result<(), RepoError>
where
    E: Executor<'e, Database = Postgres>,
{
    let res = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| {
            error!(error = %e, "delete user failed");
            RepoError::classify(e, RepoError::Delete)
        })?;

    debug!(rows = res.rows_affected(), "user deleted");
    Ok(())
}
