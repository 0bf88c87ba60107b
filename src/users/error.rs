use thiserror::Error;

/// Failures surfaced by the user and log repositories.
///
/// Every variant except `NotFound` carries the driver error that caused it.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("database unreachable: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),

    #[error("user {id} not found")]
    NotFound { id: i64 },

    #[error("create user transaction failed: {0}")]
    Transaction(#[source] sqlx::Error),

    #[error("update failed: {0}")]
    Update(#[source] sqlx::Error),

    #[error("delete failed: {0}")]
    Delete(#[source] sqlx::Error),
}

impl RepoError {
    /// Wrap a driver error, routing connection-class failures to
    /// `Connection` and everything else to `otherwise`.
    pub(crate) fn classify(err: sqlx::Error, otherwise: fn(sqlx::Error) -> RepoError) -> Self {
        if is_connection_error(&err) {
            RepoError::Connection(err)
        } else {
            otherwise(err)
        }
    }
}

fn is_connection_error(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_are_connection_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = RepoError::classify(sqlx::Error::Io(io), RepoError::Query);
        assert!(matches!(err, RepoError::Connection(_)));
    }

    #[test]
    fn pool_exhaustion_is_a_connection_error() {
        let err = RepoError::classify(sqlx::Error::PoolTimedOut, RepoError::Update);
        assert!(matches!(err, RepoError::Connection(_)));

        let err = RepoError::classify(sqlx::Error::PoolClosed, RepoError::Delete);
        assert!(matches!(err, RepoError::Connection(_)));
    }

    #[test]
    fn other_errors_keep_the_operation_variant() {
        let err = RepoError::classify(sqlx::Error::RowNotFound, RepoError::Update);
        assert!(matches!(err, RepoError::Update(_)));

        let err = RepoError::classify(
            sqlx::Error::ColumnNotFound("registered_at".into()),
            RepoError::Query,
        );
        assert!(matches!(err, RepoError::Query(_)));
    }

    #[test]
    fn messages_name_the_failure() {
        assert_eq!(RepoError::NotFound { id: 7 }.to_string(), "user 7 not found");

        let err = RepoError::Transaction(sqlx::Error::PoolClosed);
        assert!(err.to_string().starts_with("create user transaction failed"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
