//! Error types for the runtime.

/// Errors from running generated accessors.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Database error while executing a statement.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The subscription was cancelled and yields no more values.
    #[error("Subscription is closed")]
    SubscriptionClosed,
}

/// Result type for runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_error_converts() {
        let err: RuntimeError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, RuntimeError::Database(_)));
        assert!(err.to_string().starts_with("Database error: "));
    }

    #[test]
    fn test_closed_message() {
        assert_eq!(
            RuntimeError::SubscriptionClosed.to_string(),
            "Subscription is closed"
        );
    }
}
