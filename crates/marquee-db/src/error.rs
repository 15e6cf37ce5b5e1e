use rusqlite::ErrorCode;

pub type Result<T> = std::result::Result<T, DbError>;

/// Failure categories surfaced by the database layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Unique, foreign-key, not-null or trigger constraint rejected a write.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// The write lock could not be taken within the busy timeout.
    #[error("lock wait timeout exceeded: {0}")]
    LockTimeout(String),

    #[error("transient database error: {0}")]
    Transient(String),

    #[error("database error: {0}")]
    Fatal(String),

    /// Input rejected before any statement ran.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// A multi-statement operation was rolled back.
    #[error("{operation} failed: {source}")]
    OperationFailed {
        operation: &'static str,
        #[source]
        source: Box<DbError>,
    },
}

impl DbError {
    pub fn operation_failed(operation: &'static str, source: DbError) -> Self {
        DbError::OperationFailed {
            operation,
            source: Box::new(source),
        }
    }

    /// The innermost category, looking through `OperationFailed`.
    pub fn root(&self) -> &DbError {
        match self {
            DbError::OperationFailed { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether the caller may retry the same request unchanged. No retry
    /// happens inside this crate.
    pub fn is_retryable(&self) -> bool {
        matches!(self.root(), DbError::LockTimeout(_) | DbError::Transient(_))
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        let detail = err.to_string();
        match err.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => DbError::ConstraintViolation(detail),
            Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => {
                DbError::LockTimeout(detail)
            }
            Some(
                ErrorCode::SystemIoFailure
                | ErrorCode::OperationInterrupted
                | ErrorCode::OutOfMemory
                | ErrorCode::DiskFull,
            ) => DbError::Transient(detail),
            _ => DbError::Fatal(detail),
        }
    }
}
