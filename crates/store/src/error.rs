use std::fmt;

#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite error (constraint violations surface here).
    Sql(rusqlite::Error),
    /// A row expected to exist was not found.
    NotFound { table: &'static str, id: String },
}

impl StoreError {
    /// Whether this error is a uniqueness-constraint violation.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::Sql(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sql(e) => write!(f, "sql error: {e}"),
            Self::NotFound { table, id } => write!(f, "{table}: no row with id '{id}'"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Sql(e)
    }
}
