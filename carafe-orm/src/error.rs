/// Errors produced while executing generated statements.
///
/// Failures are returned to the immediate caller; the crate never retries
/// internally.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The database rejected or failed a statement.
    #[error("driver error: {0}")]
    Driver(#[from] sqlx::Error),

    /// A statement completed but affected zero rows (or reported an insert
    /// id of zero) where the contract required at least one.
    #[error("{op} on {table}: statement affected no rows")]
    ZeroEffect {
        table: &'static str,
        op: &'static str,
    },
}

impl Error {
    /// Whether this is a zero-effect failure rather than a driver failure.
    pub fn is_zero_effect(&self) -> bool {
        matches!(self, Error::ZeroEffect { .. })
    }
}
