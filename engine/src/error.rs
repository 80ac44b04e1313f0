//! Error types for the TreeType engine.

use thiserror::Error;

/// All possible errors from the TreeType engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A persisted stats payload could not be parsed back into a
    /// [`StatsCollection`](crate::StatsCollection).
    #[error("corrupt stats payload: {0}")]
    CorruptStats(String),

    #[error("stats serialization failed: {0}")]
    Serialize(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::CorruptStats("expected value at line 1".into());
        assert_eq!(
            err.to_string(),
            "corrupt stats payload: expected value at line 1"
        );

        let err = Error::Serialize("key must be a string".into());
        assert_eq!(
            err.to_string(),
            "stats serialization failed: key must be a string"
        );
    }
}
