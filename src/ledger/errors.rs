use thiserror::Error;

/// Errors that can arise while reading, mutating or persisting the ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Wrapper around IO errors (data directory creation, file writes, locks).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted store did not match the expected record shape.
    #[error("failed to decode {store}: {source}")]
    Decode {
        store: String,
        #[source]
        source: serde_json::Error,
    },

    /// A store could not be serialized back to JSON.
    #[error("failed to encode {store}: {source}")]
    Encode {
        store: String,
        #[source]
        source: serde_json::Error,
    },

    /// A quantity or balance argument that is not an integer.
    #[error("not a number: {0}")]
    InvalidNumber(String),

    /// Malformed denomination amount such as `5 bananas`.
    #[error("invalid currency amount: {0}")]
    InvalidCurrency(String),
}
