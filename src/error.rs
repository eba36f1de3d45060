use crate::model::TransactionId;

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the event and transaction stores.
///
/// Validation and not-found errors mean nothing was changed. A persist error means the in-memory
/// state holds the mutation but the storage write failed, so the caller may retry by saving again.
/// A load error is only ever reported through `LoadStatus::Reset`; the store has already recovered
/// to an empty state by then.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Unable to persist '{key}': {message}")]
    Persist { key: String, message: String },

    #[error("Unable to load '{key}': {message}")]
    Load { key: String, message: String },

    #[error("Transaction not found: {0}")]
    NotFound(TransactionId),
}

impl StoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        StoreError::Validation(message.into())
    }

    pub(crate) fn persist(key: &str, e: &Error) -> Self {
        StoreError::Persist {
            key: key.to_string(),
            message: format!("{e:#}"),
        }
    }

    pub(crate) fn load(key: &str, message: impl Into<String>) -> Self {
        StoreError::Load {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// The outcome of reading a store from storage. Loading never fails the caller: missing data
/// yields an empty store and unreadable data resets the store to empty.
#[derive(Debug)]
pub enum LoadStatus {
    /// Data was found and parsed; holds the number of records loaded.
    Loaded(usize),
    /// The data parsed but some records in it did not; those were skipped and the rest loaded.
    Partial { loaded: usize, skipped: usize },
    /// Nothing was stored under the key yet.
    Missing,
    /// The stored data could not be read or was not valid JSON, and the store was reset to empty.
    Reset(StoreError),
}

impl LoadStatus {
    pub fn is_reset(&self) -> bool {
        matches!(self, LoadStatus::Reset(_))
    }

    /// A note for the user when stored records were skipped or the store was reset, naming the
    /// records as `what`, e.g. `transactions`.
    pub fn warning(&self, what: &str) -> Option<String> {
        match self {
            LoadStatus::Partial { skipped, .. } => Some(format!(
                "{skipped} stored {what} could not be read and were skipped"
            )),
            LoadStatus::Reset(e) => Some(format!(
                "Stored {what} could not be read, starting empty: {e}"
            )),
            LoadStatus::Loaded(_) | LoadStatus::Missing => None,
        }
    }

    /// The number of records now held by the store.
    pub fn count(&self) -> usize {
        match self {
            LoadStatus::Loaded(n) => *n,
            LoadStatus::Partial { loaded, .. } => *loaded,
            _ => 0,
        }
    }
}
