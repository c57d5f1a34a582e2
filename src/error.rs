use thiserror::Error;

/// Custom Result type for this crate.
pub type Result<T> = std::result::Result<T, JmdictError>;

/// Enum representing all possible errors in the jmdict_rs library.
#[derive(Error, Debug)]
pub enum JmdictError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("XML parsing error: {0}")]
    XmlParse(#[from] quick_xml::DeError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Data directory not found or could not be determined")]
    DataDirNotFound,

    // --- Per-entry mapping failures ---
    #[error("Entry {id} has no reading elements")]
    MissingReadingElements { id: u64 },

    #[error("Entry {id} has no sense elements")]
    MissingSenseElements { id: u64 },

    #[error("Malformed entry identifier: {0:?}")]
    MalformedIdentifier(String),
}

impl JmdictError {
    /// True for errors that only invalidate a single entry, not the whole batch.
    pub fn is_entry_failure(&self) -> bool {
        matches!(
            self,
            JmdictError::MissingReadingElements { .. }
                | JmdictError::MissingSenseElements { .. }
                | JmdictError::MalformedIdentifier(_)
        )
    }
}
