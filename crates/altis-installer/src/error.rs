//! Error types for altis-installer

/// Result type for altis-installer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while handling a lifecycle event
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The host fired an event name this plugin does not know
    #[error("Unknown lifecycle event: {name}")]
    UnknownEvent { name: String },

    /// A registered action failed; the host should abort the event
    #[error("Action {action} failed during {event}: {source}")]
    ActionFailed {
        event: String,
        action: String,
        #[source]
        source: Box<Error>,
    },

    /// Filesystem error from altis-fs
    #[error(transparent)]
    Fs(#[from] altis_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
