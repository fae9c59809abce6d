use crate::track::TrackId;

/// Result alias that carries the custom [`PendulumError`] type.
pub type Result<T> = std::result::Result<T, PendulumError>;

/// Common error type for the core crate.
///
/// The per-frame tick never produces one of these; numeric oddities in track
/// configuration degrade silently. Errors only come from the edges: loading
/// configuration, addressing tracks by id and file IO.
#[derive(Debug, thiserror::Error)]
pub enum PendulumError {
    /// Free-form message for failures without a dedicated variant.
    #[error("{0}")]
    Message(String),
    /// A track id that is not present in the bank.
    #[error("unknown track id {0}")]
    UnknownTrack(TrackId),
    /// A configuration value that the engine cannot run with.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Wrapper around JSON (de)serialisation errors.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl PendulumError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for PendulumError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for PendulumError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
