use thiserror::Error;

#[derive(Error, Debug)]
pub enum KVError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    /// Backend is not configured (e.g. missing REST credentials).
    #[error("{0}")]
    Unavailable(String),

    /// The remote service answered with a non-success status.
    #[error("remote error ({status}): {message}")]
    Remote { status: u16, message: String },
}
