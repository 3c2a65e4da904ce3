use thiserror::Error;

/// Application-wide error types.
///
/// Every variant carries the underlying failure message, which is returned
/// to the client verbatim inside the error envelope.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Database(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    /// A remote fetch (image proxy) failed or answered with an error status.
    #[error("{0}")]
    Upstream(String),

    /// The uploaded workbook could not be read.
    #[error("{0}")]
    Import(String),

    #[error("{0}")]
    Internal(String),
}
