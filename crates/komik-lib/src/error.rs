use thiserror::Error;

/// Failures at the fetch boundary. Callers only ever see them collapsed
/// into `None`, the variants exist for logging.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("protocol failure: {0}")]
    Protocol(String),
    #[error("not found")]
    NotFound,
}
