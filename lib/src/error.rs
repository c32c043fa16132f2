use thiserror::Error;

/// Failure modes for constructing grid geometry. Every other entry point in this
/// crate is infallible by design: a malformed runtime input degrades into a
/// fallback decision instead of propagating an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid width must be positive, got {0}")]
    NonPositiveWidth(i32),
    #[error("grid height must be positive, got {0}")]
    NonPositiveHeight(i32),
}
