//! Domain error types.

use thiserror::Error;

/// Errors raised while validating or running a proximity search.
///
/// Both variants are caller input errors: the request is rejected with no
/// partial result and the service keeps serving.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid radius: {0}")]
    InvalidRadius(String),
}

/// Errors raised by the record store's write path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u64 },

    #[error("{kind} {id} already exists")]
    Duplicate { kind: &'static str, id: u64 },

    #[error("{kind} id {id} is out of range")]
    IdOutOfRange { kind: &'static str, id: u64 },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Field-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid phone number format. Please use a valid international format.")]
    PhoneNumber,

    #[error("Invalid URL format. Please provide a valid URL.")]
    WebsiteUrl,

    #[error("File too large. Size should not exceed 5 MB.")]
    FileTooLarge,

    #[error("Unsupported {kind} format. Please use {allowed}.")]
    UnsupportedFormat {
        kind: &'static str,
        allowed: &'static str,
    },

    #[error("Price cannot be negative.")]
    NegativePrice,

    #[error("Rating must be between 1 and 5.")]
    Rating,

    #[error("{what} name must be between {min} and {max} characters long.")]
    NameLength {
        what: &'static str,
        min: usize,
        max: usize,
    },
}
