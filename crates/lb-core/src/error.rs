//! Errors raised by a Record Store.
//!
//! The HTTP layer turns each variant into a status code; the client folds
//! all of them into a network error.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// No such collection, or no document with that id in it.
    #[error("no {0} with id {1}")]
    NotFound(String, String),

    /// The body was not a JSON object, or its `id` was not an integer.
    #[error("bad document: {0}")]
    ValidationError(String),

    /// The data file could not be written.
    #[error("store failure: {0}")]
    Internal(String),

    /// A document with the given id is already stored.
    #[error("id taken: {0}")]
    Conflict(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
