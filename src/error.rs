//! Error types for the direct store facade and its reference dispatch store.

use thiserror::Error;

/// Errors raised by the underlying dispatch store.
///
/// Facades never translate these; a commit through a facade fails exactly the
/// way a string-keyed commit against the store would.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Unknown mutation type: {0}")]
    UnknownMutation(String),

    #[error("Unknown action type: {0}")]
    UnknownAction(String),

    #[error("Unknown getter: {0}")]
    UnknownGetter(String),

    #[error("Action failed: {0}")]
    ActionFailed(String),

    #[error("Invalid state path: {0}")]
    InvalidStatePath(String),
}

/// Build-time errors in an options tree. Always fatal, always reported at
/// construction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("Invalid {kind} name {name:?} in module {module}: {reason}")]
    InvalidName {
        kind: &'static str,
        name: String,
        module: String,
        reason: &'static str,
    },

    #[error("State of module {0} must be an object to hold child module state")]
    StateNotObject(String),
}

/// Errors raised by facade navigation and context construction.
#[derive(Debug, Error)]
pub enum FacadeError {
    #[error("No {kind} named {name:?} on facade node {path}")]
    UnknownMember {
        kind: &'static str,
        name: String,
        path: String,
    },

    #[error("Module not found in options tree: {0}")]
    UnknownModule(String),

    #[error("Context provider is not bound to a store yet")]
    Unbound,

    #[error("Context provider is already bound to a store")]
    AlreadyBound,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to load shape file {path}: {message}")]
    ShapeFile { path: String, message: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Options error: {0}")]
    Options(#[from] OptionsError),
}

impl From<config::ConfigError> for FacadeError {
    fn from(err: config::ConfigError) -> Self {
        FacadeError::ConfigError(err.to_string())
    }
}
