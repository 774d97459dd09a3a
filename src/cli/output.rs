//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::FacadeError;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &FacadeError) -> String {
    match e {
        FacadeError::Options(inner) => format!("Invalid options tree: {}", inner),
        FacadeError::UnknownModule(path) => format!("No module at path {}", path),
        other => other.to_string(),
    }
}
