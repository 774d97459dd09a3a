//! State tree assembly and module state addressing.
//!
//! Every module owns the state subtree found by following its module path
//! from the root state, namespaced or not.

use crate::error::{OptionsError, StoreError};
use crate::options::ModuleOptions;
use crate::tree::ModulePath;
use serde_json::Value;
use tracing::warn;

/// Build the initial state of `node` and every module below it.
pub fn initial_state(node: &ModuleOptions, path: &ModulePath) -> Result<Value, OptionsError> {
    let mut state = node.seed_state();
    if node.modules.is_empty() {
        return Ok(state);
    }

    let fields = state
        .as_object_mut()
        .ok_or_else(|| OptionsError::StateNotObject(path.to_string()))?;

    for (name, child) in &node.modules {
        let child_state = initial_state(child, &path.child(name.as_str()))?;
        if fields.insert(name.clone(), child_state).is_some() {
            warn!(
                module = %path,
                field = %name,
                "State field is shadowed by a module of the same name"
            );
        }
    }

    Ok(state)
}

/// Module-local state at `path`.
pub fn state_at<'a>(root: &'a Value, path: &ModulePath) -> Result<&'a Value, StoreError> {
    path.segments().iter().try_fold(root, |state, name| {
        state
            .get(name)
            .ok_or_else(|| StoreError::InvalidStatePath(path.to_string()))
    })
}

/// Mutable module-local state at `path`.
pub fn state_at_mut<'a>(root: &'a mut Value, path: &ModulePath) -> Result<&'a mut Value, StoreError> {
    path.segments().iter().try_fold(root, |state, name| {
        state
            .get_mut(name)
            .ok_or_else(|| StoreError::InvalidStatePath(path.to_string()))
    })
}
