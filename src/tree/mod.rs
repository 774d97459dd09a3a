//! Options tree walking
//!
//! Resolves dispatch-key prefixes and lays out the facade shape of an options
//! tree. Only namespaced modules introduce a nested facade node; merged
//! modules contribute their members to the parent's node.

pub mod builder;
pub mod path;
pub mod shape;
pub mod walker;

pub use builder::{build_layout, LayoutEntry, LayoutNode};
pub use path::{dispatch_key, join_prefix, resolve, resolve_prefix, ModulePath, Resolved};
pub use shape::{validate, Declaration, MemberKind, ModuleShape};
pub use walker::{Placement, Walker};
