//! CLI presentation: text and json formatters for layout listings.

use crate::error::FacadeError;
use crate::tree::{LayoutEntry, LayoutNode, ModulePath};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;

pub fn format_keys_text(entries: &[LayoutEntry]) -> String {
    if entries.is_empty() {
        return "No members declared.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Kind", "Facade path", "Dispatch key"]);
    for entry in entries {
        table.add_row(vec![
            entry.kind.to_string(),
            entry.access.clone(),
            entry.key.clone(),
        ]);
    }
    table.to_string()
}

pub fn format_keys_json(entries: &[LayoutEntry]) -> Result<String, FacadeError> {
    serde_json::to_string_pretty(entries)
        .map_err(|e| FacadeError::ConfigError(format!("Failed to serialize keys: {}", e)))
}

/// Indented facade layout: one line per namespaced module, members below
/// their node as `kind name -> key`.
pub fn format_tree_text(layout: &LayoutNode) -> String {
    let mut lines = vec!["<root>".to_string()];
    push_node(layout, 1, &mut lines);
    lines.join("\n")
}

fn push_node(node: &LayoutNode, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for kind in crate::tree::MemberKind::ALL {
        for (name, key) in node.members(kind) {
            lines.push(format!("{}{} {} -> {}", indent, kind, name, key));
        }
    }
    for (name, child) in &node.modules {
        lines.push(format!("{}{}/", indent, name));
        push_node(child, depth + 1, lines);
    }
}

pub fn format_prefix(path: &ModulePath, prefix: &str) -> String {
    if prefix.is_empty() {
        format!("{}: (root namespace)", path)
    } else {
        format!("{}: {}", path, prefix)
    }
}
