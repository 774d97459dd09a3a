//! CLI route: single route table and run context. Loads shape files and hands
//! layouts to presentation.

use crate::cli::parse::Commands;
use crate::cli::presentation::{format_keys_json, format_keys_text, format_prefix, format_tree_text};
use crate::config::{ConfigLoader, FacadeConfig};
use crate::error::FacadeError;
use crate::tree::{resolve_prefix, validate, LayoutNode, MemberKind, ModulePath, ModuleShape};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Runtime context for CLI execution: the loaded configuration.
pub struct RunContext {
    config: FacadeConfig,
    config_path: Option<PathBuf>,
}

impl RunContext {
    /// Create run context from an optional config path. Uses ConfigLoader only.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, FacadeError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load()?
        };
        Ok(Self {
            config,
            config_path,
        })
    }

    pub fn config(&self) -> &FacadeConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, FacadeError> {
        debug!(config_path = ?self.config_path, "Executing command");
        match command {
            Commands::Keys {
                shape,
                format,
                kind,
            } => {
                let layout = layout_of(&load_shape(shape)?);
                let mut entries = layout.entries();
                if let Some(kind) = kind {
                    let kind = parse_kind(kind)?;
                    entries.retain(|entry| entry.kind == kind);
                }
                match format.as_str() {
                    "json" => format_keys_json(&entries),
                    "text" => Ok(format_keys_text(&entries)),
                    other => Err(FacadeError::ConfigError(format!(
                        "Invalid output format: {} (must be 'text' or 'json')",
                        other
                    ))),
                }
            }
            Commands::Tree { shape } => Ok(format_tree_text(&layout_of(&load_shape(shape)?))),
            Commands::Prefix { shape, module } => {
                let shape = load_shape(shape)?;
                let path = ModulePath::parse(module);
                let prefix = resolve_prefix(&shape, &path)?;
                Ok(format_prefix(&path, &prefix))
            }
        }
    }
}

/// Read and validate a module shape from a `.json` or `.toml` file.
pub fn load_shape(path: &Path) -> Result<ModuleShape, FacadeError> {
    let shape_error = |message: String| FacadeError::ShapeFile {
        path: path.display().to_string(),
        message,
    };

    let content = std::fs::read_to_string(path).map_err(|e| shape_error(e.to_string()))?;
    let shape: ModuleShape = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| shape_error(e.to_string()))?,
        _ => toml::from_str(&content).map_err(|e| shape_error(e.to_string()))?,
    };

    validate(&shape)?;
    info!(shape = %path.display(), "Shape loaded");
    Ok(shape)
}

fn layout_of(shape: &ModuleShape) -> LayoutNode {
    LayoutNode::from_tree(shape)
}

fn parse_kind(kind: &str) -> Result<MemberKind, FacadeError> {
    MemberKind::ALL
        .into_iter()
        .find(|candidate| candidate.as_str() == kind)
        .ok_or_else(|| {
            FacadeError::ConfigError(format!(
                "Invalid member kind: {} (must be getter, mutation or action)",
                kind
            ))
        })
}
