//! Integration tests for direct-store facades, contexts and the reference store

mod cli_layout;
mod config_integration;
mod context_cache;
mod getter_context;
mod merged_modules;
