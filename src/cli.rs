//! CLI domain: parse, route, output, and presentation only.
//! No facade logic; the route table calls into `tree` and formats results.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{format_keys_json, format_keys_text, format_prefix, format_tree_text};
pub use route::{load_shape, RunContext};
