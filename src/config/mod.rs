//! Configuration module
//!
//! Handles user configuration (`<config dir>/config.toml`) layered with
//! `SESSION_TREE_*` environment variables.

mod settings;

pub use settings::*;
