// src/config/mod.rs
//! Configuration for encrypted-credentials
//!
//! TOML file + injected environment overrides, no global state.

pub use app::{load, load_from, Config, EditorConfig, Keys, Paths, CONFIG_ENV_VAR};
pub use paths::CredentialPaths;

mod app;
mod defaults;
mod paths;
