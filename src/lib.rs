//! Shared project configuration for the tapcast release publisher.
//!
//! The `tapcast` binary lives in the `tapcast-publisher` crate; this crate
//! owns the `tapcast.toml` schema so that tooling can read it without pulling
//! in the HTTP stack.

pub mod config;

pub use config::{
    AppcastConfig, CaskConfig, ConfigError, DEFAULT_CONFIG_FILE, HttpConfig, ProjectConfig,
};
