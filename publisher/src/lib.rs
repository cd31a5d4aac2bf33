//! tapcast publisher library.
//!
//! This crate connects the release core in `tapcast_common` to the outside
//! world: it lists releases from GitHub, downloads artefacts for signing and
//! checksums, renders Sparkle appcasts and Homebrew casks, and writes them
//! idempotently. It backs the `tapcast` CLI binary and can be driven
//! programmatically with substitute collaborators.
//!
//! # Modules
//!
//! - [`appcast`] - Sparkle feed rendering and build numbers
//! - [`cask`] - Homebrew cask rendering
//! - [`cli`] - Command-line argument definitions
//! - [`download`] - Artefact downloads over HTTPS
//! - [`error`] - Errors that abort a publishing run
//! - [`github`] - Release listing from the GitHub REST API
//! - [`naming`] - Release asset naming policy
//! - [`output`] - Run summaries for standard output
//! - [`pipeline`] - Orchestration of appcast and cask runs
//! - [`writer`] - Idempotent file writes

pub mod appcast;
pub mod cask;
pub mod cli;
pub mod download;
pub mod error;
pub mod github;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod writer;
