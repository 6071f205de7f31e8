//! Vigneron command-line client
//!
//! Argument parsing, a typed HTTP client for the server API and plain-text
//! rendering of its responses. The binary in `main.rs` wires them together.

pub mod cli;
pub mod client;
pub mod output;

pub use cli::{Cli, Commands};
pub use client::{ApiClient, ClientError};
