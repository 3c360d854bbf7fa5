//! Navigator: a natural-language browser automation agent.
//!
//! This crate is the CLI host; the control loop itself lives in
//! `agent-core` and its collaborator crates. See [`config::AppConfig`] for
//! the configuration surface.

pub mod cli;
pub mod config;
pub mod driver;

pub use config::AppConfig;
