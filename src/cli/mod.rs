//! The `navigator` command-line surface: `run`, `config schema`,
//! `config check`.

mod args;
mod commands;

pub use args::Cli;
pub use commands::dispatch;
