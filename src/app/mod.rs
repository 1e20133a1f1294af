//! CLI and configuration

pub mod cli;
pub mod config;

pub use cli::{Cli, Commands, ProfileAction};
pub use config::Config;
