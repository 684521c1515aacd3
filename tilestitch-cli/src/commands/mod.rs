//! CLI subcommands.

pub mod common;
pub mod config;
pub mod download;
pub mod init;
pub mod locate;
