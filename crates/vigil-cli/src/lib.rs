//! vigil-cli
//!
//! Command-line front end: configuration loading and the command
//! implementations behind the `vigil` binary.

pub mod commands;
pub mod config;
