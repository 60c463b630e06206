//! Sparqlgate CLI
//!
//! This crate provides the command-line interface for Sparqlgate including:
//! - run: Start the server
//! - dev: Start in development mode with hot reload
//! - query: Execute a single query from the command line
//! - init: Initialize a new Sparqlgate configuration

pub mod commands;

pub use commands::{Cli, Commands, LogFormat};
