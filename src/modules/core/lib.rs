//! Core domain logic for Sparqlgate
//!
//! This crate contains the endpoint configuration model and the error type
//! shared by the parser, runtime and CLI crates.

pub mod domain;
pub mod error;

pub use domain::*;
pub use error::GatewayError;
