//! Type definitions for Sparqlgate
//!
//! This crate contains shared type definitions used across the Sparqlgate codebase:
//! the query outcome sum type and the request/response shapes of the HTTP surface.

pub mod outcome;
pub mod runtime;

pub use outcome::{FailureKind, QueryFailure, QueryOutcome};
