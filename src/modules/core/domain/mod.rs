//! Domain models for Sparqlgate configuration

mod endpoint;
mod model;
mod types;

pub use endpoint::{
    BasicAuth, EndpointProfile, DEFAULT_CONNECTION_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
};
pub use model::Model;
pub use types::ServerConfig;
