//! Runtime server for Sparqlgate
//!
//! This crate provides the endpoint registry, the outbound transport, the
//! query gateway and the HTTP surface that exposes it.

pub mod gateway;
pub mod handlers;
pub mod registry;
pub mod server;
pub mod state;
pub mod transport;

pub use gateway::QueryGateway;
pub use handlers::{EndpointsHandler, QueryHandler};
pub use registry::EndpointRegistry;
pub use server::Runtime;
pub use transport::{HttpTransport, OutboundRequest, Transport, TransportError, TransportResponse};
