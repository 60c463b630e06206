//! HTTP request handlers for the Sparqlgate server

mod endpoints;
mod query;

pub use endpoints::EndpointsHandler;
pub use query::QueryHandler;
