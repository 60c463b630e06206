//! Query gateway
//!
//! Resolves an endpoint name, builds the outbound request, executes it under
//! the profile's deadline and classifies the result. Every call ends in a
//! `QueryOutcome`; nothing here returns an error of another shape.

mod classify;

pub use classify::{classify, decode_payload};

use sparqlgate_core::EndpointProfile;
use sparqlgate_types::{QueryFailure, QueryOutcome};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::registry::EndpointRegistry;
use crate::transport::{OutboundRequest, Transport, TransportError};

/// Gateway between inbound query calls and remote endpoints
pub struct QueryGateway {
    registry: Arc<EndpointRegistry>,
    transport: Arc<dyn Transport>,
}

impl QueryGateway {
    /// Create a new gateway over a registry and a transport
    pub fn new(registry: Arc<EndpointRegistry>, transport: Arc<dyn Transport>) -> Self {
        Self {
            registry,
            transport,
        }
    }

    /// Resolve an endpoint name to its profile
    pub async fn resolve(&self, endpoint_name: &str) -> Result<Arc<EndpointProfile>, QueryFailure> {
        self.registry
            .lookup(endpoint_name)
            .await
            .ok_or_else(|| QueryFailure::endpoint_not_found(endpoint_name))
    }

    /// Execute a query against a named endpoint
    pub async fn execute(&self, endpoint_name: &str, query: &str) -> QueryOutcome {
        match self.resolve(endpoint_name).await {
            Ok(profile) => self.execute_profile(&profile, query).await,
            Err(failure) => {
                debug!("Endpoint '{}' is not registered", endpoint_name);
                failure.into()
            }
        }
    }

    /// Execute a query against an already resolved profile
    pub async fn execute_profile(&self, profile: &EndpointProfile, query: &str) -> QueryOutcome {
        let request = OutboundRequest::build(profile, query);
        let deadline = profile.request_timeout();
        let started = Instant::now();

        debug!(
            "Sending query to endpoint '{}' via {} ({} bytes)",
            profile.name,
            self.transport.transport_type(),
            request.body.len()
        );

        let result = match tokio::time::timeout(deadline, self.transport.send(&request)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::new(format!(
                "Request timed out after {} seconds",
                deadline.as_secs()
            ))),
        };

        let outcome = classify(result);
        match outcome.failure() {
            None => debug!("Endpoint '{}' answered in {:?}", profile.name, started.elapsed()),
            Some(failure) => warn!(
                "Query to endpoint '{}' failed after {:?}: {}",
                profile.name,
                started.elapsed(),
                failure
            ),
        }
        outcome
    }

    /// The registry this gateway resolves against
    pub fn registry(&self) -> &Arc<EndpointRegistry> {
        &self.registry
    }
}
