//! HTTP server for Sparqlgate

use axum::{
    routing::{get, post},
    Router,
};
use sparqlgate_core::{GatewayError, Model, ServerConfig};
use sparqlgate_parser::ConfigValidator;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::gateway::QueryGateway;
use crate::handlers::{EndpointsHandler, QueryHandler};
use crate::registry::EndpointRegistry;
use crate::state::AppState;
use crate::transport::{HttpTransport, Transport};

/// Inbound requests never time out sooner than this
const MIN_SERVER_TIMEOUT_SECS: u64 = 30;

/// Added to the longest endpoint request timeout so the gateway's own
/// deadline fires before the server's
const SERVER_TIMEOUT_GRACE_SECS: u64 = 5;

/// Runtime server for Sparqlgate
pub struct Runtime {
    model: RwLock<Arc<Model>>,
    registry: Arc<EndpointRegistry>,
    gateway: Arc<QueryGateway>,
    port_override: Option<u16>,
}

/// Apply port override to a model configuration
fn apply_port_override(mut model: Model, port_override: Option<u16>) -> Model {
    if let Some(port) = port_override {
        if let Some(ref mut server) = model.server {
            server.port = Some(port.to_string());
        } else {
            model.server = Some(ServerConfig {
                host: None,
                port: Some(port.to_string()),
            });
        }
    }
    model
}

/// Timeout applied to each inbound HTTP request
fn server_timeout(model: &Model) -> Duration {
    let secs = model
        .max_request_timeout_secs()
        .saturating_add(SERVER_TIMEOUT_GRACE_SECS)
        .max(MIN_SERVER_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

fn validate(model: &Model) -> Result<(), GatewayError> {
    let validator = ConfigValidator::new();
    validator.validate(model)?;
    for warning in validator.warnings(model) {
        warn!("{}", warning);
    }
    Ok(())
}

impl Runtime {
    /// Create a new runtime from a model configuration
    pub fn new(model: Model) -> Result<Self, GatewayError> {
        Self::with_port_override(model, None)
    }

    /// Create a new runtime with an optional port override
    pub fn with_port_override(
        model: Model,
        port_override: Option<u16>,
    ) -> Result<Self, GatewayError> {
        Self::with_transport(model, port_override, Arc::new(HttpTransport::new()))
    }

    /// Create a new runtime that sends queries through the given transport
    pub fn with_transport(
        model: Model,
        port_override: Option<u16>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, GatewayError> {
        validate(&model)?;
        let model = Arc::new(apply_port_override(model, port_override));

        let registry = Arc::new(EndpointRegistry::from_profiles(model.endpoints.clone()));
        let gateway = Arc::new(QueryGateway::new(registry.clone(), transport));

        Ok(Self {
            model: RwLock::new(model),
            registry,
            gateway,
            port_override,
        })
    }

    /// Build the Axum router
    pub async fn build_router(&self) -> Router {
        let state = AppState::new(self.gateway.clone());
        let timeout = server_timeout(&*self.model().await);

        // CORS configuration
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            // Query endpoint
            .route(
                "/api/sparqlquery",
                get(QueryHandler::execute_get).post(QueryHandler::execute_post),
            )
            .route("/api/endpoints", get(EndpointsHandler::list))
            // Health check
            .route("/health", get(Self::health_check))
            // State
            .with_state(state)
            // Middleware
            .layer(cors)
            .layer(TimeoutLayer::new(timeout))
            .layer(TraceLayer::new_for_http())
    }

    /// Health check endpoint
    async fn health_check() -> &'static str {
        "OK"
    }

    /// Start the server
    pub async fn run(&self) -> Result<(), GatewayError> {
        let model = self.model().await;
        let app = self.build_router().await;

        let listener = TcpListener::bind((model.host(), model.port()))
            .await
            .map_err(|e| {
                GatewayError::Server(format!(
                    "Failed to bind {}:{}: {}",
                    model.host(),
                    model.port(),
                    e
                ))
            })?;
        let addr = listener
            .local_addr()
            .map_err(|e| GatewayError::Server(format!("Failed to read local address: {}", e)))?;

        info!("Starting Sparqlgate server on http://{}", addr);
        info!("Model: {}", model.name);
        info!("Endpoints: {}", self.registry.names().await.join(", "));
        info!("Query API: http://{}/api/sparqlquery", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(Self::shutdown_signal())
            .await
            .map_err(|e| GatewayError::Server(format!("Server error: {}", e)))?;

        info!("Server stopped");
        Ok(())
    }

    /// Wait for shutdown signal
    async fn shutdown_signal() {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                error!("Failed to listen for CTRL+C: {}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    error!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                debug!("Received CTRL+C, shutting down...");
            }
            _ = terminate => {
                debug!("Received SIGTERM, shutting down...");
            }
        }
    }

    /// Reload the endpoint configuration while the server keeps serving
    ///
    /// An invalid model is rejected and the current endpoints stay in place.
    pub async fn reload(&self, new_model: Model) -> Result<(), GatewayError> {
        info!("Reloading configuration...");
        validate(&new_model)?;

        let new_model = Arc::new(apply_port_override(new_model, self.port_override));
        let mut current = self.model.write().await;

        if new_model.port() != current.port() || new_model.host() != current.host() {
            warn!(
                "Listen address changed to {}:{}; restart to apply",
                new_model.host(),
                new_model.port()
            );
        }
        if server_timeout(&new_model) > server_timeout(&current) {
            warn!(
                "Longest requestTimeout is now {}s; restart to extend the server timeout",
                new_model.max_request_timeout_secs()
            );
        }

        let count = self.registry.replace_all(new_model.endpoints.clone()).await;
        *current = new_model;

        info!("Configuration reloaded: {} endpoint(s)", count);
        Ok(())
    }

    /// Get the current model
    pub async fn model(&self) -> Arc<Model> {
        self.model.read().await.clone()
    }

    /// Get the endpoint registry
    pub fn registry(&self) -> &Arc<EndpointRegistry> {
        &self.registry
    }

    /// Get the query gateway
    pub fn gateway(&self) -> &Arc<QueryGateway> {
        &self.gateway
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{OutboundRequest, TransportError, TransportResponse};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use sparqlgate_core::EndpointProfile;
    use tower::ServiceExt;

    /// Echoes the decoded query back, or answers with the status named by the query
    struct ScriptedTransport;

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(
            &self,
            request: &OutboundRequest,
        ) -> Result<TransportResponse, TransportError> {
            let query: String = url::form_urlencoded::parse(request.body.as_bytes())
                .find(|(k, _)| k == "query")
                .map(|(_, v)| v.into_owned())
                .unwrap_or_default();

            match query.as_str() {
                "status 500" => Ok(TransportResponse::new(500, "boom")),
                "unreachable" => Err(TransportError::new("connection refused")),
                _ => Ok(TransportResponse::new(
                    200,
                    json!({ "echo": query, "url": request.url }).to_string(),
                )),
            }
        }

        fn transport_type(&self) -> &'static str {
            "scripted"
        }
    }

    fn create_test_model() -> Model {
        Model::new("test-gateway")
            .with_endpoint(EndpointProfile::new("wikidata", "http://wd/sparql"))
            .with_endpoint(EndpointProfile::new("dbpedia", "http://dbp/sparql"))
    }

    fn scripted_runtime() -> Runtime {
        Runtime::with_transport(create_test_model(), None, Arc::new(ScriptedTransport)).unwrap()
    }

    async fn send(runtime: &Runtime, request: Request<Body>) -> (StatusCode, Value) {
        let response = runtime.build_router().await.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_runtime_creation() {
        let runtime = Runtime::new(create_test_model()).unwrap();
        assert_eq!(runtime.registry().len().await, 2);
    }

    #[tokio::test]
    async fn test_runtime_rejects_invalid_model() {
        let model = Model::new("test")
            .with_endpoint(EndpointProfile::new("wd", "http://a"))
            .with_endpoint(EndpointProfile::new("wd", "http://b"));
        assert!(Runtime::new(model).is_err());
    }

    #[tokio::test]
    async fn test_runtime_with_port_override() {
        let runtime = Runtime::with_port_override(create_test_model(), Some(3000)).unwrap();
        assert_eq!(runtime.model().await.port(), 3000);
    }

    #[test]
    fn test_apply_port_override_with_existing_server() {
        let mut model = create_test_model();
        model.server = Some(ServerConfig {
            host: Some("127.0.0.1".to_string()),
            port: Some("8080".to_string()),
        });
        let result = apply_port_override(model, Some(3000)).server.unwrap();
        assert_eq!(result.port, Some("3000".to_string()));
        assert_eq!(result.host, Some("127.0.0.1".to_string()));
    }

    #[test]
    fn test_apply_port_override_none() {
        let result = apply_port_override(create_test_model(), None);
        assert!(result.server.is_none());
    }

    #[test]
    fn test_server_timeout() {
        assert_eq!(server_timeout(&create_test_model()), Duration::from_secs(35));
        assert_eq!(server_timeout(&Model::default()), Duration::from_secs(30));

        let model = Model::new("slow")
            .with_endpoint(EndpointProfile::new("wd", "http://wd").with_timeouts(10, 120));
        assert_eq!(server_timeout(&model), Duration::from_secs(125));
    }

    #[tokio::test]
    async fn test_huge_request_timeout_saturates() {
        let yaml =
            "endpoints:\n  wd:\n    url: http://wd\n    requestTimeout: 18446744073709551615\n";
        let model = sparqlgate_parser::parse_string(yaml).unwrap();
        assert_eq!(server_timeout(&model), Duration::from_secs(u64::MAX));

        let runtime = Runtime::with_transport(model, None, Arc::new(ScriptedTransport)).unwrap();
        let request = Request::get("/api/sparqlquery?endpointName=wd&query=ASK")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&runtime, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sparqlresult"]["echo"], "ASK");
    }

    #[tokio::test]
    async fn test_get_query_success() {
        let runtime = scripted_runtime();
        let request = Request::get("/api/sparqlquery?endpointName=wikidata&query=ASK%20%7B%7D")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(&runtime, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sparqlresult"]["echo"], "ASK {}");
        assert_eq!(body["sparqlresult"]["url"], "http://wd/sparql");
    }

    #[tokio::test]
    async fn test_post_json_success() {
        let runtime = scripted_runtime();
        let request = Request::post("/api/sparqlquery")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"endpointName":"dbpedia","query":"SELECT ?s {}"}"#))
            .unwrap();

        let (status, body) = send(&runtime, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sparqlresult"]["echo"], "SELECT ?s {}");
    }

    #[tokio::test]
    async fn test_post_form_success() {
        let runtime = scripted_runtime();
        let request = Request::post("/api/sparqlquery")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("endpointName=wikidata&query=SELECT+%3Fs+%7B%7D"))
            .unwrap();

        let (status, body) = send(&runtime, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sparqlresult"]["echo"], "SELECT ?s {}");
    }

    #[tokio::test]
    async fn test_missing_query_is_empty() {
        let runtime = scripted_runtime();
        let request = Request::get("/api/sparqlquery?endpointName=wikidata")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(&runtime, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sparqlresult"]["echo"], "");
    }

    #[tokio::test]
    async fn test_get_repeated_parameters_answer_json() {
        let runtime = scripted_runtime();
        let uri = "/api/sparqlquery?endpointName=nowhere&endpoint_name=wikidata&query=ASK";
        let request = Request::get(uri).body(Body::empty()).unwrap();

        let (status, body) = send(&runtime, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sparqlresult"]["echo"], "ASK");

        let request = Request::get("/api/sparqlquery?endpointName=%ZZ&query=ASK")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&runtime, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "endpoint-not-found");
    }

    #[tokio::test]
    async fn test_missing_endpoint_name() {
        let runtime = scripted_runtime();
        let request = Request::get("/api/sparqlquery?query=ASK")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(&runtime, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "missing-param");
        assert!(body["error"].get("httpcode").is_none());
    }

    #[tokio::test]
    async fn test_invalid_json_body() {
        let runtime = scripted_runtime();
        let request = Request::post("/api/sparqlquery")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(&runtime, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "invalid-request");
    }

    #[tokio::test]
    async fn test_unknown_endpoint() {
        let runtime = scripted_runtime();
        let request = Request::get("/api/sparqlquery?endpointName=nowhere&query=ASK")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(&runtime, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({
                "error": {
                    "code": "endpoint-not-found",
                    "info": "SPARQL endpoint \"nowhere\" is not configured.",
                    "httpcode": 0
                }
            })
        );
    }

    #[tokio::test]
    async fn test_remote_http_error() {
        let runtime = scripted_runtime();
        let request = Request::get("/api/sparqlquery?endpointName=wikidata&query=status%20500")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(&runtime, request).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "query-failed");
        assert_eq!(body["error"]["httpcode"], 500);
        assert_eq!(body["error"]["info"], "SPARQL query failed: HTTP 500");
    }

    #[tokio::test]
    async fn test_transport_error() {
        let runtime = scripted_runtime();
        let request = Request::get("/api/sparqlquery?endpointName=wikidata&query=unreachable")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(&runtime, request).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["httpcode"], 0);
        assert_eq!(
            body["error"]["info"],
            "SPARQL query failed: connection refused"
        );
    }

    #[tokio::test]
    async fn test_list_endpoints() {
        let runtime = scripted_runtime();
        let request = Request::get("/api/endpoints").body(Body::empty()).unwrap();

        let (status, body) = send(&runtime, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "endpoints": ["dbpedia", "wikidata"] }));
    }

    #[tokio::test]
    async fn test_health() {
        let runtime = scripted_runtime();
        let response = runtime
            .build_router()
            .await
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_reload_swaps_endpoints() {
        let runtime = Runtime::with_port_override(create_test_model(), Some(4000)).unwrap();
        let router = runtime.build_router().await;

        let next = Model::new("test-gateway")
            .with_endpoint(EndpointProfile::new("local", "http://localhost:3030/ds/sparql"));
        runtime.reload(next).await.unwrap();

        assert_eq!(runtime.registry().names().await, vec!["local".to_string()]);
        assert_eq!(runtime.model().await.port(), 4000);

        // A router built before the reload sees the new endpoints
        let response = router
            .oneshot(Request::get("/api/endpoints").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "endpoints": ["local"] }));
    }

    #[tokio::test]
    async fn test_reload_rejects_invalid_model() {
        let runtime = Runtime::new(create_test_model()).unwrap();
        let bad = Model::new("test-gateway").with_endpoint(EndpointProfile::new("", "http://x"));

        assert!(runtime.reload(bad).await.is_err());
        assert_eq!(runtime.registry().len().await, 2);
    }
}
