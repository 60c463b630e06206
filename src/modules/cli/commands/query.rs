//! Query command implementation

use clap::Args;
use sparqlgate_core::GatewayError;
use sparqlgate_parser::parse_file;
use sparqlgate_runtime::Runtime;
use sparqlgate_types::runtime::{ErrorResponse, QueryResponse};
use sparqlgate_types::QueryOutcome;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

/// Query command arguments
#[derive(Args, Debug)]
pub struct QueryCommand {
    /// Name of the configured endpoint
    pub endpoint: String,

    /// Query text (read from stdin when neither --query nor --query-file is given)
    #[arg(short, long, conflicts_with = "query_file")]
    pub query: Option<String>,

    /// Read the query text from a file
    #[arg(long)]
    pub query_file: Option<String>,
}

impl QueryCommand {
    /// Execute the query command
    pub async fn execute(&self, config_path: &str) -> Result<(), GatewayError> {
        info!("Loading configuration from: {}", config_path);
        let model = parse_file(config_path)?;
        let runtime = Runtime::new(model)?;

        let query = self.read_query().await?;
        debug!("Query text is {} bytes", query.len());

        let outcome = runtime.gateway().execute(&self.endpoint, &query).await;
        let (body, result) = render(outcome)?;
        println!("{}", body);
        result
    }

    async fn read_query(&self) -> Result<String, GatewayError> {
        if let Some(query) = &self.query {
            return Ok(query.clone());
        }
        if let Some(path) = &self.query_file {
            return tokio::fs::read_to_string(path).await.map_err(|e| {
                GatewayError::Config(format!("Failed to read query file '{}': {}", path, e))
            });
        }

        let mut query = String::new();
        tokio::io::stdin().read_to_string(&mut query).await?;
        Ok(query)
    }
}

/// JSON body to print, plus the command result
fn render(outcome: QueryOutcome) -> Result<(String, Result<(), GatewayError>), GatewayError> {
    match outcome {
        QueryOutcome::Success { data } => {
            let body = serde_json::to_string_pretty(&QueryResponse::new(data))?;
            Ok((body, Ok(())))
        }
        QueryOutcome::Failure(failure) => {
            let body = serde_json::to_string_pretty(&ErrorResponse::from(&failure))?;
            Ok((body, Err(failure.into())))
        }
    }
}
