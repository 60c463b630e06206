//! Run command implementation

use clap::Args;
use sparqlgate_core::GatewayError;
use sparqlgate_parser::parse_file;
use sparqlgate_runtime::Runtime;
use tracing::info;

/// Run command arguments
#[derive(Args, Debug)]
pub struct RunCommand {
    /// Override server port
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl RunCommand {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> Result<(), GatewayError> {
        info!("Loading configuration from: {}", config_path);

        let model = parse_file(config_path)?;

        // Port override is applied by the runtime
        let runtime = Runtime::with_port_override(model, self.port)?;
        runtime.run().await
    }
}
