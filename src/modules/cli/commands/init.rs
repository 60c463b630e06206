//! Init command implementation

use clap::Args;
use sparqlgate_core::GatewayError;
use std::fs;
use std::path::Path;
use tracing::info;

const CONFIG_FILE: &str = "sparqlgate.yaml";
const ENV_EXAMPLE_FILE: &str = ".env.example";

/// Init command arguments
#[derive(Args, Debug)]
pub struct InitCommand {
    /// Gateway name
    #[arg(default_value = "my-gateway")]
    pub name: String,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub output: String,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,
}

impl InitCommand {
    /// Execute the init command
    pub async fn execute(&self) -> Result<(), GatewayError> {
        info!("Initializing new Sparqlgate configuration: {}", self.name);

        let output_dir = Path::new(&self.output);
        if !output_dir.exists() {
            fs::create_dir_all(output_dir)?;
        }

        let config_path = output_dir.join(CONFIG_FILE);
        let env_path = output_dir.join(ENV_EXAMPLE_FILE);

        if !self.force {
            for path in [&config_path, &env_path] {
                if path.exists() {
                    return Err(GatewayError::Config(format!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    )));
                }
            }
        }

        fs::write(&config_path, self.generate_config())?;
        info!("Created: {}", config_path.display());

        fs::write(&env_path, generate_env_example())?;
        info!("Created: {}", env_path.display());

        println!("\nSparqlgate configuration initialized!");
        println!("\nNext steps:");
        println!("  1. Edit {} to add your endpoints", CONFIG_FILE);
        println!("  2. Copy {} to .env and fill in credentials", ENV_EXAMPLE_FILE);
        println!("  3. Run: sparqlgate run -f {}", CONFIG_FILE);

        Ok(())
    }

    /// Generate configuration file content
    fn generate_config(&self) -> String {
        format!(
            r#"# Sparqlgate configuration

name: {}

server:
  port: 8080

endpoints:
  wikidata:
    url: https://query.wikidata.org/sparql
    connectionTimeout: 10
    requestTimeout: 30

  # Private endpoint with basic authentication:
  # internal:
  #   url: https://sparql.example.org/query
  #   verifySSLCertificate: true
  #   basicAuth:
  #     user: "{{{{ env.SPARQL_USER }}}}"
  #     password: "{{{{ env.SPARQL_PASSWORD }}}}"
"#,
            self.name
        )
    }
}

/// Generate .env.example content
fn generate_env_example() -> String {
    r#"# Credentials for endpoints that use basicAuth
SPARQL_USER=
SPARQL_PASSWORD=
"#
    .to_string()
}
