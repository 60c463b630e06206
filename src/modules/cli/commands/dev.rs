//! Dev command implementation with hot reload

use clap::Args;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use sparqlgate_core::GatewayError;
use sparqlgate_parser::parse_file;
use sparqlgate_runtime::Runtime;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Dev command arguments
#[derive(Args, Debug)]
pub struct DevCommand {
    /// Override server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Debounce delay in milliseconds for file changes
    #[arg(long, default_value = "500")]
    pub debounce: u64,
}

impl DevCommand {
    /// Execute the dev command with file watching
    pub async fn execute(&self, config_path: &str) -> Result<(), GatewayError> {
        info!("Starting development mode with hot reload");
        info!("Watching: {}", config_path);

        let model = parse_file(config_path)?;

        // Port override is kept by the runtime across reloads
        let runtime = Arc::new(Runtime::with_port_override(model, self.port)?);

        let (tx, rx) = mpsc::channel::<()>(16);
        let config_file = PathBuf::from(config_path);

        // Editors often replace the file, so watch its directory and filter
        let watch_dir = config_file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let file_name = config_file.file_name().map(|n| n.to_os_string());

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| match result {
                Ok(event) if touches_file(&event, file_name.as_deref()) => {
                    // A full channel already has a reload pending
                    let _ = tx.try_send(());
                }
                Ok(_) => {}
                Err(e) => error!("File watcher error: {}", e),
            },
            Config::default().with_poll_interval(Duration::from_millis(500)),
        )
        .map_err(|e| GatewayError::Internal(format!("Failed to create file watcher: {}", e)))?;

        watcher
            .watch(&watch_dir, RecursiveMode::NonRecursive)
            .map_err(|e| {
                GatewayError::Internal(format!("Failed to watch {}: {}", watch_dir.display(), e))
            })?;

        let reload_handle = tokio::spawn(reload_loop(
            runtime.clone(),
            rx,
            config_path.to_string(),
            Duration::from_millis(self.debounce),
        ));

        let result = runtime.run().await;

        reload_handle.abort();
        drop(watcher);

        result
    }
}

/// Reload on every burst of change notifications, once the burst settles
async fn reload_loop(
    runtime: Arc<Runtime>,
    mut rx: mpsc::Receiver<()>,
    config_path: String,
    debounce: Duration,
) {
    while rx.recv().await.is_some() {
        tokio::time::sleep(debounce).await;
        while rx.try_recv().is_ok() {}

        info!("Configuration file changed, reloading...");
        reload_from(&runtime, &config_path).await;
    }
}

async fn reload_from(runtime: &Runtime, config_path: &str) -> bool {
    let model = match parse_file(config_path) {
        Ok(model) => model,
        Err(e) => {
            warn!("Failed to parse configuration: {}", e);
            warn!("Server continues with previous endpoints");
            return false;
        }
    };

    match runtime.reload(model).await {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to reload configuration: {}", e);
            warn!("Server continues with previous endpoints");
            false
        }
    }
}

fn touches_file(event: &Event, file_name: Option<&std::ffi::OsStr>) -> bool {
    if !(event.kind.is_modify() || event.kind.is_create()) {
        return false;
    }
    let Some(file_name) = file_name else {
        return true;
    };
    let hit = event
        .paths
        .iter()
        .any(|p| p.file_name() == Some(file_name));
    if hit {
        debug!("Change detected: {:?}", event.kind);
    }
    hit
}
