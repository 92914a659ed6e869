use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use tracing::info;

use thoughtline::client::CompletionClient;
use thoughtline::config::load_or_init;
use thoughtline::logger;
use thoughtline::router::{run_router, RouterState};

const CONFIG_ENV: &str = "THOUGHTLINE_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let config_path = std::env::var(CONFIG_ENV)
    .map(PathBuf::from)
    .unwrap_or_else(|_| PathBuf::from("thoughtline.json"));
  let config = load_or_init(&config_path)
    .with_context(|| format!("failed to load config from {}", config_path.display()))?
    .with_env_overrides();

  logger::init(config.log_file.as_deref())?;
  info!(config = %config_path.display(), model = %config.default_model, "thoughtline starting up");

  let listener = std::net::TcpListener::bind(&config.listen_addr)
    .with_context(|| format!("failed to bind {}", config.listen_addr))?;
  info!(addr = %listener.local_addr()?, "listening");

  let state = RouterState {
    started_at: Instant::now(),
    client: CompletionClient::new(config.client_config()),
  };
  run_router(listener, state).await
}
