use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use askline::client::ApiClient;
use askline::config::Config;
use askline::error::Result;
use askline::health::{self, HealthProbeJob};
use askline::scheduler::Scheduler;
use askline::ui::ChatUi;

#[derive(Parser, Debug)]
#[command(name = "askline")]
#[command(about = "Terminal chat client for a campus question-answering backend")]
#[command(version, long_version = long_version())]
struct Cli {
    /// Backend base URL, e.g. http://127.0.0.1:5001.
    #[arg(long, env = "ASKLINE_BACKEND")]
    backend: Option<String>,

    /// Config JSON path.
    #[arg(long, env = "ASKLINE_CONFIG", default_value_t = askline::runtime_paths::default_config_path())]
    config: String,

    /// Health poll cadence in seconds.
    #[arg(long)]
    health_interval: Option<u64>,
}

fn long_version() -> &'static str {
    concat!(env!("CARGO_PKG_VERSION"), " (", env!("ASKLINE_GIT_SHA"), ")")
}

#[tokio::main]
async fn main() -> Result<()> {
    askline::logging::init_tracing("askline");
    let cli = Cli::parse();

    let config = load_config(&cli.config);
    let base_url = cli.backend.unwrap_or_else(|| config.base_url());
    let poll_interval = cli
        .health_interval
        .map(|seconds| Duration::from_secs(seconds.max(1)))
        .unwrap_or_else(|| config.health_poll_interval());

    let client = Arc::new(ApiClient::new(&base_url, config.request_timeout()));

    let (status_tx, status_rx) = health::status_channel();
    let mut scheduler = Scheduler::new();
    scheduler.register_job(Arc::new(HealthProbeJob::new(
        Arc::clone(&client),
        status_tx,
        poll_interval,
    )));
    scheduler.start();

    let mut ui = ChatUi::new(client, &config, status_rx);
    let result = ui.run().await;

    scheduler.stop().await;
    result
}

fn load_config(path: &str) -> Config {
    match Config::from_file(path) {
        Ok(config) => config,
        Err(err) => {
            tracing::debug!(path, error = %err, "no config file, using convention defaults");
            Config::convention_defaults()
        }
    }
}
