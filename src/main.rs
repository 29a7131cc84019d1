use anyhow::Result;
use logscope::{CliOptions, Config, LogScopeServer, run};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.source.rust_log);

    tracing::info!("Starting logscope MCP server");

    let cli = CliOptions::from_args();
    let server = LogScopeServer::new(&config, &cli);
    server.initialize().await?;

    run::serve(server, &config.transport).await
}

fn init_tracing(default_directive: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
