use anyhow::Result;
use rmcp::{
    ServiceExt,
    transport::{
        stdio,
        streamable_http_server::{StreamableHttpService, session::local::LocalSessionManager},
    },
};

use crate::{config::TransportConfig, server::LogScopeServer};

/// Path the streamable HTTP transport is mounted under
pub const MCP_PATH: &str = "/mcp";

/// Serve `server` on the configured transport until the client disconnects
/// or the process is interrupted.
///
/// Every MCP session is handed a clone of `server`, so all sessions share one
/// filter store.
pub async fn serve(server: LogScopeServer, transport: &TransportConfig) -> Result<()> {
    match transport.transport.as_str() {
        "stdio" => serve_stdio(server).await,
        "streamable-http" | "http" => serve_http(server, &transport.bind_address).await,
        other => {
            tracing::error!("Unknown transport: {other}");
            anyhow::bail!("Unknown transport: {other}. Use 'stdio' or 'streamable-http'")
        }
    }
}

async fn serve_stdio(server: LogScopeServer) -> Result<()> {
    tracing::info!("Serving log filters over stdio");

    let running = server
        .serve(stdio())
        .await
        .inspect_err(|e| tracing::error!("Failed to start stdio session: {e:?}"))?;

    let reason = running.waiting().await?;
    tracing::info!("stdio session ended: {reason:?}");
    Ok(())
}

async fn serve_http(server: LogScopeServer, bind_address: &str) -> Result<()> {
    let sessions = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        Default::default(),
    );
    let router = axum::Router::new().nest_service(MCP_PATH, sessions);

    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    tracing::info!(
        "Serving log filters at http://{}{MCP_PATH}",
        listener.local_addr()?
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP transport stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received shutdown signal"),
        Err(e) => tracing::error!("Unable to listen for shutdown signal: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cli::CliOptions, config::Config};

    #[tokio::test]
    async fn test_unknown_transport_is_rejected() {
        let server = LogScopeServer::new(&Config::default(), &CliOptions::default());
        let transport = TransportConfig {
            transport: "carrier-pigeon".to_string(),
            ..TransportConfig::default()
        };

        let err = serve(server, &transport).await.unwrap_err();
        assert!(err.to_string().contains("carrier-pigeon"));
    }

    #[tokio::test]
    async fn test_http_bind_failure_is_reported() {
        let server = LogScopeServer::new(&Config::default(), &CliOptions::default());
        let transport = TransportConfig {
            transport: "http".to_string(),
            bind_address: "not an address".to_string(),
        };

        assert!(serve(server, &transport).await.is_err());
    }
}
