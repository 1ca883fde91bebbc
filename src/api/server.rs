//! API server lifecycle: bind, serve, shut down on Ctrl-C.

use std::net::SocketAddr;

use thiserror::Error;

use crate::api::router::api_router;
use crate::api::types::ApiContext;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Bind `addr` and serve the API until Ctrl-C.
pub async fn serve(addr: SocketAddr, ctx: ApiContext) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    let local = listener.local_addr().unwrap_or(addr);
    tracing::info!(addr = %local, patients = ctx.roster.len(), "API server listening");

    axum::serve(listener, api_router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("API server received shutdown signal");
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::llm::FallbackChain;

    #[tokio::test]
    async fn bind_failure_is_reported() {
        let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap();

        let ctx = ApiContext::new(Vec::new(), FallbackChain::new());
        let err = serve(addr, ctx).await.unwrap_err();
        assert!(matches!(err, ServerError::Bind { .. }));
    }
}
