//! HTTP server facade for Folio with Axum, error handling, and OpenAPI support.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;

use folio_kernel::settings::{ServerSettings, Settings};
use folio_kernel::{InitCtx, ModuleRegistry};

pub mod error;
pub mod openapi;
pub mod router;

use router::{AppState, RouterBuilder};

/// Bootstrap storage and modules, then serve until Ctrl-C.
///
/// A storage bootstrap failure does not abort startup: the server still binds
/// and answers every request with a 500 carrying the failure text.
pub async fn start_server(
    registry: Arc<ModuleRegistry>,
    settings: &Settings,
) -> anyhow::Result<()> {
    let state = match folio_db::bootstrap(&settings.database, &registry).await {
        Ok(db) => {
            let ctx = InitCtx {
                settings,
                db: &db,
            };
            registry.init_modules(&ctx).await?;
            registry.start_modules(&ctx).await?;
            AppState::ready(Arc::clone(&registry), db)
        }
        Err(err) => {
            let reason = format!("{err:#}");
            tracing::error!(error = %reason, "storage bootstrap failed, refusing all requests");
            AppState::unavailable(reason)
        }
    };
    let ready = matches!(state, AppState::Ready { .. });

    tracing::info!(
        "starting HTTP server on {}:{}",
        settings.server.host,
        settings.server.port
    );

    let app = build_router(state, &settings.server);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", settings.server.host, settings.server.port))
            .await
            .context("failed to bind to address")?;

    tracing::info!(
        "HTTP server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    if ready {
        registry.stop_modules().await?;
    }

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Build the main HTTP router with global middlewares around the dispatcher
pub fn build_router(state: AppState, settings: &ServerSettings) -> Router {
    let mut router_builder = RouterBuilder::new(state)
        .with_tracing()
        .with_request_id()
        .with_timeout(settings.request_timeout_ms)
        .with_json_rejections();

    if settings.cors {
        router_builder = router_builder.with_cors();
    }

    router_builder.with_panic_guard().build()
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
