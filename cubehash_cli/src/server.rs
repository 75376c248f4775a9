//! HTTP front end for the artifact origin

use anyhow::{Context, Result};
use axum::{
    Router,
    body::Body,
    extract::{Path, State},
    http::{self, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use cubehash_core::assets::{AssetOrigin, AssetResponse, AssetRoute, FsObjectStore, ObjectStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::ServerConfig;

/// Build the router for an origin
pub fn router<S: ObjectStore + 'static>(origin: Arc<AssetOrigin<S>>) -> Router {
    Router::new()
        .route("/cubehash-wasm/:version/:file", get(serve_flat::<S>))
        .route(
            "/cubehash-wasm/:version/:implementation/:file",
            get(serve_nested::<S>),
        )
        .fallback(not_found)
        .with_state(origin)
}

/// Serve the asset root until interrupted
pub async fn run(config: &ServerConfig) -> Result<()> {
    let addr: SocketAddr = config
        .bind_address
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.bind_address))?;
    if !config.asset_root.is_dir() {
        log::warn!(
            "Asset root {} is not a directory; every request will miss",
            config.asset_root.display()
        );
    }

    let origin = Arc::new(AssetOrigin::new(FsObjectStore::new(&config.asset_root)));
    let app = router(origin);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    log::info!(
        "Serving {} on http://{}",
        config.asset_root.display(),
        listener.local_addr()?
    );
    eprintln!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}

async fn serve_flat<S: ObjectStore + 'static>(
    State(origin): State<Arc<AssetOrigin<S>>>,
    Path((version, file)): Path<(String, String)>,
) -> Response {
    respond(&origin, AssetRoute::new(&version, None, &file)).await
}

async fn serve_nested<S: ObjectStore + 'static>(
    State(origin): State<Arc<AssetOrigin<S>>>,
    Path((version, implementation, file)): Path<(String, String, String)>,
) -> Response {
    respond(
        &origin,
        AssetRoute::new(&version, Some(&implementation), &file),
    )
    .await
}

async fn not_found() -> Response {
    to_http(AssetResponse::not_found())
}

async fn respond<S: ObjectStore>(origin: &AssetOrigin<S>, route: Option<AssetRoute>) -> Response {
    let Some(route) = route else {
        return to_http(AssetResponse::not_found());
    };

    match origin.serve(&route).await {
        Ok(response) => to_http(response),
        Err(e) => {
            log::warn!("Failed to read {}: {e}", route.key());
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn to_http(response: AssetResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = http::Response::builder().status(status);
    for (name, value) in &response.headers {
        builder = builder.header(*name, value.as_str());
    }
    builder
        .body(Body::from(response.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
