//! Application startup and lifecycle management.

use crate::config::{CartConfig, StoreBackend};
use crate::handlers;
use crate::services::{CartStore, InMemoryCartStore, MongoCartStore};
use axum::{
    middleware::from_fn,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use service_core::error::{route_not_found, AppError};
use service_core::middleware::metrics::metrics_middleware;
use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: CartConfig,
    pub store: Arc<dyn CartStore>,
}

impl AppState {
    pub fn new(config: CartConfig, store: Arc<dyn CartStore>) -> Self {
        Self { config, store }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home).fallback(route_not_found))
        .route(
            "/health",
            get(handlers::health_check).fallback(route_not_found),
        )
        .route(
            "/metrics",
            get(handlers::metrics_endpoint).fallback(route_not_found),
        )
        .route(
            "/carts",
            post(handlers::create_cart_item)
                .get(handlers::list_cart_items)
                .fallback(route_not_found),
        )
        .route(
            "/carts/:id",
            get(handlers::get_cart_item)
                .put(handlers::update_cart_item)
                .delete(handlers::delete_cart_item)
                .fallback(route_not_found),
        )
        .fallback(route_not_found)
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        // Outermost, so the span and the response both see the id
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::InternalError(anyhow::anyhow!("Request handler panicked: {}", detail))
        .into_response()
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Connects the configured store and binds the listener. A store that
    /// cannot be reached is a startup error.
    pub async fn build(config: CartConfig) -> Result<Self, AppError> {
        let store: Arc<dyn CartStore> = match config.store {
            StoreBackend::MongoDb => Arc::new(
                MongoCartStore::connect(&config.mongodb.uri, &config.mongodb.database)
                    .await
                    .map_err(|e| {
                        tracing::error!("Failed to connect to MongoDB: {}", e);
                        e
                    })?,
            ),
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory cart store; data will not survive restarts");
                Arc::new(InMemoryCartStore::new())
            }
        };

        Self::build_with_store(config, store).await
    }

    pub async fn build_with_store(
        config: CartConfig,
        store: Arc<dyn CartStore>,
    ) -> Result<Self, AppError> {
        let state = AppState::new(config.clone(), store);

        // Port 0 binds a random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!("Cart service listening on port {}", self.port);

        axum::serve(self.listener, build_router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
