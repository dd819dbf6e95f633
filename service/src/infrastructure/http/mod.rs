use anyhow::Context;
use axum::Router;
use axum::routing::{get, patch, put};
use axum_prometheus::PrometheusMetricLayer;
use tokio::net;
use tokio::signal;

use crate::domain::AppState;
use crate::infrastructure::http::handlers::comments::{
    add_comment, delete_comment, like_comment, list_comments, update_comment,
};
use crate::infrastructure::http::handlers::health_check;
use crate::infrastructure::http::handlers::publications::{
    create_publication, delete_publication, get_publication, list_publications,
    trending_publications, update_publication,
};

mod api;
mod extract;
mod handlers;


/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServerConfig<'a> {
    pub port: &'a str,
}

/// The application's HTTP server. The underlying HTTP package is opaque to module consumers.
pub struct HttpServer {
    router: axum::Router,
    listener: net::TcpListener,
}

impl HttpServer {
    /// Returns a new HTTP server bound to the port specified in `config`.
    pub async fn new(state: impl AppState, config: HttpServerConfig<'_>) -> anyhow::Result<Self> {
        // see: https://github.com/metrics-rs/metrics
        // see: https://github.com/Ptrskay3/axum-prometheus
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

        let router = router(state)
            .route("/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer);

        let listener = net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
            .await
            .with_context(|| format!("failed to listen on {}", config.port))?;

        Ok(Self { router, listener })
    }

    /// Runs the HTTP server until Ctrl-C or SIGTERM.
    pub async fn run(self) -> anyhow::Result<()> {
        let address = self
            .listener
            .local_addr()
            .context("failed to read listener address")?;
        tracing::info!("listening on {}", address);
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("received error from running server")?;
        tracing::info!("server shut down");
        Ok(())
    }
}

/// Health check and API routes with request tracing, without the metrics endpoint
pub fn router<S: AppState>(state: S) -> Router {
    let trace_layer = tower_http::trace::TraceLayer::new_for_http().make_span_with(
        |request: &axum::extract::Request<_>| {
            let uri = request.uri().to_string();
            tracing::info_span!("http_request", method = ?request.method(), uri)
        },
    );

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .layer(trace_layer)
        .with_state(state)
}

fn api_routes<S: AppState>() -> Router<S> {
    Router::new()
        .route(
            "/publications",
            get(list_publications::<S>).post(create_publication::<S>),
        )
        .route("/publications/trending", get(trending_publications::<S>))
        .route(
            "/publications/{id}",
            get(get_publication::<S>)
                .put(update_publication::<S>)
                .delete(delete_publication::<S>),
        )
        .route(
            "/publications/{id}/comments",
            get(list_comments::<S>).post(add_comment::<S>),
        )
        .route(
            "/publications/{id}/comments/{comment_id}",
            put(update_comment::<S>).delete(delete_comment::<S>),
        )
        .route(
            "/publications/{id}/comments/{comment_id}/like",
            patch(like_comment::<S>),
        )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {}", e);
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
}
