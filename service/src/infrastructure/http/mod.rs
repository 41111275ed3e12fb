use std::time::Duration;

use anyhow::Context;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum_prometheus::PrometheusMetricLayer;
use tokio::net;
use tower_http::timeout::TimeoutLayer;

use crate::domain::AppState;
use crate::infrastructure::http::handlers::health_check;
use crate::infrastructure::http::handlers::topics::{
    approve_topic, comment_on_topic, create_topic, delete_topic, find_topic_by_id, list_topics,
    my_topics, reject_topic, request_revision, submit_topic, topic_history, topic_stats,
    update_topic,
};

mod actor;
mod api;
mod handlers;
mod querystring;

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServerConfig<'a> {
    pub port: &'a str,
    pub request_timeout: Duration,
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

        let router = router(state, config.request_timeout)
            .route("/metrics", get(|| async move { metric_handle.render() }))
            .layer(prometheus_layer);

        let listener = net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
            .await
            .with_context(|| format!("failed to listen on {}", config.port))?;

        Ok(Self { router, listener })
    }

    /// Runs the HTTP server.
    pub async fn run(self) -> anyhow::Result<()> {
        let address = self
            .listener
            .local_addr()
            .context("failed to read listener address")?;
        tracing::info!("listening on {}", address);

        axum::serve(self.listener, self.router)
            .await
            .context("received error from running server")?;
        Ok(())
    }
}

/// Health check plus the `/api` routes, traced and bounded by `request_timeout`
fn router<S: AppState>(state: S, request_timeout: Duration) -> Router {
    let trace_layer = tower_http::trace::TraceLayer::new_for_http().make_span_with(
        |request: &axum::extract::Request<_>| {
            let uri = request.uri().to_string();
            tracing::info_span!("http_request", method = ?request.method(), uri)
        },
    );

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .layer(timeout_layer(request_timeout))
        .layer(trace_layer)
        .with_state(state)
}

/// Requests running past `request_timeout` are answered with 408
fn timeout_layer(request_timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout)
}

fn api_routes<S: AppState>() -> Router<S> {
    Router::new()
        .route("/topics", get(list_topics::<S>).post(create_topic::<S>))
        .route("/topics/my", get(my_topics::<S>))
        .route("/topics/stats", get(topic_stats::<S>))
        .route(
            "/topics/{id}",
            get(find_topic_by_id::<S>)
                .put(update_topic::<S>)
                .delete(delete_topic::<S>),
        )
        .route("/topics/{id}/history", get(topic_history::<S>))
        .route("/topics/{id}/submit", post(submit_topic::<S>))
        .route("/topics/{id}/approve", post(approve_topic::<S>))
        .route("/topics/{id}/reject", post(reject_topic::<S>))
        .route("/topics/{id}/request-revision", post(request_revision::<S>))
        .route("/topics/{id}/comment", post(comment_on_topic::<S>))
}
