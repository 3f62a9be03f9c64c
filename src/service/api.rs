//! HTTP API publishing the current leaderboard snapshot.
//!
//! - `/toptenhashtags` - JSON array of `{"value", "count"}`, best first
//! - `/snapshot` - the same ranking wrapped with the event total and a timestamp
//! - `/metrics` - Prometheus exposition format
//! - `/table` - plain-text table
//!
//! Every handler loads one snapshot and renders it, so handlers never wait on
//! the ingestor.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::leaderboard::Leaderboard;
use crate::observers::json::JsonObserver;
use crate::observers::prometheus::PrometheusObserver;
use crate::observers::table::TableObserver;

/// Shared state of the HTTP handlers.
#[derive(Debug)]
pub struct AppState {
    board: Arc<Leaderboard<String>>,
    prometheus: PrometheusObserver,
    table: TableObserver,
}

impl AppState {
    /// Creates the state with the default observers.
    pub fn new(board: Arc<Leaderboard<String>>) -> Self {
        Self {
            board,
            prometheus: PrometheusObserver::new()
                .with_namespace("classifica")
                .with_help("events_total", "Raw events observed")
                .with_help("tallies_total", "Hashtag occurrences tallied")
                .with_help(
                    "contention_faults_total",
                    "Tallies that timed out waiting for the podium lock",
                )
                .with_help("podium_count", "Count of each hashtag on the podium"),
            table: TableObserver::new()
                .with_title("Top hashtags")
                .with_total_events(true),
        }
    }
}

/// Builds the router over `board`.
pub fn router(board: Arc<Leaderboard<String>>) -> Router {
    Router::new()
        .route("/toptenhashtags", get(top_hashtags_handler))
        .route("/snapshot", get(snapshot_handler))
        .route("/metrics", get(metrics_handler))
        .route("/table", get(table_handler))
        .with_state(Arc::new(AppState::new(board)))
}

/// Serves `app` on `listener` until `cancel` fires.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    cancel: CancellationToken,
) -> std::io::Result<()> {
    let addr: Option<SocketAddr> = listener.local_addr().ok();
    info!(addr = ?addr, "HTTP API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;

    info!("HTTP API stopped");
    Ok(())
}

fn json_response(body: Result<String, serde_json::Error>) -> Response {
    match body {
        Ok(body) => ([(header::CONTENT_TYPE, "application/json")], body).into_response(),
        Err(e) => {
            error!(error = %e, "failed to serialize snapshot");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Ranked results as a JSON array.
async fn top_hashtags_handler(State(state): State<Arc<AppState>>) -> Response {
    json_response(JsonObserver::new().to_json(&state.board.current_snapshot()))
}

/// Ranked results with the event total and a timestamp.
async fn snapshot_handler(State(state): State<Arc<AppState>>) -> Response {
    let observer = JsonObserver::new()
        .wrap_in_snapshot(true)
        .include_timestamp(true);
    json_response(observer.to_json(&state.board.current_snapshot()))
}

/// Prometheus metrics handler.
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    let snapshot = state.board.current_snapshot();
    match state
        .prometheus
        .render(&snapshot, state.board.counters().into_iter())
    {
        Ok(body) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            error!(error = %e, "failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn table_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.table.render(&state.board.current_snapshot())
}
