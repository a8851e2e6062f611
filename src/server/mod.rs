//! HTTP surface for the explanation handler.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    error::ExplainError,
    explain::{AnalysisRequest, AnalysisResponse, ErrorResponse, Explainer},
};

pub const EXPLAIN_ROUTE: &str = "/api/code-explainer";

impl IntoResponse for ExplainError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

#[derive(Clone)]
pub struct AppState {
    explainer: Arc<Explainer>,
}

pub fn create_app(explainer: Explainer) -> Router {
    let state = AppState {
        explainer: Arc::new(explainer),
    };

    Router::new()
        .route("/health", get(health_check))
        .route(EXPLAIN_ROUTE, post(explain))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and return the listener with its resolved local address.
pub async fn bind(addr: &str) -> anyhow::Result<(TcpListener, SocketAddr)> {
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    Ok((listener, local))
}

pub async fn run_server(app: Router, listener: TcpListener) -> anyhow::Result<()> {
    info!(addr = %listener.local_addr()?, "starting code explainer server");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

async fn explain(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>, ExplainError> {
    let Json(req) = payload.map_err(|rej| ExplainError::InvalidBody(rej.body_text()))?;
    let explanation = state.explainer.analyze(&req).await?;
    Ok(Json(AnalysisResponse { explanation }))
}
