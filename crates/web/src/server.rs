//! Web server implementation

use crate::config::WebConfig;
use crate::form::{calculate, CalculationForm, FormError};
use crate::page;
use crate::static_files::StaticFiles;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Form, Json, Router,
};
use calculadora_engine::{format_number, Operation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

/// Web server state
#[derive(Clone)]
pub struct WebServer {
    state: Arc<WebServerState>,
}

struct WebServerState {
    /// Static file handler
    static_files: StaticFiles,
}

/// JSON body accepted by `POST /api/calculate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateRequest {
    pub a: f64,
    pub b: f64,
    pub operacion: String,
}

/// JSON body returned by a successful `POST /api/calculate`
#[derive(Debug, Clone, Serialize)]
pub struct CalculateResponse {
    pub operacion: Operation,
    pub a: f64,
    pub b: f64,
    #[serde(serialize_with = "serialize_resultado")]
    pub resultado: f64,
    pub texto: String,
}

/// JSON numbers cannot hold infinities or NaN; those go out as the same
/// text the form shows (`"inf"`, `"-inf"`, `"NaN"`).
fn serialize_resultado<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_str(&format_number(*value))
    }
}

pub async fn serve(cfg: WebConfig) -> anyhow::Result<()> {
    WebServer::new().serve(cfg).await
}

impl WebServer {
    /// Create a new web server
    pub fn new() -> Self {
        Self {
            state: Arc::new(WebServerState {
                static_files: StaticFiles::new(),
            }),
        }
    }

    /// Build the router
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(index_handler).post(calculate_form_handler))
            .route("/api/calculate", post(calculate_api_handler))
            .route("/health", get(health_handler))
            .route("/api/health", get(health_handler))
            .route("/static/*path", get(static_handler))
            .fallback(not_found_handler)
            .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the web server and run until a shutdown signal arrives
    pub async fn serve(self, cfg: WebConfig) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(cfg.addr).await?;
        info!("Calculadora listening on http://{}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Calculadora stopped");
        Ok(())
    }
}

impl Default for WebServer {
    fn default() -> Self {
        Self::new()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

// ============================================================================
// Handlers
// ============================================================================

async fn index_handler() -> Html<String> {
    Html(page::render(None, None))
}

async fn calculate_form_handler(Form(form): Form<CalculationForm>) -> Html<String> {
    let outcome = form.calculate();
    match &outcome {
        Ok(calc) => debug!(op = %calc.operation, result = calc.result, "form calculation"),
        Err(e) => debug!(error = %e, "form rejected"),
    }
    Html(page::render(Some(&form), Some(&outcome)))
}

async fn calculate_api_handler(Json(req): Json<CalculateRequest>) -> impl IntoResponse {
    let outcome = req
        .operacion
        .parse::<Operation>()
        .map_err(FormError::from)
        .and_then(|op| calculate(op, req.a, req.b));

    match outcome {
        Ok(calc) => (
            StatusCode::OK,
            Json(CalculateResponse {
                operacion: calc.operation,
                a: calc.a,
                b: calc.b,
                resultado: calc.result,
                texto: calc.text(),
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({
                "error": e.to_string(),
                "texto": e.text(),
            })),
        )
            .into_response(),
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "calculadora-web"
    }))
}

async fn static_handler(
    State(state): State<Arc<WebServerState>>,
    Path(path): Path<String>,
) -> impl IntoResponse {
    state.static_files.serve(&path).await
}

async fn not_found_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}
