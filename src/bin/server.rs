use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wingstats_bot::config::ServiceConfig;
use wingstats_bot::core::{ParseRequest, ParseResponse};
use wingstats_bot::error::WingStatsError;
use wingstats_bot::service::{self, CommandReader, ScorecardReader};

#[derive(Clone)]
struct AppState {
    reader: Arc<dyn ScorecardReader>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    detail: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scorebird_server=debug,wingstats_bot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServiceConfig::from_env();
    let reader_cmd = config.reader_cmd.clone().ok_or_else(|| {
        anyhow::anyhow!("SCOREBIRD_READER_CMD must point at the scorecard reader executable")
    })?;

    tracing::info!("🚀 Starting ScoreBird parse service");
    tracing::info!("🔍 Reader: {} (timeout {}s)", reader_cmd, config.reader_timeout.as_secs());
    tracing::info!("🔌 Port: {}", config.port);

    let state = AppState {
        reader: Arc::new(CommandReader::new(reader_cmd, config.reader_timeout)),
    };

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/parse", post(parse_handler))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("🐦 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}

async fn parse_handler(
    State(state): State<AppState>,
    Json(req): Json<ParseRequest>,
) -> Result<Json<ParseResponse>, AppError> {
    let start = Instant::now();

    let response = service::parse_image(state.reader.as_ref(), &req.image).await?;

    tracing::info!(
        "✅ Parsed {} players, winners: {:?} ({}ms)",
        response.players.len(),
        response.winners,
        start.elapsed().as_millis()
    );

    Ok(Json(response))
}

// Error handling
struct AppError(WingStatsError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let detail = service::failure_detail(&self.0);

        tracing::error!("❌ Error: {} - {}", status, detail);

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

impl From<WingStatsError> for AppError {
    fn from(err: WingStatsError) -> Self {
        Self(err)
    }
}
