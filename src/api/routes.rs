use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::warn;

use crate::db::MarketStatsDao;
use crate::error::AppError;
use crate::types::MarketStats;

#[derive(Clone)]
pub struct ApiState {
    pub stats: MarketStatsDao,
    pub pool: sqlx::SqlitePool,
}

impl ApiState {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self {
            stats: MarketStatsDao::new(pool.clone()),
            pool,
        }
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/stats/market", get(get_market_stats))
        .route("/health", get(get_health))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store_reachable: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub(crate) async fn get_market_stats(
    State(state): State<ApiState>,
) -> Result<Json<MarketStats>, AppError> {
    let stats = state.stats.get_stats().await.map_err(|e| {
        warn!("Market stats build failed: {e}");
        e
    })?;
    Ok(Json(stats))
}

pub(crate) async fn get_health(State(state): State<ApiState>) -> Json<HealthResponse> {
    let store_reachable = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();
    Json(HealthResponse {
        status: if store_reachable { "ok" } else { "degraded" },
        store_reachable,
    })
}
