use std::sync::Arc;

use shuttle_axum::axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::item::NewsItem;
use crate::result::AnalysisResult;
use crate::service::VibeService;
use crate::vibe::{catalog, Vibe, VibeProfile};

pub const CACHE_HEADER: &str = "x-vibe-cache";

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<VibeService>,
}

impl AppState {
    pub fn new(service: VibeService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/vibes", get(list_vibes))
        .route("/analyze", post(analyze))
        .route("/vibe/today", post(vibe_today).get(cached_today))
        .route("/vibe/refresh", post(refresh_today))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
struct VibeOut {
    tag: Vibe,
    #[serde(flatten)]
    profile: &'static VibeProfile,
}

async fn list_vibes() -> Json<Vec<VibeOut>> {
    Json(
        catalog()
            .into_iter()
            .map(|(tag, profile)| VibeOut { tag, profile })
            .collect(),
    )
}

async fn analyze(
    State(state): State<AppState>,
    Json(items): Json<Vec<NewsItem>>,
) -> Json<AnalysisResult> {
    Json(state.service.analyze(&items).await)
}

async fn vibe_today(State(state): State<AppState>, Json(items): Json<Vec<NewsItem>>) -> Response {
    let cached = state.service.vibe_for_today(&items).await;
    (
        [(CACHE_HEADER, cached.status.as_header())],
        Json(cached.value),
    )
        .into_response()
}

async fn refresh_today(
    State(state): State<AppState>,
    Json(items): Json<Vec<NewsItem>>,
) -> Json<AnalysisResult> {
    Json(state.service.refresh_today(&items).await)
}

async fn cached_today(State(state): State<AppState>) -> Response {
    match state.service.cached_today().await {
        Some(r) => Json(r).into_response(),
        None => (StatusCode::NOT_FOUND, "no vibe cached for today").into_response(),
    }
}
