use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::dashboard;
use crate::error::ApiError;
use crate::labels::{is_healthy, CLASS_NAMES};
use crate::model::{self, Prediction};
use crate::preprocess;
use crate::sections::DiseaseInfo;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    /// Base64-encoded image bytes
    pub image: String,
    pub filename: String,
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub disease_name: String,
    pub confidence: f32,
    /// Only present when the predicted class is not a healthy plant.
    #[serde(flatten)]
    pub info: Option<DiseaseInfo>,
}

pub fn router(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/predict", post(predict))
        .route("/classes", get(classes))
        .route("/dashboard", get(dashboard_page))
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Plant Disease Recognition API",
        "status": "online",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn classes() -> Json<Value> {
    Json(json!({ "classes": CLASS_NAMES.as_slice() }))
}

async fn dashboard_page(State(state): State<AppState>) -> Html<String> {
    Html(dashboard::render(&state.dashboard_api_base))
}

async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<ImageRequest>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidBody {
        status: e.status(),
        message: e.body_text(),
    })?;
    info!(filename = %request.filename, bytes = request.image.len(), "received prediction request");

    // Decode and forward pass run on the blocking pool.
    let classifier = state.classifier.clone();
    let prediction = tokio::task::spawn_blocking(move || -> Result<Prediction, ApiError> {
        let batch = preprocess::preprocess(&request.image)?;
        Ok(model::predict(classifier.as_ref(), &batch)?)
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    info!(
        disease = prediction.label,
        confidence = prediction.confidence,
        "classified image"
    );

    let info = if is_healthy(prediction.label) {
        None
    } else {
        Some(state.disease_info.describe(prediction.label).await)
    };

    Ok(Json(PredictionResponse {
        disease_name: prediction.label.to_string(),
        confidence: prediction.confidence,
        info,
    }))
}
