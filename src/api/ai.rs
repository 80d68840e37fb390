//! AI service endpoints
//!
//! Each handler forwards its request to the upstream AI service unchanged and returns the
//! upstream payload, or a fixed error message when the call fails for any reason.

use crate::api::{GatewayError, ValidatedJson};
use crate::core::dto::{ChatRequest, ChatResponse, HealthResponse, PointsResponse, SessionMetricsRequest};
use crate::core::traits::AiServiceClient;
use axum::routing::{get, post};
use axum::{Json, Router};
use di_axum::Inject;
use log::{debug, error};

pub fn router() -> Router {
    Router::new()
        .route("/chat/generate", post(generate_chat_response))
        .route("/session/metrics", post(calculate_session_points))
        .route("/points/calculations", get(get_points_calculations))
        .route("/health", get(get_health))
}

async fn generate_chat_response(
    Inject(client): Inject<dyn AiServiceClient>,
    ValidatedJson(request): ValidatedJson<ChatRequest>,
) -> Result<Json<ChatResponse>, GatewayError> {
    debug!("Generating chat response for session {}", request.session_id);

    client
        .generate_chat_response(&request)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Error generating chat response: {e}");
            GatewayError::ChatGeneration
        })
}

async fn calculate_session_points(
    Inject(client): Inject<dyn AiServiceClient>,
    ValidatedJson(request): ValidatedJson<SessionMetricsRequest>,
) -> Result<Json<PointsResponse>, GatewayError> {
    client
        .calculate_session_points(&request)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Error calculating session points: {e}");
            GatewayError::SessionPoints
        })
}

async fn get_points_calculations(
    Inject(client): Inject<dyn AiServiceClient>,
) -> Result<Json<PointsResponse>, GatewayError> {
    client.get_points_calculations().await.map(Json).map_err(|e| {
        error!("Error retrieving points calculations: {e}");
        GatewayError::PointsCalculations
    })
}

async fn get_health(
    Inject(client): Inject<dyn AiServiceClient>,
) -> Result<Json<HealthResponse>, GatewayError> {
    client.get_health().await.map(Json).map_err(|e| {
        error!("Error retrieving health status: {e}");
        GatewayError::Unhealthy
    })
}
