use crate::core::validation::{FieldViolation, Validate, ValidationErrors};
use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};

pub mod ai;

pub fn router() -> Router {
    ai::router()
}

/// JSON body that passed its [`Validate`] constraints.
///
/// The body is decoded as `T::Draft` first, so missing members are reported per field. Every
/// rejection, malformed JSON included, is a `400 Bad Request` listing the offending fields.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: Validate,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ValidationErrors>);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(draft) = Json::<T::Draft>::from_request(req, state)
            .await
            .map_err(rejection_to_violations)?;

        T::validate(draft)
            .map(ValidatedJson)
            .map_err(|errors| (StatusCode::BAD_REQUEST, Json(errors)))
    }
}

fn rejection_to_violations(rejection: JsonRejection) -> (StatusCode, Json<ValidationErrors>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ValidationErrors {
            violations: vec![FieldViolation {
                field: "body".to_owned(),
                message: rejection.body_text(),
            }],
        }),
    )
}

/// Failure of a gateway operation, rendered with a fixed status and message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayError {
    ChatGeneration,
    SessionPoints,
    PointsCalculations,
    Unhealthy,
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::ChatGeneration
            | GatewayError::SessionPoints
            | GatewayError::PointsCalculations => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            GatewayError::ChatGeneration => "Error generating chat response",
            GatewayError::SessionPoints => "Error calculating session points",
            GatewayError::PointsCalculations => "Error retrieving points calculations",
            GatewayError::Unhealthy => "Service is unhealthy",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), self.message()).into_response()
    }
}
