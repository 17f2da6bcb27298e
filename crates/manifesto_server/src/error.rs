use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use manifesto_core::error::{EngineError, ImpactError, InputError};
use serde_json::json;

/// Errors returned by the manifesto API
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid parameter: {field} - {message}")]
    ValidationError { field: String, message: String },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("No recorded simulation: {0}")]
    NotRecorded(String),

    #[error("Snapshots not loaded")]
    SnapshotsUnavailable,

    #[error("Engine error: {0}")]
    EngineError(String),

    #[error("Internal server error")]
    InternalError,
}

impl From<InputError> for ApiError {
    fn from(err: InputError) -> Self {
        let field = match &err {
            InputError::OutOfRange { field, .. } => field.to_string(),
            InputError::TooManyChildren { .. } => "children".to_string(),
        };
        ApiError::ValidationError {
            field,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::MissingRecording { what } => ApiError::NotRecorded(what),
            other => ApiError::EngineError(other.to_string()),
        }
    }
}

impl From<ImpactError> for ApiError {
    fn from(err: ImpactError) -> Self {
        match err {
            ImpactError::Input(e) => e.into(),
            ImpactError::Engine(e) => e.into(),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(_: tokio::task::JoinError) -> Self {
        ApiError::InternalError
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::ValidationError { .. } | ApiError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }

            ApiError::NotRecorded(_) => (StatusCode::NOT_FOUND, self.to_string()),

            ApiError::SnapshotsUnavailable => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),

            ApiError::EngineError(_) | ApiError::InternalError => {
                tracing::error!(error = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Helper type for API results
pub type ApiResult<T> = Result<T, ApiError>;
