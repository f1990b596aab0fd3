use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use volley_entities::EngineError;


#[derive(Debug, Clone)]
pub struct APIError {
    pub message: String,
    pub code: StatusCode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct APIErrorResponse {
    pub message: String,
}

impl APIError {
    pub fn new(message: String) -> Self {
        APIError {
            message,
            code: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for APIError {
    fn from(err: anyhow::Error) -> Self {
        error!("Error while handling request {}", err);
        APIError::new(err.to_string())
    }
}

impl From<EngineError> for APIError {
    fn from(err: EngineError) -> Self {
        let code = match &err {
            EngineError::EventNotFound(_) | EngineError::UnknownUser(_) => StatusCode::NOT_FOUND,
            EngineError::InvalidScore(_)
            | EngineError::SelfVote
            | EngineError::UnknownParticipant(_)
            | EngineError::QuorumNotMet { .. }
            | EngineError::RosterNotSet(_)
            | EngineError::InvalidEventDate(_) => StatusCode::BAD_REQUEST,
            EngineError::RosterLocked(_) => StatusCode::CONFLICT,
            EngineError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        };
        error!("Error while handling request {}", err);
        APIError { message: err.to_string(), code }
    }
}

impl From<(StatusCode, &str)> for APIError {
    fn from((code, message): (StatusCode, &str)) -> Self {
        error!("Error while handling request {}", message);
        APIError { message: message.to_string(), code }
    }
}

impl IntoResponse for APIError {
    fn into_response(self) -> Response {
        (self.code, Json(APIErrorResponse { message: self.message })).into_response()
    }
}
