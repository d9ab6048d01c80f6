use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Missing data")]
    MissingData,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Unsupported question type: {0}")]
    UnknownQuestionType(String),

    #[error("An error occurred while generating content: {0}")]
    Generation(String),

    #[error("No new unique questions found after multiple attempts")]
    NoUniqueQuestions,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingData | AppError::InvalidBody(_) | AppError::UnknownQuestionType(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Generation(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        let body = match self {
            // exhaustion keeps the success/message shape the clients already parse
            AppError::NoUniqueQuestions => json!({
                "success": false,
                "message": message,
            }),
            _ => json!({ "error": message }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_bad_request() {
        assert_eq!(AppError::MissingData.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::InvalidBody("expected value".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::UnknownQuestionType("poem".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_generation_failures_map_to_server_error() {
        assert_eq!(
            AppError::Generation("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::NoUniqueQuestions.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_generation_message_carries_cause() {
        let err = AppError::Generation("connection reset".into());
        assert_eq!(
            err.to_string(),
            "An error occurred while generating content: connection reset"
        );
    }
}
