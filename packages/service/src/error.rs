use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mood_predict_model::MoodError;
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Bad request: {}", msg);
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg,
        }
    }

    /// Details are logged, the caller only sees a generic message.
    pub fn internal(msg: impl Into<String>) -> Self {
        let msg: String = msg.into();
        tracing::error!("Internal error: {}", msg);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorEnvelope<'a> {
            error: &'a str,
            status: &'static str,
        }

        (
            self.status,
            Json(ErrorEnvelope {
                error: &self.message,
                status: "error",
            }),
        )
            .into_response()
    }
}

impl From<MoodError> for ApiError {
    fn from(err: MoodError) -> Self {
        if err.kind().is_client_error() {
            Self::bad_request(err.to_string())
        } else {
            Self::internal(format!("{:?}", err))
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}
