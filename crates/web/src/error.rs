//! Checkout errors and their HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebError {
    #[error("Missing amountUSD")]
    MissingAmount,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("No exchange API returned")]
    NoExchangeUrl,

    #[error("{0}")]
    Upstream(#[from] reqwest::Error),
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::MissingAmount => StatusCode::BAD_REQUEST,
            WebError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            WebError::NoExchangeUrl | WebError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        (self.status(), Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
