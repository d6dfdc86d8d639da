//! API error type and [`axum::response::IntoResponse`] implementation.

use amigo_core::ErrorKind;
use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Engine(#[from] amigo_core::Error),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),
}

impl ApiError {
  /// Convert any store error into an [`ApiError`] via [`amigo_core::Error`].
  pub fn store<E: Into<amigo_core::Error>>(err: E) -> Self { Self::Engine(err.into()) }

  fn status_and_code(&self) -> (StatusCode, &'static str) {
    match self {
      ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
      ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
      ApiError::Engine(e) => {
        let kind = e.kind();
        let status = match kind {
          ErrorKind::DuplicateGroup => StatusCode::CONFLICT,
          ErrorKind::GroupNotFound => StatusCode::NOT_FOUND,
          ErrorKind::AlreadyDrawn => StatusCode::CONFLICT,
          ErrorKind::NotDrawn => StatusCode::CONFLICT,
          ErrorKind::NotEnoughParticipants => StatusCode::UNPROCESSABLE_ENTITY,
          ErrorKind::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, kind.code())
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, code) = self.status_and_code();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    (status, Json(json!({ "error": self.to_string(), "code": code }))).into_response()
  }
}
