//! Handlers for `/groups` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/groups` | Body: `{"external_id":1,"name":"Office"}`; 201 |
//! | `GET`    | `/groups/:id` | 404 if not found |
//! | `DELETE` | `/groups/:id` | Removes the group and its participants; 204 |
//! | `POST`   | `/groups/:id/participants` | Body: `{"external_id":7,"name":"Ann"}`; idempotent |
//! | `GET`    | `/groups/:id/participants` | Display names in join order |
//! | `POST`   | `/groups/:id/draw` | One-time draw; 409 on repeat |
//! | `GET`    | `/groups/:id/assignments` | Read back a finished draw |

use std::sync::Arc;

use amigo_core::{
  group::{Group, Pairing, Participant},
  store::GroupStore,
};
use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use rand::{SeedableRng, rngs::StdRng};
use serde::Deserialize;

use crate::error::ApiError;

/// Body shared by group creation and participant joins.
#[derive(Debug, Deserialize)]
pub struct NamedBody {
  pub external_id: i64,
  pub name:        String,
}

impl NamedBody {
  fn validated_name(self) -> Result<(i64, String), ApiError> {
    let name = self.name.trim();
    if name.is_empty() {
      return Err(ApiError::BadRequest("name must not be empty".into()));
    }
    Ok((self.external_id, name.to_owned()))
  }
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /groups`
pub async fn create<S: GroupStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NamedBody>,
) -> Result<impl IntoResponse, ApiError> {
  let (external_id, name) = body.validated_name()?;
  let group = store
    .create_group(external_id, name)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(group)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /groups/:id`
pub async fn get_one<S: GroupStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Group>, ApiError> {
  let group = store
    .get_group(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("group {id} not found")))?;
  Ok(Json(group))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /groups/:id`
pub async fn delete_one<S: GroupStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
  store.delete_group(id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Participants ─────────────────────────────────────────────────────────────

/// `POST /groups/:id/participants`
pub async fn join<S: GroupStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<NamedBody>,
) -> Result<Json<Participant>, ApiError> {
  let (participant_id, name) = body.validated_name()?;
  let participant = store
    .add_participant(id, participant_id, name)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(participant))
}

/// `GET /groups/:id/participants`
pub async fn participant_names<S: GroupStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<String>>, ApiError> {
  let names = store
    .list_participant_names(id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(names))
}

// ─── Draw ─────────────────────────────────────────────────────────────────────

/// `POST /groups/:id/draw`
pub async fn draw<S: GroupStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<Pairing>>, ApiError> {
  let pairings = store
    .draw(id, StdRng::from_os_rng())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(pairings))
}

/// `GET /groups/:id/assignments`
pub async fn assignments<S: GroupStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<Pairing>>, ApiError> {
  let pairings = store
    .current_assignments(id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(pairings))
}
