//! Handlers for `/participants` endpoints: lookups across every group a
//! person has joined.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/participants/:id/groups` | Groups joined, in creation order |
//! | `GET`  | `/participants/:id/assignments` | Assignee per drawn group |

use std::sync::Arc;

use amigo_core::{
  group::{GroupAssignment, GroupSummary},
  store::GroupStore,
};
use axum::{
  Json,
  extract::{Path, State},
};

use crate::error::ApiError;

/// `GET /participants/:id/groups`
pub async fn groups<S: GroupStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<GroupSummary>>, ApiError> {
  let groups = store.groups_containing(id).await.map_err(ApiError::store)?;
  Ok(Json(groups))
}

/// `GET /participants/:id/assignments`
pub async fn assignments<S: GroupStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<GroupAssignment>>, ApiError> {
  let assignments = store.assignments_for(id).await.map_err(ApiError::store)?;
  Ok(Json(assignments))
}
