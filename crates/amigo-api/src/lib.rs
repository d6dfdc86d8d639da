//! JSON REST API for Amigo.
//!
//! Exposes an axum [`Router`] backed by any [`amigo_core::store::GroupStore`].
//! This is the surface a chat front end calls; rendering replies and
//! messaging participants stay on the caller's side. Every engine failure
//! comes back with a distinct `code` field.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(amigo_api::api_router(Arc::new(store)))
//! ```

pub mod error;
pub mod groups;
pub mod participants;

use std::sync::Arc;

use amigo_core::store::GroupStore;
use axum::{
  Router,
  routing::{get, post},
};

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: GroupStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    // Groups
    .route("/groups", post(groups::create::<S>))
    .route("/groups/{id}", get(groups::get_one::<S>).delete(groups::delete_one::<S>))
    .route(
      "/groups/{id}/participants",
      get(groups::participant_names::<S>).post(groups::join::<S>),
    )
    .route("/groups/{id}/draw", post(groups::draw::<S>))
    .route("/groups/{id}/assignments", get(groups::assignments::<S>))
    // Cross-group lookups
    .route("/participants/{id}/groups", get(participants::groups::<S>))
    .route("/participants/{id}/assignments", get(participants::assignments::<S>))
    .with_state(store)
}

async fn health() -> &'static str { "ok" }
