//! The `GroupStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `amigo-store-sqlite`).
//! Front ends (`amigo-api`) depend on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use rand::Rng;

use crate::group::{Group, GroupAssignment, GroupSummary, Pairing, Participant};

/// Abstraction over an Amigo storage backend.
///
/// Every mutation is atomic: a caller never observes a half-added
/// participant, a partially deleted group, or a group marked drawn whose
/// participants lack assignees. Backend errors convert into
/// [`crate::Error`], where anything that is not a domain failure becomes
/// [`crate::Error::Persistence`].
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait GroupStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + Into<crate::Error> + 'static;

  // ── Groups ────────────────────────────────────────────────────────────

  /// Create an empty, undrawn group.
  ///
  /// Fails with `DuplicateGroup` if `external_id` is taken, without
  /// writing anything.
  fn create_group(
    &self,
    external_id: i64,
    name: String,
  ) -> impl Future<Output = Result<Group, Self::Error>> + Send + '_;

  /// Load a group with all of its participants. Returns `None` if not found.
  fn get_group(
    &self,
    external_id: i64,
  ) -> impl Future<Output = Result<Option<Group>, Self::Error>> + Send + '_;

  /// Delete a group and, in the same transaction, all of its participants.
  fn delete_group(
    &self,
    external_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Participants ──────────────────────────────────────────────────────

  /// Join a participant to a group.
  ///
  /// Joining twice is a no-op that returns the existing participant. A new
  /// participant cannot join a group that has already drawn.
  fn add_participant(
    &self,
    group_external_id: i64,
    participant_external_id: i64,
    name: String,
  ) -> impl Future<Output = Result<Participant, Self::Error>> + Send + '_;

  /// Display names of a group's participants, in join order.
  fn list_participant_names(
    &self,
    group_external_id: i64,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  // ── Draw ──────────────────────────────────────────────────────────────

  /// Run the one-time draw for a group, using `rng` as the random source.
  ///
  /// Fails with `AlreadyDrawn` on every call after the first success, and
  /// with `NotEnoughParticipants` below two participants. Assignees and
  /// the `drawn` flag are written together or not at all.
  fn draw<R>(
    &self,
    group_external_id: i64,
    rng: R,
  ) -> impl Future<Output = Result<Vec<Pairing>, Self::Error>> + Send + '_
  where
    R: Rng + Send + 'static;

  /// Read back the pairings of a drawn group without recomputing them.
  ///
  /// Fails with `NotDrawn` if the group has not drawn yet.
  fn current_assignments(
    &self,
    group_external_id: i64,
  ) -> impl Future<Output = Result<Vec<Pairing>, Self::Error>> + Send + '_;

  // ── Cross-group queries ───────────────────────────────────────────────

  /// Every group a participant external id has joined, in creation order.
  fn groups_containing(
    &self,
    participant_external_id: i64,
  ) -> impl Future<Output = Result<Vec<GroupSummary>, Self::Error>> + Send + '_;

  /// The participant's assignee in every drawn group they belong to, in
  /// creation order. Undrawn groups are left out.
  fn assignments_for(
    &self,
    participant_external_id: i64,
  ) -> impl Future<Output = Result<Vec<GroupAssignment>, Self::Error>> + Send + '_;
}
