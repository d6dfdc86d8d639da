//! Error types for `amigo-core`.

use thiserror::Error;

/// Every failure an engine operation can report to its caller.
///
/// Variants carry the external identifier the caller passed in, so a front
/// end can render a message without re-threading its own arguments.
#[derive(Debug, Error)]
pub enum Error {
  #[error("group {0} already exists")]
  DuplicateGroup(i64),

  #[error("group not found: {0}")]
  GroupNotFound(i64),

  #[error("group {0} has already drawn")]
  AlreadyDrawn(i64),

  #[error("group {0} has not drawn yet")]
  NotDrawn(i64),

  #[error("group {group} has {count} participant(s), a draw needs at least two")]
  NotEnoughParticipants { group: i64, count: usize },

  #[error("persistence error: {0}")]
  Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Fieldless discriminant of [`Error`], for callers that only branch on the
/// kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  DuplicateGroup,
  GroupNotFound,
  AlreadyDrawn,
  NotDrawn,
  NotEnoughParticipants,
  Persistence,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::DuplicateGroup(_) => ErrorKind::DuplicateGroup,
      Self::GroupNotFound(_) => ErrorKind::GroupNotFound,
      Self::AlreadyDrawn(_) => ErrorKind::AlreadyDrawn,
      Self::NotDrawn(_) => ErrorKind::NotDrawn,
      Self::NotEnoughParticipants { .. } => ErrorKind::NotEnoughParticipants,
      Self::Persistence(_) => ErrorKind::Persistence,
    }
  }
}

impl ErrorKind {
  /// Stable snake_case code, suitable for wire formats.
  pub fn code(self) -> &'static str {
    match self {
      Self::DuplicateGroup => "duplicate_group",
      Self::GroupNotFound => "group_not_found",
      Self::AlreadyDrawn => "already_drawn",
      Self::NotDrawn => "not_drawn",
      Self::NotEnoughParticipants => "not_enough_participants",
      Self::Persistence => "persistence_error",
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kinds_have_distinct_codes() {
    let kinds = [
      ErrorKind::DuplicateGroup,
      ErrorKind::GroupNotFound,
      ErrorKind::AlreadyDrawn,
      ErrorKind::NotDrawn,
      ErrorKind::NotEnoughParticipants,
      ErrorKind::Persistence,
    ];
    let codes: std::collections::HashSet<_> =
      kinds.iter().map(|k| k.code()).collect();
    assert_eq!(codes.len(), kinds.len());
  }

  #[test]
  fn kind_matches_variant() {
    let err = Error::NotEnoughParticipants { group: 4, count: 1 };
    assert_eq!(err.kind(), ErrorKind::NotEnoughParticipants);
    assert_eq!(Error::NotDrawn(4).kind().code(), "not_drawn");
  }
}
