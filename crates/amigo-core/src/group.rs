//! Group (the aggregate root) and the participants it owns.
//!
//! Internal ids are surrogate keys assigned by the store. External ids are
//! whatever the caller uses to name things (a chat id, a user id). A group's
//! external id is unique across the store; a participant's external id is
//! unique only within its group.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Entities ────────────────────────────────────────────────────────────────

/// A member of exactly one group.
///
/// `assignee_id` is the internal id of another participant in the same
/// group: the person this participant gives a gift to. It stays `None`
/// until the group draws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
  pub participant_id: i64,
  pub group_id:       i64,
  pub external_id:    i64,
  pub name:           String,
  pub assignee_id:    Option<i64>,
  pub joined_at:      DateTime<Utc>,
}

/// A group together with its participants, in join order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
  pub group_id:     i64,
  pub external_id:  i64,
  pub name:         String,
  /// Flips to `true` once, when the draw is persisted. Never reverts.
  pub drawn:        bool,
  pub created_at:   DateTime<Utc>,
  pub participants: Vec<Participant>,
}

impl Group {
  /// Whether a participant with `external_id` has joined.
  pub fn contains(&self, external_id: i64) -> bool {
    self.participants.iter().any(|p| p.external_id == external_id)
  }

  /// Look up a participant by internal id.
  pub fn participant(&self, participant_id: i64) -> Option<&Participant> {
    self
      .participants
      .iter()
      .find(|p| p.participant_id == participant_id)
  }

  /// Display names in join order.
  pub fn participant_names(&self) -> Vec<String> {
    self.participants.iter().map(|p| p.name.clone()).collect()
  }

  /// Each participant paired with its assignee, in join order.
  ///
  /// Participants without a resolvable assignee are skipped, so this is
  /// empty for a group that has not drawn.
  pub fn pairings(&self) -> Vec<Pairing> {
    self
      .participants
      .iter()
      .filter_map(|p| {
        let assignee = self.participant(p.assignee_id?)?;
        Some(Pairing {
          participant: p.clone(),
          assignee:    assignee.clone(),
        })
      })
      .collect()
  }
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// A participant and the participant they give a gift to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
  pub participant: Participant,
  pub assignee:    Participant,
}

/// The identifying fields of a group, without its participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
  pub external_id: i64,
  pub name:        String,
}

/// Who a participant gives to in one drawn group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAssignment {
  pub group_external_id: i64,
  pub group_name:        String,
  pub assignee_name:     String,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn participant(participant_id: i64, external_id: i64, name: &str) -> Participant {
    Participant {
      participant_id,
      group_id: 1,
      external_id,
      name: name.into(),
      assignee_id: None,
      joined_at: Utc::now(),
    }
  }

  fn group(participants: Vec<Participant>) -> Group {
    Group {
      group_id: 1,
      external_id: -100,
      name: "Office".into(),
      drawn: false,
      created_at: Utc::now(),
      participants,
    }
  }

  #[test]
  fn names_follow_join_order() {
    let g = group(vec![
      participant(10, 3, "Cy"),
      participant(11, 1, "Ann"),
      participant(12, 2, "Bo"),
    ]);
    assert_eq!(g.participant_names(), vec!["Cy", "Ann", "Bo"]);
    assert!(g.contains(1));
    assert!(!g.contains(4));
  }

  #[test]
  fn pairings_empty_before_draw() {
    let g = group(vec![participant(10, 1, "Ann"), participant(11, 2, "Bo")]);
    assert!(g.pairings().is_empty());
  }

  #[test]
  fn pairings_resolve_assignees() {
    let mut ann = participant(10, 1, "Ann");
    let mut bo = participant(11, 2, "Bo");
    ann.assignee_id = Some(11);
    bo.assignee_id = Some(10);
    let g = group(vec![ann, bo]);

    let pairs = g.pairings();
    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0].participant.name, "Ann");
    assert_eq!(pairs[0].assignee.name, "Bo");
    assert_eq!(pairs[1].assignee.name, "Ann");
  }
}
