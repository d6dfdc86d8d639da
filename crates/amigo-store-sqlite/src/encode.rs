//! Conversions between SQLite rows and domain types.
//!
//! Timestamps are stored as RFC 3339 strings. Ids and the `drawn` flag map
//! directly onto SQLite integers.

use amigo_core::group::{Group, Participant};
use chrono::{DateTime, Utc};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const GROUP_COLUMNS: &str = "group_id, external_id, name, drawn, created_at";

pub const PARTICIPANT_COLUMNS: &str =
  "participant_id, group_id, external_id, name, assignee_id, joined_at";

/// Raw values read from a `groups` row selected with [`GROUP_COLUMNS`].
pub struct RawGroup {
  pub group_id:    i64,
  pub external_id: i64,
  pub name:        String,
  pub drawn:       bool,
  pub created_at:  String,
}

impl RawGroup {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      group_id:    row.get(0)?,
      external_id: row.get(1)?,
      name:        row.get(2)?,
      drawn:       row.get(3)?,
      created_at:  row.get(4)?,
    })
  }

  pub fn into_group(self, participants: Vec<Participant>) -> Result<Group> {
    Ok(Group {
      group_id: self.group_id,
      external_id: self.external_id,
      name: self.name,
      drawn: self.drawn,
      created_at: decode_dt(&self.created_at)?,
      participants,
    })
  }
}

/// Raw values read from a `participants` row selected with
/// [`PARTICIPANT_COLUMNS`].
pub struct RawParticipant {
  pub participant_id: i64,
  pub group_id:       i64,
  pub external_id:    i64,
  pub name:           String,
  pub assignee_id:    Option<i64>,
  pub joined_at:      String,
}

impl RawParticipant {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      participant_id: row.get(0)?,
      group_id:       row.get(1)?,
      external_id:    row.get(2)?,
      name:           row.get(3)?,
      assignee_id:    row.get(4)?,
      joined_at:      row.get(5)?,
    })
  }

  pub fn into_participant(self) -> Result<Participant> {
    Ok(Participant {
      participant_id: self.participant_id,
      group_id: self.group_id,
      external_id: self.external_id,
      name: self.name,
      assignee_id: self.assignee_id,
      joined_at: decode_dt(&self.joined_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dt_roundtrip_keeps_instant() {
    let now = Utc::now();
    assert_eq!(decode_dt(&encode_dt(now)).unwrap(), now);
  }

  #[test]
  fn bad_dt_is_reported() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }
}
