//! [`SqliteStore`], the SQLite implementation of [`GroupStore`].

use std::path::Path;

use amigo_core::{
  Error as CoreError,
  group::{Group, GroupAssignment, GroupSummary, Pairing, Participant},
  store::GroupStore,
};
use chrono::Utc;
use rand::Rng;
use rusqlite::{Connection, OptionalExtension as _, Transaction, TransactionBehavior, params};
use tracing::{debug, info, warn};

use crate::{
  Result,
  encode::{GROUP_COLUMNS, PARTICIPANT_COLUMNS, RawGroup, RawParticipant, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Amigo group store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted. All calls
/// share one connection, and every mutation takes the write lock up front
/// (`BEGIN IMMEDIATE`), so concurrent writers are serialised.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run raw SQL against the connection. Tests use it to rig failures.
  #[cfg(test)]
  pub(crate) async fn execute_batch(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Synchronous helpers (run on the connection thread) ──────────────────────

fn begin_immediate(conn: &mut Connection) -> rusqlite::Result<Transaction<'_>> {
  conn.transaction_with_behavior(TransactionBehavior::Immediate)
}

fn find_group_id(conn: &Connection, external_id: i64) -> rusqlite::Result<Option<i64>> {
  conn
    .query_row(
      "SELECT group_id FROM groups WHERE external_id = ?1",
      params![external_id],
      |row| row.get(0),
    )
    .optional()
}

fn find_participant(
  conn: &Connection,
  group_id: i64,
  external_id: i64,
) -> Result<Option<Participant>> {
  let raw = conn
    .query_row(
      &format!(
        "SELECT {PARTICIPANT_COLUMNS} FROM participants
         WHERE group_id = ?1 AND external_id = ?2"
      ),
      params![group_id, external_id],
      RawParticipant::from_row,
    )
    .optional()?;

  raw.map(RawParticipant::into_participant).transpose()
}

/// Load the whole aggregate: the group row plus its participants in join
/// order.
fn load_group(conn: &Connection, external_id: i64) -> Result<Option<Group>> {
  let raw = conn
    .query_row(
      &format!("SELECT {GROUP_COLUMNS} FROM groups WHERE external_id = ?1"),
      params![external_id],
      RawGroup::from_row,
    )
    .optional()?;

  let Some(raw) = raw else {
    return Ok(None);
  };

  let mut stmt = conn.prepare(&format!(
    "SELECT {PARTICIPANT_COLUMNS} FROM participants
     WHERE group_id = ?1
     ORDER BY participant_id"
  ))?;
  let participants = stmt
    .query_map(params![raw.group_id], RawParticipant::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?
    .into_iter()
    .map(RawParticipant::into_participant)
    .collect::<Result<Vec<_>>>()?;

  raw.into_group(participants).map(Some)
}

fn create_group_tx(conn: &mut Connection, external_id: i64, name: String) -> Result<Group> {
  let tx = begin_immediate(conn)?;
  let created_at = Utc::now();

  let inserted = tx.execute(
    "INSERT INTO groups (external_id, name, drawn, created_at)
     VALUES (?1, ?2, 0, ?3)
     ON CONFLICT (external_id) DO NOTHING",
    params![external_id, name, encode_dt(created_at)],
  )?;
  if inserted == 0 {
    return Err(CoreError::DuplicateGroup(external_id).into());
  }

  let group_id = tx.last_insert_rowid();
  tx.commit()?;

  Ok(Group {
    group_id,
    external_id,
    name,
    drawn: false,
    created_at,
    participants: Vec::new(),
  })
}

/// Returns the participant and whether this call added it.
fn add_participant_tx(
  conn: &mut Connection,
  group_external_id: i64,
  external_id: i64,
  name: String,
) -> Result<(Participant, bool)> {
  let tx = begin_immediate(conn)?;

  let Some(group_id) = find_group_id(&tx, group_external_id)? else {
    return Err(CoreError::GroupNotFound(group_external_id).into());
  };

  if let Some(existing) = find_participant(&tx, group_id, external_id)? {
    return Ok((existing, false));
  }

  let drawn: bool = tx.query_row(
    "SELECT drawn FROM groups WHERE group_id = ?1",
    params![group_id],
    |row| row.get(0),
  )?;
  if drawn {
    return Err(CoreError::AlreadyDrawn(group_external_id).into());
  }

  let joined_at = Utc::now();
  tx.execute(
    "INSERT INTO participants (group_id, external_id, name, assignee_id, joined_at)
     VALUES (?1, ?2, ?3, NULL, ?4)",
    params![group_id, external_id, name, encode_dt(joined_at)],
  )?;
  let participant_id = tx.last_insert_rowid();
  tx.commit()?;

  Ok((
    Participant {
      participant_id,
      group_id,
      external_id,
      name,
      assignee_id: None,
      joined_at,
    },
    true,
  ))
}

/// Returns how many participants went with the group.
fn delete_group_tx(conn: &mut Connection, external_id: i64) -> Result<usize> {
  let tx = begin_immediate(conn)?;

  let Some(group_id) = find_group_id(&tx, external_id)? else {
    return Err(CoreError::GroupNotFound(external_id).into());
  };

  // Assignees only ever point within the group.
  tx.execute(
    "UPDATE participants SET assignee_id = NULL WHERE group_id = ?1",
    params![group_id],
  )?;
  let removed = tx.execute(
    "DELETE FROM participants WHERE group_id = ?1",
    params![group_id],
  )?;
  tx.execute("DELETE FROM groups WHERE group_id = ?1", params![group_id])?;
  tx.commit()?;

  Ok(removed)
}

fn draw_tx<R: Rng + ?Sized>(
  conn: &mut Connection,
  external_id: i64,
  rng: &mut R,
) -> Result<Vec<Pairing>> {
  let tx = begin_immediate(conn)?;

  let Some(mut group) = load_group(&tx, external_id)? else {
    return Err(CoreError::GroupNotFound(external_id).into());
  };

  let pairings = group.draw(rng)?;

  {
    let mut stmt =
      tx.prepare("UPDATE participants SET assignee_id = ?1 WHERE participant_id = ?2")?;
    for participant in &group.participants {
      stmt.execute(params![participant.assignee_id, participant.participant_id])?;
    }
  }

  let flipped = tx.execute(
    "UPDATE groups SET drawn = 1 WHERE group_id = ?1 AND drawn = 0",
    params![group.group_id],
  )?;
  if flipped != 1 {
    return Err(CoreError::AlreadyDrawn(external_id).into());
  }

  tx.commit()?;
  Ok(pairings)
}

fn groups_containing_query(conn: &Connection, external_id: i64) -> Result<Vec<GroupSummary>> {
  let mut stmt = conn.prepare(
    "SELECT g.external_id, g.name
     FROM groups g
     JOIN participants p ON p.group_id = g.group_id
     WHERE p.external_id = ?1
     ORDER BY g.group_id",
  )?;

  let rows = stmt
    .query_map(params![external_id], |row| {
      Ok(GroupSummary {
        external_id: row.get(0)?,
        name:        row.get(1)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(rows)
}

fn assignments_for_query(conn: &Connection, external_id: i64) -> Result<Vec<GroupAssignment>> {
  let mut stmt = conn.prepare(
    "SELECT g.external_id, g.name, a.name
     FROM participants p
     JOIN groups       g ON g.group_id       = p.group_id
     JOIN participants a ON a.participant_id = p.assignee_id
     WHERE p.external_id = ?1
       AND g.drawn = 1
     ORDER BY g.group_id",
  )?;

  let rows = stmt
    .query_map(params![external_id], |row| {
      Ok(GroupAssignment {
        group_external_id: row.get(0)?,
        group_name:        row.get(1)?,
        assignee_name:     row.get(2)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(rows)
}

// ─── GroupStore impl ─────────────────────────────────────────────────────────

impl GroupStore for SqliteStore {
  type Error = crate::Error;

  // ── Groups ────────────────────────────────────────────────────────────────

  async fn create_group(&self, external_id: i64, name: String) -> Result<Group> {
    let result = self
      .conn
      .call(move |conn| Ok(create_group_tx(conn, external_id, name)))
      .await?;

    match &result {
      Ok(group) => info!(group = external_id, name = %group.name, "group created"),
      Err(e) => warn!(group = external_id, error = %e, "group not created"),
    }
    result
  }

  async fn get_group(&self, external_id: i64) -> Result<Option<Group>> {
    debug!(group = external_id, "loading group");
    self
      .conn
      .call(move |conn| Ok(load_group(conn, external_id)))
      .await?
  }

  async fn delete_group(&self, external_id: i64) -> Result<()> {
    let removed = self
      .conn
      .call(move |conn| Ok(delete_group_tx(conn, external_id)))
      .await??;

    info!(group = external_id, participants = removed, "group deleted");
    Ok(())
  }

  // ── Participants ──────────────────────────────────────────────────────────

  async fn add_participant(
    &self,
    group_external_id:       i64,
    participant_external_id: i64,
    name:                    String,
  ) -> Result<Participant> {
    let (participant, added) = self
      .conn
      .call(move |conn| {
        Ok(add_participant_tx(
          conn,
          group_external_id,
          participant_external_id,
          name,
        ))
      })
      .await??;

    if added {
      info!(
        group = group_external_id,
        participant = participant_external_id,
        "participant joined"
      );
    } else {
      debug!(
        group = group_external_id,
        participant = participant_external_id,
        "participant already in group"
      );
    }
    Ok(participant)
  }

  async fn list_participant_names(&self, group_external_id: i64) -> Result<Vec<String>> {
    let group = self
      .get_group(group_external_id)
      .await?
      .ok_or(CoreError::GroupNotFound(group_external_id))?;
    Ok(group.participant_names())
  }

  // ── Draw ──────────────────────────────────────────────────────────────────

  async fn draw<R>(&self, group_external_id: i64, rng: R) -> Result<Vec<Pairing>>
  where
    R: Rng + Send + 'static,
  {
    let result = self
      .conn
      .call(move |conn| {
        let mut rng = rng;
        Ok(draw_tx(conn, group_external_id, &mut rng))
      })
      .await?;

    match &result {
      Ok(pairings) => {
        info!(group = group_external_id, count = pairings.len(), "draw completed")
      }
      Err(e) => warn!(group = group_external_id, error = %e, "draw failed"),
    }
    result
  }

  async fn current_assignments(&self, group_external_id: i64) -> Result<Vec<Pairing>> {
    let group = self
      .get_group(group_external_id)
      .await?
      .ok_or(CoreError::GroupNotFound(group_external_id))?;

    if !group.drawn {
      return Err(CoreError::NotDrawn(group_external_id).into());
    }
    Ok(group.pairings())
  }

  // ── Cross-group queries ───────────────────────────────────────────────────

  async fn groups_containing(&self, participant_external_id: i64) -> Result<Vec<GroupSummary>> {
    debug!(participant = participant_external_id, "listing groups");
    self
      .conn
      .call(move |conn| Ok(groups_containing_query(conn, participant_external_id)))
      .await?
  }

  async fn assignments_for(
    &self,
    participant_external_id: i64,
  ) -> Result<Vec<GroupAssignment>> {
    debug!(participant = participant_external_id, "listing assignments");
    self
      .conn
      .call(move |conn| Ok(assignments_for_query(conn, participant_external_id)))
      .await?
  }
}
