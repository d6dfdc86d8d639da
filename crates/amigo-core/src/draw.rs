//! The draw: assigning every participant exactly one other participant.
//!
//! Targets are picked slot by slot in join order. For slot `i`, indices are
//! drawn uniformly from `0..n` and rejected while they equal `i` or were
//! already taken by an earlier slot. The result is a permutation with no
//! fixed points, but not a uniform choice among all of them: earlier slots
//! constrain later ones, and the skew is a stable property of the draw.
//!
//! The last slot can be left with only its own index free (for `n = 3`,
//! targets `1, 0` leave slot 2 with nothing but itself). When that happens
//! the construction starts over from slot 0.

use rand::Rng;

use crate::{
  Error, Result,
  group::{Group, Pairing},
};

/// Smallest group for which a derangement exists.
pub const MIN_PARTICIPANTS: usize = 2;

/// Build a derangement of `0..n`: `targets[i] != i` for every `i`, and every
/// index appears exactly once.
///
/// Returns `None` when `n < MIN_PARTICIPANTS`.
pub fn derangement<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Option<Vec<usize>> {
  if n < MIN_PARTICIPANTS {
    return None;
  }

  'attempt: loop {
    let mut targets = Vec::with_capacity(n);
    let mut taken = vec![false; n];

    for i in 0..n {
      // Slots before `i` took `i` indices, so `n - i` remain free.
      if n - i == 1 && !taken[i] {
        continue 'attempt;
      }

      let target = loop {
        let r = rng.random_range(0..n);
        if r != i && !taken[r] {
          break r;
        }
      };

      taken[target] = true;
      targets.push(target);
    }

    return Some(targets);
  }
}

impl Group {
  /// Assign every participant a target and mark the group drawn.
  ///
  /// Only the in-memory aggregate changes; persisting it is the store's
  /// job. On error the group is left untouched.
  pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Vec<Pairing>> {
    if self.drawn {
      return Err(Error::AlreadyDrawn(self.external_id));
    }

    let targets = derangement(self.participants.len(), rng).ok_or(
      Error::NotEnoughParticipants {
        group: self.external_id,
        count: self.participants.len(),
      },
    )?;

    let assignee_ids: Vec<i64> = targets
      .iter()
      .map(|&t| self.participants[t].participant_id)
      .collect();

    for (participant, assignee_id) in self.participants.iter_mut().zip(assignee_ids) {
      participant.assignee_id = Some(assignee_id);
    }
    self.drawn = true;

    Ok(self.pairings())
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use chrono::Utc;
  use rand::{SeedableRng, rngs::StdRng};

  use super::*;
  use crate::{ErrorKind, group::Participant};

  fn assert_derangement(targets: &[usize]) {
    let n = targets.len();
    for (i, &t) in targets.iter().enumerate() {
      assert_ne!(i, t, "slot {i} assigned to itself in {targets:?}");
      assert!(t < n);
    }
    let unique: HashSet<_> = targets.iter().collect();
    assert_eq!(unique.len(), n, "target reused in {targets:?}");
  }

  fn group_of(n: usize) -> Group {
    let participants = (0..n as i64)
      .map(|i| Participant {
        participant_id: 100 + i,
        group_id:       1,
        external_id:    i,
        name:           format!("p{i}"),
        assignee_id:    None,
        joined_at:      Utc::now(),
      })
      .collect();
    Group {
      group_id: 1,
      external_id: 42,
      name: "Office".into(),
      drawn: false,
      created_at: Utc::now(),
      participants,
    }
  }

  #[test]
  fn too_small_has_no_derangement() {
    let mut rng = StdRng::seed_from_u64(1);
    assert!(derangement(0, &mut rng).is_none());
    assert!(derangement(1, &mut rng).is_none());
  }

  #[test]
  fn two_always_swap() {
    for seed in 0..50 {
      let mut rng = StdRng::seed_from_u64(seed);
      assert_eq!(derangement(2, &mut rng), Some(vec![1, 0]));
    }
  }

  #[test]
  fn three_survives_dead_ends() {
    // Half of all first attempts for n = 3 dead-end on the last slot.
    let mut seen = HashSet::new();
    for seed in 0..200 {
      let mut rng = StdRng::seed_from_u64(seed);
      let targets = derangement(3, &mut rng).unwrap();
      assert_derangement(&targets);
      seen.insert(targets);
    }
    assert_eq!(seen.len(), 2, "both 3-cycles should appear: {seen:?}");
  }

  #[test]
  fn larger_sizes_are_derangements() {
    let mut rng = StdRng::seed_from_u64(99);
    for n in 2..40 {
      for _ in 0..20 {
        let targets = derangement(n, &mut rng).unwrap();
        assert_eq!(targets.len(), n);
        assert_derangement(&targets);
      }
    }
  }

  #[test]
  fn same_seed_same_targets() {
    let a = derangement(12, &mut StdRng::seed_from_u64(2024)).unwrap();
    let b = derangement(12, &mut StdRng::seed_from_u64(2024)).unwrap();
    assert_eq!(a, b);
  }

  #[test]
  fn group_draw_assigns_everyone() {
    let mut g = group_of(5);
    let pairs = g.draw(&mut StdRng::seed_from_u64(5)).unwrap();

    assert!(g.drawn);
    assert_eq!(pairs.len(), 5);
    for pair in &pairs {
      assert_ne!(pair.participant.participant_id, pair.assignee.participant_id);
    }
    let assignees: HashSet<_> =
      g.participants.iter().map(|p| p.assignee_id.unwrap()).collect();
    assert_eq!(assignees.len(), 5);
  }

  #[test]
  fn group_draw_refuses_when_drawn() {
    let mut g = group_of(3);
    g.draw(&mut StdRng::seed_from_u64(1)).unwrap();
    let before = g.clone();

    let err = g.draw(&mut StdRng::seed_from_u64(2)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyDrawn);
    assert_eq!(g, before);
  }

  #[test]
  fn group_draw_refuses_single_participant() {
    let mut g = group_of(1);
    let err = g.draw(&mut StdRng::seed_from_u64(1)).unwrap_err();
    assert!(matches!(
      err,
      Error::NotEnoughParticipants { group: 42, count: 1 }
    ));
    assert!(!g.drawn);
    assert!(g.participants[0].assignee_id.is_none());
  }
}
