//! The draw/state core: participant registry, winner ledger, and the
//! two-phase draw engine. This module owns every state transition and knows
//! nothing about terminals, storage, or the wall clock; the UI layer decides
//! when a pending draw resolves and persists the session afterwards.

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::models::Participant;

/// Title a fresh session starts with and the one clear-all restores.
pub const DEFAULT_EVENT_TITLE: &str = "年度抽獎活動";

/// Reasons a draw request is rejected. Every variant is a no-op from the
/// caller's perspective: the session is left exactly as it was before the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DrawError {
    /// The registry has nobody left to draw from.
    #[error("the draw pool is empty")]
    EmptyRegistry,
    /// Zero winners were requested.
    #[error("at least one winner must be requested")]
    InvalidCount,
    /// A draw is already pending; draws are not reentrant.
    #[error("a draw is already in progress")]
    DrawInProgress,
}

/// Record of an accepted but not yet resolved draw request. Only the
/// requested count is captured here; selection happens at resolution time so
/// the completion is atomic against the live registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingDraw {
    requested: usize,
}

/// The whole mutable session: event title, draw pool, winner history, and the
/// draw-in-progress guard. Constructed from persisted parts at startup and
/// handed to the UI, which routes every mutation through the methods below.
#[derive(Debug)]
pub struct Session {
    event_title: String,
    registry: Vec<Participant>,
    ledger: Vec<Participant>,
    next_id: i64,
    pending: Option<PendingDraw>,
}

impl Default for Session {
    fn default() -> Self {
        Self::from_parts(DEFAULT_EVENT_TITLE.to_string(), Vec::new(), Vec::new())
    }
}

impl Session {
    /// Rebuild a session from loaded state. The id counter resumes past the
    /// highest id found in either list so identifiers stay unique across
    /// restarts.
    pub fn from_parts(
        event_title: String,
        registry: Vec<Participant>,
        ledger: Vec<Participant>,
    ) -> Self {
        let next_id = registry
            .iter()
            .chain(ledger.iter())
            .map(|p| p.id)
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            event_title,
            registry,
            ledger,
            next_id,
            pending: None,
        }
    }

    pub fn event_title(&self) -> &str {
        &self.event_title
    }

    pub fn set_event_title(&mut self, title: String) {
        self.event_title = title;
    }

    /// Participants still eligible to be drawn, in insertion order.
    pub fn registry(&self) -> &[Participant] {
        &self.registry
    }

    /// Every winner so far, newest batch first.
    pub fn ledger(&self) -> &[Participant] {
        &self.ledger
    }

    /// Add one participant per non-blank line of `raw`, skipping names the
    /// registry already holds (including names added by an earlier line of
    /// the same paste). Returns how many entries were actually added;
    /// duplicates and blanks are dropped silently.
    pub fn add_bulk(&mut self, raw: &str) -> usize {
        raw.lines().filter(|line| self.add_name(line)).count()
    }

    /// Add a single participant through the same trim/dedup path as bulk
    /// input. A blank name is a no-op.
    pub fn add_single(&mut self, name: &str) -> usize {
        usize::from(self.add_name(name))
    }

    /// Synthesize `count` names as `prefix` + 1-based index and add them
    /// through the shared dedup path. `count == 0` is a no-op.
    pub fn add_generated(&mut self, prefix: &str, count: usize) -> usize {
        (1..=count)
            .filter(|i| {
                let name = format!("{prefix}{i}");
                self.add_name(&name)
            })
            .count()
    }

    /// Shared insert path: trim, reject blanks, reject names already in the
    /// pool, then append with a fresh id.
    fn add_name(&mut self, raw: &str) -> bool {
        let name = raw.trim();
        if name.is_empty() {
            return false;
        }
        if self.registry.iter().any(|p| p.name == name) {
            return false;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.registry.push(Participant {
            id,
            name: name.to_string(),
        });
        true
    }

    /// Delete the registry entry with the given id. Returns false (not an
    /// error) when no such entry exists.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.registry.len();
        self.registry.retain(|p| p.id != id);
        self.registry.len() != before
    }

    /// Accept a draw request, or reject it without touching any state. The
    /// reentrancy guard comes first: a request that arrives while another
    /// draw is pending must change nothing.
    pub fn begin_draw(&mut self, requested: usize) -> Result<(), DrawError> {
        if self.pending.is_some() {
            return Err(DrawError::DrawInProgress);
        }
        if self.registry.is_empty() {
            return Err(DrawError::EmptyRegistry);
        }
        if requested == 0 {
            return Err(DrawError::InvalidCount);
        }

        self.pending = Some(PendingDraw { requested });
        Ok(())
    }

    /// Whether a draw is pending resolution.
    pub fn is_drawing(&self) -> bool {
        self.pending.is_some()
    }

    /// Resolve the pending draw: shuffle the registry uniformly, take the
    /// first `min(requested, len)` entries as winners, move them to the front
    /// of the ledger in selected order, and return them. Returns `None` when
    /// no draw is pending, so a stray resolution cannot move anything.
    ///
    /// The RNG is supplied by the caller; tests drive this with a seeded
    /// generator, the UI with its dedicated draw RNG. The cosmetic suspense
    /// animation samples from a different stream entirely.
    pub fn resolve_draw(&mut self, rng: &mut impl Rng) -> Option<Vec<Participant>> {
        let pending = self.pending.take()?;

        let mut pool = self.registry.clone();
        pool.shuffle(rng);
        let take = pending.requested.min(pool.len());
        let winners: Vec<Participant> = pool.into_iter().take(take).collect();

        self.registry
            .retain(|p| !winners.iter().any(|w| w.id == p.id));

        let mut ledger = winners.clone();
        ledger.append(&mut self.ledger);
        self.ledger = ledger;

        Some(winners)
    }

    /// Return every winner to the draw pool and sort the merged pool
    /// case-insensitively (ties broken by the raw string, the same collation
    /// shape as `ORDER BY LOWER(name), name`). The ledger ends up empty; no
    /// participant is lost or duplicated.
    pub fn reset(&mut self) {
        self.registry.append(&mut self.ledger);
        self.registry.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });
    }

    /// Wipe everything: both lists, any pending draw, and the event title
    /// back to its default. The caller is responsible for erasing persisted
    /// state alongside.
    pub fn clear(&mut self) {
        self.event_title = DEFAULT_EVENT_TITLE.to_string();
        self.registry.clear();
        self.ledger.clear();
        self.pending = None;
    }

    /// Display rank of the ledger entry at `index` (0 = most recent winner).
    /// The most recent winner carries the highest number.
    pub fn rank(&self, index: usize) -> usize {
        self.ledger.len().saturating_sub(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    fn names(list: &[Participant]) -> Vec<&str> {
        list.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_add_bulk_trims_and_skips_blanks() {
        let mut session = Session::default();
        let added = session.add_bulk("  Alice  \n\n   \nBob\n");
        assert_eq!(added, 2);
        assert_eq!(names(session.registry()), vec!["Alice", "Bob"]);
    }

    #[test]
    fn test_add_bulk_dedups_against_registry_and_within_batch() {
        let mut session = Session::default();
        session.add_single("Alice");
        let added = session.add_bulk("Alice\nBob\nBob\nCarol");
        assert_eq!(added, 2);
        assert_eq!(names(session.registry()), vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_add_single_blank_is_noop() {
        let mut session = Session::default();
        assert_eq!(session.add_single("   "), 0);
        assert!(session.registry().is_empty());
    }

    #[test]
    fn test_add_is_case_sensitive() {
        let mut session = Session::default();
        session.add_single("alice");
        assert_eq!(session.add_single("Alice"), 1);
        assert_eq!(session.registry().len(), 2);
    }

    #[test]
    fn test_add_generated_numbers_from_one() {
        let mut session = Session::default();
        let added = session.add_generated("成員", 3);
        assert_eq!(added, 3);
        assert_eq!(names(session.registry()), vec!["成員1", "成員2", "成員3"]);
    }

    #[test]
    fn test_add_generated_zero_count_is_noop() {
        let mut session = Session::default();
        assert_eq!(session.add_generated("成員", 0), 0);
        assert!(session.registry().is_empty());
    }

    #[test]
    fn test_add_generated_skips_existing_numbers() {
        let mut session = Session::default();
        session.add_single("成員2");
        assert_eq!(session.add_generated("成員", 3), 2);
        assert_eq!(session.registry().len(), 3);
    }

    #[test]
    fn test_remove_by_id() {
        let mut session = Session::default();
        session.add_bulk("Alice\nBob");
        let id = session.registry()[0].id;
        assert!(session.remove(id));
        assert_eq!(names(session.registry()), vec!["Bob"]);
        // Removing an id that no longer exists is a quiet no-op.
        assert!(!session.remove(id));
        assert_eq!(session.registry().len(), 1);
    }

    #[test]
    fn test_ids_are_unique_and_resume_past_loaded_state() {
        let loaded = vec![Participant {
            id: 41,
            name: "Alice".to_string(),
        }];
        let mut session = Session::from_parts(DEFAULT_EVENT_TITLE.to_string(), loaded, Vec::new());
        session.add_single("Bob");
        assert_eq!(session.registry()[1].id, 42);
    }

    #[test]
    fn test_draw_moves_winners_and_keeps_sets_disjoint() {
        let mut session = Session::default();
        session.add_bulk("A\nB\nC\nD\nE");

        session.begin_draw(2).unwrap();
        let winners = session.resolve_draw(&mut rng(7)).unwrap();

        assert_eq!(winners.len(), 2);
        assert_eq!(session.registry().len(), 3);
        assert_eq!(session.ledger().len(), 2);
        for winner in &winners {
            assert!(!session.registry().iter().any(|p| p.id == winner.id));
            assert!(session.ledger().iter().any(|p| p.id == winner.id));
        }
    }

    #[test]
    fn test_draw_caps_at_registry_size_and_drains_pool() {
        let mut session = Session::default();
        session.add_bulk("A\nB\nC\nD\nE");

        session.begin_draw(2).unwrap();
        session.resolve_draw(&mut rng(1)).unwrap();

        session.begin_draw(10).unwrap();
        let winners = session.resolve_draw(&mut rng(2)).unwrap();

        assert_eq!(winners.len(), 3);
        assert!(session.registry().is_empty());
        assert_eq!(session.ledger().len(), 5);
    }

    #[test]
    fn test_draw_preconditions() {
        let mut session = Session::default();
        assert_eq!(session.begin_draw(1), Err(DrawError::EmptyRegistry));

        session.add_single("Alice");
        assert_eq!(session.begin_draw(0), Err(DrawError::InvalidCount));
        assert!(!session.is_drawing());
    }

    #[test]
    fn test_second_draw_while_pending_changes_nothing() {
        let mut session = Session::default();
        session.add_bulk("A\nB\nC");

        session.begin_draw(1).unwrap();
        assert_eq!(session.begin_draw(2), Err(DrawError::DrawInProgress));

        let winners = session.resolve_draw(&mut rng(9)).unwrap();
        assert_eq!(winners.len(), 1);
        assert_eq!(session.registry().len(), 2);
        assert_eq!(session.ledger().len(), 1);
    }

    #[test]
    fn test_resolve_without_pending_draw_is_noop() {
        let mut session = Session::default();
        session.add_bulk("A\nB");
        assert!(session.resolve_draw(&mut rng(3)).is_none());
        assert_eq!(session.registry().len(), 2);
        assert!(session.ledger().is_empty());
    }

    #[test]
    fn test_draw_is_deterministic_for_a_given_seed() {
        let run = |seed: u64| {
            let mut session = Session::default();
            session.add_bulk("A\nB\nC\nD\nE\nF");
            session.begin_draw(3).unwrap();
            let winners = session.resolve_draw(&mut rng(seed)).unwrap();
            names(winners.as_slice())
                .into_iter()
                .map(str::to_string)
                .collect::<Vec<_>>()
        };

        assert_eq!(run(11), run(11));
    }

    #[test]
    fn test_ledger_prepends_newest_batch() {
        let mut session = Session::default();
        session.add_bulk("A\nB\nC\nD");

        session.begin_draw(2).unwrap();
        let first = session.resolve_draw(&mut rng(4)).unwrap();
        session.begin_draw(1).unwrap();
        let second = session.resolve_draw(&mut rng(5)).unwrap();

        assert_eq!(session.ledger()[0], second[0]);
        assert_eq!(&session.ledger()[1..], first.as_slice());
    }

    #[test]
    fn test_rank_counts_from_the_back() {
        let mut session = Session::default();
        session.add_bulk("A\nB\nC");
        session.begin_draw(3).unwrap();
        session.resolve_draw(&mut rng(6)).unwrap();

        assert_eq!(session.rank(0), 3);
        assert_eq!(session.rank(1), 2);
        assert_eq!(session.rank(2), 1);
    }

    #[test]
    fn test_reset_returns_winners_sorted_without_loss() {
        let mut session = Session::default();
        session.add_bulk("delta\nBravo\nalpha\nCharlie");
        session.begin_draw(2).unwrap();
        session.resolve_draw(&mut rng(8)).unwrap();

        session.reset();

        assert!(session.ledger().is_empty());
        assert_eq!(
            names(session.registry()),
            vec!["alpha", "Bravo", "Charlie", "delta"]
        );
    }

    #[test]
    fn test_clear_restores_defaults() {
        let mut session = Session::default();
        session.set_event_title("Spring Gala".to_string());
        session.add_bulk("A\nB\nC");
        session.begin_draw(1).unwrap();

        session.clear();

        assert_eq!(session.event_title(), DEFAULT_EVENT_TITLE);
        assert!(session.registry().is_empty());
        assert!(session.ledger().is_empty());
        assert!(!session.is_drawing());
    }
}
