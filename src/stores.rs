//! Interfaces of the persistence collaborators, plus in-memory
//! implementations (tests, offline play).
//!
//! The engine never does I/O itself: brackets are handed to a [`MatchStore`]
//! in bulk after generation and incrementally after each recording, and the
//! rating engine pushes both participants' stats through a
//! [`PlayerRatingStore`] after each update.

use crate::models::{Match, MatchId, PlayerId, PlayerRatingStats, TournamentError};
use std::collections::HashMap;

/// Persistence for player rating statistics.
pub trait PlayerRatingStore {
    /// Full snapshot used to seed the rating engine at startup. Order is
    /// preserved into leaderboard tie-breaking.
    fn fetch_all(&self) -> Result<Vec<(PlayerId, PlayerRatingStats)>, TournamentError>;

    /// Persist one participant's updated stats.
    fn persist(&mut self, id: PlayerId, stats: &PlayerRatingStats) -> Result<(), TournamentError>;
}

/// Persistence for the match graph.
pub trait MatchStore {
    /// Store a freshly generated bracket in one batch.
    fn persist_batch(&mut self, matches: &[Match]) -> Result<(), TournamentError>;

    fn fetch_by_id(&self, id: MatchId) -> Result<Match, TournamentError>;

    /// Write back a single mutated match.
    fn save(&mut self, m: &Match) -> Result<(), TournamentError>;
}

/// Match store backed by a map.
#[derive(Clone, Debug, Default)]
pub struct InMemoryMatchStore {
    matches: HashMap<MatchId, Match>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

impl MatchStore for InMemoryMatchStore {
    fn persist_batch(&mut self, matches: &[Match]) -> Result<(), TournamentError> {
        for m in matches {
            self.matches.insert(m.id, m.clone());
        }
        Ok(())
    }

    fn fetch_by_id(&self, id: MatchId) -> Result<Match, TournamentError> {
        self.matches
            .get(&id)
            .cloned()
            .ok_or(TournamentError::MatchNotFound(id))
    }

    fn save(&mut self, m: &Match) -> Result<(), TournamentError> {
        self.matches.insert(m.id, m.clone());
        Ok(())
    }
}

/// Rating store backed by an ordered list (keeps snapshot order stable).
#[derive(Clone, Debug, Default)]
pub struct InMemoryRatingStore {
    entries: Vec<(PlayerId, PlayerRatingStats)>,
}

impl InMemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<(PlayerId, PlayerRatingStats)>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PlayerRatingStore for InMemoryRatingStore {
    fn fetch_all(&self) -> Result<Vec<(PlayerId, PlayerRatingStats)>, TournamentError> {
        Ok(self.entries.clone())
    }

    fn persist(&mut self, id: PlayerId, stats: &PlayerRatingStats) -> Result<(), TournamentError> {
        match self.entries.iter_mut().find(|(pid, _)| *pid == id) {
            Some(entry) => entry.1 = stats.clone(),
            None => self.entries.push((id, stats.clone())),
        }
        Ok(())
    }
}
