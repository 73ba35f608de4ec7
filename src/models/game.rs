//! Match, Bracket, and MatchStatus for elimination brackets.

use crate::models::player::PlayerId;
use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Which partition of the tournament a match belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bracket {
    /// The main bracket. A single-elimination tournament has only this one.
    Winners,
    /// Double elimination: where winners-bracket losers drop to.
    Losers,
    /// Double elimination: the final between the two bracket survivors.
    GrandFinal,
}

/// Current state of a match.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Not yet played (slots may still be empty).
    #[default]
    Pending,
    /// Played (or a bye); `winner_id` is set.
    Completed,
    /// Can never be contested: a losers-bracket slot starved by byes, or the
    /// if-game when the winners-bracket finalist takes the first grand final.
    Voided,
}

/// A single match in the dependency graph of a tournament.
///
/// Created once by the bracket generator, then mutated in place by result
/// recording: `status`, `winner_id`, and the player slots of the matches its
/// advancement pointers address. Never deleted.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub bracket: Bracket,
    /// 1-based, increasing away from the starting round within its bracket.
    pub round: u32,
    /// None = slot not yet determined, or the missing side of a bye.
    pub player1_id: Option<PlayerId>,
    pub player2_id: Option<PlayerId>,
    pub status: MatchStatus,
    /// Set only when `status` is Completed.
    pub winner_id: Option<PlayerId>,
    /// Where the winner advances to. None only for the terminal match.
    pub next_match_id: Option<MatchId>,
    /// Where the loser drops to. Winners-bracket matches of a
    /// double-elimination tournament only.
    pub loser_next_match_id: Option<MatchId>,
    /// True only for the conditional grand-final rematch (bracket reset).
    pub is_if_game: bool,
}

impl Match {
    /// Create a pending match with the given slots and no wiring yet.
    pub fn new(
        tournament_id: TournamentId,
        bracket: Bracket,
        round: u32,
        player1_id: Option<PlayerId>,
        player2_id: Option<PlayerId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            bracket,
            round,
            player1_id,
            player2_id,
            status: MatchStatus::Pending,
            winner_id: None,
            next_match_id: None,
            loser_next_match_id: None,
            is_if_game: false,
        }
    }

    /// Both slots populated (playable once pending).
    pub fn is_ready(&self) -> bool {
        self.player1_id.is_some() && self.player2_id.is_some()
    }

    /// Completed or voided: this match will never produce further changes.
    pub fn is_resolved(&self) -> bool {
        self.status != MatchStatus::Pending
    }

    /// Number of populated player slots.
    pub fn occupied_slots(&self) -> usize {
        usize::from(self.player1_id.is_some()) + usize::from(self.player2_id.is_some())
    }

    pub fn has_player(&self, id: PlayerId) -> bool {
        self.player1_id == Some(id) || self.player2_id == Some(id)
    }

    /// The participant that is not `id`, if both slots are known.
    pub fn opponent_of(&self, id: PlayerId) -> Option<PlayerId> {
        match (self.player1_id, self.player2_id) {
            (Some(a), Some(b)) if a == id => Some(b),
            (Some(a), Some(b)) if b == id => Some(a),
            _ => None,
        }
    }

    /// The losing participant of a completed match, None for byes.
    pub fn loser_id(&self) -> Option<PlayerId> {
        self.winner_id.and_then(|w| self.opponent_of(w))
    }
}
