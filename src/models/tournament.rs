//! Tournament format, id, and the engine error taxonomy.

use crate::models::game::MatchId;
use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Elimination format of a tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    /// One loss eliminates. Requires at least 2 players.
    #[default]
    SingleElimination,
    /// Losers drop to a second bracket; two losses eliminate. Requires at
    /// least 4 players.
    DoubleElimination,
}

impl TournamentFormat {
    /// Minimum player count the format can be generated for.
    pub fn min_players(self) -> usize {
        match self {
            TournamentFormat::SingleElimination => 2,
            TournamentFormat::DoubleElimination => 4,
        }
    }
}

/// Errors that can occur during bracket generation, result recording, or
/// rating persistence.
#[derive(Clone, Debug, PartialEq)]
pub enum TournamentError {
    /// Too few players for the requested format.
    InsufficientPlayers { required: usize, got: usize },
    /// The same player id appears more than once in the entry list.
    DuplicatePlayer(PlayerId),
    /// No match with this id exists in the graph.
    MatchNotFound(MatchId),
    /// The match is already completed or voided; results are recorded once.
    MatchAlreadyResolved(MatchId),
    /// The match still has an undetermined player slot.
    MatchNotReady(MatchId),
    /// The declared winner is not a participant of the match.
    PlayerNotFound(PlayerId),
    /// An advancement pointer targets a missing match or an occupied slot.
    /// Indicates a bug in generation or advancement; fatal, never coerced.
    GraphConsistencyViolation(String),
    /// A persistence collaborator reported a failure.
    StoreFailure(String),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InsufficientPlayers { required, got } => {
                write!(f, "Need at least {} players, got {}", required, got)
            }
            TournamentError::DuplicatePlayer(id) => {
                write!(f, "Player {} listed more than once", id)
            }
            TournamentError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            TournamentError::MatchAlreadyResolved(id) => {
                write!(f, "Match {} is already resolved", id)
            }
            TournamentError::MatchNotReady(id) => {
                write!(f, "Match {} does not have both players yet", id)
            }
            TournamentError::PlayerNotFound(id) => {
                write!(f, "Player {} is not a participant of this match", id)
            }
            TournamentError::GraphConsistencyViolation(detail) => {
                write!(f, "Bracket graph consistency violation: {}", detail)
            }
            TournamentError::StoreFailure(detail) => write!(f, "Store failure: {}", detail),
        }
    }
}

impl std::error::Error for TournamentError {}
