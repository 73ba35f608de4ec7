//! Tournament bracket construction/progression engine and the coupled
//! Elo-style rating engine of the scorekeeper app.
//!
//! The app shell (hosted database, realtime sync, auth, UI, notifications)
//! drives this crate: it supplies the entry list, persists the generated
//! match graph through [`MatchStore`], feeds results back in one at a time,
//! and seeds/persists rating state through [`PlayerRatingStore`]. Everything
//! in here is synchronous, in-memory, and deterministic.

pub mod logic;
pub mod models;
pub mod stores;

pub use logic::{
    create_tournament, generate_bracket, record_match_result, BracketGraph, RatingConfig,
    RatingEngine, RatingUpdate, RecordOutcome,
};
pub use models::{
    Bracket, LeaderboardEntry, Match, MatchId, MatchStatus, PlayerId, PlayerRatingStats,
    TournamentError, TournamentFormat, TournamentId,
};
pub use stores::{InMemoryMatchStore, InMemoryRatingStore, MatchStore, PlayerRatingStore};
