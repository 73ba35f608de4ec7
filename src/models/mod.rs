//! Data structures for the bracket engine: matches, players, tournaments.

mod game;
mod player;
mod tournament;

pub use game::{Bracket, Match, MatchId, MatchStatus};
pub use player::{LeaderboardEntry, PlayerId, PlayerRatingStats};
pub use tournament::{TournamentError, TournamentFormat, TournamentId};
