//! Player identity and rating statistics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in matches and rating lookups).
pub type PlayerId = Uuid;

/// Skill-rating state for one player.
///
/// Created lazily on first reference, mutated on every recorded match, never
/// deleted. Ratings stay floating point internally; any rounding is display
/// formatting and belongs to the UI layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerRatingStats {
    pub rating: f64,
    pub games_played: u32,
    /// Signed rating movement accumulated during the current calendar day
    /// (clamp state; resets on day rollover).
    pub daily_delta: f64,
    /// Day of the player's most recent rated match. None until the first one.
    pub last_match_day: Option<NaiveDate>,
}

impl PlayerRatingStats {
    /// Fresh stats for a player never seen before.
    pub fn new(initial_rating: f64) -> Self {
        Self {
            rating: initial_rating,
            games_played: 0,
            daily_delta: 0.0,
            last_match_day: None,
        }
    }
}

/// One row of the rating leaderboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: PlayerId,
    pub stats: PlayerRatingStats,
}
