//! Elo-style rating engine: tiered K-factors, per-day delta clamping,
//! atomic per-match updates.

use crate::models::{LeaderboardEntry, PlayerId, PlayerRatingStats, TournamentError};
use crate::stores::PlayerRatingStore;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Tunables of the rating model. `Default` gives the production values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RatingConfig {
    pub initial_rating: f64,
    /// K for players with fewer than `newbie_games` games.
    pub newbie_k: f64,
    /// K for players between the two thresholds.
    pub intermediate_k: f64,
    /// K for players with at least `veteran_games` games.
    pub veteran_k: f64,
    pub newbie_games: u32,
    pub veteran_games: u32,
    /// Rating-difference scale of the expected-score curve.
    pub scale: f64,
    /// Cap on a player's total rating movement within one calendar day.
    pub max_daily_delta: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            initial_rating: 1200.0,
            newbie_k: 32.0,
            intermediate_k: 16.0,
            veteran_k: 8.0,
            newbie_games: 30,
            veteran_games: 100,
            scale: 400.0,
            max_daily_delta: 150.0,
        }
    }
}

/// Both participants' stats as committed by one match.
#[derive(Clone, Debug, PartialEq)]
pub struct RatingUpdate {
    pub winner: PlayerRatingStats,
    pub loser: PlayerRatingStats,
}

/// In-memory rating state for all known players. Pure computation; the
/// injected [`PlayerRatingStore`] is the only persistence touchpoint.
pub struct RatingEngine {
    config: RatingConfig,
    stats: HashMap<PlayerId, PlayerRatingStats>,
    /// Insertion order; keeps leaderboard ties stable.
    order: Vec<PlayerId>,
}

impl Default for RatingEngine {
    fn default() -> Self {
        Self::new(RatingConfig::default())
    }
}

impl RatingEngine {
    pub fn new(config: RatingConfig) -> Self {
        Self {
            config,
            stats: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    /// Create default stats for `id` if absent. Idempotent.
    pub fn ensure_player(&mut self, id: PlayerId) {
        if !self.stats.contains_key(&id) {
            self.stats
                .insert(id, PlayerRatingStats::new(self.config.initial_rating));
            self.order.push(id);
        }
    }

    /// Bulk-seed from a store snapshot (startup). Existing entries are
    /// overwritten in place, new ones appended in iteration order.
    pub fn load(&mut self, entries: impl IntoIterator<Item = (PlayerId, PlayerRatingStats)>) {
        for (id, stats) in entries {
            if self.stats.insert(id, stats).is_none() {
                self.order.push(id);
            }
        }
    }

    pub fn get_player_stats(&self, id: PlayerId) -> Option<&PlayerRatingStats> {
        self.stats.get(&id)
    }

    /// All known players sorted by rating descending; equal ratings keep
    /// their insertion order.
    pub fn get_leaderboard(&self) -> Vec<LeaderboardEntry> {
        let mut entries: Vec<LeaderboardEntry> = self
            .order
            .iter()
            .filter_map(|id| {
                self.stats.get(id).map(|stats| LeaderboardEntry {
                    id: *id,
                    stats: stats.clone(),
                })
            })
            .collect();
        entries.sort_by(|a, b| {
            b.stats
                .rating
                .partial_cmp(&a.stats.rating)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        entries
    }

    /// Compute and commit both participants' post-match stats.
    ///
    /// Returns `Ok(None)` without touching anything (in memory or in the
    /// store) when either id is unknown: a late-joining or deleted player is
    /// an expected occurrence, not an error. Otherwise both stats are updated
    /// and both persisted through `store`.
    pub fn update_after_match(
        &mut self,
        winner_id: PlayerId,
        loser_id: PlayerId,
        match_date: NaiveDate,
        store: &mut dyn PlayerRatingStore,
    ) -> Result<Option<RatingUpdate>, TournamentError> {
        if winner_id == loser_id {
            return Ok(None);
        }
        let (Some(winner), Some(loser)) = (self.stats.get(&winner_id), self.stats.get(&loser_id))
        else {
            return Ok(None);
        };
        let mut winner = winner.clone();
        let mut loser = loser.clone();

        // clamp state is per calendar day
        roll_over_day(&mut winner, match_date);
        roll_over_day(&mut loser, match_date);

        let expected_winner = expected_score(winner.rating, loser.rating, self.config.scale);
        let expected_loser = 1.0 - expected_winner;

        let raw_winner = self.k_for(winner.games_played) * (1.0 - expected_winner);
        let raw_loser = self.k_for(loser.games_played) * (0.0 - expected_loser);

        let applied_winner = clamp_daily(&winner, raw_winner, self.config.max_daily_delta);
        let applied_loser = clamp_daily(&loser, raw_loser, self.config.max_daily_delta);

        winner.rating += applied_winner;
        winner.daily_delta += applied_winner;
        winner.games_played += 1;
        loser.rating += applied_loser;
        loser.daily_delta += applied_loser;
        loser.games_played += 1;

        self.stats.insert(winner_id, winner.clone());
        self.stats.insert(loser_id, loser.clone());
        store.persist(winner_id, &winner)?;
        store.persist(loser_id, &loser)?;

        Ok(Some(RatingUpdate { winner, loser }))
    }

    fn k_for(&self, games_played: u32) -> f64 {
        if games_played < self.config.newbie_games {
            self.config.newbie_k
        } else if games_played < self.config.veteran_games {
            self.config.intermediate_k
        } else {
            self.config.veteran_k
        }
    }
}

/// Probability of the player at `rating` beating the one at `opponent`.
fn expected_score(rating: f64, opponent: f64, scale: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / scale))
}

/// A new calendar day resets the accumulated daily movement.
fn roll_over_day(stats: &mut PlayerRatingStats, day: NaiveDate) {
    if stats.last_match_day != Some(day) {
        stats.daily_delta = 0.0;
        stats.last_match_day = Some(day);
    }
}

/// Reduce `raw` so the day's accumulated delta saturates exactly at the cap.
/// A late match on a big winning day can be worth less than the formula says.
fn clamp_daily(stats: &PlayerRatingStats, raw: f64, cap: f64) -> f64 {
    (stats.daily_delta + raw).clamp(-cap, cap) - stats.daily_delta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_score_even_matchup_is_half() {
        assert!((expected_score(1500.0, 1500.0, 400.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn expected_score_favors_higher_rating() {
        let e = expected_score(1700.0, 1500.0, 400.0);
        assert!(e > 0.7 && e < 0.8);
    }

    #[test]
    fn clamp_reduces_delta_at_the_cap() {
        let mut stats = PlayerRatingStats::new(1200.0);
        stats.daily_delta = 140.0;
        assert!((clamp_daily(&stats, 16.0, 150.0) - 10.0).abs() < 1e-9);
        stats.daily_delta = -140.0;
        assert!((clamp_daily(&stats, -16.0, 150.0) + 10.0).abs() < 1e-9);
    }

    #[test]
    fn k_factor_tiers() {
        let engine = RatingEngine::default();
        assert_eq!(engine.k_for(0), 32.0);
        assert_eq!(engine.k_for(30), 16.0);
        assert_eq!(engine.k_for(100), 8.0);
    }
}
