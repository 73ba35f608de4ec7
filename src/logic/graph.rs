//! The match-dependency graph: an id-addressed arena of Match records with
//! result recording and automatic advancement.
//!
//! Mutation happens in two places only: `record_result` (a declared winner)
//! and the internal auto-advancement pass that completes byes and voids
//! matches no participant can ever reach. Every mutated record is returned to
//! the caller for incremental persistence.

use crate::models::{
    Bracket, Match, MatchId, MatchStatus, PlayerId, TournamentError, TournamentFormat,
    TournamentId,
};
use std::collections::{HashMap, HashSet, VecDeque};

/// Construct a `GraphConsistencyViolation`, logging it loudly: a violation
/// means a bug in generation or advancement, never a caller mistake.
fn violation(detail: String) -> TournamentError {
    log::error!("bracket graph consistency violation: {}", detail);
    TournamentError::GraphConsistencyViolation(detail)
}

/// Everything `record_result` changed, cloned for persistence.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordOutcome {
    /// The recorded match, now completed.
    pub completed: Match,
    /// Every other match mutated by advancement: slots filled, byes
    /// auto-completed, matches voided.
    pub advanced: Vec<Match>,
    /// True once the terminal match is resolved.
    pub tournament_complete: bool,
}

/// Arena of the matches of one tournament, indexed by match id, with the
/// reverse feeder edges needed to decide when a slot can no longer be filled.
#[derive(Clone, Debug)]
pub struct BracketGraph {
    format: TournamentFormat,
    tournament_id: TournamentId,
    matches: Vec<Match>,
    index: HashMap<MatchId, usize>,
    /// For each match, the matches whose advancement pointers target it.
    feeders: HashMap<MatchId, Vec<MatchId>>,
}

impl BracketGraph {
    /// Build the arena from a generated (or reloaded) match set, validating
    /// every structural invariant.
    pub fn from_matches(
        format: TournamentFormat,
        matches: Vec<Match>,
    ) -> Result<Self, TournamentError> {
        let tournament_id = matches
            .first()
            .map(|m| m.tournament_id)
            .ok_or_else(|| violation("empty match set".to_string()))?;

        let mut index = HashMap::with_capacity(matches.len());
        for (i, m) in matches.iter().enumerate() {
            if index.insert(m.id, i).is_some() {
                return Err(violation(format!("duplicate match id {}", m.id)));
            }
        }

        let mut feeders: HashMap<MatchId, Vec<MatchId>> = HashMap::new();
        for m in &matches {
            if let Some(next) = m.next_match_id {
                feeders.entry(next).or_default().push(m.id);
            }
            if let Some(drop) = m.loser_next_match_id {
                feeders.entry(drop).or_default().push(m.id);
            }
        }

        let graph = Self {
            format,
            tournament_id,
            matches,
            index,
            feeders,
        };
        graph.validate()?;
        Ok(graph)
    }

    pub fn format(&self) -> TournamentFormat {
        self.format
    }

    pub fn tournament_id(&self) -> TournamentId {
        self.tournament_id
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn get(&self, id: MatchId) -> Option<&Match> {
        self.index.get(&id).map(|&i| &self.matches[i])
    }

    pub fn into_matches(self) -> Vec<Match> {
        self.matches
    }

    /// The tournament is complete once its terminal match is resolved:
    /// the winners final (single elimination), or the if-game, contested or
    /// voided (double elimination).
    pub fn is_complete(&self) -> bool {
        match self.format {
            TournamentFormat::SingleElimination => self.matches.iter().any(|m| {
                m.bracket == Bracket::Winners
                    && m.next_match_id.is_none()
                    && m.status == MatchStatus::Completed
            }),
            TournamentFormat::DoubleElimination => {
                self.matches.iter().any(|m| m.is_if_game && m.is_resolved())
            }
        }
    }

    /// Check every structural invariant of the graph. Violations indicate a
    /// generation or advancement bug and are fatal.
    pub fn validate(&self) -> Result<(), TournamentError> {
        for m in &self.matches {
            if m.tournament_id != self.tournament_id {
                return Err(violation(format!(
                    "match {} belongs to tournament {}, expected {}",
                    m.id, m.tournament_id, self.tournament_id
                )));
            }
            if let Some(next) = m.next_match_id {
                let target = self
                    .get(next)
                    .ok_or_else(|| violation(format!("match {} advances to missing match {}", m.id, next)))?;
                if target.bracket == m.bracket && target.round <= m.round {
                    return Err(violation(format!(
                        "match {} (round {}) advances to match {} (round {}) in the same bracket",
                        m.id, m.round, target.id, target.round
                    )));
                }
            }
            if let Some(drop) = m.loser_next_match_id {
                if self.format != TournamentFormat::DoubleElimination {
                    return Err(violation(format!(
                        "match {} has a loser pointer in a single-elimination tournament",
                        m.id
                    )));
                }
                if m.bracket != Bracket::Winners {
                    return Err(violation(format!(
                        "non-winners match {} has a loser pointer",
                        m.id
                    )));
                }
                let target = self
                    .get(drop)
                    .ok_or_else(|| violation(format!("match {} drops to missing match {}", m.id, drop)))?;
                if target.bracket != Bracket::Losers {
                    return Err(violation(format!(
                        "match {} drops its loser outside the losers bracket",
                        m.id
                    )));
                }
            }
            match m.status {
                MatchStatus::Completed => match m.winner_id {
                    Some(w) if m.has_player(w) => {}
                    _ => {
                        return Err(violation(format!(
                            "completed match {} has no valid winner",
                            m.id
                        )))
                    }
                },
                MatchStatus::Pending | MatchStatus::Voided => {
                    if m.winner_id.is_some() {
                        return Err(violation(format!(
                            "unplayed match {} has a winner set",
                            m.id
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Record a declared winner for a pending match and advance the
    /// participants along the precomputed pointers.
    pub fn record_result(
        &mut self,
        match_id: MatchId,
        winner_id: PlayerId,
    ) -> Result<RecordOutcome, TournamentError> {
        let idx = *self
            .index
            .get(&match_id)
            .ok_or(TournamentError::MatchNotFound(match_id))?;
        {
            let m = &self.matches[idx];
            if m.is_resolved() {
                return Err(TournamentError::MatchAlreadyResolved(match_id));
            }
            if !m.is_ready() {
                return Err(TournamentError::MatchNotReady(match_id));
            }
            if !m.has_player(winner_id) {
                return Err(TournamentError::PlayerNotFound(winner_id));
            }
        }

        let snapshot = self.matches[idx].clone();
        let is_grand_final = snapshot.bracket == Bracket::GrandFinal && !snapshot.is_if_game;
        let drops_loser = snapshot.bracket == Bracket::Winners
            && self.format == TournamentFormat::DoubleElimination;

        // pre-flight every advancement target so a consistency violation
        // never leaves a half-recorded result behind
        let grand_final_plan = if is_grand_final {
            Some(self.grand_final_plan(&snapshot, winner_id)?)
        } else {
            if let Some(next) = snapshot.next_match_id {
                self.ensure_can_place(next)?;
            }
            if drops_loser {
                if let Some(drop) = snapshot.loser_next_match_id {
                    self.ensure_can_place(drop)?;
                }
            }
            None
        };

        self.matches[idx].status = MatchStatus::Completed;
        self.matches[idx].winner_id = Some(winner_id);

        let mut touched: Vec<MatchId> = Vec::new();
        let mut seeds: Vec<MatchId> = Vec::new();

        if let Some((if_idx, void_if_game)) = grand_final_plan {
            if void_if_game {
                self.matches[if_idx].status = MatchStatus::Voided;
            } else {
                // bracket reset: both grand-final participants play again
                self.matches[if_idx].player1_id = snapshot.player1_id;
                self.matches[if_idx].player2_id = snapshot.player2_id;
            }
            touched.push(self.matches[if_idx].id);
        } else {
            if let Some(next) = snapshot.next_match_id {
                self.place_player(next, winner_id)?;
                touched.push(next);
                seeds.push(next);
            }
            if drops_loser {
                if let Some(drop) = snapshot.loser_next_match_id {
                    let loser = self.matches[idx].loser_id().ok_or_else(|| {
                        violation(format!("ready match {} has no loser", snapshot.id))
                    })?;
                    self.place_player(drop, loser)?;
                    touched.push(drop);
                    seeds.push(drop);
                }
            }
        }

        touched.extend(self.auto_resolve(seeds)?);

        let mut seen = HashSet::new();
        let advanced = touched
            .into_iter()
            .filter(|id| *id != match_id && seen.insert(*id))
            .filter_map(|id| self.get(id).cloned())
            .collect();

        Ok(RecordOutcome {
            completed: self.matches[idx].clone(),
            advanced,
            tournament_complete: self.is_complete(),
        })
    }

    /// Bracket-reset rule for the first grand final. The winners-bracket
    /// finalist arrives undefeated and only needs to be beaten twice: if they
    /// win, the tournament is over and the if-game is voided; if the
    /// losers-bracket finalist wins, both players move into the if-game.
    /// Returns the if-game index and whether it gets voided.
    fn grand_final_plan(
        &self,
        grand_final: &Match,
        winner_id: PlayerId,
    ) -> Result<(usize, bool), TournamentError> {
        let undefeated = self
            .feeders
            .get(&grand_final.id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.get(*id))
            .find(|m| m.bracket == Bracket::Winners)
            .and_then(|m| m.winner_id)
            .ok_or_else(|| {
                violation(format!(
                    "grand final {} has no completed winners-bracket feeder",
                    grand_final.id
                ))
            })?;

        let if_idx = self
            .matches
            .iter()
            .position(|m| m.is_if_game)
            .ok_or_else(|| violation("no if-game allocated for grand final".to_string()))?;
        if self.matches[if_idx].is_resolved() {
            return Err(violation(format!(
                "if-game {} resolved before the grand final",
                self.matches[if_idx].id
            )));
        }

        Ok((if_idx, winner_id == undefeated))
    }

    /// Pre-flight for [`Self::place_player`]: the target exists, is still
    /// pending, and has a free slot.
    fn ensure_can_place(&self, target: MatchId) -> Result<(), TournamentError> {
        let m = self
            .get(target)
            .ok_or_else(|| violation(format!("advancement targets missing match {}", target)))?;
        if m.is_resolved() {
            return Err(violation(format!(
                "advancement targets resolved match {}",
                target
            )));
        }
        if m.occupied_slots() == 2 {
            return Err(violation(format!(
                "both slots of advancement target {} are already occupied",
                target
            )));
        }
        Ok(())
    }

    /// Copy an advancing player into the first empty slot of `target`.
    fn place_player(&mut self, target: MatchId, player: PlayerId) -> Result<(), TournamentError> {
        let idx = *self.index.get(&target).ok_or_else(|| {
            violation(format!("advancement targets missing match {}", target))
        })?;
        let m = &mut self.matches[idx];
        if m.is_resolved() {
            return Err(violation(format!(
                "player {} advanced into resolved match {}",
                player, target
            )));
        }
        if m.player1_id.is_none() {
            m.player1_id = Some(player);
        } else if m.player2_id.is_none() {
            m.player2_id = Some(player);
        } else {
            return Err(violation(format!(
                "both slots of match {} already occupied when advancing player {}",
                target, player
            )));
        }
        Ok(())
    }

    /// Resolve every round-1 bye and every losers-bracket slot that byes
    /// leave unreachable. Called once at generation time.
    pub(crate) fn resolve_byes(&mut self) -> Result<(), TournamentError> {
        let all: Vec<MatchId> = self.matches.iter().map(|m| m.id).collect();
        self.auto_resolve(all)?;
        Ok(())
    }

    /// Worklist pass: a pending match whose feeders are all resolved has its
    /// final set of participants. With one participant it is a bye (completed,
    /// winner propagated onward); with none it is voided. Matches with both
    /// slots filled stay pending and wait for a recorded result.
    fn auto_resolve(&mut self, seeds: Vec<MatchId>) -> Result<Vec<MatchId>, TournamentError> {
        let mut touched = Vec::new();
        let mut queue: VecDeque<MatchId> = seeds.into_iter().collect();

        while let Some(id) = queue.pop_front() {
            let Some(&idx) = self.index.get(&id) else {
                continue;
            };
            if self.matches[idx].is_resolved() || !self.all_feeders_resolved(id) {
                continue;
            }
            match self.matches[idx].occupied_slots() {
                2 => {}
                1 => {
                    let player = match self.matches[idx].player1_id.or(self.matches[idx].player2_id)
                    {
                        Some(p) => p,
                        None => continue,
                    };
                    self.matches[idx].status = MatchStatus::Completed;
                    self.matches[idx].winner_id = Some(player);
                    touched.push(id);
                    let next = self.matches[idx].next_match_id;
                    let drop = self.matches[idx].loser_next_match_id;
                    if let Some(next_id) = next {
                        self.place_player(next_id, player)?;
                        touched.push(next_id);
                        queue.push_back(next_id);
                    }
                    // a bye has no loser; its drop target only needs re-examination
                    if let Some(drop_id) = drop {
                        queue.push_back(drop_id);
                    }
                }
                _ => {
                    // round-1 matches have no feeders and are never voided
                    if self.feeders.get(&id).map_or(true, |f| f.is_empty()) {
                        continue;
                    }
                    self.matches[idx].status = MatchStatus::Voided;
                    touched.push(id);
                    if let Some(next_id) = self.matches[idx].next_match_id {
                        queue.push_back(next_id);
                    }
                }
            }
        }
        Ok(touched)
    }

    /// No feeder of `id` can still deliver a participant.
    fn all_feeders_resolved(&self, id: MatchId) -> bool {
        self.feeders.get(&id).map_or(true, |fs| {
            fs.iter()
                .all(|f| self.get(*f).map_or(false, Match::is_resolved))
        })
    }
}
