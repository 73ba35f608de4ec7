//! Bracket generation: a complete, internally consistent match-dependency
//! graph from an ordered entry list, for single and double elimination.
//!
//! Deterministic for a given input, no side effects. Seeding is input order;
//! when the entry count is not a power of two the trailing players in input
//! order receive the byes (one per trailing round-1 match).

use crate::logic::graph::BracketGraph;
use crate::models::{
    Bracket, Match, MatchId, PlayerId, TournamentError, TournamentFormat, TournamentId,
};
use std::collections::HashSet;

/// Generate every match of a tournament, fully wired.
///
/// Round-1 byes come back already completed with their winner propagated;
/// losers-bracket slots that byes leave unreachable come back voided. The
/// returned set satisfies every invariant of [`BracketGraph::validate`].
pub fn generate_bracket(
    format: TournamentFormat,
    tournament_id: TournamentId,
    player_ids: &[PlayerId],
) -> Result<Vec<Match>, TournamentError> {
    validate_entries(format, player_ids)?;

    let bracket_size = player_ids.len().next_power_of_two();
    let mut winners = build_winners_rounds(tournament_id, bracket_size, player_ids);

    // each pair of round-r matches feeds one round-(r+1) match
    for r in 0..winners.len().saturating_sub(1) {
        let next_ids: Vec<MatchId> = winners[r + 1].iter().map(|m| m.id).collect();
        for (i, m) in winners[r].iter_mut().enumerate() {
            m.next_match_id = Some(next_ids[i / 2]);
        }
    }

    let mut matches: Vec<Match> = Vec::with_capacity(total_matches(format, bracket_size));
    match format {
        TournamentFormat::SingleElimination => {
            matches.extend(winners.into_iter().flatten());
        }
        TournamentFormat::DoubleElimination => {
            let losers = build_losers_rounds(tournament_id, bracket_size, &mut winners);

            let mut grand_final = Match::new(tournament_id, Bracket::GrandFinal, 1, None, None);
            let mut if_game = Match::new(tournament_id, Bracket::GrandFinal, 2, None, None);
            if_game.is_if_game = true;
            grand_final.next_match_id = Some(if_game.id);

            if let Some(wb_final) = winners.last_mut().and_then(|r| r.last_mut()) {
                wb_final.next_match_id = Some(grand_final.id);
            }

            matches.extend(winners.into_iter().flatten());
            let mut losers_flat: Vec<Match> = losers.into_iter().flatten().collect();
            if let Some(lb_final) = losers_flat.last_mut() {
                lb_final.next_match_id = Some(grand_final.id);
            }
            matches.extend(losers_flat);
            matches.push(grand_final);
            matches.push(if_game);
        }
    }

    let mut graph = BracketGraph::from_matches(format, matches)?;
    graph.resolve_byes()?;
    let matches = graph.into_matches();

    log::debug!(
        "generated {} matches for tournament {} ({:?}, {} players, bracket size {})",
        matches.len(),
        tournament_id,
        format,
        player_ids.len(),
        bracket_size
    );
    Ok(matches)
}

/// Entry list preconditions: enough players for the format, no duplicates.
fn validate_entries(
    format: TournamentFormat,
    player_ids: &[PlayerId],
) -> Result<(), TournamentError> {
    let required = format.min_players();
    if player_ids.len() < required {
        return Err(TournamentError::InsufficientPlayers {
            required,
            got: player_ids.len(),
        });
    }
    let mut seen = HashSet::with_capacity(player_ids.len());
    for &id in player_ids {
        if !seen.insert(id) {
            return Err(TournamentError::DuplicatePlayer(id));
        }
    }
    Ok(())
}

fn total_matches(format: TournamentFormat, bracket_size: usize) -> usize {
    match format {
        TournamentFormat::SingleElimination => bracket_size - 1,
        // winners + losers + grand final + if-game
        TournamentFormat::DoubleElimination => (bracket_size - 1) + (bracket_size - 2) + 2,
    }
}

/// Winners-bracket rounds, unwired. Round 1 pairs players in input order; the
/// first `bracket_size/2 - bye_count` matches take two entrants each, the
/// trailing `bye_count` matches take a single entrant (a bye).
fn build_winners_rounds(
    tournament_id: TournamentId,
    bracket_size: usize,
    player_ids: &[PlayerId],
) -> Vec<Vec<Match>> {
    let total_rounds = bracket_size.trailing_zeros();
    let first_round_matches = bracket_size / 2;
    let bye_count = bracket_size - player_ids.len();
    let paired = first_round_matches - bye_count;

    let mut entrants = player_ids.iter().copied();
    let mut round1 = Vec::with_capacity(first_round_matches);
    for i in 0..first_round_matches {
        let player1 = entrants.next();
        let player2 = if i < paired { entrants.next() } else { None };
        round1.push(Match::new(
            tournament_id,
            Bracket::Winners,
            1,
            player1,
            player2,
        ));
    }

    let mut rounds = vec![round1];
    for r in 2..=total_rounds {
        let count = bracket_size >> r;
        rounds.push(
            (0..count)
                .map(|_| Match::new(tournament_id, Bracket::Winners, r, None, None))
                .collect(),
        );
    }
    rounds
}

/// Losers-bracket rounds for double elimination, wired internally and hooked
/// up to the winners bracket (`loser_next_match_id` on every winners match).
///
/// Rounds alternate: a pair round matches two losers-bracket survivors, a
/// drop round matches a survivor against the winners-bracket loser entering
/// at that depth. Winners round-1 losers pair up in losers round 1; winners
/// round-r losers (r >= 2) drop into losers round 2(r-1) at the same index.
fn build_losers_rounds(
    tournament_id: TournamentId,
    bracket_size: usize,
    winners: &mut [Vec<Match>],
) -> Vec<Vec<Match>> {
    let winners_rounds = bracket_size.trailing_zeros() as usize;

    let mut counts = vec![bracket_size / 4];
    for r in 2..=winners_rounds {
        counts.push(bracket_size >> r);
        if r < winners_rounds {
            counts.push(bracket_size >> (r + 1));
        }
    }

    let mut losers: Vec<Vec<Match>> = counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            (0..count)
                .map(|_| Match::new(tournament_id, Bracket::Losers, (i + 1) as u32, None, None))
                .collect()
        })
        .collect();

    // internal wiring: pair rounds keep the index, drop rounds halve it
    for lr in 0..losers.len().saturating_sub(1) {
        let next_ids: Vec<MatchId> = losers[lr + 1].iter().map(|m| m.id).collect();
        let pair_round = lr % 2 == 0;
        for (i, m) in losers[lr].iter_mut().enumerate() {
            let target = if pair_round { i } else { i / 2 };
            m.next_match_id = Some(next_ids[target]);
        }
    }

    // cross-bracket wiring from the winners bracket
    for (i, m) in winners[0].iter_mut().enumerate() {
        m.loser_next_match_id = Some(losers[0][i / 2].id);
    }
    for r in 2..=winners_rounds {
        let drop_round = &losers[2 * (r - 1) - 1];
        let drop_ids: Vec<MatchId> = drop_round.iter().map(|m| m.id).collect();
        for (i, m) in winners[r - 1].iter_mut().enumerate() {
            m.loser_next_match_id = Some(drop_ids[i]);
        }
    }

    losers
}
