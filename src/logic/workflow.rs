//! Thin orchestration over the store collaborators: generate-then-persist
//! and record-then-save. The caller serializes recording per tournament.

use crate::logic::generator::generate_bracket;
use crate::logic::graph::{BracketGraph, RecordOutcome};
use crate::models::{MatchId, PlayerId, TournamentError, TournamentFormat, TournamentId};
use crate::stores::MatchStore;

/// Generate a bracket and persist it in one batch.
/// Generation failures abort before anything reaches the store; no partial
/// bracket is ever persisted.
pub fn create_tournament(
    store: &mut dyn MatchStore,
    format: TournamentFormat,
    tournament_id: TournamentId,
    player_ids: &[PlayerId],
) -> Result<BracketGraph, TournamentError> {
    let matches = generate_bracket(format, tournament_id, player_ids)?;
    store.persist_batch(&matches)?;
    BracketGraph::from_matches(format, matches)
}

/// Record a result and write back every mutated match. A recording failure
/// aborts this operation only; previously recorded results remain valid.
pub fn record_match_result(
    graph: &mut BracketGraph,
    store: &mut dyn MatchStore,
    match_id: MatchId,
    winner_id: PlayerId,
) -> Result<RecordOutcome, TournamentError> {
    let outcome = graph.record_result(match_id, winner_id)?;
    store.save(&outcome.completed)?;
    for m in &outcome.advanced {
        store.save(m)?;
    }
    Ok(outcome)
}
