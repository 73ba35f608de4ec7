//! Tournament engine logic: bracket generation, result advancement, ratings.

mod generator;
mod graph;
mod rating;
mod workflow;

pub use generator::generate_bracket;
pub use graph::{BracketGraph, RecordOutcome};
pub use rating::{RatingConfig, RatingEngine, RatingUpdate};
pub use workflow::{create_tournament, record_match_result};
