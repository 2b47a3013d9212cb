pub mod engine;
pub mod ranking;
pub mod rules;
pub mod totals;
pub mod validation;

pub use engine::{score_activity, ScoreOutcome};
pub use ranking::{
    activity_winner, compute_mvp, effective_placements, rank_entries, MvpResult, RankEntry,
    RankedEntry,
};
pub use rules::ScoringRules;
pub use totals::{recompute_for_rule_change, recompute_team_totals};
pub use validation::{resolve_participant_scores, resolve_team_scores, validate_setup};
