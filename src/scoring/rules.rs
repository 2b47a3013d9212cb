use serde::{Deserialize, Serialize};

/// Point values applied when scoring activities.
///
/// One instance per competition. Every field may be zero or negative;
/// negative values act as penalties, zero as a no-op. Changing the rules
/// after activities have been scored triggers a full recomputation of all
/// point records under the new values.
///
/// Example YAML:
/// ```yaml
/// rules:
///   team_win: 50
///   team_loss: 0
///   first_place: 10
///   second_place: 5
///   last_place: -5
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ScoringRules {
    /// Awarded to the winning team of a team activity, and as the placement
    /// bonus for the top team of an individual activity.
    pub team_win: i64,

    /// Awarded to the losing team of a team activity, and as the placement
    /// bonus for the bottom team of an individual activity.
    pub team_loss: i64,

    /// Individual bonus for first place.
    pub first_place: i64,

    /// Individual bonus for second place.
    pub second_place: i64,

    /// Individual penalty (usually negative) for last place.
    pub last_place: i64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            team_win: 50,
            team_loss: 0,
            first_place: 10,
            second_place: 5,
            last_place: -5,
        }
    }
}
