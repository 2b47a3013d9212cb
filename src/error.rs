use thiserror::Error;

use crate::competition::types::ActivityKind;

/// Errors produced by the scoring engine.
///
/// Two classes: invalid input (the caller handed us a score sheet that
/// cannot be scored as-is) and inconsistent state (the sheet references
/// entities that do not exist in the competition, a caller bug that is
/// never ignored silently). An empty score sheet is not an error; it yields an
/// empty outcome and leaves the activity incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("activity '{activity}' is {kind}-scored but scores were entered in {mode} mode")]
    ModeMismatch {
        activity: String,
        kind: ActivityKind,
        mode: &'static str,
    },

    #[error("duplicate score entry for {entity} {id}")]
    DuplicateEntry { entity: &'static str, id: u32 },

    #[error("no activity with id {0} in this competition")]
    UnknownActivity(u32),

    #[error("score entry references unknown team id {0}")]
    UnknownTeam(u32),

    #[error("score entry references unknown participant id {0}")]
    UnknownParticipant(u32),

    #[error("winning team id {0} is not part of this competition")]
    UnknownWinner(u32),

    #[error("activity '{0}' is completed but its point records cannot be rebuilt")]
    UnrecoverableRecords(String),
}

impl ScoringError {
    /// True for the inconsistent-state class: the competition data itself
    /// is broken, not just this score sheet.
    pub fn is_inconsistent_state(&self) -> bool {
        matches!(
            self,
            ScoringError::UnknownActivity(_)
                | ScoringError::UnknownTeam(_)
                | ScoringError::UnknownParticipant(_)
                | ScoringError::UnknownWinner(_)
                | ScoringError::UnrecoverableRecords(_)
        )
    }
}
