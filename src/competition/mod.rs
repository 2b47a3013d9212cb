pub mod state;
pub mod storage;
pub mod types;

pub use storage::{load_state, save_state};
pub use types::{
    Activity, ActivityKind, CompetitionState, Participant, ParticipantScore, PointKind,
    PointRecord, ScoreInput, Team, TeamScore,
};
