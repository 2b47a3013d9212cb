use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::scoring::rules::ScoringRules;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
    pub captain: String, // participant name, matched by name rather than a flag
    /// Cached total. The point records are authoritative; this must equal
    /// their sum after every recomputation.
    pub total_score: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: u32,
    pub name: String,
    pub team_id: u32,
}

impl Participant {
    /// Whether this participant captains the given team.
    pub fn is_captain_of(&self, team: &Team) -> bool {
        self.team_id == team.id && self.name == team.captain
    }
}

/// How an activity is scored. Determines which scoring algorithm applies;
/// fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Team,
    Individual,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityKind::Team => write!(f, "team"),
            ActivityKind::Individual => write!(f, "individual"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    pub id: u32,
    pub name: String,
    pub kind: ActivityKind,
    /// Display unit for raw values, e.g. "points" or "seconds".
    #[serde(default)]
    pub unit: Option<String>,
    pub completed: bool,
    #[serde(default)]
    pub winner_name: Option<String>,
}

/// Whether a point record is attributed to a team or to a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointKind {
    Team,
    Individual,
}

/// The authoritative unit of points for one entity in one activity.
///
/// Records are immutable once written; re-saving an activity's scores
/// replaces all of its records wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub activity_id: u32,
    #[serde(default)]
    pub team_id: Option<u32>,
    #[serde(default)]
    pub participant_id: Option<u32>,
    #[serde(default)]
    pub raw_value: Option<f64>,
    pub points: i64,
    pub kind: PointKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamScore {
    pub team_id: u32,
    pub raw: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticipantScore {
    pub participant_id: u32,
    pub raw: f64,
}

/// Raw input for one activity save.
///
/// The mode is chosen by the caller per save operation (a toggle in the
/// original score entry flow), never inferred from the shape of the data.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreInput {
    /// Team activity, win/loss toggle. `None` means undecided: no points
    /// are produced and the activity cannot be marked completed.
    WinLoss { winning_team: Option<u32> },
    /// Team activity, custom numeric score per team.
    TeamTotals(Vec<TeamScore>),
    /// Individual activity, numeric score per participant. Participants
    /// without an entry are excluded from records and ranking.
    Individual(Vec<ParticipantScore>),
}

impl ScoreInput {
    pub fn mode_name(&self) -> &'static str {
        match self {
            ScoreInput::WinLoss { .. } => "win/loss",
            ScoreInput::TeamTotals(_) => "team score",
            ScoreInput::Individual(_) => "individual",
        }
    }
}

/// The persisted competition document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitionState {
    pub version: u32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub rules: ScoringRules,
    pub teams: Vec<Team>,
    pub participants: Vec<Participant>,
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub point_records: Vec<PointRecord>,
}

pub const STATE_VERSION: u32 = 1;

impl CompetitionState {
    /// Create an empty competition with default rules.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            version: STATE_VERSION,
            name: name.into(),
            created_at: now,
            updated_at: now,
            rules: ScoringRules::default(),
            teams: Vec::new(),
            participants: Vec::new(),
            activities: Vec::new(),
            point_records: Vec::new(),
        }
    }

    pub fn team(&self, id: u32) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn team_by_name(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn participant(&self, id: u32) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn participant_by_name(&self, name: &str) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn activity(&self, id: u32) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }

    pub fn activity_by_name(&self, name: &str) -> Option<&Activity> {
        self.activities
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// All point records belonging to one activity.
    pub fn records_for(&self, activity_id: u32) -> Vec<&PointRecord> {
        self.point_records
            .iter()
            .filter(|r| r.activity_id == activity_id)
            .collect()
    }

    /// Participants on one team, in roster order.
    pub fn roster(&self, team_id: u32) -> Vec<&Participant> {
        self.participants
            .iter()
            .filter(|p| p.team_id == team_id)
            .collect()
    }
}
