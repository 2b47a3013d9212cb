use std::collections::{BTreeMap, HashMap, HashSet};

use crate::competition::types::{
    Activity, ActivityKind, Participant, ParticipantScore, PointKind, PointRecord, ScoreInput,
    Team, TeamScore,
};
use crate::error::ScoringError;
use crate::scoring::ranking::{effective_placements, RankEntry};
use crate::scoring::rules::ScoringRules;

/// Everything one activity save produces: the replacement point records,
/// the declared winner (if any), and whether the activity can be marked
/// completed.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreOutcome {
    pub records: Vec<PointRecord>,
    pub winner_name: Option<String>,
    pub completed: bool,
}

impl ScoreOutcome {
    fn empty() -> Self {
        Self {
            records: Vec::new(),
            winner_name: None,
            completed: false,
        }
    }
}

/// Score one activity from raw input.
///
/// Pure: no state is read or written. The caller replaces the activity's
/// previous point records with `records` wholesale and recomputes team
/// totals afterwards. An empty score sheet is recoverable and yields an
/// empty outcome with `completed` unset.
pub fn score_activity(
    activity: &Activity,
    input: &ScoreInput,
    teams: &[Team],
    participants: &[Participant],
    rules: &ScoringRules,
) -> Result<ScoreOutcome, ScoringError> {
    match (activity.kind, input) {
        (ActivityKind::Team, ScoreInput::WinLoss { winning_team }) => {
            score_win_loss(activity, *winning_team, teams, rules)
        }
        (ActivityKind::Team, ScoreInput::TeamTotals(scores)) => {
            score_team_totals(activity, scores, teams)
        }
        (ActivityKind::Individual, ScoreInput::Individual(scores)) => {
            score_individual(activity, scores, teams, participants, rules)
        }
        _ => Err(ScoringError::ModeMismatch {
            activity: activity.name.clone(),
            kind: activity.kind,
            mode: input.mode_name(),
        }),
    }
}

/// Win/loss mode: the selected team takes `team_win`, every other team
/// takes `team_loss`. No selection means the activity stays undecided.
fn score_win_loss(
    activity: &Activity,
    winning_team: Option<u32>,
    teams: &[Team],
    rules: &ScoringRules,
) -> Result<ScoreOutcome, ScoringError> {
    let Some(winner_id) = winning_team else {
        return Ok(ScoreOutcome::empty());
    };
    let winner = teams
        .iter()
        .find(|t| t.id == winner_id)
        .ok_or(ScoringError::UnknownWinner(winner_id))?;

    let records = teams
        .iter()
        .map(|team| PointRecord {
            activity_id: activity.id,
            team_id: Some(team.id),
            participant_id: None,
            raw_value: None,
            points: if team.id == winner_id {
                rules.team_win
            } else {
                rules.team_loss
            },
            kind: PointKind::Team,
        })
        .collect();

    Ok(ScoreOutcome {
        records,
        winner_name: Some(winner.name.clone()),
        completed: true,
    })
}

/// Custom-score mode: each entered value becomes that team's points as-is,
/// with no win/loss transformation.
fn score_team_totals(
    activity: &Activity,
    scores: &[TeamScore],
    teams: &[Team],
) -> Result<ScoreOutcome, ScoringError> {
    if scores.is_empty() {
        return Ok(ScoreOutcome::empty());
    }

    let mut seen = HashSet::new();
    for score in scores {
        if !seen.insert(score.team_id) {
            return Err(ScoringError::DuplicateEntry {
                entity: "team",
                id: score.team_id,
            });
        }
        if !teams.iter().any(|t| t.id == score.team_id) {
            return Err(ScoringError::UnknownTeam(score.team_id));
        }
    }

    let records: Vec<PointRecord> = scores
        .iter()
        .map(|score| PointRecord {
            activity_id: activity.id,
            team_id: Some(score.team_id),
            participant_id: None,
            raw_value: Some(score.raw),
            points: score.raw.round() as i64,
            kind: PointKind::Team,
        })
        .collect();

    let winner_name = unique_max(records.iter().map(|r| (r.team_id.unwrap_or(0), r.points)))
        .filter(|&(_, points)| points > 0)
        .and_then(|(id, _)| teams.iter().find(|t| t.id == id))
        .map(|t| t.name.clone());

    Ok(ScoreOutcome {
        records,
        winner_name,
        completed: true,
    })
}

/// Individual mode: participants are scored individually, their raw values
/// roll up into team totals for the placement bonus, and the top-two and
/// bottom individual placements earn bonuses that are folded into the
/// owning team's record.
fn score_individual(
    activity: &Activity,
    scores: &[ParticipantScore],
    teams: &[Team],
    participants: &[Participant],
    rules: &ScoringRules,
) -> Result<ScoreOutcome, ScoringError> {
    if scores.is_empty() {
        return Ok(ScoreOutcome::empty());
    }

    let mut seen = HashSet::new();
    let mut team_of = HashMap::new();
    for score in scores {
        if !seen.insert(score.participant_id) {
            return Err(ScoringError::DuplicateEntry {
                entity: "participant",
                id: score.participant_id,
            });
        }
        let participant = participants
            .iter()
            .find(|p| p.id == score.participant_id)
            .ok_or(ScoringError::UnknownParticipant(score.participant_id))?;
        if !teams.iter().any(|t| t.id == participant.team_id) {
            return Err(ScoringError::UnknownTeam(participant.team_id));
        }
        team_of.insert(score.participant_id, participant.team_id);
    }

    // Team raw totals over scored participants only.
    let mut team_totals: BTreeMap<u32, f64> = BTreeMap::new();
    for score in scores {
        *team_totals
            .entry(team_of[&score.participant_id])
            .or_insert(0.0) += score.raw;
    }

    let placement_bonus = team_placement_bonuses(&team_totals, rules);

    let entries: Vec<RankEntry> = scores
        .iter()
        .map(|s| RankEntry {
            id: s.participant_id,
            score: s.raw,
        })
        .collect();
    let bonuses = individual_bonuses(&entries, rules);

    // The score entry itself carries zero points. Individual bonuses are
    // folded into the owning team's record below, never attributed to the
    // participant's own record; team totals would double-count otherwise.
    let mut records: Vec<PointRecord> = scores
        .iter()
        .map(|score| PointRecord {
            activity_id: activity.id,
            team_id: None,
            participant_id: Some(score.participant_id),
            raw_value: Some(score.raw),
            points: 0,
            kind: PointKind::Individual,
        })
        .collect();

    let mut team_points: BTreeMap<u32, i64> = BTreeMap::new();
    for &team_id in team_totals.keys() {
        team_points.insert(team_id, placement_bonus.get(&team_id).copied().unwrap_or(0));
    }
    for score in scores {
        let bonus = bonuses.get(&score.participant_id).copied().unwrap_or(0);
        *team_points
            .entry(team_of[&score.participant_id])
            .or_insert(0) += bonus;
    }

    for (&team_id, &points) in &team_points {
        records.push(PointRecord {
            activity_id: activity.id,
            team_id: Some(team_id),
            participant_id: None,
            raw_value: None,
            points,
            kind: PointKind::Team,
        });
    }

    let winner_name = unique_max(team_points.iter().map(|(&id, &points)| (id, points)))
        .filter(|&(_, points)| points > 0)
        .and_then(|(id, _)| teams.iter().find(|t| t.id == id))
        .map(|t| t.name.clone());

    Ok(ScoreOutcome {
        records,
        winner_name,
        completed: true,
    })
}

/// Placement bonuses for team raw totals in an individual activity. Applies
/// only when at least two teams were scored and at least one total is
/// positive: the unique highest total takes `team_win`, the unique lowest
/// takes `team_loss`. A tie at either end awards nothing there.
fn team_placement_bonuses(
    team_totals: &BTreeMap<u32, f64>,
    rules: &ScoringRules,
) -> HashMap<u32, i64> {
    let mut bonuses = HashMap::new();
    if team_totals.len() < 2 || !team_totals.values().any(|&total| total > 0.0) {
        return bonuses;
    }

    if let Some((top, _)) = unique_max(team_totals.iter().map(|(&id, &total)| (id, total))) {
        bonuses.insert(top, rules.team_win);
    }
    if let Some((bottom, _)) = unique_min(team_totals.iter().map(|(&id, &total)| (id, total))) {
        bonuses.insert(bottom, rules.team_loss);
    }
    bonuses
}

/// Individual placement bonuses, keyed by participant id.
///
/// Thresholds use effective placements: the first placement group takes
/// `first_place` (population over 1), the second-best distinct group takes
/// `second_place` and the worst group takes `last_place` (population over
/// 2 for both). Overlapping awards stack; with very few distinct scores a
/// participant can take a top bonus and the last-place penalty at once.
fn individual_bonuses(entries: &[RankEntry], rules: &ScoringRules) -> HashMap<u32, i64> {
    let mut bonuses: HashMap<u32, i64> = HashMap::new();
    let placements = effective_placements(entries);
    let population = entries.len();

    let mut distinct: Vec<u32> = placements.values().copied().collect();
    distinct.sort_unstable();
    distinct.dedup();

    let second_best = distinct.get(1).copied();
    let worst = distinct.last().copied();

    for entry in entries {
        let placement = placements[&entry.id];
        let mut bonus = 0;
        if placement == 1 && population > 1 {
            bonus += rules.first_place;
        }
        if Some(placement) == second_best && population > 2 {
            bonus += rules.second_place;
        }
        if Some(placement) == worst && population > 2 {
            bonus += rules.last_place;
        }
        if bonus != 0 {
            bonuses.insert(entry.id, bonus);
        }
    }
    bonuses
}

fn unique_max<I, V>(items: I) -> Option<(u32, V)>
where
    I: Iterator<Item = (u32, V)>,
    V: PartialOrd + Copy,
{
    let mut best: Option<(u32, V)> = None;
    let mut tied = false;
    for (id, value) in items {
        match best {
            None => {
                best = Some((id, value));
            }
            Some((_, current)) => {
                if value > current {
                    best = Some((id, value));
                    tied = false;
                } else if value == current {
                    tied = true;
                }
            }
        }
    }
    if tied {
        None
    } else {
        best
    }
}

fn unique_min<I, V>(items: I) -> Option<(u32, V)>
where
    I: Iterator<Item = (u32, V)>,
    V: PartialOrd + Copy,
{
    let mut best: Option<(u32, V)> = None;
    let mut tied = false;
    for (id, value) in items {
        match best {
            None => {
                best = Some((id, value));
            }
            Some((_, current)) => {
                if value < current {
                    best = Some((id, value));
                    tied = false;
                } else if value == current {
                    tied = true;
                }
            }
        }
    }
    if tied {
        None
    } else {
        best
    }
}
