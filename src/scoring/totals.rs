use std::collections::BTreeMap;

use crate::competition::types::{
    Activity, ActivityKind, Participant, ParticipantScore, PointKind, PointRecord, ScoreInput,
    Team, TeamScore,
};
use crate::error::ScoringError;
use crate::scoring::engine::{score_activity, ScoreOutcome};
use crate::scoring::rules::ScoringRules;

/// Recompute every team's total from the full point record set.
///
/// Always from scratch: the sum of team-kind record points per team across
/// all activities. Every supplied team appears in the result, at zero when
/// it has no records, so a missing total is never ambiguous. Safe to
/// re-run at any time; there is deliberately no incremental variant.
pub fn recompute_team_totals(teams: &[Team], records: &[PointRecord]) -> BTreeMap<u32, i64> {
    let mut totals: BTreeMap<u32, i64> = teams.iter().map(|t| (t.id, 0)).collect();
    for record in records {
        if record.kind != PointKind::Team {
            continue;
        }
        if let Some(team_id) = record.team_id {
            if let Some(total) = totals.get_mut(&team_id) {
                *total += record.points;
            }
        }
    }
    totals
}

/// Re-score every completed activity under new rules.
///
/// Each activity's raw input is rebuilt from its stored records (raw
/// values, plus the recorded winner name for win/loss activities) and fed
/// back through the scorer, so the replacement records carry no residue of
/// the old rule values. Completed activities that somehow have no records
/// are absent from the result. The caller swaps in the new records per
/// activity, applies the fresh winner names, and then recomputes totals.
pub fn recompute_for_rule_change(
    activities: &[Activity],
    records: &[PointRecord],
    teams: &[Team],
    participants: &[Participant],
    new_rules: &ScoringRules,
) -> Result<BTreeMap<u32, ScoreOutcome>, ScoringError> {
    let mut outcomes = BTreeMap::new();
    for activity in activities.iter().filter(|a| a.completed) {
        let activity_records: Vec<&PointRecord> = records
            .iter()
            .filter(|r| r.activity_id == activity.id)
            .collect();
        if activity_records.is_empty() {
            continue;
        }
        let input = reconstruct_input(activity, &activity_records, teams)?;
        let outcome = score_activity(activity, &input, teams, participants, new_rules)?;
        outcomes.insert(activity.id, outcome);
    }
    Ok(outcomes)
}

/// Rebuild the raw input that produced an activity's records.
///
/// Individual activities keep their raw values on the individual-kind
/// records. Team activities are custom-scored when their records carry raw
/// values; otherwise they were win/loss saves and the stored winner name
/// is the authoritative selection (it is only ever written from the
/// explicit winner toggle, never derived, so it survives rule values that
/// make winner and loser points equal).
fn reconstruct_input(
    activity: &Activity,
    activity_records: &[&PointRecord],
    teams: &[Team],
) -> Result<ScoreInput, ScoringError> {
    match activity.kind {
        ActivityKind::Individual => {
            let mut scores = Vec::new();
            for record in activity_records
                .iter()
                .filter(|r| r.kind == PointKind::Individual)
            {
                let (Some(participant_id), Some(raw)) = (record.participant_id, record.raw_value)
                else {
                    return Err(ScoringError::UnrecoverableRecords(activity.name.clone()));
                };
                scores.push(ParticipantScore {
                    participant_id,
                    raw,
                });
            }
            if scores.is_empty() {
                return Err(ScoringError::UnrecoverableRecords(activity.name.clone()));
            }
            Ok(ScoreInput::Individual(scores))
        }
        ActivityKind::Team => {
            if activity_records.iter().all(|r| r.raw_value.is_some()) {
                let scores = activity_records
                    .iter()
                    .map(|record| {
                        record
                            .team_id
                            .map(|team_id| TeamScore {
                                team_id,
                                raw: record.raw_value.unwrap_or_default(),
                            })
                            .ok_or_else(|| {
                                ScoringError::UnrecoverableRecords(activity.name.clone())
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ScoreInput::TeamTotals(scores))
            } else {
                let winner = activity
                    .winner_name
                    .as_deref()
                    .and_then(|name| teams.iter().find(|t| t.name.eq_ignore_ascii_case(name)))
                    .ok_or_else(|| ScoringError::UnrecoverableRecords(activity.name.clone()))?;
                Ok(ScoreInput::WinLoss {
                    winning_team: Some(winner.id),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_teams() -> Vec<Team> {
        vec![
            Team {
                id: 1,
                name: "Red Rockets".to_string(),
                captain: "Alice".to_string(),
                total_score: 0,
            },
            Team {
                id: 2,
                name: "Blue Comets".to_string(),
                captain: "Dana".to_string(),
                total_score: 0,
            },
        ]
    }

    fn four_participants() -> Vec<Participant> {
        vec![
            Participant {
                id: 10,
                name: "Alice".to_string(),
                team_id: 1,
            },
            Participant {
                id: 11,
                name: "Ben".to_string(),
                team_id: 1,
            },
            Participant {
                id: 12,
                name: "Dana".to_string(),
                team_id: 2,
            },
            Participant {
                id: 13,
                name: "Eli".to_string(),
                team_id: 2,
            },
        ]
    }

    fn team_record(activity_id: u32, team_id: u32, points: i64) -> PointRecord {
        PointRecord {
            activity_id,
            team_id: Some(team_id),
            participant_id: None,
            raw_value: None,
            points,
            kind: PointKind::Team,
        }
    }

    fn completed_activity(id: u32, kind: ActivityKind, winner: Option<&str>) -> Activity {
        Activity {
            id,
            name: format!("Activity {}", id),
            kind,
            unit: None,
            completed: true,
            winner_name: winner.map(str::to_string),
        }
    }

    #[test]
    fn test_totals_sum_across_activities() {
        let records = vec![
            team_record(100, 1, 50),
            team_record(100, 2, 0),
            team_record(200, 1, 15),
            team_record(200, 2, 65),
        ];
        let totals = recompute_team_totals(&two_teams(), &records);
        assert_eq!(totals[&1], 65);
        assert_eq!(totals[&2], 65);
    }

    #[test]
    fn test_totals_include_teams_without_records() {
        let records = vec![team_record(100, 1, 50)];
        let totals = recompute_team_totals(&two_teams(), &records);
        assert_eq!(totals[&1], 50);
        assert_eq!(totals[&2], 0);
    }

    #[test]
    fn test_totals_ignore_individual_records() {
        let mut records = vec![team_record(100, 1, 10)];
        records.push(PointRecord {
            activity_id: 100,
            team_id: Some(1),
            participant_id: Some(10),
            raw_value: Some(20.0),
            points: 999,
            kind: PointKind::Individual,
        });
        let totals = recompute_team_totals(&two_teams(), &records);
        assert_eq!(totals[&1], 10);
    }

    #[test]
    fn test_totals_match_engine_output() {
        let teams = two_teams();
        let participants = four_participants();
        let activity = completed_activity(200, ActivityKind::Individual, None);
        let input = ScoreInput::Individual(vec![
            ParticipantScore {
                participant_id: 10,
                raw: 20.0,
            },
            ParticipantScore {
                participant_id: 12,
                raw: 10.0,
            },
        ]);
        let outcome =
            score_activity(&activity, &input, &teams, &participants, &ScoringRules::default())
                .unwrap();

        let totals = recompute_team_totals(&teams, &outcome.records);
        let summed: i64 = outcome
            .records
            .iter()
            .filter(|r| r.kind == PointKind::Team)
            .map(|r| r.points)
            .sum();
        assert_eq!(totals.values().sum::<i64>(), summed);
    }

    #[test]
    fn test_rule_change_rescores_individual_activity() {
        let teams = two_teams();
        let participants = four_participants();
        let activity = completed_activity(200, ActivityKind::Individual, None);
        let input = ScoreInput::Individual(vec![
            ParticipantScore {
                participant_id: 10,
                raw: 20.0,
            },
            ParticipantScore {
                participant_id: 11,
                raw: 15.0,
            },
            ParticipantScore {
                participant_id: 12,
                raw: 10.0,
            },
            ParticipantScore {
                participant_id: 13,
                raw: 5.0,
            },
        ]);
        let outcome =
            score_activity(&activity, &input, &teams, &participants, &ScoringRules::default())
                .unwrap();

        // Raise first_place from 10 to 20; A's team points go 65 -> 75.
        let new_rules = ScoringRules {
            first_place: 20,
            ..ScoringRules::default()
        };
        let outcomes = recompute_for_rule_change(
            &[activity],
            &outcome.records,
            &teams,
            &participants,
            &new_rules,
        )
        .unwrap();

        let rescored = &outcomes[&200];
        let team_points: Vec<i64> = rescored
            .records
            .iter()
            .filter(|r| r.kind == PointKind::Team)
            .map(|r| r.points)
            .collect();
        assert!(team_points.contains(&75));
        assert!(!team_points.contains(&65));

        let totals = recompute_team_totals(&teams, &rescored.records);
        assert_eq!(totals[&1], 75);
        assert_eq!(totals[&2], -5);
    }

    #[test]
    fn test_rule_change_rescores_win_loss_from_winner_name() {
        let teams = two_teams();
        let activity = completed_activity(100, ActivityKind::Team, Some("Blue Comets"));
        let records = vec![team_record(100, 1, 0), team_record(100, 2, 50)];

        let new_rules = ScoringRules {
            team_win: 100,
            team_loss: -10,
            ..ScoringRules::default()
        };
        let outcomes =
            recompute_for_rule_change(&[activity], &records, &teams, &[], &new_rules).unwrap();

        let rescored = &outcomes[&100];
        assert_eq!(rescored.winner_name.as_deref(), Some("Blue Comets"));
        let blue = rescored
            .records
            .iter()
            .find(|r| r.team_id == Some(2))
            .unwrap();
        let red = rescored
            .records
            .iter()
            .find(|r| r.team_id == Some(1))
            .unwrap();
        assert_eq!(blue.points, 100);
        assert_eq!(red.points, -10);
    }

    #[test]
    fn test_rule_change_leaves_custom_scores_alone() {
        let teams = two_teams();
        let activity = completed_activity(100, ActivityKind::Team, Some("Red Rockets"));
        let records = vec![
            PointRecord {
                raw_value: Some(12.0),
                ..team_record(100, 1, 12)
            },
            PointRecord {
                raw_value: Some(8.0),
                ..team_record(100, 2, 8)
            },
        ];

        let new_rules = ScoringRules {
            team_win: 500,
            ..ScoringRules::default()
        };
        let outcomes =
            recompute_for_rule_change(&[activity], &records, &teams, &[], &new_rules).unwrap();

        // Custom scores pass raw values through; rules do not touch them.
        let rescored = &outcomes[&100];
        let points: Vec<i64> = rescored.records.iter().map(|r| r.points).collect();
        assert_eq!(points, vec![12, 8]);
    }

    #[test]
    fn test_rule_change_skips_incomplete_activities() {
        let teams = two_teams();
        let mut activity = completed_activity(100, ActivityKind::Team, None);
        activity.completed = false;

        let outcomes = recompute_for_rule_change(
            &[activity],
            &[],
            &teams,
            &[],
            &ScoringRules::default(),
        )
        .unwrap();
        assert!(outcomes.is_empty());
    }

    #[test]
    fn test_rule_change_unrecoverable_win_loss_without_winner() {
        let teams = two_teams();
        // Completed win/loss records but the winner name is gone.
        let activity = completed_activity(100, ActivityKind::Team, None);
        let records = vec![team_record(100, 1, 50), team_record(100, 2, 0)];

        let err = recompute_for_rule_change(
            &[activity],
            &records,
            &teams,
            &[],
            &ScoringRules::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ScoringError::UnrecoverableRecords(_)));
        assert!(err.is_inconsistent_state());
    }
}
