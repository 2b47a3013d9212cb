use chrono::Utc;

use super::types::{Activity, ActivityKind, CompetitionState, Participant, PointKind, ScoreInput, Team};
use crate::config::SetupFile;
use crate::error::ScoringError;
use crate::scoring::engine::{score_activity, ScoreOutcome};
use crate::scoring::ranking::{self, MvpResult, RankEntry};
use crate::scoring::rules::ScoringRules;
use crate::scoring::totals::{recompute_for_rule_change, recompute_team_totals};

impl CompetitionState {
    /// Build a fresh competition from a validated setup file. Ids are
    /// assigned here and never reused.
    pub fn from_setup(setup: &SetupFile) -> Self {
        let mut state = CompetitionState::new(setup.name.clone());
        if let Some(rules) = setup.rules {
            state.rules = rules;
        }

        let mut participant_id = 0;
        for (i, team) in setup.teams.iter().enumerate() {
            let team_id = i as u32 + 1;
            state.teams.push(Team {
                id: team_id,
                name: team.name.clone(),
                captain: team.captain.clone(),
                total_score: 0,
            });
            for player in &team.players {
                participant_id += 1;
                state.participants.push(Participant {
                    id: participant_id,
                    name: player.clone(),
                    team_id,
                });
            }
        }

        for (i, activity) in setup.activities.iter().enumerate() {
            state.activities.push(Activity {
                id: i as u32 + 1,
                name: activity.name.clone(),
                kind: activity.kind,
                unit: activity.unit.clone(),
                completed: false,
                winner_name: None,
            });
        }

        state
    }

    /// Save one activity's scores.
    ///
    /// The whole sequence is one in-memory mutation: the activity's old
    /// records are dropped, the new ones inserted, completion and winner
    /// updated, and every team total rebuilt from the full record set.
    /// Persisting the state afterwards makes the sequence atomic for any
    /// reader of the store.
    pub fn save_scores(
        &mut self,
        activity_id: u32,
        input: &ScoreInput,
    ) -> Result<ScoreOutcome, ScoringError> {
        let activity = self
            .activity(activity_id)
            .cloned()
            .ok_or(ScoringError::UnknownActivity(activity_id))?;

        let outcome = score_activity(&activity, input, &self.teams, &self.participants, &self.rules)?;

        self.point_records.retain(|r| r.activity_id != activity_id);
        self.point_records.extend(outcome.records.iter().cloned());
        if let Some(stored) = self.activities.iter_mut().find(|a| a.id == activity_id) {
            stored.completed = outcome.completed;
            stored.winner_name = outcome.winner_name.clone();
        }

        self.refresh_totals();
        self.updated_at = Utc::now();
        Ok(outcome)
    }

    /// Delete an activity along with all of its point records, then
    /// rebuild team totals.
    pub fn delete_activity(&mut self, activity_id: u32) -> Result<(), ScoringError> {
        if self.activity(activity_id).is_none() {
            return Err(ScoringError::UnknownActivity(activity_id));
        }
        self.activities.retain(|a| a.id != activity_id);
        self.point_records.retain(|r| r.activity_id != activity_id);
        self.refresh_totals();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Replace the scoring rules and re-score every completed activity
    /// under the new values.
    ///
    /// All replacement records are computed before anything is touched, so
    /// a reconstruction failure leaves the state unchanged.
    pub fn set_rules(&mut self, new_rules: ScoringRules) -> Result<(), ScoringError> {
        let outcomes = recompute_for_rule_change(
            &self.activities,
            &self.point_records,
            &self.teams,
            &self.participants,
            &new_rules,
        )?;

        self.rules = new_rules;
        for (activity_id, outcome) in outcomes {
            self.point_records.retain(|r| r.activity_id != activity_id);
            self.point_records.extend(outcome.records);
            if let Some(stored) = self.activities.iter_mut().find(|a| a.id == activity_id) {
                stored.winner_name = outcome.winner_name;
            }
        }

        self.refresh_totals();
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Teams ordered for the standings table: total descending, name
    /// ascending on ties.
    pub fn standings(&self) -> Vec<&Team> {
        let mut teams: Vec<&Team> = self.teams.iter().collect();
        teams.sort_by(|a, b| {
            b.total_score
                .cmp(&a.total_score)
                .then_with(|| a.name.cmp(&b.name))
        });
        teams
    }

    /// The competition MVP, judged over all completed individual
    /// activities that have at least one scored entry.
    pub fn mvp(&self) -> Option<MvpResult> {
        let per_activity: Vec<Vec<RankEntry>> = self
            .activities
            .iter()
            .filter(|a| a.completed && a.kind == ActivityKind::Individual)
            .map(|a| {
                self.records_for(a.id)
                    .into_iter()
                    .filter(|r| r.kind == PointKind::Individual)
                    .filter_map(|r| {
                        Some(RankEntry {
                            id: r.participant_id?,
                            score: r.raw_value?,
                        })
                    })
                    .collect::<Vec<RankEntry>>()
            })
            .filter(|entries| !entries.is_empty())
            .collect();

        ranking::compute_mvp(&per_activity, &self.participants)
    }

    /// The winning team of one activity as judged from its records.
    pub fn winner_of(&self, activity_id: u32) -> Option<&Team> {
        let records = self.records_for(activity_id);
        ranking::activity_winner(&records).and_then(|id| self.team(id))
    }

    fn refresh_totals(&mut self) {
        let totals = recompute_team_totals(&self.teams, &self.point_records);
        for team in &mut self.teams {
            team.total_score = totals.get(&team.id).copied().unwrap_or(0);
        }
    }
}
