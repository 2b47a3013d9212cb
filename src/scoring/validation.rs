use crate::competition::types::{CompetitionState, ParticipantScore, TeamScore};
use crate::config::SetupFile;

/// Parse one "NAME=VALUE" score assignment.
fn parse_assignment(raw: &str) -> Result<(&str, f64), String> {
    let Some((name, value)) = raw.rsplit_once('=') else {
        return Err(format!("'{}': expected NAME=VALUE", raw));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("'{}': empty name", raw));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}': '{}' is not a number", raw, value.trim()))?;
    if !value.is_finite() {
        return Err(format!("'{}': value must be finite", raw));
    }
    Ok((name, value))
}

/// Resolve "TEAM=VALUE" assignments against the competition's teams.
/// Returns all resolution errors at once (not just the first).
pub fn resolve_team_scores(
    raw: &[String],
    state: &CompetitionState,
) -> Result<Vec<TeamScore>, Vec<String>> {
    let mut errors = Vec::new();
    let mut scores: Vec<TeamScore> = Vec::new();

    for assignment in raw {
        match parse_assignment(assignment) {
            Err(e) => errors.push(e),
            Ok((name, value)) => match state.team_by_name(name) {
                None => errors.push(format!("'{}': no team named '{}'", assignment, name)),
                Some(team) => {
                    if scores.iter().any(|s| s.team_id == team.id) {
                        errors.push(format!("'{}': team '{}' listed twice", assignment, name));
                    } else {
                        scores.push(TeamScore {
                            team_id: team.id,
                            raw: value,
                        });
                    }
                }
            },
        }
    }

    if errors.is_empty() {
        Ok(scores)
    } else {
        Err(errors)
    }
}

/// Resolve "PLAYER=VALUE" assignments against the competition's roster.
/// Returns all resolution errors at once.
pub fn resolve_participant_scores(
    raw: &[String],
    state: &CompetitionState,
) -> Result<Vec<ParticipantScore>, Vec<String>> {
    let mut errors = Vec::new();
    let mut scores: Vec<ParticipantScore> = Vec::new();

    for assignment in raw {
        match parse_assignment(assignment) {
            Err(e) => errors.push(e),
            Ok((name, value)) => match state.participant_by_name(name) {
                None => errors.push(format!("'{}': no participant named '{}'", assignment, name)),
                Some(participant) => {
                    if scores.iter().any(|s| s.participant_id == participant.id) {
                        errors.push(format!(
                            "'{}': participant '{}' listed twice",
                            assignment, name
                        ));
                    } else {
                        scores.push(ParticipantScore {
                            participant_id: participant.id,
                            raw: value,
                        });
                    }
                }
            },
        }
    }

    if errors.is_empty() {
        Ok(scores)
    } else {
        Err(errors)
    }
}

/// Validate a setup file before building a competition from it.
/// Returns all validation errors at once.
pub fn validate_setup(setup: &SetupFile) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if setup.name.trim().is_empty() {
        errors.push("name: must not be empty".to_string());
    }
    if setup.teams.len() < 2 {
        errors.push(format!(
            "teams: a competition needs at least 2 teams, found {}",
            setup.teams.len()
        ));
    }

    let mut team_names: Vec<&str> = Vec::new();
    let mut player_names: Vec<&str> = Vec::new();
    for (i, team) in setup.teams.iter().enumerate() {
        if team_names
            .iter()
            .any(|n| n.eq_ignore_ascii_case(&team.name))
        {
            errors.push(format!("teams[{}]: duplicate team name '{}'", i, team.name));
        }
        team_names.push(&team.name);

        if team.players.is_empty() {
            errors.push(format!("teams[{}]: '{}' has no players", i, team.name));
        }
        if !team
            .players
            .iter()
            .any(|p| p.eq_ignore_ascii_case(&team.captain))
        {
            errors.push(format!(
                "teams[{}]: captain '{}' is not on the roster",
                i, team.captain
            ));
        }
        for player in &team.players {
            if player_names.iter().any(|n| n.eq_ignore_ascii_case(player)) {
                errors.push(format!(
                    "teams[{}]: participant '{}' appears more than once",
                    i, player
                ));
            }
            player_names.push(player);
        }
    }

    let mut activity_names: Vec<&str> = Vec::new();
    for (i, activity) in setup.activities.iter().enumerate() {
        if activity_names
            .iter()
            .any(|n| n.eq_ignore_ascii_case(&activity.name))
        {
            errors.push(format!(
                "activities[{}]: duplicate activity name '{}'",
                i, activity.name
            ));
        }
        activity_names.push(&activity.name);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
