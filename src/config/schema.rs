use serde::{Deserialize, Serialize};

use crate::competition::types::ActivityKind;
use crate::scoring::rules::ScoringRules;

/// Competition setup document.
///
/// Example YAML:
/// ```yaml
/// name: Summer Field Day
/// rules:
///   team_win: 50
///   last_place: -5
/// teams:
///   - name: Red Rockets
///     captain: Alice
///     players: [Alice, Ben, Cleo]
///   - name: Blue Comets
///     captain: Dana
///     players: [Dana, Eli, Fern]
/// activities:
///   - name: Tug of War
///     kind: team
///   - name: Trivia Relay
///     kind: individual
///     unit: points
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SetupFile {
    pub name: String,

    /// Scoring rules override; defaults apply when omitted.
    #[serde(default)]
    pub rules: Option<ScoringRules>,

    pub teams: Vec<TeamSetup>,

    #[serde(default)]
    pub activities: Vec<ActivitySetup>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TeamSetup {
    pub name: String,
    pub captain: String,
    pub players: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ActivitySetup {
    pub name: String,
    pub kind: ActivityKind,

    /// Display unit for raw values, e.g. "points" or "seconds".
    #[serde(default)]
    pub unit: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_setup_parse() {
        let yaml = r#"
name: Summer Field Day
rules:
  team_win: 60
teams:
  - name: Red Rockets
    captain: Alice
    players: [Alice, Ben]
  - name: Blue Comets
    captain: Dana
    players: [Dana, Eli]
activities:
  - name: Tug of War
    kind: team
  - name: Trivia Relay
    kind: individual
    unit: points
"#;
        let setup: SetupFile = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(setup.name, "Summer Field Day");
        assert_eq!(setup.rules.unwrap().team_win, 60);
        assert_eq!(setup.teams.len(), 2);
        assert_eq!(setup.teams[0].players.len(), 2);
        assert_eq!(setup.activities.len(), 2);
        assert_eq!(setup.activities[1].kind, ActivityKind::Individual);
        assert_eq!(setup.activities[1].unit.as_deref(), Some("points"));
    }

    #[test]
    fn test_minimal_setup_parse() {
        let yaml = r#"
name: Office Games
teams:
  - name: A
    captain: Pat
    players: [Pat]
  - name: B
    captain: Sam
    players: [Sam]
"#;
        let setup: SetupFile = serde_saphyr::from_str(yaml).unwrap();
        assert!(setup.rules.is_none());
        assert!(setup.activities.is_empty());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "name: X\nteams: []\nbracket: single\n";
        let parsed: Result<SetupFile, _> = serde_saphyr::from_str(yaml);
        assert!(parsed.is_err());
    }
}
