use std::collections::HashMap;
use std::io::IsTerminal;

use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::competition::types::{Activity, CompetitionState, PointKind};
use crate::scoring::ranking::{rank_entries, MvpResult, RankEntry};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format the standings table with columns: rank, team, captain, points.
/// Tied totals share a rank, as everywhere else in the scoring.
pub fn format_standings(state: &CompetitionState, use_colors: bool) -> String {
    if state.teams.is_empty() {
        return "No teams in this competition.".to_string();
    }

    let entries: Vec<RankEntry> = state
        .teams
        .iter()
        .map(|t| RankEntry {
            id: t.id,
            score: t.total_score as f64,
        })
        .collect();
    let ranks: HashMap<u32, u32> = rank_entries(&entries)
        .into_iter()
        .map(|r| (r.id, r.rank))
        .collect();

    let name_width = standings_name_width(state);

    state
        .standings()
        .iter()
        .map(|team| {
            let rank_str = format!("{:>2}.", ranks.get(&team.id).copied().unwrap_or(0));
            let name = format!("{:<name_width$}", truncate_name(&team.name, name_width));
            let captain = format!("{:<20}", format!("capt. {}", team.captain));
            let points = format!("{:>6}", team.total_score);

            if use_colors {
                format!(
                    "{} {}  {}  {}",
                    rank_str.dimmed(),
                    name,
                    captain.dimmed(),
                    points.bold(),
                )
            } else {
                format!("{} {}  {}  {}", rank_str, name, captain, points)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format one activity as a single results line:
/// "{name} ({kind}): {winner or status}"
pub fn format_activity_line(
    state: &CompetitionState,
    activity: &Activity,
    use_colors: bool,
) -> String {
    let status = if !activity.completed {
        "not yet scored".to_string()
    } else {
        match state.winner_of(activity.id) {
            Some(team) => format!("winner: {}", team.name),
            None => "no winner (tie)".to_string(),
        }
    };

    if use_colors {
        format!(
            "{} ({}): {}",
            activity.name.bold(),
            activity.kind,
            if activity.completed {
                status.green().to_string()
            } else {
                status.dimmed().to_string()
            }
        )
    } else {
        format!("{} ({}): {}", activity.name, activity.kind, status)
    }
}

/// Format the per-participant results of one individual activity, ranked,
/// one line per scored participant.
pub fn format_individual_results(
    state: &CompetitionState,
    activity: &Activity,
    use_colors: bool,
) -> String {
    let entries: Vec<RankEntry> = state
        .records_for(activity.id)
        .into_iter()
        .filter(|r| r.kind == PointKind::Individual)
        .filter_map(|r| {
            Some(RankEntry {
                id: r.participant_id?,
                score: r.raw_value?,
            })
        })
        .collect();

    if entries.is_empty() {
        return "  (no entries)".to_string();
    }

    let unit = activity.unit.as_deref().unwrap_or("");
    rank_entries(&entries)
        .iter()
        .map(|ranked| {
            let name = state
                .participant(ranked.id)
                .map(|p| p.name.as_str())
                .unwrap_or("?");
            let value = format_raw(ranked.score);
            let line = if unit.is_empty() {
                format!("  {:>2}. {:<20} {}", ranked.rank, name, value)
            } else {
                format!("  {:>2}. {:<20} {} {}", ranked.rank, name, value, unit)
            };
            if use_colors && ranked.rank == 1 {
                line.bold().to_string()
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the MVP line: "MVP: {name} (avg rank {rank})"
pub fn format_mvp(mvp: &MvpResult, use_colors: bool) -> String {
    let rank = format!("{:.2}", mvp.average_rank);
    if use_colors {
        format!("MVP: {} (avg rank {})", mvp.name.bold().yellow(), rank)
    } else {
        format!("MVP: {} (avg rank {})", mvp.name, rank)
    }
}

/// Format a raw value without a trailing ".0" for whole numbers.
pub fn format_raw(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

/// Width available for team names, bounded by the terminal when present.
fn standings_name_width(state: &CompetitionState) -> usize {
    let longest = state
        .teams
        .iter()
        .map(|t| t.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);

    match terminal_size() {
        // rank(4) + captain(22) + points(8) leaves the rest for the name
        Some((Width(w), _)) => longest.min((w as usize).saturating_sub(34).max(8)),
        None => longest, // pipe, don't truncate
    }
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}
