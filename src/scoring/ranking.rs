use std::cmp::Ordering;
use std::collections::HashMap;

use crate::competition::types::{Participant, PointKind, PointRecord};

/// An entity (team or participant) with a score to be ranked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankEntry {
    pub id: u32,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedEntry {
    pub id: u32,
    pub score: f64,
    pub rank: u32,
}

/// Rank entries under competition ranking.
///
/// Sort descending by score; the first entry gets rank 1 and each
/// subsequent entry's rank equals its 1-based position, unless its score
/// equals the preceding entry's, in which case it inherits that rank.
/// Entries [10, 10, 5] rank [1, 1, 3].
pub fn rank_entries(entries: &[RankEntry]) -> Vec<RankedEntry> {
    let mut sorted: Vec<RankEntry> = entries.to_vec();
    sorted.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

    let mut ranked: Vec<RankedEntry> = Vec::with_capacity(sorted.len());
    for (idx, entry) in sorted.iter().enumerate() {
        let rank = match ranked.last() {
            Some(prev) if prev.score == entry.score => prev.rank,
            _ => idx as u32 + 1,
        };
        ranked.push(RankedEntry {
            id: entry.id,
            score: entry.score,
            rank,
        });
    }
    ranked
}

/// Effective placement per entry: 1 plus the count of entries with a
/// strictly greater score. Tied entries share a placement and the next
/// distinct score's placement skips ahead by the tie group's size.
///
/// This is the scheme the bonus thresholds are evaluated against; it is
/// kept separate from `rank_entries` because the two are used for
/// different purposes and must not drift into one another.
pub fn effective_placements(entries: &[RankEntry]) -> HashMap<u32, u32> {
    let mut placements = HashMap::with_capacity(entries.len());
    for entry in entries {
        let greater = entries.iter().filter(|e| e.score > entry.score).count();
        placements.insert(entry.id, greater as u32 + 1);
    }
    placements
}

/// The winning team of one activity, judged from its team-kind point
/// records: strictly greatest points wins, a tie yields no winner.
pub fn activity_winner(records: &[&PointRecord]) -> Option<u32> {
    let team_records: Vec<&&PointRecord> = records
        .iter()
        .filter(|r| r.kind == PointKind::Team)
        .collect();

    let best = team_records.iter().map(|r| r.points).max()?;
    let mut at_best = team_records.iter().filter(|r| r.points == best);
    let winner = at_best.next()?;
    if at_best.next().is_some() {
        return None; // tied at the top
    }
    winner.team_id
}

#[derive(Debug, Clone, PartialEq)]
pub struct MvpResult {
    pub participant_id: u32,
    pub name: String,
    pub average_rank: f64,
}

/// Determine the competition MVP.
///
/// `per_activity` holds the scored entries of every completed individual
/// activity that has at least one entry. Only participants present in ALL
/// of those activities qualify; the qualifier with the lowest mean
/// competition rank wins. Ties are broken lexicographically by name, a
/// deliberate contract where the original resolved them by iteration
/// order. Returns `None` when no participant qualifies.
pub fn compute_mvp(
    per_activity: &[Vec<RankEntry>],
    participants: &[Participant],
) -> Option<MvpResult> {
    if per_activity.is_empty() {
        return None;
    }

    let mut ranks: HashMap<u32, Vec<u32>> = HashMap::new();
    for entries in per_activity {
        for ranked in rank_entries(entries) {
            ranks.entry(ranked.id).or_default().push(ranked.rank);
        }
    }

    let names: HashMap<u32, &str> = participants
        .iter()
        .map(|p| (p.id, p.name.as_str()))
        .collect();

    let mut best: Option<MvpResult> = None;
    for (id, rank_list) in &ranks {
        if rank_list.len() != per_activity.len() {
            continue; // missed at least one activity
        }
        let average = rank_list.iter().sum::<u32>() as f64 / rank_list.len() as f64;
        let name = names.get(id).copied().unwrap_or_default();

        let better = match &best {
            None => true,
            Some(current) => {
                average < current.average_rank
                    || (average == current.average_rank && name < current.name.as_str())
            }
        };
        if better {
            best = Some(MvpResult {
                participant_id: *id,
                name: name.to_string(),
                average_rank: average,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(scores: &[f64]) -> Vec<RankEntry> {
        scores
            .iter()
            .enumerate()
            .map(|(i, &score)| RankEntry {
                id: i as u32 + 1,
                score,
            })
            .collect()
    }

    fn team_record(team_id: u32, points: i64) -> PointRecord {
        PointRecord {
            activity_id: 1,
            team_id: Some(team_id),
            participant_id: None,
            raw_value: None,
            points,
            kind: PointKind::Team,
        }
    }

    fn roster(names: &[&str]) -> Vec<Participant> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Participant {
                id: i as u32 + 1,
                name: name.to_string(),
                team_id: 1,
            })
            .collect()
    }

    #[test]
    fn test_rank_distinct_scores() {
        let ranked = rank_entries(&entries(&[20.0, 15.0, 10.0, 5.0]));
        let ranks: Vec<u32> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_rank_tie_shares_lower_rank() {
        let ranked = rank_entries(&entries(&[10.0, 10.0, 5.0]));
        let ranks: Vec<u32> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 1, 3]);
    }

    #[test]
    fn test_rank_four_entry_tie_at_top() {
        let ranked = rank_entries(&entries(&[10.0, 10.0, 8.0, 2.0]));
        let ranks: Vec<u32> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 1, 3, 4]);
    }

    #[test]
    fn test_rank_unsorted_input() {
        let ranked = rank_entries(&entries(&[5.0, 10.0, 10.0]));
        assert_eq!(ranked[0].score, 10.0);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].rank, 1);
        assert_eq!(ranked[2].id, 1);
        assert_eq!(ranked[2].rank, 3);
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank_entries(&[]).is_empty());
    }

    #[test]
    fn test_effective_placements_tie_skips() {
        let placements = effective_placements(&entries(&[10.0, 10.0, 5.0]));
        assert_eq!(placements[&1], 1);
        assert_eq!(placements[&2], 1);
        assert_eq!(placements[&3], 3);
    }

    #[test]
    fn test_effective_placements_distinct() {
        let placements = effective_placements(&entries(&[20.0, 15.0, 10.0, 5.0]));
        assert_eq!(placements[&1], 1);
        assert_eq!(placements[&2], 2);
        assert_eq!(placements[&3], 3);
        assert_eq!(placements[&4], 4);
    }

    #[test]
    fn test_activity_winner_unique_max() {
        let records = vec![team_record(1, 50), team_record(2, 0)];
        let refs: Vec<&PointRecord> = records.iter().collect();
        assert_eq!(activity_winner(&refs), Some(1));
    }

    #[test]
    fn test_activity_winner_tie_yields_none() {
        let records = vec![team_record(1, 25), team_record(2, 25)];
        let refs: Vec<&PointRecord> = records.iter().collect();
        assert_eq!(activity_winner(&refs), None);
    }

    #[test]
    fn test_activity_winner_ignores_individual_records() {
        let mut records = vec![team_record(1, 10), team_record(2, 5)];
        records.push(PointRecord {
            activity_id: 1,
            team_id: None,
            participant_id: Some(7),
            raw_value: Some(99.0),
            points: 0,
            kind: PointKind::Individual,
        });
        let refs: Vec<&PointRecord> = records.iter().collect();
        assert_eq!(activity_winner(&refs), Some(1));
    }

    #[test]
    fn test_activity_winner_no_records() {
        assert_eq!(activity_winner(&[]), None);
    }

    #[test]
    fn test_mvp_lowest_average_rank_wins() {
        let participants = roster(&["Alice", "Bob"]);
        let per_activity = vec![
            vec![
                RankEntry { id: 1, score: 20.0 },
                RankEntry { id: 2, score: 10.0 },
            ],
            vec![
                RankEntry { id: 1, score: 5.0 },
                RankEntry { id: 2, score: 15.0 },
            ],
            vec![
                RankEntry { id: 1, score: 9.0 },
                RankEntry { id: 2, score: 3.0 },
            ],
        ];
        let mvp = compute_mvp(&per_activity, &participants).unwrap();
        // Alice ranks 1, 2, 1; Bob ranks 2, 1, 2.
        assert_eq!(mvp.participant_id, 1);
        assert!((mvp.average_rank - 4.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_mvp_requires_participation_in_every_activity() {
        let participants = roster(&["Alice", "Bob"]);
        let per_activity = vec![
            vec![
                RankEntry { id: 1, score: 20.0 },
                RankEntry { id: 2, score: 10.0 },
            ],
            // Alice missing here, even though she ranked first above.
            vec![RankEntry { id: 2, score: 15.0 }],
        ];
        let mvp = compute_mvp(&per_activity, &participants).unwrap();
        assert_eq!(mvp.participant_id, 2);
    }

    #[test]
    fn test_mvp_none_when_nobody_is_complete() {
        let participants = roster(&["Alice", "Bob"]);
        let per_activity = vec![
            vec![RankEntry { id: 1, score: 20.0 }],
            vec![RankEntry { id: 2, score: 15.0 }],
        ];
        assert_eq!(compute_mvp(&per_activity, &participants), None);
    }

    #[test]
    fn test_mvp_none_without_activities() {
        let participants = roster(&["Alice"]);
        assert_eq!(compute_mvp(&[], &participants), None);
    }

    #[test]
    fn test_mvp_tie_broken_by_name() {
        let participants = roster(&["Zoe", "Abe"]);
        let per_activity = vec![vec![
            RankEntry { id: 1, score: 10.0 },
            RankEntry { id: 2, score: 10.0 },
        ]];
        let mvp = compute_mvp(&per_activity, &participants).unwrap();
        assert_eq!(mvp.name, "Abe");
    }
}
