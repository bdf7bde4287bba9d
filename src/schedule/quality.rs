use std::cmp::Ordering;
use std::collections::HashMap;
use serde::{Serialize, Deserialize};
use super::types::ScheduledGame;

/// Gap statistics for a finished sequence. Lower is better.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceQuality {
    /// Largest distance between two successive games of the same team
    pub max_gap: usize,
    /// Teams with more than one gap at or above the wait threshold
    pub teams_with_multiple_large_gaps: usize,
}

impl SequenceQuality {
    pub fn score(&self) -> usize {
        self.max_gap * 1000 + self.teams_with_multiple_large_gaps * 100
    }
}

// Compared on max_gap first so a better quality never has a larger max gap, even when
// more than ten teams carry repeat large gaps.
impl Ord for SequenceQuality {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.max_gap, self.teams_with_multiple_large_gaps)
            .cmp(&(other.max_gap, other.teams_with_multiple_large_gaps))
    }
}

impl PartialOrd for SequenceQuality {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Scans the sequence and measures every gap between successive appearances of a team
pub fn evaluate_sequence(games: &[ScheduledGame], max_wait_threshold: usize) -> SequenceQuality {
    let mut last_seen: HashMap<&str, usize> = HashMap::new();
    let mut large_gaps: HashMap<&str, usize> = HashMap::new();
    let mut max_gap = 0;

    for (position, game) in games.iter().enumerate() {
        for team in [game.team1.as_str(), game.team2.as_str()] {
            if let Some(last) = last_seen.insert(team, position) {
                let gap = position - last;
                max_gap = max_gap.max(gap);
                if gap >= max_wait_threshold {
                    *large_gaps.entry(team).or_insert(0) += 1;
                }
            }
        }
    }

    SequenceQuality {
        max_gap,
        teams_with_multiple_large_gaps: large_gaps.values().filter(|&&n| n > 1).count(),
    }
}
