use std::collections::HashMap;
use chrono::NaiveDate;
use serde::{Serialize, Deserialize};
use super::quality::SequenceQuality;

/// One matchup instance between two teams, with the designated home team
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GamePair {
    pub team_a: String,
    pub team_b: String,
    pub home_team: String,
}

impl GamePair {
    pub fn home(&self) -> &str {
        &self.home_team
    }

    pub fn away(&self) -> &str {
        if self.home_team == self.team_a {
            &self.team_b
        } else {
            &self.team_a
        }
    }

    pub fn involves(&self, team: &str) -> bool {
        self.team_a == team || self.team_b == team
    }
}

/// A game placed in the week's sequence. `team1` is home, `team2` is away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledGame {
    pub team1: String,
    pub team2: String,
    #[serde(rename = "ref")]
    pub referee: Option<String>,
}

impl ScheduledGame {
    pub fn from_pair(pair: &GamePair) -> Self {
        ScheduledGame {
            team1: pair.home().to_string(),
            team2: pair.away().to_string(),
            referee: None,
        }
    }

    pub fn is_playing(&self, team: &str) -> bool {
        self.team1 == team || self.team2 == team
    }
}

/// Per-team bookkeeping carried through one sequencing run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamState {
    pub games_played: u32,
    pub last_position: Option<usize>,
    pub large_gap_count: u32,
}

impl TeamState {
    /// Games since this team last appeared, or the sequence length if it has not played yet
    pub fn wait(&self, sequence_len: usize) -> usize {
        match self.last_position {
            Some(pos) => sequence_len - pos,
            None => sequence_len,
        }
    }
}

/// Snapshot of every team's state during sequencing
#[derive(Debug, Clone)]
pub struct ScheduleState {
    teams: HashMap<String, TeamState>,
    max_wait_threshold: usize,
}

impl ScheduleState {
    pub fn new(teams: &[String], max_wait_threshold: usize) -> Self {
        ScheduleState {
            teams: teams
                .iter()
                .map(|t| (t.clone(), TeamState::default()))
                .collect(),
            max_wait_threshold,
        }
    }

    pub fn team(&self, team: &str) -> TeamState {
        self.teams.get(team).copied().unwrap_or_default()
    }

    /// Records that `team` played at `position`, counting a large gap if the wait since
    /// its previous game reached the threshold
    pub fn record_game(&mut self, team: &str, position: usize) {
        let threshold = self.max_wait_threshold;
        let state = self.teams.entry(team.to_string()).or_default();
        if let Some(last) = state.last_position {
            if position - last >= threshold {
                state.large_gap_count += 1;
            }
        }
        state.games_played += 1;
        state.last_position = Some(position);
    }
}

/// Remaining referee assignments per team
#[derive(Debug, Clone)]
pub struct RefereePool {
    remaining: HashMap<String, u32>,
}

impl RefereePool {
    pub fn uniform(teams: &[String], quota: u32) -> Self {
        RefereePool {
            remaining: teams.iter().map(|t| (t.clone(), quota)).collect(),
        }
    }

    pub fn from_quotas<I, S>(quotas: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        RefereePool {
            remaining: quotas.into_iter().map(|(t, q)| (t.into(), q)).collect(),
        }
    }

    pub fn remaining(&self, team: &str) -> u32 {
        self.remaining.get(team).copied().unwrap_or(0)
    }

    pub fn has_quota(&self, team: &str) -> bool {
        self.remaining(team) > 0
    }

    pub fn take(&mut self, team: &str) {
        if let Some(left) = self.remaining.get_mut(team) {
            *left = left.saturating_sub(1);
        }
    }
}

/// How often the referee assigner had to relax its rules for a week
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefereeReport {
    pub consecutive_repeats: usize,
    pub self_officiated: usize,
}

/// The finished schedule for a single week
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekSchedule {
    pub week: u32,
    pub label: String,
    pub date: NaiveDate,
    pub games: Vec<ScheduledGame>,
    pub quality: SequenceQuality,
    pub referee_report: RefereeReport,
}

/// All weeks of a league, each generated independently
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct League {
    pub teams: Vec<String>,
    pub weeks: Vec<WeekSchedule>,
}
