use std::fs;
use std::path::Path;
use serde::{Serialize, Deserialize};
use super::error::ScheduleError;

/// Which scoring formula the greedy sequencer uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// Game-count balance plus raw wait
    Baseline,
    /// Exponential urgency past the wait threshold, with large-gap penalties
    Advanced,
}

/// Tuning knobs for the scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub max_wait_threshold: usize,
    pub attempts: usize,
    /// Fresh referee draws per week before settling for a self-officiated game
    pub referee_attempts: usize,
    pub scoring: ScoringMode,
    pub baseline_weight: f64,
    pub balance_weight: f64,
    pub urgency_base: f64,
    pub wait_weight: f64,
    pub urgent_bonus: f64,
    pub large_gap_penalty: f64,
    /// Overrides games-per-week / teams when set
    pub referee_quota: Option<u32>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            max_wait_threshold: 4,
            attempts: 5,
            referee_attempts: 50,
            scoring: ScoringMode::Advanced,
            baseline_weight: 10.0,
            balance_weight: 5.0,
            urgency_base: 50_000.0,
            wait_weight: 200.0,
            urgent_bonus: 1_000.0,
            large_gap_penalty: 5_000.0,
            referee_quota: None,
        }
    }
}

impl SchedulerConfig {
    /// Preset for a league size. Four-team weeks only have 12 games, so the wait
    /// threshold drops to 3.
    pub fn for_team_count(num_teams: usize) -> Self {
        let mut config = SchedulerConfig::default();
        if num_teams <= 4 {
            config.max_wait_threshold = 3;
        }
        config
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScheduleError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Number of games each team plays in a week: every opponent twice
    pub fn games_per_team(num_teams: usize) -> usize {
        2 * num_teams.saturating_sub(1)
    }

    pub fn games_per_week(num_teams: usize) -> usize {
        num_teams * num_teams.saturating_sub(1)
    }

    pub fn quota_for(&self, num_teams: usize) -> u32 {
        match self.referee_quota {
            Some(quota) => quota,
            None if num_teams == 0 => 0,
            None => (Self::games_per_week(num_teams) / num_teams) as u32,
        }
    }
}
