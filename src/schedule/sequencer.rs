use log::warn;
use super::config::{ScoringMode, SchedulerConfig};
use super::types::{GamePair, ScheduleState, ScheduledGame, TeamState};

/// Orders the given pairs into a week's game sequence, greedily picking the most
/// desirable remaining pair each step. Ties go to the first pair in pool order.
pub fn sequence_games(
    pairs: &[GamePair],
    teams: &[String],
    config: &SchedulerConfig,
    mode: ScoringMode,
) -> Vec<ScheduledGame> {
    let mut pool: Vec<&GamePair> = pairs.iter().collect();
    let mut state = ScheduleState::new(teams, config.max_wait_threshold);
    let mut sequence = Vec::with_capacity(pairs.len());
    let games_per_team = SchedulerConfig::games_per_team(teams.len()) as f64;

    while !pool.is_empty() {
        let position = sequence.len();
        let best = best_candidate(&pool, &state, config, mode, position, games_per_team)
            .unwrap_or_else(|| {
                warn!("No scored candidate at position {}, taking first remaining pair", position);
                0
            });
        let pair = pool.remove(best);
        let game = ScheduledGame::from_pair(pair);

        state.record_game(&game.team1, position);
        state.record_game(&game.team2, position);
        sequence.push(game);
    }

    sequence
}

/// Index of the highest scoring pair, or `None` when no score beats negative infinity
/// (an empty pool, or scores that are all NaN)
fn best_candidate(
    pool: &[&GamePair],
    state: &ScheduleState,
    config: &SchedulerConfig,
    mode: ScoringMode,
    position: usize,
    games_per_team: f64,
) -> Option<usize> {
    let mut best_index = None;
    let mut best_score = f64::NEG_INFINITY;

    for (index, pair) in pool.iter().enumerate() {
        let a = state.team(&pair.team_a);
        let b = state.team(&pair.team_b);
        let score = match mode {
            ScoringMode::Baseline => baseline_score(a, b, config, position, games_per_team),
            ScoringMode::Advanced => advanced_score(a, b, config, position, games_per_team),
        };
        if score > best_score {
            best_score = score;
            best_index = Some(index);
        }
    }

    best_index
}

pub fn baseline_score(
    a: TeamState,
    b: TeamState,
    config: &SchedulerConfig,
    position: usize,
    games_per_team: f64,
) -> f64 {
    (games_per_team - a.games_played as f64) * config.baseline_weight
        + (games_per_team - b.games_played as f64) * config.baseline_weight
        + a.wait(position) as f64
        + b.wait(position) as f64
}

pub fn advanced_score(
    a: TeamState,
    b: TeamState,
    config: &SchedulerConfig,
    position: usize,
    games_per_team: f64,
) -> f64 {
    let threshold = config.max_wait_threshold;
    let wait_a = a.wait(position);
    let wait_b = b.wait(position);
    let addresses_urgent = wait_a >= threshold || wait_b >= threshold;

    urgency(wait_a, config)
        + urgency(wait_b, config)
        + (games_per_team - a.games_played as f64) * config.balance_weight
        + (games_per_team - b.games_played as f64) * config.balance_weight
        + if addresses_urgent { config.urgent_bonus } else { 0.0 }
        - a.large_gap_count as f64 * config.large_gap_penalty
        - b.large_gap_count as f64 * config.large_gap_penalty
}

/// Grows linearly below the threshold and doubles for every game waited past it
fn urgency(wait: usize, config: &SchedulerConfig) -> f64 {
    let threshold = config.max_wait_threshold;
    if wait >= threshold {
        let exponent = (wait - threshold + 2) as i32;
        2f64.powi(exponent) * config.urgency_base
    } else {
        wait as f64 * config.wait_weight
    }
}
