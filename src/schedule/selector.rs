use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use super::config::SchedulerConfig;
use super::quality::{evaluate_sequence, SequenceQuality};
use super::sequencer::sequence_games;
use super::types::{GamePair, ScheduledGame};

/// Runs the sequencer on the pairs in their given order, then once per configured attempt
/// on a shuffled copy, and keeps the sequence with the best gap quality. The unshuffled
/// run is kept unless a shuffled run is strictly better.
pub fn select_best_sequence<R: Rng + ?Sized>(
    pairs: &[GamePair],
    teams: &[String],
    config: &SchedulerConfig,
    rng: &mut R,
) -> (Vec<ScheduledGame>, SequenceQuality) {
    let threshold = config.max_wait_threshold;
    let mut best = sequence_games(pairs, teams, config, config.scoring);
    let mut best_quality = evaluate_sequence(&best, threshold);
    debug!("Baseline sequence: max gap {}, score {}", best_quality.max_gap, best_quality.score());

    let mut shuffled = pairs.to_vec();
    for attempt in 1..=config.attempts {
        shuffled.shuffle(rng);
        let candidate = sequence_games(&shuffled, teams, config, config.scoring);
        let quality = evaluate_sequence(&candidate, threshold);
        debug!("Attempt {}: max gap {}, score {}", attempt, quality.max_gap, quality.score());

        if quality < best_quality {
            best = candidate;
            best_quality = quality;
        }
    }

    (best, best_quality)
}
