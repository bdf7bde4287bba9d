use log::warn;
use rand::seq::SliceRandom;
use rand::Rng;
use super::error::ScheduleError;
use super::types::{RefereePool, RefereeReport, ScheduledGame};

/// Assigns a referee to every game in sequence order, with `quota` assignments per team
pub fn assign_referees<R: Rng + ?Sized>(
    games: &mut [ScheduledGame],
    teams: &[String],
    quota: u32,
    rng: &mut R,
) -> Result<RefereeReport, ScheduleError> {
    assign_referees_from_pool(games, teams, RefereePool::uniform(teams, quota), rng)
}

/// Assigns referees drawing from an explicit pool.
///
/// Candidates for each game are tried in order of decreasing strictness, picking
/// uniformly at random within the first non-empty tier:
/// 1. not playing, quota left, and not the previous game's referee;
/// 2. not playing and quota left (a consecutive repeat is recorded);
/// 3. any team with quota left, even one playing in the game (recorded as self-officiated).
///
/// With fewer than three teams every game involves every team, so no game can be
/// officiated and the first game fails with `NoEligibleReferee`. The same error is
/// returned once every quota is spent. On error no game is modified.
pub fn assign_referees_from_pool<R: Rng + ?Sized>(
    games: &mut [ScheduledGame],
    teams: &[String],
    mut pool: RefereePool,
    rng: &mut R,
) -> Result<RefereeReport, ScheduleError> {
    if teams.len() < 3 && !games.is_empty() {
        return Err(ScheduleError::NoEligibleReferee { game: 1 });
    }

    let mut report = RefereeReport::default();
    let mut last_ref: Option<String> = None;

    let mut assigned: Vec<String> = Vec::with_capacity(games.len());

    for (index, game) in games.iter().enumerate() {
        let available: Vec<&String> = teams
            .iter()
            .filter(|t| !game.is_playing(t) && pool.has_quota(t))
            .collect();
        let preferred: Vec<&String> = available
            .iter()
            .copied()
            .filter(|t| last_ref.as_deref() != Some(t.as_str()))
            .collect();

        let chosen = if let Some(team) = preferred.choose(rng) {
            (*team).clone()
        } else if let Some(team) = available.choose(rng) {
            (*team).clone()
        } else {
            let any: Vec<&String> = teams.iter().filter(|t| pool.has_quota(t)).collect();
            match any.choose(rng) {
                Some(team) => {
                    warn!("Game {}: no free referee left, {} refs while playing", index + 1, team);
                    report.self_officiated += 1;
                    (*team).clone()
                }
                None => return Err(ScheduleError::NoEligibleReferee { game: index + 1 }),
            }
        };

        if last_ref.as_deref() == Some(chosen.as_str()) {
            warn!("Game {}: {} refs twice in a row", index + 1, chosen);
            report.consecutive_repeats += 1;
        }
        pool.take(&chosen);
        last_ref = Some(chosen.clone());
        assigned.push(chosen);
    }

    for (game, referee) in games.iter_mut().zip(assigned) {
        game.referee = Some(referee);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::config::SchedulerConfig;
    use crate::schedule::pairs::generate_game_pairs;
    use crate::schedule::sequencer::sequence_games;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn sequenced(teams: &[String]) -> Vec<ScheduledGame> {
        let config = SchedulerConfig::for_team_count(teams.len());
        sequence_games(&generate_game_pairs(teams), teams, &config, config.scoring)
    }

    fn game(home: &str, away: &str) -> ScheduledGame {
        ScheduledGame { team1: home.to_string(), team2: away.to_string(), referee: None }
    }

    #[test]
    fn six_teams_ref_five_games_each() {
        let teams = names(&["A", "B", "C", "D", "E", "F"]);
        for seed in 0..25 {
            let mut games = sequenced(&teams);
            let mut rng = StdRng::seed_from_u64(seed);
            let report = assign_referees(&mut games, &teams, 5, &mut rng).unwrap();

            let mut counts: HashMap<&str, u32> = HashMap::new();
            for g in &games {
                let referee = g.referee.as_deref().unwrap();
                *counts.entry(referee).or_insert(0) += 1;
            }
            assert!(counts.values().all(|&n| n == 5), "seed {seed}: {counts:?}");

            let repeats = games.windows(2).filter(|w| w[0].referee == w[1].referee).count();
            assert_eq!(repeats, report.consecutive_repeats, "seed {seed}");
            let playing = games
                .iter()
                .filter(|g| g.is_playing(g.referee.as_deref().unwrap()))
                .count();
            assert_eq!(playing, report.self_officiated, "seed {seed}");
        }
    }

    #[test]
    fn two_teams_cannot_be_officiated() {
        let teams = names(&["A", "B"]);
        let mut games = sequenced(&teams);
        assert_eq!(games.len(), 2);
        let err = assign_referees(&mut games, &teams, 1, &mut StdRng::seed_from_u64(1)).unwrap_err();
        assert!(matches!(err, ScheduleError::NoEligibleReferee { game: 1 }));
        assert!(games.iter().all(|g| g.referee.is_none()));
    }

    #[test]
    fn three_teams_force_consecutive_repeats() {
        let teams = names(&["A", "B", "C"]);
        let mut games = vec![game("A", "B"), game("B", "A"), game("A", "C"), game("B", "C"), game("C", "A"), game("C", "B")];
        let report = assign_referees(&mut games, &teams, 2, &mut StdRng::seed_from_u64(3)).unwrap();
        let refs: Vec<&str> = games.iter().map(|g| g.referee.as_deref().unwrap()).collect();
        assert_eq!(refs, ["C", "C", "B", "A", "B", "A"]);
        assert_eq!(report.consecutive_repeats, 1);
        assert_eq!(report.self_officiated, 0);
    }

    #[test]
    fn exhausted_free_teams_fall_back_to_players() {
        let teams = names(&["A", "B", "C"]);
        let mut games = vec![game("A", "B"), game("A", "B")];
        let pool = RefereePool::from_quotas([("A", 0), ("B", 1), ("C", 1)]);
        let report = assign_referees_from_pool(&mut games, &teams, pool, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(games[0].referee.as_deref(), Some("C"));
        assert_eq!(games[1].referee.as_deref(), Some("B"));
        assert_eq!(report.self_officiated, 1);
    }

    #[test]
    fn empty_pool_is_an_error() {
        let teams = names(&["A", "B", "C", "D"]);
        let mut games = sequenced(&teams);
        let err = assign_referees(&mut games, &teams, 1, &mut StdRng::seed_from_u64(11)).unwrap_err();
        assert!(matches!(err, ScheduleError::NoEligibleReferee { game: 5 }));
        assert!(games.iter().all(|g| g.referee.is_none()));
    }
}
