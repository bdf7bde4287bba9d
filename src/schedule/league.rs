use std::collections::HashSet;
use chrono::{Datelike, Duration, NaiveDate};
use log::{debug, info};
use rand::Rng;
use super::config::SchedulerConfig;
use super::error::ScheduleError;
use super::pairs::generate_game_pairs;
use super::referee::assign_referees;
use super::selector::select_best_sequence;
use super::types::{League, RefereeReport, ScheduledGame, WeekSchedule};

/// Checks the team list is usable: at least two teams, all named, no repeats
pub fn validate_teams(teams: &[String]) -> Result<(), ScheduleError> {
    if teams.len() < 2 {
        return Err(ScheduleError::NotEnoughTeams { found: teams.len() });
    }
    let mut seen = HashSet::new();
    for (index, team) in teams.iter().enumerate() {
        if team.trim().is_empty() {
            return Err(ScheduleError::EmptyTeamName { index });
        }
        if !seen.insert(team.as_str()) {
            return Err(ScheduleError::DuplicateTeam(team.clone()));
        }
    }
    Ok(())
}

/// League play starts on the first Saturday strictly after `today`
pub fn first_week_date(today: NaiveDate) -> NaiveDate {
    let from_sunday = today.weekday().num_days_from_sunday() as i64;
    let days = match (6 - from_sunday) % 7 {
        0 => 7,
        d => d,
    };
    today + Duration::days(days)
}

pub fn week_label(week: u32, date: NaiveDate) -> String {
    format!("Week {} ({}.{})", week, date.month(), date.day())
}

/// Builds one week: sequence the games, then hand out referees
pub fn generate_week<R: Rng + ?Sized>(
    teams: &[String],
    week: u32,
    date: NaiveDate,
    config: &SchedulerConfig,
    rng: &mut R,
) -> Result<WeekSchedule, ScheduleError> {
    validate_teams(teams)?;

    let pairs = generate_game_pairs(teams);
    let (games, quality) = select_best_sequence(&pairs, teams, config, rng);
    let quota = config.quota_for(teams.len());

    let mut best: Option<(Vec<ScheduledGame>, RefereeReport)> = None;
    for attempt in 1..=config.referee_attempts.max(1) {
        let mut candidate = games.clone();
        let report = assign_referees(&mut candidate, teams, quota, rng)?;
        let improves = best
            .as_ref()
            .map_or(true, |(_, b)| report.self_officiated < b.self_officiated);
        if improves {
            best = Some((candidate, report));
        }
        if report.self_officiated == 0 {
            debug!("Week {}: referees settled on draw {}", week, attempt);
            break;
        }
    }

    let (games, referee_report) = match best {
        Some(found) => found,
        None => return Err(ScheduleError::NoEligibleReferee { game: 1 }),
    };

    Ok(WeekSchedule {
        week,
        label: week_label(week, date),
        date,
        games,
        quality,
        referee_report,
    })
}

/// Generates `num_weeks` independent weeks for the same set of teams
pub fn generate_league<R: Rng + ?Sized>(
    teams: &[String],
    num_weeks: u32,
    start_date: NaiveDate,
    config: &SchedulerConfig,
    rng: &mut R,
) -> Result<League, ScheduleError> {
    validate_teams(teams)?;
    if num_weeks == 0 {
        return Err(ScheduleError::InvalidWeekCount);
    }

    let mut weeks = Vec::with_capacity(num_weeks as usize);
    for week in 1..=num_weeks {
        let date = start_date + Duration::weeks(week as i64 - 1);
        let schedule = generate_week(teams, week, date, config, rng)?;
        info!(
            "{}: {} games, max gap {}, {} consecutive refs",
            schedule.label,
            schedule.games.len(),
            schedule.quality.max_gap,
            schedule.referee_report.consecutive_repeats
        );
        weeks.push(schedule);
    }

    Ok(League {
        teams: teams.to_vec(),
        weeks,
    })
}
