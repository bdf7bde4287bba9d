use thiserror::Error;

/// Errors raised while building or exporting a league schedule
#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("at least 2 teams are required to build a schedule, found {found}")]
    NotEnoughTeams { found: usize },
    #[error("team at position {index} has an empty name")]
    EmptyTeamName { index: usize },
    #[error("team {0:?} is listed more than once")]
    DuplicateTeam(String),
    #[error("number of weeks must be at least 1")]
    InvalidWeekCount,
    #[error("no team is eligible to referee game {game}")]
    NoEligibleReferee { game: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
