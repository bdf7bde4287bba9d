pub mod types;
pub mod config;
pub mod error;
pub mod pairs;
pub mod sequencer;
pub mod quality;
pub mod selector;
pub mod referee;
pub mod league;

pub use types::{League, ScheduledGame, WeekSchedule};
pub use config::SchedulerConfig;
pub use error::ScheduleError;
pub use league::{first_week_date, generate_league};
