mod parser;
mod schedule;
mod display;
mod export;
mod web;

use std::path::Path;
use env_logger::{Builder, Env};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use parser::load_teams;
use schedule::{first_week_date, generate_league, SchedulerConfig};
use display::print_week_schedule;
use export::write_league_to_dir;

const DEFAULT_TEAMS_CSV: &str = "data/teams.csv";
const DEFAULT_WEEKS: u32 = 6;

/// Scheduler settings from `LEAGUE_CONFIG`, if set
fn config_from_env() -> Result<Option<SchedulerConfig>, Box<dyn std::error::Error>> {
    match std::env::var("LEAGUE_CONFIG") {
        Ok(path) => {
            info!("Loading scheduler config from {}", path);
            Ok(Some(SchedulerConfig::load(path)?))
        }
        Err(_) => Ok(None),
    }
}

fn default_teams() -> Vec<String> {
    ["Team Alpha", "Team Beta", "Team Gamma", "Team Delta", "Team Epsilon", "Team Zeta"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = config_from_env()?;

    // Check if we should run in web mode
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "web" {
        let port = args.get(2)
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);

        println!("Starting web server on port {}...", port);
        println!("Access the API at http://localhost:{}/api/league", port);

        web::start_server(port, config).await?;
        return Ok(());
    }

    // CLI mode: [teams.csv] [weeks] [--seed N]
    let mut positional = Vec::new();
    let mut seed = None;
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        if arg == "--seed" {
            let value = rest.next().ok_or("--seed needs a value")?;
            seed = Some(value.parse::<u64>()?);
        } else {
            positional.push(arg.as_str());
        }
    }

    let csv_path = positional.first().copied().unwrap_or(DEFAULT_TEAMS_CSV);
    let num_weeks = match positional.get(1) {
        Some(weeks) => weeks.parse::<u32>()?,
        None => DEFAULT_WEEKS,
    };

    let teams = if Path::new(csv_path).exists() {
        println!("Loading teams from {}...", csv_path);
        load_teams(csv_path)?
    } else {
        warn!("{} not found, using the default six teams", csv_path);
        default_teams()
    };
    println!("Loaded {} teams", teams.len());

    let config = config.unwrap_or_else(|| SchedulerConfig::for_team_count(teams.len()));
    let start_date = first_week_date(chrono::Local::now().date_naive());

    println!("\n\n=== Generating {} Weeks ===", num_weeks);
    let league = match seed {
        Some(seed) => generate_league(&teams, num_weeks, start_date, &config, &mut StdRng::seed_from_u64(seed))?,
        None => generate_league(&teams, num_weeks, start_date, &config, &mut rand::thread_rng())?,
    };

    for week in &league.weeks {
        print_week_schedule(week, &league.teams);
    }

    // Write week sheets to files
    println!("\n=== Writing Schedules to Files ===");
    let written = write_league_to_dir(&league, Path::new("."))?;
    println!("Schedules saved to:");
    for path in written {
        println!("  - {}", path.display());
    }

    Ok(())
}
