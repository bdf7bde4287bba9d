use std::collections::BTreeMap;
use crate::schedule::WeekSchedule;

/// Formats one game line: `Game 01  Hawks vs Owls  (ref: Crows)`
pub fn format_game_line(number: usize, home: &str, away: &str, referee: Option<&str>) -> String {
    match referee {
        Some(referee) => format!("Game {:02}  {} vs {}  (ref: {})", number, home, away, referee),
        None => format!("Game {:02}  {} vs {}  (ref: -)", number, home, away),
    }
}

/// Prints a week's schedule in a readable format
pub fn print_week_schedule(week: &WeekSchedule, teams: &[String]) {
    println!("\n=== {} ===", week.label);
    println!("Total games scheduled: {}", week.games.len());
    println!(
        "Longest wait: {} games (quality score {})",
        week.quality.max_gap,
        week.quality.score()
    );
    if week.referee_report.consecutive_repeats > 0 {
        println!("Consecutive referee repeats: {}", week.referee_report.consecutive_repeats);
    }
    if week.referee_report.self_officiated > 0 {
        println!("⚠️  Games refereed by a playing team: {}", week.referee_report.self_officiated);
    }

    println!();
    for (index, game) in week.games.iter().enumerate() {
        println!("  {}", format_game_line(index + 1, &game.team1, &game.team2, game.referee.as_deref()));
    }

    let mut refs: BTreeMap<&str, u32> = teams.iter().map(|t| (t.as_str(), 0)).collect();
    for referee in week.games.iter().filter_map(|g| g.referee.as_deref()) {
        *refs.entry(referee).or_insert(0) += 1;
    }
    println!("\nReferee assignments:");
    for (team, count) in refs {
        println!("  {}: {}", team, count);
    }
}
