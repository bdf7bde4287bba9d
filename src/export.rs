use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use csv::WriterBuilder;
use crate::schedule::{League, ScheduleError, WeekSchedule};

/// Week sheets are ten columns wide (A-J)
pub const SHEET_WIDTH: usize = 10;

fn blank_row() -> Vec<String> {
    vec![String::new(); SHEET_WIDTH]
}

/// Lays a week out as sheet rows.
///
/// Row 1 is the `Court 1` header. Each game takes two rows: the game row holds the game
/// number in column A, home team in B and away team in D (C and E are left for scores);
/// the row below carries `Refs: <team>` in column B. A win/loss section with SUMIFS
/// formulas per team follows the games.
pub fn week_sheet_rows(week: &WeekSchedule, teams: &[String]) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(week.games.len() * 2 + teams.len() + 4);

    let mut header = blank_row();
    header[1] = "Court 1".to_string();
    rows.push(header);

    for (index, game) in week.games.iter().enumerate() {
        let mut game_row = blank_row();
        game_row[0] = format!("Game {:02}", index + 1);
        game_row[1] = game.team1.clone();
        game_row[3] = game.team2.clone();
        rows.push(game_row);

        let mut ref_row = blank_row();
        if let Some(referee) = &game.referee {
            ref_row[1] = format!("Refs: {}", referee);
        }
        rows.push(ref_row);
    }

    rows.push(blank_row());
    let mut title = blank_row();
    title[0] = "Team Wins/Losses This Week".to_string();
    rows.push(title);
    let mut columns = blank_row();
    columns[0] = "Team Name".to_string();
    columns[1] = "Wins".to_string();
    columns[2] = "Losses".to_string();
    rows.push(columns);

    for team in teams {
        let mut row = blank_row();
        row[0] = team.clone();
        row[1] = format!("=SUMIFS(C:C,B:B,\"{0}\")+SUMIFS(E:E,D:D,\"{0}\")", team);
        row[2] = format!("=SUMIFS(E:E,B:B,\"{0}\")+SUMIFS(C:C,D:D,\"{0}\")", team);
        rows.push(row);
    }

    rows
}

/// Writes a week sheet as CSV
pub fn write_week_csv<W: Write>(
    writer: W,
    week: &WeekSchedule,
    teams: &[String],
) -> Result<(), ScheduleError> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    for row in week_sheet_rows(week, teams) {
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn week_csv_string(week: &WeekSchedule, teams: &[String]) -> Result<String, ScheduleError> {
    let mut buffer = Vec::new();
    write_week_csv(&mut buffer, week, teams)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Writes one `schedule_week_N.csv` per week into `dir`, returning the paths written
pub fn write_league_to_dir(league: &League, dir: &Path) -> Result<Vec<PathBuf>, ScheduleError> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(league.weeks.len());
    for week in &league.weeks {
        let path = dir.join(format!("schedule_week_{}.csv", week.week));
        let file = File::create(&path)?;
        write_week_csv(file, week, &league.teams)?;
        written.push(path);
    }
    Ok(written)
}
