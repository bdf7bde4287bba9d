use csv::{ReaderBuilder, StringRecord};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::{Serialize, Deserialize};
use crate::schedule::ScheduleError;

/// One game row of a schedule sheet, covering both courts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedGame {
    pub game_number: String,
    pub court1_team1: String,
    pub court1_team2: String,
    pub court1_ref: String,
    pub court2_team1: String,
    pub court2_team2: String,
    pub court2_ref: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchupStats {
    pub total: u32,
    pub home: u32,
    pub away: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStats {
    pub games_played: u32,
    pub games_reffed: u32,
    pub home_games: u32,
    pub away_games: u32,
    pub matchups: BTreeMap<String, MatchupStats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub game_number: String,
    pub team: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedSchedule {
    pub games: Vec<ParsedGame>,
    pub team_stats: BTreeMap<String, TeamStats>,
    pub conflicts: Vec<Conflict>,
}

#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    pub include_home_away: bool,
    pub include_matchups: bool,
    /// Flag teams listed on both courts of the same game row
    pub detect_court_conflicts: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            include_home_away: true,
            include_matchups: true,
            detect_court_conflicts: false,
        }
    }
}

/// Placeholder cells that never name a team
fn is_team(value: &str) -> bool {
    !value.is_empty() && value != "Refs:" && value != "BYE" && value != "TBD"
}

fn cell(record: &StringRecord, index: usize) -> String {
    record.get(index).unwrap_or("").trim().to_string()
}

fn ref_cell(record: Option<&StringRecord>, index: usize) -> String {
    record
        .and_then(|r| r.get(index))
        .map(|v| v.replace("Refs:", "").trim().to_string())
        .unwrap_or_default()
}

/// A game row starts with `Game <number>` in column A
fn is_game_row(record: &StringRecord) -> bool {
    record
        .get(0)
        .and_then(|first| first.trim().strip_prefix("Game "))
        .map_or(false, |number| number.trim().parse::<u32>().is_ok())
}

fn record_contains(record: &StringRecord, needle: &str) -> bool {
    record.iter().any(|field| field.contains(needle))
}

/// Parses a schedule sheet exported as CSV.
///
/// Game rows are recognised by `Game <number>` in the first column. When the following row contains `Refs:`
/// it is read as that game's referee row and skipped. Court 1 teams sit in columns 1 and 3
/// with the referee in column 1 of the ref row; court 2 uses columns 6 and 8.
pub fn parse_schedule_csv(data: &str, options: ParseOptions) -> Result<ParsedSchedule, ScheduleError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data.as_bytes());
    let records: Vec<StringRecord> = reader.records().collect::<Result<_, _>>()?;

    let mut parsed = ParsedSchedule::default();
    let mut i = 0;
    while i < records.len() {
        let game_row = &records[i];
        if !is_game_row(game_row) {
            i += 1;
            continue;
        }

        let ref_row = records.get(i + 1).filter(|r| record_contains(r, "Refs:"));
        i += if ref_row.is_some() { 2 } else { 1 };

        let game = ParsedGame {
            game_number: cell(game_row, 0),
            court1_team1: cell(game_row, 1),
            court1_team2: cell(game_row, 3),
            court1_ref: ref_cell(ref_row, 1),
            court2_team1: cell(game_row, 6),
            court2_team2: cell(game_row, 8),
            court2_ref: ref_cell(ref_row, 6),
        };

        let players = [
            (&game.court1_team1, true),
            (&game.court1_team2, false),
            (&game.court2_team1, true),
            (&game.court2_team2, false),
        ];
        if players.iter().all(|(team, _)| team.is_empty()) {
            continue;
        }

        for team in [&game.court1_ref, &game.court2_ref] {
            if is_team(team) {
                parsed.team_stats.entry(team.clone()).or_default();
            }
        }
        for (team, is_home) in players {
            if !is_team(team) {
                continue;
            }
            let stats = parsed.team_stats.entry(team.clone()).or_default();
            stats.games_played += 1;
            if options.include_home_away {
                if is_home {
                    stats.home_games += 1;
                } else {
                    stats.away_games += 1;
                }
            }
        }

        if options.include_matchups {
            record_matchup(&mut parsed.team_stats, &game.court1_team1, &game.court1_team2);
            record_matchup(&mut parsed.team_stats, &game.court2_team1, &game.court2_team2);
        }

        if options.detect_court_conflicts {
            for team in [&game.court1_team1, &game.court1_team2] {
                if is_team(team) && (*team == game.court2_team1 || *team == game.court2_team2) {
                    parsed.conflicts.push(Conflict {
                        game_number: game.game_number.clone(),
                        team: team.clone(),
                        reason: "Playing on both Court 1 and Court 2".to_string(),
                    });
                }
            }
        }

        for (referee, court) in [(&game.court1_ref, "Court 1"), (&game.court2_ref, "Court 2")] {
            if !is_team(referee) {
                continue;
            }
            if let Some(stats) = parsed.team_stats.get_mut(referee.as_str()) {
                stats.games_reffed += 1;
            }
            if players.iter().any(|(team, _)| *team == referee) {
                parsed.conflicts.push(Conflict {
                    game_number: game.game_number.clone(),
                    team: referee.clone(),
                    reason: format!("Playing and reffing {}", court),
                });
            }
        }

        parsed.games.push(game.clone());
    }

    Ok(parsed)
}

fn record_matchup(stats: &mut BTreeMap<String, TeamStats>, home: &str, away: &str) {
    if !is_team(home) || !is_team(away) || home == away {
        return;
    }
    if let Some(entry) = stats.get_mut(home) {
        let m = entry.matchups.entry(away.to_string()).or_default();
        m.total += 1;
        m.home += 1;
    }
    if let Some(entry) = stats.get_mut(away) {
        let m = entry.matchups.entry(home.to_string()).or_default();
        m.total += 1;
        m.away += 1;
    }
}

/// Reads team names from a reader.
///
/// A first row starting with `Team Names` is the teams-sheet layout and lists the teams
/// from the third column on. Otherwise the first column of every row is a team.
pub fn teams_from_reader<R: Read>(reader: R) -> Result<Vec<String>, ScheduleError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let records: Vec<StringRecord> = reader.records().collect::<Result<_, _>>()?;

    let teams = match records.first() {
        Some(first) if first.get(0).map(str::trim) == Some("Team Names") => first
            .iter()
            .skip(2)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect(),
        _ => records
            .iter()
            .filter_map(|r| r.get(0))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect(),
    };
    Ok(teams)
}

/// Loads team names from a CSV file
pub fn load_teams<P: AsRef<Path>>(csv_path: P) -> Result<Vec<String>, ScheduleError> {
    let file = std::fs::File::open(csv_path)?;
    teams_from_reader(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_COURT: &str = "\
,Court 1,,,,,Court 2,,,
Game 01,Hawks,,Owls,,,Crows,,Ravens,
,Refs: Crows,,,,,Refs: Owls,,,
Game 02,Owls,,Crows,,,Ravens,,Owls,
,Refs: Hawks,,,,,Refs: BYE,,,
Game 03,TBD,,,,,,,,
";

    #[test]
    fn reads_games_and_refs() {
        let parsed = parse_schedule_csv(TWO_COURT, ParseOptions::default()).unwrap();
        assert_eq!(parsed.games.len(), 3);
        let first = &parsed.games[0];
        assert_eq!(first.game_number, "Game 01");
        assert_eq!(first.court1_team1, "Hawks");
        assert_eq!(first.court1_team2, "Owls");
        assert_eq!(first.court1_ref, "Crows");
        assert_eq!(first.court2_ref, "Owls");
        assert_eq!(parsed.games[2].court1_team1, "TBD");
    }

    #[test]
    fn tallies_team_stats() {
        let parsed = parse_schedule_csv(TWO_COURT, ParseOptions::default()).unwrap();
        let owls = &parsed.team_stats["Owls"];
        assert_eq!(owls.games_played, 3);
        assert_eq!(owls.home_games, 1);
        assert_eq!(owls.away_games, 2);
        assert_eq!(owls.games_reffed, 1);
        assert_eq!(owls.matchups["Hawks"], MatchupStats { total: 1, home: 0, away: 1 });
        assert!(!parsed.team_stats.contains_key("TBD"));
        assert!(!parsed.team_stats.contains_key("BYE"));
    }

    #[test]
    fn flags_conflicts() {
        let options = ParseOptions { detect_court_conflicts: true, ..ParseOptions::default() };
        let parsed = parse_schedule_csv(TWO_COURT, options).unwrap();
        let reasons: Vec<(&str, &str)> = parsed
            .conflicts
            .iter()
            .map(|c| (c.team.as_str(), c.reason.as_str()))
            .collect();
        assert!(reasons.contains(&("Owls", "Playing on both Court 1 and Court 2")));
        assert!(reasons.contains(&("Owls", "Playing and reffing Court 2")));
        assert!(reasons.contains(&("Crows", "Playing and reffing Court 1")));
        assert_eq!(reasons.len(), 3);

        let plain = parse_schedule_csv(TWO_COURT, ParseOptions::default()).unwrap();
        assert_eq!(plain.conflicts.len(), 2);
    }

    #[test]
    fn game_rows_without_ref_rows() {
        let data = "Game 01,A,,B\nGame 02,B,,C\n";
        let parsed = parse_schedule_csv(data, ParseOptions::default()).unwrap();
        assert_eq!(parsed.games.len(), 2);
        assert_eq!(parsed.games[1].court1_ref, "");
    }

    #[test]
    fn team_names_containing_game_are_not_game_rows() {
        let data = "\
Game 01,Game Changers,,B,,,,,,
,Refs: C,,,,,,,,
Team Name,Wins,Losses
Game Changers,\"=SUMIFS(C:C,B:B,\"\"Game Changers\"\")\",
Game Night,,
";
        let parsed = parse_schedule_csv(data, ParseOptions::default()).unwrap();
        assert_eq!(parsed.games.len(), 1);
        let keys: Vec<&str> = parsed.team_stats.keys().map(String::as_str).collect();
        assert_eq!(keys, ["B", "C", "Game Changers"]);
        assert_eq!(parsed.team_stats["Game Changers"].games_played, 1);
    }

    #[test]
    fn teams_sheet_layout() {
        let data = "Team Names,,Hawks,Owls,Crows\n";
        let teams = teams_from_reader(data.as_bytes()).unwrap();
        assert_eq!(teams, ["Hawks", "Owls", "Crows"]);
    }

    #[test]
    fn one_team_per_line() {
        let data = "Hawks\n  Owls \n\nCrows,extra\n";
        let teams = teams_from_reader(data.as_bytes()).unwrap();
        assert_eq!(teams, ["Hawks", "Owls", "Crows"]);
    }
}
