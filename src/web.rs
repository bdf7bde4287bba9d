use actix_web::{web, App, HttpServer, HttpResponse, Result, middleware};
use chrono::Local;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};
use crate::export::week_csv_string;
use crate::parser::{parse_schedule_csv, ParseOptions};
use crate::schedule::{first_week_date, generate_league, League, ScheduleError, SchedulerConfig};

// In-memory storage for the current league (persistence is left to the sheet collaborators)
pub struct AppState {
    pub league: Mutex<Option<StoredLeague>>,
    /// Used for every league instead of the per-size preset when set
    pub config: Option<SchedulerConfig>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredLeague {
    league_name: String,
    league: League,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeagueRequest {
    pub league_name: String,
    pub num_teams: usize,
    pub teams: Vec<String>,
    pub num_weeks: u32,
    pub seed: Option<u64>,
}

/// Validates a create-league request
pub fn validate_league_request(req: &CreateLeagueRequest) -> Result<(), String> {
    if req.league_name.trim().is_empty() {
        return Err("League name is required".to_string());
    }
    if req.num_teams != 4 && req.num_teams != 6 {
        return Err("Number of teams must be 4 or 6".to_string());
    }
    if req.teams.len() != req.num_teams {
        return Err(format!(
            "Number of teams must match: expected {}, got {}",
            req.num_teams,
            req.teams.len()
        ));
    }
    if req.num_weeks == 0 {
        return Err("Number of weeks must be at least 1".to_string());
    }
    Ok(())
}

fn lock_league(state: &AppState) -> Result<MutexGuard<'_, Option<StoredLeague>>> {
    state
        .league
        .lock()
        .map_err(|_| actix_web::error::ErrorInternalServerError("league state poisoned"))
}

fn schedule_error_response(err: ScheduleError) -> HttpResponse {
    let body = serde_json::json!({"success": false, "error": err.to_string()});
    match err {
        ScheduleError::NotEnoughTeams { .. }
        | ScheduleError::EmptyTeamName { .. }
        | ScheduleError::DuplicateTeam(_)
        | ScheduleError::InvalidWeekCount => HttpResponse::BadRequest().json(body),
        _ => HttpResponse::UnprocessableEntity().json(body),
    }
}

// Create league endpoint
async fn create_league(
    req: web::Json<CreateLeagueRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if let Err(e) = validate_league_request(&req) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({"success": false, "error": e})));
    }

    let config = state
        .config
        .clone()
        .unwrap_or_else(|| SchedulerConfig::for_team_count(req.teams.len()));
    let start_date = first_week_date(Local::now().date_naive());
    let generated = match req.seed {
        Some(seed) => generate_league(&req.teams, req.num_weeks, start_date, &config, &mut StdRng::seed_from_u64(seed)),
        None => generate_league(&req.teams, req.num_weeks, start_date, &config, &mut rand::thread_rng()),
    };

    let league = match generated {
        Ok(league) => league,
        Err(e) => return Ok(schedule_error_response(e)),
    };

    info!("Created league {:?} with {} weeks", req.league_name, league.weeks.len());
    let weeks = league.weeks.len();
    let games_per_week = league.weeks.first().map(|w| w.games.len()).unwrap_or(0);
    *lock_league(&state)? = Some(StoredLeague {
        league_name: req.league_name.clone(),
        league,
    });

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "weeks": weeks,
        "gamesPerWeek": games_per_week,
    })))
}

// Whole league endpoint
async fn get_league(state: web::Data<AppState>) -> Result<HttpResponse> {
    let stored = lock_league(&state)?;
    match *stored {
        Some(ref stored) => Ok(HttpResponse::Ok().json(stored)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "No league available"}))),
    }
}

// Single week endpoint
async fn get_week(week: web::Path<u32>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let stored = lock_league(&state)?;
    let found = stored
        .as_ref()
        .and_then(|s| s.league.weeks.iter().find(|w| w.week == *week));
    match found {
        Some(week) => Ok(HttpResponse::Ok().json(week)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "Week not available"}))),
    }
}

// Week sheet as CSV
async fn get_week_csv(week: web::Path<u32>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let stored = lock_league(&state)?;
    let Some(stored) = stored.as_ref() else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "No league available"})));
    };
    let Some(found) = stored.league.weeks.iter().find(|w| w.week == *week) else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "Week not available"})));
    };

    let csv = week_csv_string(found, &stored.league.teams)
        .map_err(actix_web::error::ErrorInternalServerError)?;
    let filename = format!("{}_week_{}.csv", stored.league_name.split_whitespace().collect::<Vec<_>>().join("_"), found.week);
    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header(("Content-Disposition", format!("attachment; filename=\"{}\"", filename)))
        .body(csv))
}

// Stats over every week, read back from the rendered sheets
async fn get_stats(state: web::Data<AppState>) -> Result<HttpResponse> {
    let stored = lock_league(&state)?;
    let Some(stored) = stored.as_ref() else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({"error": "No data available"})));
    };

    let mut sheets = String::new();
    for week in &stored.league.weeks {
        sheets.push_str(
            &week_csv_string(week, &stored.league.teams).map_err(actix_web::error::ErrorInternalServerError)?,
        );
    }
    let parsed = parse_schedule_csv(&sheets, ParseOptions::default())
        .map_err(actix_web::error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "teamStats": parsed.team_stats,
        "conflicts": parsed.conflicts,
    })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/league", web::post().to(create_league))
        .route("/api/league", web::get().to(get_league))
        .route("/api/league/stats", web::get().to(get_stats))
        .service(web::resource("/api/league/week/{week}").route(web::get().to(get_week)))
        .service(web::resource("/api/league/week/{week}/csv").route(web::get().to(get_week_csv)));
}

pub async fn start_server(port: u16, config: Option<SchedulerConfig>) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState {
        league: Mutex::new(None),
        config,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test as atest;

    fn state() -> web::Data<AppState> {
        web::Data::new(AppState {
            league: Mutex::new(None),
            config: None,
        })
    }

    fn request(num_teams: usize, teams: &[&str], num_weeks: u32) -> CreateLeagueRequest {
        CreateLeagueRequest {
            league_name: "Fall League".to_string(),
            num_teams,
            teams: teams.iter().map(|s| s.to_string()).collect(),
            num_weeks,
            seed: Some(42),
        }
    }

    #[test]
    fn validation_matches_form_rules() {
        let six = ["A", "B", "C", "D", "E", "F"];
        assert!(validate_league_request(&request(6, &six, 6)).is_ok());
        assert!(validate_league_request(&request(4, &six[..4], 1)).is_ok());
        assert!(validate_league_request(&request(5, &six[..5], 6)).is_err());
        assert!(validate_league_request(&request(6, &six[..5], 6)).is_err());
        assert!(validate_league_request(&request(6, &six, 0)).is_err());
        let mut unnamed = request(6, &six, 6);
        unnamed.league_name = "  ".to_string();
        assert!(validate_league_request(&unnamed).is_err());
    }

    #[actix_web::test]
    async fn create_then_read_weeks() {
        let app = atest::init_service(App::new().app_data(state()).configure(configure)).await;

        let create = atest::TestRequest::post()
            .uri("/api/league")
            .set_json(serde_json::json!({
                "leagueName": "Fall League",
                "numTeams": 6,
                "teams": ["A", "B", "C", "D", "E", "F"],
                "numWeeks": 2,
                "seed": 7
            }))
            .to_request();
        let body: serde_json::Value = atest::call_and_read_body_json(&app, create).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["weeks"], 2);
        assert_eq!(body["gamesPerWeek"], 30);

        let week = atest::TestRequest::get().uri("/api/league/week/2").to_request();
        let body: serde_json::Value = atest::call_and_read_body_json(&app, week).await;
        assert_eq!(body["week"], 2);
        assert_eq!(body["games"].as_array().map(|g| g.len()), Some(30));
        assert!(body["games"][0]["ref"].is_string());

        let csv = atest::TestRequest::get().uri("/api/league/week/1/csv").to_request();
        let resp = atest::call_service(&app, csv).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let text = atest::read_body(resp).await;
        assert!(String::from_utf8_lossy(&text).contains("Game 30,"));

        let stats = atest::TestRequest::get().uri("/api/league/stats").to_request();
        let body: serde_json::Value = atest::call_and_read_body_json(&app, stats).await;
        assert_eq!(body["teamStats"]["A"]["games_played"], 20);
        assert_eq!(body["teamStats"]["A"]["games_reffed"], 10);
        assert_eq!(body["conflicts"].as_array().map(|c| c.len()), Some(0));
    }

    #[actix_web::test]
    async fn bad_requests_are_rejected() {
        let app = atest::init_service(App::new().app_data(state()).configure(configure)).await;

        let wrong_size = atest::TestRequest::post()
            .uri("/api/league")
            .set_json(serde_json::json!({
                "leagueName": "Tiny",
                "numTeams": 2,
                "teams": ["A", "B"],
                "numWeeks": 1
            }))
            .to_request();
        assert_eq!(atest::call_service(&app, wrong_size).await.status(), StatusCode::BAD_REQUEST);

        let duplicate = atest::TestRequest::post()
            .uri("/api/league")
            .set_json(serde_json::json!({
                "leagueName": "Twins",
                "numTeams": 4,
                "teams": ["A", "B", "A", "C"],
                "numWeeks": 1
            }))
            .to_request();
        assert_eq!(atest::call_service(&app, duplicate).await.status(), StatusCode::BAD_REQUEST);

        let missing = atest::TestRequest::get().uri("/api/league/week/1").to_request();
        assert_eq!(atest::call_service(&app, missing).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn stats_only_count_real_teams() {
        let app = atest::init_service(App::new().app_data(state()).configure(configure)).await;

        let create = atest::TestRequest::post()
            .uri("/api/league")
            .set_json(serde_json::json!({
                "leagueName": "Sunday League",
                "numTeams": 4,
                "teams": ["Game Changers", "B", "C", "D"],
                "numWeeks": 1,
                "seed": 3
            }))
            .to_request();
        let body: serde_json::Value = atest::call_and_read_body_json(&app, create).await;
        assert_eq!(body["success"], true);

        let stats = atest::TestRequest::get().uri("/api/league/stats").to_request();
        let body: serde_json::Value = atest::call_and_read_body_json(&app, stats).await;
        let team_stats = body["teamStats"].as_object().unwrap();
        let mut keys: Vec<&str> = team_stats.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, ["B", "C", "D", "Game Changers"]);
        assert_eq!(team_stats["Game Changers"]["games_played"], 6);
    }
}
