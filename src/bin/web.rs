//! Single binary web server: JSON API over an in-memory club store.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Set SHUFFLE_SEED to make position shuffles reproducible.

use actix_web::{
    delete, get, patch, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{NaiveDate, NaiveTime};
use club_team_manager::config::ATTRIBUTE_RANGE;
use club_team_manager::{
    adjust_category_by_score, adjust_category_by_single_attr, allocate_match_teams,
    allocate_two_teams, set_category_score, set_overall_score, AppConfig, Category, ClubStore,
    Match, MatchId, MatchPlayerId, MatchPlayerUpdate, MatchTeam, MemoryStore, PlayerAttributes,
    PlayerId, Team,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use std::sync::RwLock;

/// Store plus the RNG used for new players' attributes and position shuffles.
struct Club {
    store: MemoryStore,
    rng: StdRng,
}

type AppState = Data<RwLock<Club>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreatePlayerBody {
    name: String,
    /// Build attributes from this overall score.
    overall_score: Option<i64>,
    /// Explicit attributes; ignored when `overall_score` is given.
    attributes: Option<PlayerAttributes>,
}

#[derive(Deserialize)]
struct ScoreBody {
    score: i64,
    /// Scale existing attributes instead of flattening them.
    #[serde(default)]
    proportional: bool,
}

#[derive(Deserialize)]
struct AttributeBody {
    value: i64,
}

#[derive(Deserialize, Default)]
struct AllocateBody {
    max_per_team: Option<usize>,
}

#[derive(Deserialize)]
struct SwapPlayersBody {
    a: PlayerId,
    b: PlayerId,
}

#[derive(Deserialize)]
struct SwapMatchPlayersBody {
    a: MatchPlayerId,
    b: MatchPlayerId,
}

#[derive(Deserialize)]
struct NewTeamBody {
    number: Team,
    name: String,
    jersey_color: Option<String>,
    #[serde(default = "default_should_allocate")]
    should_allocate: bool,
}

fn default_should_allocate() -> bool {
    true
}

#[derive(Deserialize)]
struct CreateMatchBody {
    date: Option<NaiveDate>,
    start_time: Option<NaiveTime>,
    location: Option<String>,
    max_players_per_team: Option<usize>,
    /// Defaults to two allocatable teams.
    #[serde(default)]
    teams: Vec<NewTeamBody>,
}

#[derive(Deserialize)]
struct SignupBody {
    player_id: PlayerId,
}

#[derive(Deserialize)]
struct PlayerPath {
    id: PlayerId,
}

#[derive(Deserialize)]
struct CategoryPath {
    id: PlayerId,
    category: Category,
}

#[derive(Deserialize)]
struct AttributePath {
    id: PlayerId,
    category: Category,
    key: String,
}

#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

#[derive(Deserialize)]
struct MatchPlayerPath {
    id: MatchPlayerId,
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

fn bad_request(e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

fn not_found(what: &str) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": format!("No {}", what) }))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "club-team-manager",
    })
}

/// All players with their scores.
#[get("/api/players")]
async fn api_list_players(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let summaries: Vec<_> = g.store.players().iter().map(|p| p.summary()).collect();
    HttpResponse::Ok().json(summaries)
}

/// Add a player: from an overall score, explicit attributes, or random attributes.
#[post("/api/players")]
async fn api_create_player(state: AppState, body: Json<CreatePlayerBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let club = &mut *g;
    let body = body.into_inner();
    let attributes = match (body.overall_score, body.attributes) {
        (Some(score), _) => set_overall_score(score),
        (None, Some(attrs)) => attrs,
        (None, None) => PlayerAttributes::random(&mut club.rng),
    };
    match club.store.add_player(&body.name, attributes) {
        Ok(id) => match club.store.player(id) {
            Some(p) => HttpResponse::Ok().json(p.summary()),
            None => not_found("player"),
        },
        Err(e) => bad_request(e),
    }
}

/// A player with full attributes and scores.
#[get("/api/players/{id}")]
async fn api_get_player(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.store.player(path.id) {
        Some(p) => HttpResponse::Ok().json(serde_json::json!({
            "player": p,
            "summary": p.summary(),
        })),
        None => not_found("player"),
    }
}

#[delete("/api/players/{id}")]
async fn api_delete_player(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.store.remove_player(path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => bad_request(e),
    }
}

fn replace_attributes(store: &mut MemoryStore, id: PlayerId, attributes: PlayerAttributes) -> HttpResponse {
    if let Err(e) = store.update_player_attributes(id, attributes) {
        return bad_request(e);
    }
    match store.player(id) {
        Some(p) => HttpResponse::Ok().json(p.summary()),
        None => not_found("player"),
    }
}

/// Re-derive all attributes from a target overall score.
#[put("/api/players/{id}/overall")]
async fn api_set_overall(state: AppState, path: Path<PlayerPath>, body: Json<ScoreBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    replace_attributes(&mut g.store, path.id, set_overall_score(body.score))
}

/// Set one category score, flat or keeping the attributes' shape.
#[put("/api/players/{id}/categories/{category}")]
async fn api_set_category(
    state: AppState,
    path: Path<CategoryPath>,
    body: Json<ScoreBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let current = match g.store.player(path.id) {
        Some(p) => p.attributes.clone(),
        None => return not_found("player"),
    };
    let map = if body.proportional {
        adjust_category_by_score(current.get(path.category), body.score)
    } else {
        set_category_score(path.category, body.score)
    };
    replace_attributes(&mut g.store, path.id, current.with(path.category, map))
}

/// Change one attribute and scale the rest of its category.
#[put("/api/players/{id}/attributes/{category}/{key}")]
async fn api_set_attribute(
    state: AppState,
    path: Path<AttributePath>,
    body: Json<AttributeBody>,
) -> HttpResponse {
    if !path.category.contains(&path.key) {
        return bad_request(format!("Unknown {} attribute: {}", path.category, path.key));
    }
    if !ATTRIBUTE_RANGE.contains(&body.value) {
        return bad_request(format!(
            "Attribute value must be between {} and {}",
            ATTRIBUTE_RANGE.start(),
            ATTRIBUTE_RANGE.end()
        ));
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let current = match g.store.player(path.id) {
        Some(p) => p.attributes.clone(),
        None => return not_found("player"),
    };
    let map = adjust_category_by_single_attr(current.get(path.category), &path.key, body.value);
    replace_attributes(&mut g.store, path.id, current.with(path.category, map))
}

/// Split all players into two teams.
#[post("/api/teams/allocate")]
async fn api_allocate_teams(state: AppState, body: Option<Json<AllocateBody>>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let club = &mut *g;
    let cap = body.map(|b| b.into_inner()).unwrap_or_default().max_per_team;
    match allocate_two_teams(&mut club.store, cap, &mut club.rng) {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => bad_request(e),
    }
}

#[post("/api/teams/reset")]
async fn api_reset_teams(state: AppState) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let updated = g.store.reset_teams();
    HttpResponse::Ok().json(serde_json::json!({ "updated": updated }))
}

#[post("/api/teams/swap")]
async fn api_swap_players(state: AppState, body: Json<SwapPlayersBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.store.swap_players(body.a, body.b) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => bad_request(e),
    }
}

/// Create a match and its teams (two allocatable teams unless given).
#[post("/api/matches")]
async fn api_create_match(state: AppState, body: Json<CreateMatchBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let body = body.into_inner();
    let mut fixture = Match::new(body.max_players_per_team);
    fixture.date = body.date;
    fixture.start_time = body.start_time;
    fixture.location = body.location;
    let match_id = fixture.id;

    let teams = if body.teams.is_empty() {
        vec![
            MatchTeam::new(match_id, Team::One, "Team 1"),
            MatchTeam::new(match_id, Team::Two, "Team 2"),
        ]
    } else {
        body.teams
            .into_iter()
            .map(|t| MatchTeam {
                jersey_color: t.jersey_color,
                should_allocate: t.should_allocate,
                ..MatchTeam::new(match_id, t.number, t.name)
            })
            .collect()
    };
    if let Err(e) = g.store.add_match_with_teams(fixture, teams) {
        return bad_request(e);
    }
    match_view(&g.store, match_id)
}

fn match_view(store: &MemoryStore, match_id: MatchId) -> HttpResponse {
    let fixture = match store.get_match(match_id) {
        Some(m) => m,
        None => return not_found("match"),
    };
    let teams = store.match_teams(match_id);
    let players = store.match_players(match_id, None);
    match (teams, players) {
        (Ok(teams), Ok(players)) => HttpResponse::Ok().json(serde_json::json!({
            "match": fixture,
            "teams": teams,
            "players": players,
        })),
        (Err(e), _) | (_, Err(e)) => bad_request(e),
    }
}

#[get("/api/matches/{id}")]
async fn api_get_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match_view(&g.store, path.id)
}

#[post("/api/matches/{id}/signups")]
async fn api_sign_up(state: AppState, path: Path<MatchPath>, body: Json<SignupBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.store.sign_up(path.id, body.player_id) {
        Ok(_) => match_view(&g.store, path.id),
        Err(e) => bad_request(e),
    }
}

/// Allocate the match's signed-up players into its allocatable team(s).
#[post("/api/matches/{id}/allocate")]
async fn api_allocate_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let club = &mut *g;
    match allocate_match_teams(&mut club.store, path.id, &mut club.rng) {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => bad_request(e),
    }
}

#[post("/api/matches/{id}/swap")]
async fn api_swap_match_players(
    state: AppState,
    path: Path<MatchPath>,
    body: Json<SwapMatchPlayersBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.store.swap_match_players(body.a, body.b) {
        Ok(()) => match_view(&g.store, path.id),
        Err(e) => bad_request(e),
    }
}

/// Partial update of one match-player record (team, position, starter flag, rating).
#[patch("/api/match-players/{id}")]
async fn api_update_match_player(
    state: AppState,
    path: Path<MatchPlayerPath>,
    body: Json<MatchPlayerUpdate>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if let Err(e) = g.store.update_match_player(path.id, &body) {
        return bad_request(e);
    }
    match g.store.match_player(path.id) {
        Some(mp) => HttpResponse::Ok().json(mp),
        None => not_found("match player"),
    }
}

/// Withdraw a player from a match by deleting their record.
#[delete("/api/match-players/{id}")]
async fn api_remove_match_player(state: AppState, path: Path<MatchPlayerPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.store.remove_match_player(path.id) {
        Ok(removed) => match_view(&g.store, removed.match_id),
        Err(e) => bad_request(e),
    }
}

/// Drop every signed-up player of a match who is not on a team.
#[delete("/api/matches/{id}/signups")]
async fn api_clear_signups(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    if g.store.get_match(path.id).is_none() {
        return not_found("match");
    }
    let removed = g.store.clear_signups(path.id);
    HttpResponse::Ok().json(serde_json::json!({ "removed": removed }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();
    let rng = match config.shuffle_seed {
        Some(seed) => {
            log::info!("Using fixed shuffle seed {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state = Data::new(RwLock::new(Club {
        store: MemoryStore::new(),
        rng,
    }));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_list_players)
            .service(api_create_player)
            .service(api_get_player)
            .service(api_delete_player)
            .service(api_set_overall)
            .service(api_set_category)
            .service(api_set_attribute)
            .service(api_allocate_teams)
            .service(api_reset_teams)
            .service(api_swap_players)
            .service(api_create_match)
            .service(api_get_match)
            .service(api_sign_up)
            .service(api_allocate_match)
            .service(api_swap_match_players)
            .service(api_update_match_player)
            .service(api_remove_match_player)
            .service(api_clear_signups)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
