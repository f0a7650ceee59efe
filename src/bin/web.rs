//! Single binary web server: JSON API over the tennis ladder, static files from STATIC_DIR.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. See `tennis_ladder::config` for the environment
//! variables (HOST, PORT, LADDER_DATA, LADDER_ADMIN_SECRET, ...).

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use std::sync::RwLock;
use std::time::Duration;
use tennis_ladder::{
    add_match_with_id, audit, challenge_candidates,
    config::{secret_matches, ServerConfig},
    delete_match, edit_match, export, leaderboard, match_history, sorted_standings, storage, Ladder,
    LadderError, MatchEdit, MatchEntry, MatchId, PlayerId, SortColumn, SortDirection, TOP_PLAYERS,
};
use tokio::sync::{watch, Mutex};

/// Shared server state: the current ladder, its change counter and the settings.
struct LadderState {
    ladder: RwLock<Ladder>,
    /// Held while writing the data file, so saves run one at a time.
    save_lock: Mutex<()>,
    /// Bumped after every successful write; watchers long-poll on it.
    revision: watch::Sender<u64>,
    config: ServerConfig,
}

type AppState = Data<LadderState>;

/// How long a change poll waits before answering with the unchanged revision.
const LONG_POLL_TIMEOUT: Duration = Duration::from_secs(25);

/// Session key set once the admin secret has been presented.
const ADMIN_SESSION_KEY: &str = "admin";

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(serde::Serialize)]
struct RevisionResponse {
    revision: u64,
}

#[derive(Deserialize)]
struct LoginBody {
    secret: String,
}

#[derive(Deserialize)]
struct SetNameBody {
    name: String,
}

#[derive(Deserialize)]
struct ActiveCountBody {
    active_player_count: u32,
}

#[derive(Deserialize)]
struct ChangesQuery {
    #[serde(default)]
    since: u64,
}

#[derive(Deserialize)]
struct StandingsQuery {
    sort: Option<String>,
    #[serde(default)]
    direction: SortDirection,
}

/// Path segment: match id (e.g. /api/ladder/matches/{id})
#[derive(Deserialize)]
struct MatchPath {
    id: MatchId,
}

/// Path segment: player id (e.g. /api/ladder/players/{id}/name)
#[derive(Deserialize)]
struct PlayerPath {
    id: PlayerId,
}

fn error_response(e: &LadderError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        LadderError::MatchNotFound(_) | LadderError::PlayerNotFound(_) => HttpResponse::NotFound().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn is_admin(session: &Session) -> bool {
    matches!(session.get::<bool>(ADMIN_SESSION_KEY), Ok(Some(true)))
}

/// Run one ladder transaction under the write lock, then notify watchers and persist.
///
/// Saves are serialized and always write the newest in-memory ladder, so the file never
/// ends up behind memory when commits overlap. The in-memory ladder keeps the new state
/// even when saving fails; the error is reported to the caller.
async fn commit(
    state: &AppState,
    session: &Session,
    transaction: impl FnOnce(&Ladder) -> Result<Ladder, LadderError>,
) -> HttpResponse {
    if !is_admin(session) {
        return HttpResponse::Unauthorized().json(serde_json::json!({ "error": "Log in to make changes" }));
    }
    let next = {
        let mut g = match state.ladder.write() {
            Ok(guard) => guard,
            Err(_) => return HttpResponse::InternalServerError().body("lock error"),
        };
        match transaction(&g) {
            Ok(next) => {
                *g = next.clone();
                next
            }
            Err(e) => return error_response(&e),
        }
    };
    state.revision.send_modify(|r| *r = r.wrapping_add(1));
    let _saving = state.save_lock.lock().await;
    let latest = match state.ladder.read() {
        Ok(g) => g.clone(),
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match storage::save_ladder(&state.config.data_path, &latest).await {
        Ok(()) => HttpResponse::Ok().json(&next),
        Err(e) => {
            log::error!("Could not save ladder to {}: {}", state.config.data_path.display(), e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Change applied but not saved: {}", e),
                "ladder": next,
            }))
        }
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tennis-ladder",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Full ladder snapshot.
#[get("/api/ladder")]
async fn api_get_ladder(state: AppState) -> HttpResponse {
    match state.ladder.read() {
        Ok(g) => HttpResponse::Ok().json(&*g),
        Err(_) => HttpResponse::InternalServerError().body("lock error"),
    }
}

#[get("/api/ladder/revision")]
async fn api_revision(state: AppState) -> HttpResponse {
    let revision = *state.revision.borrow();
    HttpResponse::Ok().json(RevisionResponse { revision })
}

/// Long poll: answers as soon as the revision passes `since`, or after the timeout.
#[get("/api/ladder/changes")]
async fn api_changes(state: AppState, query: Query<ChangesQuery>) -> HttpResponse {
    let mut rx = state.revision.subscribe();
    let since = query.since;
    let changed = tokio::time::timeout(LONG_POLL_TIMEOUT, rx.wait_for(|r| *r > since)).await;
    let revision = match changed {
        Ok(Ok(r)) => *r,
        _ => *state.revision.borrow(),
    };
    HttpResponse::Ok().json(RevisionResponse { revision })
}

/// Active players sorted by a column (`?sort=games_won&direction=desc`).
#[get("/api/ladder/standings")]
async fn api_standings(state: AppState, query: Query<StandingsQuery>) -> HttpResponse {
    let column = match query.sort.as_deref().map(str::parse::<SortColumn>) {
        None => SortColumn::Position,
        Some(Ok(column)) => column,
        Some(Err(e)) => return HttpResponse::BadRequest().json(serde_json::json!({ "error": e })),
    };
    match state.ladder.read() {
        Ok(g) => HttpResponse::Ok().json(sorted_standings(&g, column, query.direction)),
        Err(_) => HttpResponse::InternalServerError().body("lock error"),
    }
}

#[get("/api/ladder/leaderboard")]
async fn api_leaderboard(state: AppState) -> HttpResponse {
    match state.ladder.read() {
        Ok(g) => HttpResponse::Ok().json(leaderboard(&g, TOP_PLAYERS)),
        Err(_) => HttpResponse::InternalServerError().body("lock error"),
    }
}

/// Players selectable in the new-match form.
#[get("/api/ladder/candidates")]
async fn api_candidates(state: AppState) -> HttpResponse {
    match state.ladder.read() {
        Ok(g) => HttpResponse::Ok().json(challenge_candidates(&g)),
        Err(_) => HttpResponse::InternalServerError().body("lock error"),
    }
}

#[get("/api/ladder/players/{id}/matches")]
async fn api_player_matches(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    let g = match state.ladder.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    if g.player(path.id).is_none() {
        return error_response(&LadderError::PlayerNotFound(path.id));
    }
    HttpResponse::Ok().json(match_history(&g, path.id))
}

#[get("/api/ladder/export/standings.csv")]
async fn api_export_standings(state: AppState) -> HttpResponse {
    let csv = match state.ladder.read() {
        Ok(g) => export::standings_csv(&g),
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match csv {
        Ok(body) => HttpResponse::Ok().content_type("text/csv; charset=utf-8").body(body),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

#[get("/api/ladder/export/matches.csv")]
async fn api_export_matches(state: AppState) -> HttpResponse {
    let csv = match state.ladder.read() {
        Ok(g) => export::matches_csv(&g),
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match csv {
        Ok(body) => HttpResponse::Ok().content_type("text/csv; charset=utf-8").body(body),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

/// Exchange the shared admin secret for a session cookie.
/// The secret is compared in constant time.
#[post("/api/session/login")]
async fn api_login(state: AppState, session: Session, body: Json<LoginBody>) -> HttpResponse {
    let Some(secret) = state.config.admin_secret.as_deref() else {
        return HttpResponse::Forbidden().json(serde_json::json!({ "error": "Changes are disabled on this server" }));
    };
    if !secret_matches(secret, &body.secret) {
        log::warn!("Rejected admin login attempt");
        return HttpResponse::Unauthorized().json(serde_json::json!({ "error": "Wrong secret" }));
    }
    session.renew();
    match session.insert(ADMIN_SESSION_KEY, true) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "admin": true })),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

#[post("/api/session/logout")]
async fn api_logout(session: Session) -> HttpResponse {
    session.purge();
    HttpResponse::Ok().json(serde_json::json!({ "admin": false }))
}

/// Record a new match.
#[post("/api/ladder/matches")]
async fn api_add_match(state: AppState, session: Session, body: Json<MatchEntry>) -> HttpResponse {
    commit(&state, &session, |ladder| {
        add_match_with_id(ladder, &body).map(|(next, id)| {
            log::info!("Match {} recorded", id);
            next
        })
    })
    .await
}

/// Replace a match's date, winner, surface and score.
#[put("/api/ladder/matches/{id}")]
async fn api_edit_match(
    state: AppState,
    session: Session,
    path: Path<MatchPath>,
    body: Json<MatchEdit>,
) -> HttpResponse {
    commit(&state, &session, |ladder| edit_match(ladder, path.id, &body)).await
}

#[delete("/api/ladder/matches/{id}")]
async fn api_delete_match(state: AppState, session: Session, path: Path<MatchPath>) -> HttpResponse {
    commit(&state, &session, |ladder| delete_match(ladder, path.id)).await
}

/// Name or rename a ladder slot (empty name clears it).
#[put("/api/ladder/players/{id}/name")]
async fn api_set_player_name(
    state: AppState,
    session: Session,
    path: Path<PlayerPath>,
    body: Json<SetNameBody>,
) -> HttpResponse {
    commit(&state, &session, |ladder| {
        let mut next = ladder.clone();
        next.set_player_name(path.id, body.name.as_str())?;
        Ok(next)
    })
    .await
}

#[put("/api/ladder/active-count")]
async fn api_set_active_count(state: AppState, session: Session, body: Json<ActiveCountBody>) -> HttpResponse {
    commit(&state, &session, |ladder| {
        let mut next = ladder.clone();
        next.set_active_player_count(body.active_player_count)?;
        Ok(next)
    })
    .await
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let ladder = match storage::load_ladder(&config.data_path).await? {
        Some(ladder) => ladder,
        None => {
            log::info!(
                "No ladder at {}; starting a new one with {} slots",
                config.data_path.display(),
                config.capacity
            );
            config.new_ladder()
        }
    };
    for d in audit(&ladder) {
        log::warn!("Ladder inconsistency: {}", d);
    }
    if config.admin_secret.is_none() {
        log::warn!("LADDER_ADMIN_SECRET is not set; the ladder is read-only");
    }

    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let static_dir = config.static_dir.clone();
    let (revision, _) = watch::channel(0u64);
    let state = Data::new(LadderState {
        ladder: RwLock::new(ladder),
        save_lock: Mutex::new(()),
        revision,
        config,
    });
    let session_key = Key::generate();

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_secure(false)
                    .build(),
            )
            .service(api_health)
            .service(favicon)
            .service(api_get_ladder)
            .service(api_revision)
            .service(api_changes)
            .service(api_standings)
            .service(api_leaderboard)
            .service(api_candidates)
            .service(api_player_matches)
            .service(api_export_standings)
            .service(api_export_matches)
            .service(api_login)
            .service(api_logout)
            .service(api_add_match)
            .service(api_edit_match)
            .service(api_delete_match)
            .service(api_set_player_name)
            .service(api_set_active_count)
            .service(Files::new("/", static_dir.clone()).index_file("index.html"))
    })
    .bind(bind)?
    .run()
    .await
}
