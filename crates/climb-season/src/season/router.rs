use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::calendar::stage_containing;
use super::domain::{ClassLabel, DateRange, League, ParticipantId, Stage};
use super::repository::SeasonRepository;
use super::standings::{StandingsError, StandingsService, TimeScope};

/// Router builder exposing read-only season endpoints.
pub fn standings_router<R>(service: Arc<StandingsService<R>>) -> Router
where
    R: SeasonRepository + 'static,
{
    Router::new()
        .route("/api/v1/season/stages", get(stages_handler::<R>))
        .route(
            "/api/v1/season/rankings/:league",
            get(class_tables_handler::<R>),
        )
        .route(
            "/api/v1/season/rankings/:league/:class",
            get(ranking_handler::<R>),
        )
        .route(
            "/api/v1/season/participants/:participant_id/standing",
            get(standing_handler::<R>),
        )
        .route(
            "/api/v1/season/qualifiers/:league/:class",
            get(qualifiers_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScopeQuery {
    stage: Option<String>,
    from: Option<String>,
    to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StandingQuery {
    league: String,
    stage: Option<String>,
    from: Option<String>,
    to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StagesQuery {
    today: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QualifierQuery {
    pub(crate) seed: Option<u64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StagesView {
    stages: Vec<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_stage: Option<String>,
}

pub(crate) async fn stages_handler<R>(
    State(service): State<Arc<StandingsService<R>>>,
    Query(query): Query<StagesQuery>,
) -> Response
where
    R: SeasonRepository + 'static,
{
    let today = match query.today.as_deref().map(parse_query_date).transpose() {
        Ok(today) => today.unwrap_or_else(|| Local::now().date_naive()),
        Err(message) => return bad_request(message),
    };

    let stages = match service.stages() {
        Ok(stages) => stages,
        Err(err) => return standings_error(err),
    };
    let current_stage = stage_containing(&stages, today).map(|stage| stage.key.clone());

    (
        StatusCode::OK,
        Json(StagesView {
            stages,
            current_stage,
        }),
    )
        .into_response()
}

pub(crate) async fn class_tables_handler<R>(
    State(service): State<Arc<StandingsService<R>>>,
    Path(league): Path<String>,
    Query(query): Query<ScopeQuery>,
) -> Response
where
    R: SeasonRepository + 'static,
{
    let league = match league.parse::<League>() {
        Ok(league) => league,
        Err(err) => return bad_request(err.to_string()),
    };
    let scope = match time_scope(query.stage, query.from, query.to) {
        Ok(scope) => scope,
        Err(message) => return bad_request(message),
    };

    match service.class_tables(league, &scope) {
        Ok(tables) => (StatusCode::OK, Json(tables)).into_response(),
        Err(err) => standings_error(err),
    }
}

pub(crate) async fn ranking_handler<R>(
    State(service): State<Arc<StandingsService<R>>>,
    Path((league, class)): Path<(String, String)>,
    Query(query): Query<ScopeQuery>,
) -> Response
where
    R: SeasonRepository + 'static,
{
    let (league, class) = match parse_table(&league, &class) {
        Ok(parsed) => parsed,
        Err(message) => return bad_request(message),
    };
    let scope = match time_scope(query.stage, query.from, query.to) {
        Ok(scope) => scope,
        Err(message) => return bad_request(message),
    };

    match service.ranking(league, class, &scope) {
        Ok(table) => (StatusCode::OK, Json(table)).into_response(),
        Err(err) => standings_error(err),
    }
}

pub(crate) async fn standing_handler<R>(
    State(service): State<Arc<StandingsService<R>>>,
    Path(participant_id): Path<String>,
    Query(query): Query<StandingQuery>,
) -> Response
where
    R: SeasonRepository + 'static,
{
    let league = match query.league.parse::<League>() {
        Ok(league) => league,
        Err(err) => return bad_request(err.to_string()),
    };
    let scope = match time_scope(query.stage, query.from, query.to) {
        Ok(scope) => scope,
        Err(message) => return bad_request(message),
    };

    match service.standing(&ParticipantId(participant_id), league, &scope) {
        Ok(standing) => (StatusCode::OK, Json(standing)).into_response(),
        Err(err) => standings_error(err),
    }
}

pub(crate) async fn qualifiers_handler<R>(
    State(service): State<Arc<StandingsService<R>>>,
    Path((league, class)): Path<(String, String)>,
    Query(query): Query<QualifierQuery>,
) -> Response
where
    R: SeasonRepository + 'static,
{
    let (league, class) = match parse_table(&league, &class) {
        Ok(parsed) => parsed,
        Err(message) => return bad_request(message),
    };
    // Draws must be replayable, so the caller always supplies the seed.
    let Some(seed) = query.seed else {
        return bad_request("seed query parameter is required".to_string());
    };

    match service.qualifiers(league, class, seed) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => standings_error(err),
    }
}

fn parse_table(league: &str, class: &str) -> Result<(League, ClassLabel), String> {
    let league = league.parse::<League>().map_err(|err| err.to_string())?;
    let class = class.parse::<ClassLabel>().map_err(|err| err.to_string())?;
    Ok((league, class))
}

pub(crate) fn time_scope(
    stage: Option<String>,
    from: Option<String>,
    to: Option<String>,
) -> Result<TimeScope, String> {
    match (stage, from, to) {
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
            Err("use either stage or from/to, not both".to_string())
        }
        (Some(stage), None, None) => Ok(TimeScope::Stage(stage)),
        (None, Some(from), Some(to)) => {
            let range = DateRange::new(parse_query_date(&from)?, parse_query_date(&to)?);
            if range.is_empty() {
                return Err(format!("range start {from} is after end {to}"));
            }
            Ok(TimeScope::Range(range))
        }
        (None, Some(_), None) | (None, None, Some(_)) => {
            Err("from and to must be supplied together".to_string())
        }
        (None, None, None) => Ok(TimeScope::Overall),
    }
}

fn parse_query_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn bad_request(message: String) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

fn standings_error(err: StandingsError) -> Response {
    let status = match &err {
        StandingsError::UnknownStage(_) | StandingsError::UnknownParticipant(_) => {
            StatusCode::NOT_FOUND
        }
        StandingsError::Repository(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
