use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::season::config::SeasonConfig;
use crate::season::domain::{
    ClimbResult, Gender, League, Participant, ParticipantId, ResultId, Route, RouteId, VenueId,
    VenueVisit,
};
use crate::season::repository::{RepositoryError, SeasonRepository};
use crate::season::router::standings_router;
use crate::season::standings::StandingsService;

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// 2026 season, qualification May through September, ages measured on May 1st.
pub(super) fn season_config() -> SeasonConfig {
    let mut config =
        SeasonConfig::new("2026").with_qualification_window(date(2026, 5, 1), date(2026, 9, 30));
    config.top_n_per_class = 1;
    config.wildcards_per_class = 1;
    config.wildcard_min_venues = 2;
    config
}

fn participant(
    id: &str,
    birth: Option<NaiveDate>,
    gender: Gender,
    league: League,
    role_excluded: bool,
) -> Participant {
    Participant {
        id: ParticipantId::from(id),
        birth_date: birth,
        gender: Some(gender),
        league: Some(league),
        role_excluded,
    }
}

pub(super) fn participants() -> Vec<Participant> {
    vec![
        // 13 on the cutoff.
        participant("a", Some(date(2013, 1, 10)), Gender::Female, League::Toprope, false),
        // 16 on the cutoff.
        participant("b", Some(date(2010, 2, 1)), Gender::Female, League::Toprope, false),
        participant("c", Some(date(2012, 3, 3)), Gender::Female, League::Toprope, false),
        participant("d", Some(date(1980, 1, 1)), Gender::Male, League::Lead, false),
        participant("staff", Some(date(1990, 5, 5)), Gender::Male, League::Toprope, true),
        participant("ghost", None, Gender::Female, League::Toprope, false),
    ]
}

pub(super) fn routes() -> Vec<Route> {
    vec![
        Route {
            id: RouteId::from("tr-1"),
            league: League::Toprope,
        },
        Route {
            id: RouteId::from("tr-2"),
            league: League::Toprope,
        },
        Route {
            id: RouteId::from("ld-1"),
            league: League::Lead,
        },
    ]
}

fn result(
    id: &str,
    participant: &str,
    route: &str,
    points: f64,
    is_flash: bool,
    on: NaiveDate,
) -> ClimbResult {
    ClimbResult {
        id: ResultId(id.to_string()),
        participant_id: ParticipantId::from(participant),
        route_id: RouteId::from(route),
        points,
        is_flash,
        occurred_at: on.and_hms_opt(18, 30, 0).expect("valid time"),
    }
}

pub(super) fn results() -> Vec<ClimbResult> {
    vec![
        result("r1", "a", "tr-1", 5.0, true, date(2026, 5, 3)),
        result("r2", "a", "tr-2", 7.5, false, date(2026, 6, 10)),
        result("r3", "b", "tr-1", 10.0, true, date(2026, 5, 4)),
        result("r4", "b", "tr-2", 9.0, false, date(2026, 6, 2)),
        result("r5", "c", "tr-1", 4.0, false, date(2026, 6, 15)),
        // Re-entry for the same route replaces r5.
        result("r6", "c", "tr-1", 3.0, false, date(2026, 6, 20)),
        result("r7", "d", "ld-1", 12.0, false, date(2026, 7, 1)),
        result("r8", "a", "bo-9", 50.0, false, date(2026, 7, 2)),
        result("r9", "staff", "tr-1", 9.0, true, date(2026, 5, 9)),
    ]
}

pub(super) fn visits() -> Vec<VenueVisit> {
    let visit = |participant: &str, venue: &str, on: NaiveDate| VenueVisit {
        participant_id: ParticipantId::from(participant),
        venue_id: VenueId(venue.to_string()),
        visited_on: on,
    };

    vec![
        visit("c", "north", date(2026, 5, 10)),
        visit("c", "south", date(2026, 6, 11)),
        visit("c", "south", date(2026, 6, 12)),
        visit("a", "north", date(2026, 5, 3)),
        // Outside the qualification window.
        visit("ghost", "north", date(2026, 4, 1)),
        visit("ghost", "east", date(2026, 4, 2)),
    ]
}

#[derive(Clone)]
pub(super) struct MemoryRepository {
    pub(super) config: SeasonConfig,
    pub(super) participants: Vec<Participant>,
    pub(super) routes: Vec<Route>,
    pub(super) results: Vec<ClimbResult>,
    pub(super) visits: Vec<VenueVisit>,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self {
            config: season_config(),
            participants: participants(),
            routes: routes(),
            results: results(),
            visits: visits(),
        }
    }
}

impl SeasonRepository for MemoryRepository {
    fn season_config(&self) -> Result<SeasonConfig, RepositoryError> {
        Ok(self.config.clone())
    }

    fn participants(&self) -> Result<Vec<Participant>, RepositoryError> {
        Ok(self.participants.clone())
    }

    fn routes(&self) -> Result<Vec<Route>, RepositoryError> {
        Ok(self.routes.clone())
    }

    fn results(&self) -> Result<Vec<ClimbResult>, RepositoryError> {
        Ok(self.results.clone())
    }

    fn venue_visits(&self) -> Result<Vec<VenueVisit>, RepositoryError> {
        Ok(self.visits.clone())
    }
}

pub(super) struct UnavailableRepository;

impl SeasonRepository for UnavailableRepository {
    fn season_config(&self) -> Result<SeasonConfig, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    fn participants(&self) -> Result<Vec<Participant>, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    fn routes(&self) -> Result<Vec<Route>, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    fn results(&self) -> Result<Vec<ClimbResult>, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }

    fn venue_visits(&self) -> Result<Vec<VenueVisit>, RepositoryError> {
        Err(RepositoryError::Unavailable("connection refused".to_string()))
    }
}

pub(super) fn build_service() -> StandingsService<MemoryRepository> {
    StandingsService::new(Arc::new(MemoryRepository::default()))
}

pub(super) fn router_with_service<R>(service: StandingsService<R>) -> axum::Router
where
    R: SeasonRepository + 'static,
{
    standings_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
