use chrono::NaiveDate;
use climb_season::import::{RecordImportError, SeasonRecords};
use climb_season::season::{
    ClassLabel, ClimbResult, League, Participant, RepositoryError, Route, SeasonConfig,
    SeasonRepository, VenueVisit,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Season records read once from the data directory and served from memory.
#[derive(Clone)]
pub(crate) struct InMemorySeasonRepository {
    records: Arc<SeasonRecords>,
}

impl InMemorySeasonRepository {
    pub(crate) fn load(dir: &Path) -> Result<Self, RecordImportError> {
        Ok(Self::from_records(SeasonRecords::from_dir(dir)?))
    }

    pub(crate) fn from_records(records: SeasonRecords) -> Self {
        Self {
            records: Arc::new(records),
        }
    }

    pub(crate) fn summary(&self) -> (usize, usize, usize) {
        (
            self.records.participants.len(),
            self.records.routes.len(),
            self.records.results.len(),
        )
    }
}

impl SeasonRepository for InMemorySeasonRepository {
    fn season_config(&self) -> Result<SeasonConfig, RepositoryError> {
        Ok(self.records.config.clone())
    }

    fn participants(&self) -> Result<Vec<Participant>, RepositoryError> {
        Ok(self.records.participants.clone())
    }

    fn routes(&self) -> Result<Vec<Route>, RepositoryError> {
        Ok(self.records.routes.clone())
    }

    fn results(&self) -> Result<Vec<ClimbResult>, RepositoryError> {
        Ok(self.records.results.clone())
    }

    fn venue_visits(&self) -> Result<Vec<VenueVisit>, RepositoryError> {
        Ok(self.records.visits.clone())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_league(raw: &str) -> Result<League, String> {
    raw.parse::<League>().map_err(|err| err.to_string())
}

pub(crate) fn parse_class(raw: &str) -> Result<ClassLabel, String> {
    raw.parse::<ClassLabel>().map_err(|err| err.to_string())
}
