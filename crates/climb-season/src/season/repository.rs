use super::config::SeasonConfig;
use super::domain::{ClimbResult, Participant, Route, VenueVisit};

/// Read access to the external record store. The engine never writes through it.
pub trait SeasonRepository: Send + Sync {
    fn season_config(&self) -> Result<SeasonConfig, RepositoryError>;
    fn participants(&self) -> Result<Vec<Participant>, RepositoryError>;
    fn routes(&self) -> Result<Vec<Route>, RepositoryError>;
    fn results(&self) -> Result<Vec<ClimbResult>, RepositoryError>;
    fn venue_visits(&self) -> Result<Vec<VenueVisit>, RepositoryError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}
