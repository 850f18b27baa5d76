//! Season scoring and classification engine.
//!
//! The leaf modules (`classifier`, `calendar`, `scoring`, `ranking`, `qualification`) are pure
//! functions over in-memory records. `standings` composes them over a [`SeasonRepository`] for
//! the host's screens and `router` exposes that composition over HTTP.

pub mod calendar;
pub mod classifier;
pub mod config;
pub mod domain;
pub mod qualification;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod standings;

#[cfg(test)]
mod tests;

pub use calendar::{resolve_stages, stage_containing};
pub use classifier::{age_on, AgeClassifier};
pub use config::SeasonConfig;
pub use domain::{
    AgeBand, ClassLabel, ClimbResult, DateRange, Gender, League, ParseLabelError, Participant,
    ParticipantId, RankingRow, ResultId, Route, RouteId, Stage, VenueId, VenueVisit,
};
pub use qualification::{
    count_distinct_venues, select_qualifiers, QualificationOutcome, QualificationSelector,
    VisitCounts,
};
pub use ranking::{find_rank, RankingBuilder};
pub use repository::{RepositoryError, SeasonRepository};
pub use router::standings_router;
pub use scoring::{aggregate, route_index, score_sheet, RouteIndex, ScoreMap, ScoreSheet};
pub use standings::{
    ParticipantStanding, QualificationReport, RankingTable, StandingsError, StandingsService,
    TimeScope,
};
