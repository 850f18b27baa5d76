use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use super::calendar::{find_stage, resolve_stages, stage_containing};
use super::classifier::AgeClassifier;
use super::config::SeasonConfig;
use super::domain::{
    ClassLabel, ClimbResult, DateRange, League, Participant, ParticipantId, RankingRow, Stage,
};
use super::qualification::{count_distinct_venues, QualificationOutcome, QualificationSelector};
use super::ranking::{find_rank, RankingBuilder};
use super::repository::{RepositoryError, SeasonRepository};
use super::scoring::{route_index, score_sheet, RouteIndex, ScoreMap};

/// Time window a ranking covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeScope {
    /// Qualification window, or every result when the season has none.
    Overall,
    Stage(String),
    Range(DateRange),
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingTable {
    pub league: League,
    pub class: ClassLabel,
    pub class_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<DateRange>,
    pub rows: Vec<RankingRow>,
}

/// Profile/dashboard view of one participant within their own class table.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantStanding {
    pub participant_id: ParticipantId,
    pub league: League,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<ClassLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_label: Option<String>,
    pub points: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<usize>,
    pub field_size: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct QualificationReport {
    pub league: League,
    pub class: ClassLabel,
    pub class_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<DateRange>,
    pub outcome: QualificationOutcome,
}

/// Records loaded once per request so every table in it sees the same data.
struct SeasonSnapshot {
    config: SeasonConfig,
    participants: Vec<Participant>,
    routes: RouteIndex,
    results: Vec<ClimbResult>,
}

struct ResolvedScope {
    stage_key: Option<String>,
    range: Option<DateRange>,
}

/// Composes the engine over a record store for the host's screens.
pub struct StandingsService<R> {
    repository: Arc<R>,
}

impl<R> StandingsService<R>
where
    R: SeasonRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn season_config(&self) -> Result<SeasonConfig, StandingsError> {
        Ok(self.repository.season_config()?)
    }

    pub fn stages(&self) -> Result<Vec<Stage>, StandingsError> {
        Ok(resolve_stages(&self.repository.season_config()?))
    }

    pub fn current_stage(&self, today: NaiveDate) -> Result<Option<Stage>, StandingsError> {
        let stages = self.stages()?;
        Ok(stage_containing(&stages, today).cloned())
    }

    pub fn ranking(
        &self,
        league: League,
        class: ClassLabel,
        scope: &TimeScope,
    ) -> Result<RankingTable, StandingsError> {
        let snapshot = self.snapshot()?;
        let resolved = resolve_scope(&snapshot.config, scope)?;
        let scores = league_scores(&snapshot, league, resolved.range);
        Ok(class_table(&snapshot, &scores, league, class, &resolved))
    }

    /// All six class tables for `league`, sharing one aggregation pass.
    pub fn class_tables(
        &self,
        league: League,
        scope: &TimeScope,
    ) -> Result<Vec<RankingTable>, StandingsError> {
        let snapshot = self.snapshot()?;
        let resolved = resolve_scope(&snapshot.config, scope)?;
        let scores = league_scores(&snapshot, league, resolved.range);

        Ok(ClassLabel::ordered()
            .into_iter()
            .map(|class| class_table(&snapshot, &scores, league, class, &resolved))
            .collect())
    }

    pub fn standing(
        &self,
        participant_id: &ParticipantId,
        league: League,
        scope: &TimeScope,
    ) -> Result<ParticipantStanding, StandingsError> {
        let snapshot = self.snapshot()?;
        let participant = snapshot
            .participants
            .iter()
            .find(|participant| &participant.id == participant_id)
            .ok_or_else(|| StandingsError::UnknownParticipant(participant_id.clone()))?;

        let resolved = resolve_scope(&snapshot.config, scope)?;
        let scores = league_scores(&snapshot, league, resolved.range);
        let points = scores.get(participant_id).copied().unwrap_or(0.0);
        let class = AgeClassifier::from_config(&snapshot.config).classify_participant(participant);

        let (rank, field_size) = match class {
            Some(class) => {
                let table = class_table(&snapshot, &scores, league, class, &resolved);
                (find_rank(participant_id, &table.rows), table.rows.len())
            }
            None => (None, 0),
        };

        Ok(ParticipantStanding {
            participant_id: participant_id.clone(),
            league,
            class,
            class_label: class.map(ClassLabel::label),
            points,
            rank,
            field_size,
        })
    }

    /// Season-long table for the class, cut at the configured top N plus a seeded wildcard
    /// draw among participants with enough distinct venues inside the qualification window.
    pub fn qualifiers(
        &self,
        league: League,
        class: ClassLabel,
        seed: u64,
    ) -> Result<QualificationReport, StandingsError> {
        let snapshot = self.snapshot()?;
        let resolved = resolve_scope(&snapshot.config, &TimeScope::Overall)?;
        let scores = league_scores(&snapshot, league, resolved.range);
        let table = class_table(&snapshot, &scores, league, class, &resolved);

        let visits = self.repository.venue_visits()?;
        let window = snapshot.config.qualification_window;
        let visit_counts = count_distinct_venues(&visits, window);

        let selector = QualificationSelector::from_config(&snapshot.config);
        let outcome = selector.select(&table.rows, &visit_counts, seed);
        debug!(
            league = league.code(),
            class = %class,
            seed,
            direct = outcome.direct.len(),
            wildcard = outcome.wildcard.len(),
            pool = outcome.wildcard_pool,
            "qualifiers selected"
        );

        Ok(QualificationReport {
            league,
            class,
            class_label: class.label(),
            window,
            outcome,
        })
    }

    fn snapshot(&self) -> Result<SeasonSnapshot, StandingsError> {
        Ok(SeasonSnapshot {
            config: self.repository.season_config()?,
            participants: self.repository.participants()?,
            routes: route_index(&self.repository.routes()?),
            results: self.repository.results()?,
        })
    }
}

fn resolve_scope(
    config: &SeasonConfig,
    scope: &TimeScope,
) -> Result<ResolvedScope, StandingsError> {
    match scope {
        TimeScope::Overall => Ok(ResolvedScope {
            stage_key: None,
            range: config.qualification_window,
        }),
        TimeScope::Stage(key) => {
            let stages = resolve_stages(config);
            let stage = find_stage(&stages, key)
                .ok_or_else(|| StandingsError::UnknownStage(key.clone()))?;
            Ok(ResolvedScope {
                stage_key: Some(stage.key.clone()),
                range: Some(stage.range()),
            })
        }
        TimeScope::Range(range) => Ok(ResolvedScope {
            stage_key: None,
            range: Some(*range),
        }),
    }
}

fn league_scores(
    snapshot: &SeasonSnapshot,
    league: League,
    range: Option<DateRange>,
) -> ScoreMap {
    let sheet = score_sheet(&snapshot.results, &snapshot.routes, league, range);
    if !sheet.orphaned.is_empty() {
        warn!(
            league = league.code(),
            orphaned = sheet.orphaned.len(),
            first = %sheet.orphaned[0].0,
            "results reference unknown routes and were skipped"
        );
    }
    if !sheet.superseded.is_empty() {
        warn!(
            league = league.code(),
            superseded = sheet.superseded.len(),
            "duplicate participant/route results; last value kept"
        );
    }
    sheet.totals
}

fn class_table(
    snapshot: &SeasonSnapshot,
    scores: &ScoreMap,
    league: League,
    class: ClassLabel,
    scope: &ResolvedScope,
) -> RankingTable {
    let builder = RankingBuilder::new(AgeClassifier::from_config(&snapshot.config));
    let rows = builder.build(&snapshot.participants, scores, league, class);
    debug!(league = league.code(), class = %class, rows = rows.len(), "ranking built");

    RankingTable {
        league,
        class,
        class_label: class.label(),
        stage_key: scope.stage_key.clone(),
        range: scope.range,
        rows,
    }
}

/// Error raised by the standings service.
#[derive(Debug, thiserror::Error)]
pub enum StandingsError {
    #[error("unknown stage '{0}'")]
    UnknownStage(String),
    #[error("unknown participant '{0}'")]
    UnknownParticipant(ParticipantId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
