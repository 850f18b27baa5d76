use super::config::SeasonConfig;
use super::domain::{DateRange, ParticipantId, RankingRow, VenueId, VenueVisit};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Distinct venues visited per participant.
pub type VisitCounts = HashMap<ParticipantId, usize>;

pub fn count_distinct_venues(visits: &[VenueVisit], range: Option<DateRange>) -> VisitCounts {
    let mut venues: HashMap<&ParticipantId, HashSet<&VenueId>> = HashMap::new();
    for visit in visits {
        if range.is_some_and(|range| !range.contains(visit.visited_on)) {
            continue;
        }
        venues
            .entry(&visit.participant_id)
            .or_default()
            .insert(&visit.venue_id);
    }

    venues
        .into_iter()
        .map(|(participant, venues)| (participant.clone(), venues.len()))
        .collect()
}

/// Direct qualifiers plus the replayable wildcard draw for one class table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualificationOutcome {
    pub seed: u64,
    pub direct: Vec<ParticipantId>,
    /// Wildcards in draw order.
    pub wildcard: Vec<ParticipantId>,
    pub wildcard_pool: usize,
}

/// Top-N cut plus a seeded lottery among the remaining participants with enough venue visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualificationSelector {
    pub top_n: usize,
    pub wildcard_count: usize,
    pub min_venues: usize,
}

impl QualificationSelector {
    pub fn from_config(config: &SeasonConfig) -> Self {
        Self {
            top_n: config.top_n_per_class,
            wildcard_count: config.wildcards_per_class,
            min_venues: config.wildcard_min_venues,
        }
    }

    pub fn select(
        &self,
        rows: &[RankingRow],
        visit_counts: &VisitCounts,
        seed: u64,
    ) -> QualificationOutcome {
        let direct: Vec<ParticipantId> = rows
            .iter()
            .take(self.top_n)
            .map(|row| row.participant_id.clone())
            .collect();

        // Pool keeps ranking order so the draw depends only on inputs and seed.
        let pool: Vec<&ParticipantId> = rows
            .iter()
            .skip(self.top_n)
            .map(|row| &row.participant_id)
            .filter(|participant| {
                visit_counts.get(*participant).copied().unwrap_or(0) >= self.min_venues
            })
            .collect();

        let amount = self.wildcard_count.min(pool.len());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let wildcard = rand::seq::index::sample(&mut rng, pool.len(), amount)
            .into_iter()
            .map(|idx| pool[idx].clone())
            .collect();

        QualificationOutcome {
            seed,
            direct,
            wildcard,
            wildcard_pool: pool.len(),
        }
    }
}

pub fn select_qualifiers(
    rows: &[RankingRow],
    visit_counts: &VisitCounts,
    top_n: usize,
    wildcard_count: usize,
    min_venues: usize,
    seed: u64,
) -> QualificationOutcome {
    QualificationSelector {
        top_n,
        wildcard_count,
        min_venues,
    }
    .select(rows, visit_counts, seed)
}
