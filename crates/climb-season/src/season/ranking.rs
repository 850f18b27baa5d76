use super::classifier::AgeClassifier;
use super::domain::{ClassLabel, League, Participant, ParticipantId, RankingRow};
use super::scoring::ScoreMap;

/// Builds the ranked table for one (league, class) pair.
#[derive(Debug, Clone, Copy)]
pub struct RankingBuilder {
    classifier: AgeClassifier,
}

impl RankingBuilder {
    pub fn new(classifier: AgeClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &AgeClassifier {
        &self.classifier
    }

    /// Keeps non-administrative participants of `league` whose class is `class`, ranks
    /// them by total descending. Ties keep their input order and take adjacent ranks.
    pub fn build(
        &self,
        participants: &[Participant],
        scores: &ScoreMap,
        league: League,
        class: ClassLabel,
    ) -> Vec<RankingRow> {
        let mut entries: Vec<(&ParticipantId, f64)> = participants
            .iter()
            .filter(|participant| participant.league == Some(league))
            .filter(|participant| self.classifier.classify_participant(participant) == Some(class))
            .map(|participant| {
                let total = scores.get(&participant.id).copied().unwrap_or(0.0);
                (&participant.id, total)
            })
            .collect();

        // `sort_by` is stable; equal totals stay in participant order.
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));

        entries
            .into_iter()
            .enumerate()
            .map(|(idx, (participant_id, total))| RankingRow {
                rank: idx + 1,
                participant_id: participant_id.clone(),
                display_points: total,
            })
            .collect()
    }
}

/// Rank held by `participant_id`, or `None` when they are not in the table.
pub fn find_rank(participant_id: &ParticipantId, rows: &[RankingRow]) -> Option<usize> {
    rows.iter()
        .find(|row| &row.participant_id == participant_id)
        .map(|row| row.rank)
}
