use super::domain::{ClimbResult, DateRange, League, ParticipantId, ResultId, Route, RouteId};
use std::collections::HashMap;

/// Flat bonus added once per counted flash.
pub const FLASH_BONUS: f64 = 1.0;

/// Per-participant totals. Participants without qualifying results are absent; read
/// missing entries as zero.
pub type ScoreMap = HashMap<ParticipantId, f64>;

/// Route id to league lookup used to scope results.
pub type RouteIndex = HashMap<RouteId, League>;

pub fn route_index(routes: &[Route]) -> RouteIndex {
    routes
        .iter()
        .map(|route| (route.id.clone(), route.league))
        .collect()
}

pub fn contribution(result: &ClimbResult) -> f64 {
    if result.is_flash {
        result.points + FLASH_BONUS
    } else {
        result.points
    }
}

/// Aggregation output with the bookkeeping a host needs to report data-integrity issues.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreSheet {
    pub totals: ScoreMap,
    /// Results whose route is missing from the index; excluded from every league.
    pub orphaned: Vec<ResultId>,
    /// Earlier duplicates of a (participant, route) pair replaced by a later result.
    pub superseded: Vec<ResultId>,
    pub counted: usize,
}

pub fn aggregate(
    results: &[ClimbResult],
    routes: &RouteIndex,
    league: League,
    range: Option<DateRange>,
) -> ScoreMap {
    score_sheet(results, routes, league, range).totals
}

/// Filters by league and optional inclusive date range, keeps the last result per
/// (participant, route) and sums contributions in input order.
pub fn score_sheet(
    results: &[ClimbResult],
    routes: &RouteIndex,
    league: League,
    range: Option<DateRange>,
) -> ScoreSheet {
    let mut sheet = ScoreSheet::default();
    let mut latest: HashMap<(&ParticipantId, &RouteId), usize> = HashMap::new();
    let mut eligible = Vec::new();

    for (idx, result) in results.iter().enumerate() {
        match routes.get(&result.route_id) {
            None => {
                sheet.orphaned.push(result.id.clone());
                continue;
            }
            Some(route_league) if *route_league != league => continue,
            Some(_) => {}
        }

        if let Some(range) = range {
            if !range.contains(result.occurred_at.date()) {
                continue;
            }
        }

        latest.insert((&result.participant_id, &result.route_id), idx);
        eligible.push(idx);
    }

    for idx in eligible {
        let result = &results[idx];
        let key = (&result.participant_id, &result.route_id);
        if latest.get(&key) != Some(&idx) {
            sheet.superseded.push(result.id.clone());
            continue;
        }

        *sheet
            .totals
            .entry(result.participant_id.clone())
            .or_insert(0.0) += contribution(result);
        sheet.counted += 1;
    }

    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn routes() -> RouteIndex {
        route_index(&[
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
        ])
    }

    fn result(
        id: &str,
        participant: &str,
        route: &str,
        points: f64,
        flash: bool,
        on: NaiveDate,
    ) -> ClimbResult {
        ClimbResult {
            id: ResultId(id.to_string()),
            participant_id: ParticipantId::from(participant),
            route_id: RouteId::from(route),
            points,
            is_flash: flash,
            occurred_at: on.and_hms_opt(18, 30, 0).expect("valid time"),
        }
    }

    #[test]
    fn flash_bonus_is_additive_not_multiplicative() {
        let results = [result("r1", "a", "tr-1", 5.0, true, date(2026, 5, 3))];
        let totals = aggregate(&results, &routes(), League::Toprope, None);
        assert_eq!(totals.get(&ParticipantId::from("a")), Some(&6.0));
    }

    #[test]
    fn results_are_scoped_to_the_requested_league() {
        let results = [
            result("r1", "a", "tr-1", 4.0, false, date(2026, 5, 3)),
            result("r2", "a", "ld-1", 7.0, false, date(2026, 5, 3)),
            result("r3", "b", "ld-1", 9.0, true, date(2026, 5, 4)),
        ];

        let toprope = aggregate(&results, &routes(), League::Toprope, None);
        assert_eq!(toprope.get(&ParticipantId::from("a")), Some(&4.0));
        assert!(!toprope.contains_key(&ParticipantId::from("b")));

        let lead = aggregate(&results, &routes(), League::Lead, None);
        assert_eq!(lead.get(&ParticipantId::from("a")), Some(&7.0));
        assert_eq!(lead.get(&ParticipantId::from("b")), Some(&10.0));
    }

    #[test]
    fn date_range_is_inclusive() {
        let results = [
            result("r1", "a", "tr-1", 1.0, false, date(2026, 4, 30)),
            result("r2", "a", "tr-2", 2.0, false, date(2026, 5, 1)),
            result("r3", "b", "tr-1", 3.0, false, date(2026, 5, 31)),
            result("r4", "b", "tr-2", 4.0, false, date(2026, 6, 1)),
        ];
        let may = DateRange::new(date(2026, 5, 1), date(2026, 5, 31));

        let totals = aggregate(&results, &routes(), League::Toprope, Some(may));
        assert_eq!(totals.get(&ParticipantId::from("a")), Some(&2.0));
        assert_eq!(totals.get(&ParticipantId::from("b")), Some(&3.0));
    }

    #[test]
    fn duplicate_route_results_keep_the_last_value() {
        let results = [
            result("r1", "a", "tr-1", 8.0, true, date(2026, 5, 3)),
            result("r2", "a", "tr-2", 2.0, false, date(2026, 5, 3)),
            result("r3", "a", "tr-1", 5.0, false, date(2026, 5, 9)),
        ];

        let sheet = score_sheet(&results, &routes(), League::Toprope, None);
        assert_eq!(sheet.totals.get(&ParticipantId::from("a")), Some(&7.0));
        assert_eq!(sheet.superseded, vec![ResultId("r1".to_string())]);
        assert_eq!(sheet.counted, 2);
    }

    #[test]
    fn orphaned_results_are_reported_and_skipped() {
        let results = [
            result("r1", "a", "gone", 10.0, false, date(2026, 5, 3)),
            result("r2", "a", "tr-1", 3.0, false, date(2026, 5, 3)),
        ];

        let sheet = score_sheet(&results, &routes(), League::Toprope, None);
        assert_eq!(sheet.orphaned, vec![ResultId("r1".to_string())]);
        assert_eq!(sheet.totals.get(&ParticipantId::from("a")), Some(&3.0));
    }

    #[test]
    fn participants_without_results_are_absent() {
        let totals = aggregate(&[], &routes(), League::Lead, None);
        assert!(totals.is_empty());
    }

    #[test]
    fn partitioned_ranges_sum_to_the_union() {
        let results = [
            result("r1", "a", "tr-1", 3.5, true, date(2026, 5, 3)),
            result("r2", "a", "tr-2", 2.0, false, date(2026, 6, 12)),
            result("r3", "b", "tr-1", 6.0, false, date(2026, 6, 30)),
            result("r4", "b", "tr-2", 1.5, true, date(2026, 7, 1)),
            result("r5", "c", "tr-2", 4.0, false, date(2026, 8, 1)),
        ];
        let index = routes();
        let parts = [
            DateRange::new(date(2026, 5, 1), date(2026, 5, 31)),
            DateRange::new(date(2026, 6, 1), date(2026, 6, 30)),
            DateRange::new(date(2026, 7, 1), date(2026, 7, 31)),
        ];
        let union = DateRange::new(date(2026, 5, 1), date(2026, 7, 31));

        let mut summed = ScoreMap::new();
        for part in parts {
            for (participant, points) in aggregate(&results, &index, League::Toprope, Some(part)) {
                *summed.entry(participant).or_insert(0.0) += points;
            }
        }

        assert_eq!(summed, aggregate(&results, &index, League::Toprope, Some(union)));
        assert!(!summed.contains_key(&ParticipantId::from("c")));
    }
}
