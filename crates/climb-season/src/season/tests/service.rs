use super::common::*;
use std::sync::Arc;

use crate::season::domain::{AgeBand, ClassLabel, DateRange, Gender, League, ParticipantId};
use crate::season::repository::RepositoryError;
use crate::season::standings::{StandingsError, StandingsService, TimeScope};

const U15_W: ClassLabel = ClassLabel::new(AgeBand::Young, Gender::Female);
const UE15_W: ClassLabel = ClassLabel::new(AgeBand::Mid, Gender::Female);
const UE40_M: ClassLabel = ClassLabel::new(AgeBand::Senior, Gender::Male);

fn ids(rows: &[crate::season::domain::RankingRow]) -> Vec<&str> {
    rows.iter().map(|row| row.participant_id.0.as_str()).collect()
}

#[test]
fn thirteen_and_sixteen_year_olds_never_share_a_table() {
    let service = build_service();

    let young = service
        .ranking(League::Toprope, U15_W, &TimeScope::Overall)
        .expect("u15 table");
    assert_eq!(ids(&young.rows), vec!["a", "c"]);
    assert_eq!(young.rows[0].rank, 1);
    assert_eq!(young.rows[0].display_points, 13.5);
    assert_eq!(young.class_label, "U15 w");

    let mid = service
        .ranking(League::Toprope, UE15_W, &TimeScope::Overall)
        .expect("ue15 table");
    assert_eq!(ids(&mid.rows), vec!["b"]);
    assert_eq!(mid.rows[0].display_points, 20.0);
}

#[test]
fn repeated_route_keeps_latest_result() {
    let service = build_service();
    let table = service
        .ranking(League::Toprope, U15_W, &TimeScope::Overall)
        .expect("table");

    let c = table
        .rows
        .iter()
        .find(|row| row.participant_id.0 == "c")
        .expect("c ranked");
    assert_eq!(c.display_points, 3.0);
    assert_eq!(c.rank, 2);
}

#[test]
fn stage_scope_limits_results_to_the_month() {
    let service = build_service();
    let table = service
        .ranking(
            League::Toprope,
            U15_W,
            &TimeScope::Stage("2026-05".to_string()),
        )
        .expect("stage table");

    assert_eq!(table.stage_key.as_deref(), Some("2026-05"));
    assert_eq!(
        table.range,
        Some(DateRange::new(date(2026, 5, 1), date(2026, 5, 31)))
    );
    assert_eq!(ids(&table.rows), vec!["a", "c"]);
    assert_eq!(table.rows[0].display_points, 6.0);
    assert_eq!(table.rows[1].display_points, 0.0);
}

#[test]
fn explicit_range_scope_is_inclusive() {
    let service = build_service();
    let scope = TimeScope::Range(DateRange::new(date(2026, 6, 10), date(2026, 6, 20)));
    let table = service
        .ranking(League::Toprope, U15_W, &scope)
        .expect("range table");

    assert_eq!(table.rows[0].participant_id, ParticipantId::from("a"));
    assert_eq!(table.rows[0].display_points, 7.5);
    assert_eq!(table.rows[1].display_points, 3.0);
}

#[test]
fn unknown_stage_is_reported() {
    let service = build_service();
    let err = service
        .ranking(League::Toprope, U15_W, &TimeScope::Stage("2026-12".to_string()))
        .expect_err("unknown stage");
    assert!(matches!(err, StandingsError::UnknownStage(key) if key == "2026-12"));
}

#[test]
fn class_tables_cover_all_six_buckets_in_order() {
    let service = build_service();
    let tables = service
        .class_tables(League::Lead, &TimeScope::Overall)
        .expect("lead tables");

    let labels: Vec<_> = tables.iter().map(|table| table.class).collect();
    assert_eq!(labels, ClassLabel::ordered().to_vec());

    let seniors = tables
        .iter()
        .find(|table| table.class == UE40_M)
        .expect("senior table");
    assert_eq!(ids(&seniors.rows), vec!["d"]);
    assert_eq!(seniors.rows[0].display_points, 12.0);

    let populated = tables.iter().filter(|table| !table.rows.is_empty()).count();
    assert_eq!(populated, 1);
}

#[test]
fn standing_matches_class_table_rank() {
    let service = build_service();
    let standing = service
        .standing(&ParticipantId::from("c"), League::Toprope, &TimeScope::Overall)
        .expect("standing");

    assert_eq!(standing.class, Some(U15_W));
    assert_eq!(standing.class_label.as_deref(), Some("U15 w"));
    assert_eq!(standing.points, 3.0);
    assert_eq!(standing.rank, Some(2));
    assert_eq!(standing.field_size, 2);
}

#[test]
fn excluded_and_unclassifiable_participants_have_no_rank() {
    let service = build_service();

    let staff = service
        .standing(&ParticipantId::from("staff"), League::Toprope, &TimeScope::Overall)
        .expect("staff standing");
    assert!(staff.class.is_none());
    assert!(staff.rank.is_none());
    assert_eq!(staff.points, 10.0);

    let ghost = service
        .standing(&ParticipantId::from("ghost"), League::Toprope, &TimeScope::Overall)
        .expect("ghost standing");
    assert!(ghost.class.is_none());
    assert_eq!(ghost.field_size, 0);
}

#[test]
fn standing_for_unknown_participant_errors() {
    let service = build_service();
    let err = service
        .standing(&ParticipantId::from("zz"), League::Toprope, &TimeScope::Overall)
        .expect_err("unknown participant");
    assert!(matches!(err, StandingsError::UnknownParticipant(_)));
}

#[test]
fn current_stage_follows_today() {
    let service = build_service();
    assert_eq!(service.stages().expect("stages").len(), 5);

    let stage = service
        .current_stage(date(2026, 6, 15))
        .expect("lookup")
        .expect("inside window");
    assert_eq!(stage.key, "2026-06");
    assert_eq!(stage.label, "Stage 2 (June)");

    assert!(service
        .current_stage(date(2026, 10, 1))
        .expect("lookup")
        .is_none());
}

#[test]
fn qualifiers_take_top_n_then_draw_from_eligible_pool() {
    let service = build_service();
    let report = service
        .qualifiers(League::Toprope, U15_W, 7)
        .expect("qualifiers");

    assert_eq!(report.outcome.direct, vec![ParticipantId::from("a")]);
    assert_eq!(report.outcome.wildcard_pool, 1);
    assert_eq!(report.outcome.wildcard, vec![ParticipantId::from("c")]);
    assert_eq!(
        report.window,
        Some(DateRange::new(date(2026, 5, 1), date(2026, 9, 30)))
    );

    let replay = service
        .qualifiers(League::Toprope, U15_W, 7)
        .expect("replay");
    assert_eq!(replay.outcome, report.outcome);
}

#[test]
fn repository_failures_surface_as_errors() {
    let service = StandingsService::new(Arc::new(UnavailableRepository));
    let err = service
        .ranking(League::Toprope, U15_W, &TimeScope::Overall)
        .expect_err("store down");
    assert!(matches!(
        err,
        StandingsError::Repository(RepositoryError::Unavailable(_))
    ));
}

#[test]
fn configured_age_thresholds_move_participants_between_bands() {
    let mut repository = MemoryRepository::default();
    repository.config.young_class_max_age = 16;
    let service = StandingsService::new(Arc::new(repository));

    let young = service
        .ranking(League::Toprope, U15_W, &TimeScope::Overall)
        .expect("u15 table");
    assert_eq!(ids(&young.rows), vec!["b", "a", "c"]);
}
