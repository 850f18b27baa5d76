use crate::infra::{parse_class, parse_date, parse_league, InMemorySeasonRepository};
use chrono::{Local, NaiveDate};
use clap::Args;
use climb_season::config::AppConfig;
use climb_season::error::AppError;
use climb_season::season::{
    ClassLabel, DateRange, League, ParticipantId, ParticipantStanding, QualificationReport,
    RankingTable, Stage, StandingsService, TimeScope,
};
use std::fmt::Write;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DataArgs {
    /// Directory holding season.json and the CSV exports (defaults to APP_DATA_DIR)
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ScopeArgs {
    /// Restrict to one stage by key (YYYY-MM)
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub(crate) stage: Option<String>,
    /// Start of a custom date range (YYYY-MM-DD), inclusive
    #[arg(long, requires = "to", value_parser = parse_date)]
    pub(crate) from: Option<NaiveDate>,
    /// End of a custom date range (YYYY-MM-DD), inclusive
    #[arg(long, requires = "from", value_parser = parse_date)]
    pub(crate) to: Option<NaiveDate>,
}

impl ScopeArgs {
    pub(crate) fn time_scope(&self) -> Result<TimeScope, AppError> {
        match (&self.stage, self.from, self.to) {
            (Some(stage), _, _) => Ok(TimeScope::Stage(stage.clone())),
            (None, Some(from), Some(to)) => {
                let range = DateRange::new(from, to);
                if range.is_empty() {
                    return Err(AppError::InvalidArgument(format!(
                        "range start {from} is after end {to}"
                    )));
                }
                Ok(TimeScope::Range(range))
            }
            _ => Ok(TimeScope::Overall),
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct StagesArgs {
    #[command(flatten)]
    pub(crate) data: DataArgs,
    /// Reporting date used to pick the current stage (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct RankingArgs {
    #[command(flatten)]
    pub(crate) data: DataArgs,
    /// League to rank (toprope or lead)
    #[arg(long, value_parser = parse_league)]
    pub(crate) league: League,
    /// Class key such as u15-w or ue40-m; omit to print all six tables
    #[arg(long, value_parser = parse_class)]
    pub(crate) class: Option<ClassLabel>,
    #[command(flatten)]
    pub(crate) scope: ScopeArgs,
}

#[derive(Args, Debug)]
pub(crate) struct StandingArgs {
    #[command(flatten)]
    pub(crate) data: DataArgs,
    /// Participant identifier as exported by the record store
    #[arg(long)]
    pub(crate) participant: String,
    /// League to evaluate (toprope or lead)
    #[arg(long, value_parser = parse_league)]
    pub(crate) league: League,
    #[command(flatten)]
    pub(crate) scope: ScopeArgs,
}

#[derive(Args, Debug)]
pub(crate) struct QualifiersArgs {
    #[command(flatten)]
    pub(crate) data: DataArgs,
    /// League to draw from (toprope or lead)
    #[arg(long, value_parser = parse_league)]
    pub(crate) league: League,
    /// Class key such as u15-w or ue40-m
    #[arg(long, value_parser = parse_class)]
    pub(crate) class: ClassLabel,
    /// Lottery seed; the same seed and records always draw the same wildcards
    #[arg(long)]
    pub(crate) seed: u64,
}

fn load_service(
    data: DataArgs,
) -> Result<StandingsService<InMemorySeasonRepository>, AppError> {
    let data_dir = match data.data_dir {
        Some(dir) => dir,
        None => AppConfig::load()?.store.data_dir,
    };
    let repository = InMemorySeasonRepository::load(&data_dir)?;
    Ok(StandingsService::new(Arc::new(repository)))
}

pub(crate) fn run_stages(args: StagesArgs) -> Result<(), AppError> {
    let service = load_service(args.data)?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let stages = service.stages()?;
    let current = service.current_stage(today)?;

    print!("{}", render_stages(&stages, current.as_ref(), today));
    Ok(())
}

pub(crate) fn run_ranking(args: RankingArgs) -> Result<(), AppError> {
    let scope = args.scope.time_scope()?;
    let service = load_service(args.data)?;

    let tables = match args.class {
        Some(class) => vec![service.ranking(args.league, class, &scope)?],
        None => service.class_tables(args.league, &scope)?,
    };
    for table in &tables {
        print!("{}", render_table(table));
    }
    Ok(())
}

pub(crate) fn run_standing(args: StandingArgs) -> Result<(), AppError> {
    let scope = args.scope.time_scope()?;
    let service = load_service(args.data)?;
    let standing = service.standing(&ParticipantId(args.participant), args.league, &scope)?;

    print!("{}", render_standing(&standing));
    Ok(())
}

pub(crate) fn run_qualifiers(args: QualifiersArgs) -> Result<(), AppError> {
    let service = load_service(args.data)?;
    let report = service.qualifiers(args.league, args.class, args.seed)?;

    print!("{}", render_qualifiers(&report));
    Ok(())
}

// Writing into a String is infallible.

pub(crate) fn render_stages(
    stages: &[Stage],
    current: Option<&Stage>,
    today: NaiveDate,
) -> String {
    let mut out = String::new();
    if stages.is_empty() {
        let _ = writeln!(out, "No stages configured (qualification window missing)");
        return out;
    }

    let _ = writeln!(out, "Stages as of {today}");
    for stage in stages {
        let marker = if current.map(|c| c.key == stage.key).unwrap_or(false) {
            "*"
        } else {
            " "
        };
        let _ = writeln!(
            out,
            "{marker} {:<8} {:<20} {} .. {}",
            stage.key, stage.label, stage.start, stage.end
        );
    }
    out
}

pub(crate) fn render_table(table: &RankingTable) -> String {
    let mut out = String::new();
    let scope = match (&table.stage_key, &table.range) {
        (Some(key), _) => format!("stage {key}"),
        (None, Some(range)) => format!("{} .. {}", range.start, range.end),
        (None, None) => "all results".to_string(),
    };
    let _ = writeln!(
        out,
        "{} / {} ({scope})",
        table.league.label(),
        table.class_label
    );

    if table.rows.is_empty() {
        let _ = writeln!(out, "  no participants");
    }
    for row in &table.rows {
        let _ = writeln!(
            out,
            "  {:>3}. {:<20} {:>7.1}",
            row.rank, row.participant_id, row.display_points
        );
    }
    out
}

pub(crate) fn render_standing(standing: &ParticipantStanding) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} in {}",
        standing.participant_id,
        standing.league.label()
    );
    let _ = writeln!(out, "  points: {:.1}", standing.points);
    match (&standing.class_label, standing.rank) {
        (Some(label), Some(rank)) => {
            let _ = writeln!(out, "  class:  {label}");
            let _ = writeln!(out, "  rank:   {rank} of {}", standing.field_size);
        }
        (Some(label), None) => {
            let _ = writeln!(out, "  class:  {label} (not listed in this league)");
        }
        (None, _) => {
            let _ = writeln!(out, "  class:  unclassified");
        }
    }
    out
}

pub(crate) fn render_qualifiers(report: &QualificationReport) -> String {
    let mut out = String::new();
    let outcome = &report.outcome;
    let _ = writeln!(
        out,
        "Finale qualifiers {} / {} (seed {})",
        report.league.label(),
        report.class_label,
        outcome.seed
    );

    let _ = writeln!(out, "  direct ({}):", outcome.direct.len());
    for participant in &outcome.direct {
        let _ = writeln!(out, "    {participant}");
    }
    let _ = writeln!(
        out,
        "  wildcards ({} drawn from {} eligible):",
        outcome.wildcard.len(),
        outcome.wildcard_pool
    );
    for participant in &outcome.wildcard {
        let _ = writeln!(out, "    {participant}");
    }
    out
}
