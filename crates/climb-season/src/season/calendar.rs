use super::config::SeasonConfig;
use super::domain::{DateRange, Stage};
use chrono::{Datelike, Month, Months, NaiveDate};

/// Stages in effect for the season: the operator override when present, otherwise one
/// stage per calendar month of the qualification window. No window means no stages.
pub fn resolve_stages(config: &SeasonConfig) -> Vec<Stage> {
    if let Some(stages) = config.stage_override() {
        return stages.to_vec();
    }

    match config.qualification_window {
        Some(window) => monthly_stages(window),
        None => Vec::new(),
    }
}

/// Splits `window` at month boundaries. Keys are `YYYY-MM`, labels `Stage i (Month)`.
pub fn monthly_stages(window: DateRange) -> Vec<Stage> {
    let mut stages = Vec::new();
    if window.is_empty() {
        return stages;
    }

    let mut cursor = window.start.with_day(1);
    while let Some(month_start) = cursor {
        if month_start > window.end {
            break;
        }

        let next_month = month_start.checked_add_months(Months::new(1));
        let month_end = next_month
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);

        let index = stages.len() + 1;
        stages.push(Stage {
            key: format!("{}-{:02}", month_start.year(), month_start.month()),
            label: format!("Stage {index} ({})", month_name(month_start)),
            start: month_start.max(window.start),
            end: month_end.min(window.end),
        });

        cursor = next_month;
    }

    stages
}

/// First stage whose range contains `date`. Overrides may overlap, so order decides.
pub fn stage_containing(stages: &[Stage], date: NaiveDate) -> Option<&Stage> {
    stages.iter().find(|stage| stage.range().contains(date))
}

pub fn find_stage<'a>(stages: &'a [Stage], key: &str) -> Option<&'a Stage> {
    stages.iter().find(|stage| stage.key == key)
}

fn month_name(date: NaiveDate) -> &'static str {
    u8::try_from(date.month())
        .ok()
        .and_then(|month| Month::try_from(month).ok())
        .map(|month| month.name())
        .unwrap_or("Unknown")
}
