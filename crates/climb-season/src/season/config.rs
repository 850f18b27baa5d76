use super::domain::{DateRange, Stage};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_YOUNG_CLASS_MAX_AGE: u32 = 14;
pub const DEFAULT_SENIOR_CLASS_MIN_AGE: u32 = 40;
pub const DEFAULT_TOP_N_PER_CLASS: usize = 30;
pub const DEFAULT_WILDCARDS_PER_CLASS: usize = 10;
pub const DEFAULT_WILDCARD_MIN_VENUES: usize = 3;

/// Operator-edited season settings. Owned by the host and passed into every engine call;
/// absent numeric fields fall back to the defaults above.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonConfig {
    pub season_year: String,
    #[serde(default)]
    pub qualification_window: Option<DateRange>,
    #[serde(default)]
    pub preparation_window: Option<DateRange>,
    #[serde(default)]
    pub finale_date: Option<NaiveDate>,
    #[serde(default)]
    pub finale_registration_deadline: Option<NaiveDate>,
    #[serde(default)]
    pub finale_enabled: bool,
    #[serde(default)]
    pub age_cutoff_date: Option<NaiveDate>,
    #[serde(default = "default_young_class_max_age")]
    pub young_class_max_age: u32,
    #[serde(default = "default_senior_class_min_age")]
    pub senior_class_min_age: u32,
    #[serde(default = "default_top_n_per_class")]
    pub top_n_per_class: usize,
    #[serde(default = "default_wildcards_per_class")]
    pub wildcards_per_class: usize,
    #[serde(default = "default_wildcard_min_venues")]
    pub wildcard_min_venues: usize,
    #[serde(default)]
    pub stages: Option<Vec<Stage>>,
}

impl SeasonConfig {
    pub fn new(season_year: impl Into<String>) -> Self {
        Self {
            season_year: season_year.into(),
            qualification_window: None,
            preparation_window: None,
            finale_date: None,
            finale_registration_deadline: None,
            finale_enabled: false,
            age_cutoff_date: None,
            young_class_max_age: DEFAULT_YOUNG_CLASS_MAX_AGE,
            senior_class_min_age: DEFAULT_SENIOR_CLASS_MIN_AGE,
            top_n_per_class: DEFAULT_TOP_N_PER_CLASS,
            wildcards_per_class: DEFAULT_WILDCARDS_PER_CLASS,
            wildcard_min_venues: DEFAULT_WILDCARD_MIN_VENUES,
            stages: None,
        }
    }

    pub fn with_qualification_window(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.qualification_window = Some(DateRange::new(start, end));
        self
    }

    /// Date on which ages are measured: the explicit cutoff, else the qualification start,
    /// else January 1st of `season_year`.
    pub fn age_cutoff(&self) -> Option<NaiveDate> {
        self.age_cutoff_date
            .or_else(|| self.qualification_window.map(|window| window.start))
            .or_else(|| {
                self.season_year
                    .trim()
                    .parse::<i32>()
                    .ok()
                    .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
            })
    }

    /// Explicit stage override, when one with at least one entry is configured.
    pub fn stage_override(&self) -> Option<&[Stage]> {
        self.stages
            .as_deref()
            .filter(|stages| !stages.is_empty())
    }

    pub fn finale_registration_open(&self, today: NaiveDate) -> bool {
        self.finale_enabled
            && self
                .finale_registration_deadline
                .map(|deadline| today <= deadline)
                .unwrap_or(true)
    }
}

fn default_young_class_max_age() -> u32 {
    DEFAULT_YOUNG_CLASS_MAX_AGE
}

fn default_senior_class_min_age() -> u32 {
    DEFAULT_SENIOR_CLASS_MIN_AGE
}

fn default_top_n_per_class() -> usize {
    DEFAULT_TOP_N_PER_CLASS
}

fn default_wildcards_per_class() -> usize {
    DEFAULT_WILDCARDS_PER_CLASS
}

fn default_wildcard_min_venues() -> usize {
    DEFAULT_WILDCARD_MIN_VENUES
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let config: SeasonConfig = serde_json::from_str(
            r#"{
                "season_year": "2026",
                "qualification_window": { "start": "2026-05-01", "end": "2026-09-13" }
            }"#,
        )
        .expect("config parses");

        assert_eq!(config.young_class_max_age, 14);
        assert_eq!(config.senior_class_min_age, 40);
        assert_eq!(config.top_n_per_class, 30);
        assert_eq!(config.wildcards_per_class, 10);
        assert_eq!(config.wildcard_min_venues, 3);
        assert!(config.stages.is_none());
        assert!(!config.finale_enabled);
        assert_eq!(
            config,
            SeasonConfig::new("2026").with_qualification_window(date(2026, 5, 1), date(2026, 9, 13))
        );
    }

    #[test]
    fn age_cutoff_prefers_explicit_date_then_window_then_year() {
        let mut config = SeasonConfig::new("2026");
        assert_eq!(config.age_cutoff(), Some(date(2026, 1, 1)));

        config = config.with_qualification_window(date(2026, 5, 1), date(2026, 9, 13));
        assert_eq!(config.age_cutoff(), Some(date(2026, 5, 1)));

        config.age_cutoff_date = Some(date(2026, 12, 31));
        assert_eq!(config.age_cutoff(), Some(date(2026, 12, 31)));

        let unnamed = SeasonConfig::new("summer");
        assert_eq!(unnamed.age_cutoff(), None);
    }

    #[test]
    fn empty_stage_override_is_ignored() {
        let mut config = SeasonConfig::new("2026");
        config.stages = Some(Vec::new());
        assert!(config.stage_override().is_none());
    }

    #[test]
    fn finale_registration_respects_toggle_and_deadline() {
        let mut config = SeasonConfig::new("2026");
        assert!(!config.finale_registration_open(date(2026, 9, 1)));

        config.finale_enabled = true;
        assert!(config.finale_registration_open(date(2026, 9, 1)));

        config.finale_registration_deadline = Some(date(2026, 9, 20));
        assert!(config.finale_registration_open(date(2026, 9, 20)));
        assert!(!config.finale_registration_open(date(2026, 9, 21)));
    }
}
