use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VenueId(pub String);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for RouteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "m")]
    Male,
    #[serde(rename = "w")]
    Female,
}

impl Gender {
    pub const fn ordered() -> [Self; 2] {
        [Self::Female, Self::Male]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Male => "m",
            Self::Female => "w",
        }
    }
}

impl FromStr for Gender {
    type Err = ParseLabelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "m" => Ok(Self::Male),
            "w" | "f" => Ok(Self::Female),
            other => Err(ParseLabelError::Gender(other.to_string())),
        }
    }
}

/// Competition discipline; results, rankings and classes are always scoped to one league.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum League {
    Toprope,
    Lead,
}

impl League {
    pub const fn ordered() -> [Self; 2] {
        [Self::Toprope, Self::Lead]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Toprope => "toprope",
            Self::Lead => "lead",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Toprope => "Toprope",
            Self::Lead => "Lead",
        }
    }
}

impl FromStr for League {
    type Err = ParseLabelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "toprope" => Ok(Self::Toprope),
            "lead" => Ok(Self::Lead),
            other => Err(ParseLabelError::League(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBand {
    Young,
    Mid,
    Senior,
}

impl AgeBand {
    pub const fn ordered() -> [Self; 3] {
        [Self::Young, Self::Mid, Self::Senior]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Young => "U15",
            Self::Mid => "Ü15",
            Self::Senior => "Ü40",
        }
    }

    const fn key(self) -> &'static str {
        match self {
            Self::Young => "u15",
            Self::Mid => "ue15",
            Self::Senior => "ue40",
        }
    }
}

/// One of the six gender × age-band buckets. Computed on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassLabel {
    pub band: AgeBand,
    pub gender: Gender,
}

impl ClassLabel {
    pub const fn new(band: AgeBand, gender: Gender) -> Self {
        Self { band, gender }
    }

    pub fn ordered() -> [Self; 6] {
        let mut labels = [Self::new(AgeBand::Young, Gender::Female); 6];
        let mut slot = 0;
        for band in AgeBand::ordered() {
            for gender in Gender::ordered() {
                labels[slot] = Self::new(band, gender);
                slot += 1;
            }
        }
        labels
    }

    /// Display form, e.g. `Ü15 w`.
    pub fn label(self) -> String {
        format!("{} {}", self.band.label(), self.gender.code())
    }

    /// URL/CLI-safe form, e.g. `ue15-w`.
    pub fn key(self) -> String {
        format!("{}-{}", self.band.key(), self.gender.code())
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.label())
    }
}

impl FromStr for ClassLabel {
    type Err = ParseLabelError;

    /// Accepts both the key (`u15-w`) and the display form (`U15 w`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase().replace(' ', "-");
        let (band, gender) = normalized
            .rsplit_once('-')
            .ok_or_else(|| ParseLabelError::Class(value.to_string()))?;

        let band = match band {
            "u15" => AgeBand::Young,
            "ue15" | "ü15" => AgeBand::Mid,
            "ue40" | "ü40" => AgeBand::Senior,
            _ => return Err(ParseLabelError::Class(value.to_string())),
        };
        let gender = gender
            .parse::<Gender>()
            .map_err(|_| ParseLabelError::Class(value.to_string()))?;

        Ok(Self::new(band, gender))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseLabelError {
    #[error("unknown gender '{0}' (expected m or w)")]
    Gender(String),
    #[error("unknown league '{0}' (expected toprope or lead)")]
    League(String),
    #[error("unknown class '{0}' (expected e.g. u15-w, ue15-m, ue40-w)")]
    Class(String),
}

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

/// Named sub-period of the qualification window. Overrides may overlap or be unordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub key: String,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Stage {
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start, self.end)
    }
}

/// Subset of a profile the engine needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub league: Option<League>,
    /// Administrative accounts; never classified or ranked.
    #[serde(default)]
    pub role_excluded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimbResult {
    pub id: ResultId,
    pub participant_id: ParticipantId,
    pub route_id: RouteId,
    pub points: f64,
    #[serde(default)]
    pub is_flash: bool,
    pub occurred_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteId,
    pub league: League,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueVisit {
    pub participant_id: ParticipantId,
    pub venue_id: VenueId,
    pub visited_on: NaiveDate,
}

/// Ephemeral ranking entry; recomputed whenever inputs or scope change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingRow {
    pub rank: usize,
    pub participant_id: ParticipantId,
    pub display_points: f64,
}
