use crate::season::domain::{
    ClimbResult, Gender, League, Participant, ParticipantId, ResultId, Route, RouteId, VenueId,
    VenueVisit,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// Row-level problem found while converting a CSV record into a domain value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub line: usize,
    pub message: String,
}

#[derive(Debug)]
pub(crate) enum ParseError {
    Csv(csv::Error),
    Field(FieldError),
}

impl From<csv::Error> for ParseError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

fn field_error(idx: usize, message: String) -> ParseError {
    // Header occupies line 1.
    ParseError::Field(FieldError {
        line: idx + 2,
        message,
    })
}

fn reader<R: Read>(source: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source)
}

#[derive(Debug, Deserialize)]
struct ParticipantRow {
    id: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    birth_date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    gender: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    league: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    role_excluded: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RouteRow {
    id: String,
    league: String,
}

#[derive(Debug, Deserialize)]
struct ResultRow {
    id: String,
    participant_id: String,
    route_id: String,
    points: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    is_flash: Option<String>,
    occurred_at: String,
}

#[derive(Debug, Deserialize)]
struct VisitRow {
    participant_id: String,
    venue_id: String,
    visited_on: String,
}

pub(crate) fn parse_participants<R: Read>(source: R) -> Result<Vec<Participant>, ParseError> {
    let mut participants = Vec::new();

    for (idx, record) in reader(source).deserialize::<ParticipantRow>().enumerate() {
        let row = record?;
        let birth_date = row
            .birth_date
            .as_deref()
            .map(|raw| parse_date(raw).ok_or_else(|| format!("invalid birth_date '{raw}'")))
            .transpose()
            .map_err(|message| field_error(idx, message))?;
        let gender = row
            .gender
            .as_deref()
            .map(str::parse::<Gender>)
            .transpose()
            .map_err(|err| field_error(idx, err.to_string()))?;
        let league = row
            .league
            .as_deref()
            .map(str::parse::<League>)
            .transpose()
            .map_err(|err| field_error(idx, err.to_string()))?;
        let role_excluded = parse_flag(row.role_excluded.as_deref())
            .map_err(|message| field_error(idx, message))?;

        participants.push(Participant {
            id: ParticipantId(row.id),
            birth_date,
            gender,
            league,
            role_excluded,
        });
    }

    Ok(participants)
}

pub(crate) fn parse_routes<R: Read>(source: R) -> Result<Vec<Route>, ParseError> {
    let mut routes = Vec::new();

    for (idx, record) in reader(source).deserialize::<RouteRow>().enumerate() {
        let row = record?;
        let league = row
            .league
            .parse::<League>()
            .map_err(|err| field_error(idx, err.to_string()))?;
        routes.push(Route {
            id: RouteId(row.id),
            league,
        });
    }

    Ok(routes)
}

pub(crate) fn parse_results<R: Read>(source: R) -> Result<Vec<ClimbResult>, ParseError> {
    let mut results = Vec::new();

    for (idx, record) in reader(source).deserialize::<ResultRow>().enumerate() {
        let row = record?;
        let points = row
            .points
            .parse::<f64>()
            .ok()
            .filter(|points| points.is_finite() && *points >= 0.0)
            .ok_or_else(|| {
                let message = format!("points must be a non-negative number, got '{}'", row.points);
                field_error(idx, message)
            })?;
        let is_flash =
            parse_flag(row.is_flash.as_deref()).map_err(|message| field_error(idx, message))?;
        let occurred_at = parse_datetime(&row.occurred_at).ok_or_else(|| {
            field_error(idx, format!("invalid occurred_at '{}'", row.occurred_at))
        })?;

        results.push(ClimbResult {
            id: ResultId(row.id),
            participant_id: ParticipantId(row.participant_id),
            route_id: RouteId(row.route_id),
            points,
            is_flash,
            occurred_at,
        });
    }

    Ok(results)
}

pub(crate) fn parse_visits<R: Read>(source: R) -> Result<Vec<VenueVisit>, ParseError> {
    let mut visits = Vec::new();

    for (idx, record) in reader(source).deserialize::<VisitRow>().enumerate() {
        let row = record?;
        let visited_on = parse_datetime(&row.visited_on)
            .map(|dt| dt.date())
            .ok_or_else(|| field_error(idx, format!("invalid visited_on '{}'", row.visited_on)))?;

        visits.push(VenueVisit {
            participant_id: ParticipantId(row.participant_id),
            venue_id: VenueId(row.venue_id),
            visited_on,
        });
    }

    Ok(visits)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_flag(value: Option<&str>) -> Result<bool, String> {
    match value.map(|raw| raw.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(raw) => match raw.as_str() {
            "true" | "1" | "yes" | "y" => Ok(true),
            "false" | "0" | "no" | "n" => Ok(false),
            _ => Err(format!("expected a boolean flag, got '{raw}'")),
        },
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    parse_date(trimmed).and_then(|date| date.and_hms_opt(0, 0, 0))
}
