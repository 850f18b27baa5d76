//! Loads season records from a directory of CSV exports plus `season.json`.

mod parser;

pub use parser::FieldError;

use crate::season::config::SeasonConfig;
use crate::season::domain::{ClimbResult, Participant, Route, VenueVisit};
use crate::season::scoring::{route_index, RouteIndex};
use parser::ParseError;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const SEASON_FILE: &str = "season.json";
pub const PARTICIPANTS_FILE: &str = "participants.csv";
pub const ROUTES_FILE: &str = "routes.csv";
pub const RESULTS_FILE: &str = "results.csv";
pub const VISITS_FILE: &str = "visits.csv";

#[derive(Debug)]
pub enum RecordImportError {
    Io { file: String, source: std::io::Error },
    Csv { file: String, source: csv::Error },
    Json { file: String, source: serde_json::Error },
    InvalidField { file: String, field: FieldError },
}

impl RecordImportError {
    fn from_parse(file: &str, err: ParseError) -> Self {
        match err {
            ParseError::Csv(source) => Self::Csv {
                file: file.to_string(),
                source,
            },
            ParseError::Field(field) => Self::InvalidField {
                file: file.to_string(),
                field,
            },
        }
    }
}

impl std::fmt::Display for RecordImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordImportError::Io { file, source } => {
                write!(f, "failed to read {}: {}", file, source)
            }
            RecordImportError::Csv { file, source } => {
                write!(f, "invalid CSV data in {}: {}", file, source)
            }
            RecordImportError::Json { file, source } => {
                write!(f, "invalid season configuration in {}: {}", file, source)
            }
            RecordImportError::InvalidField { file, field } => {
                write!(f, "{} line {}: {}", file, field.line, field.message)
            }
        }
    }
}

impl std::error::Error for RecordImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RecordImportError::Io { source, .. } => Some(source),
            RecordImportError::Csv { source, .. } => Some(source),
            RecordImportError::Json { source, .. } => Some(source),
            RecordImportError::InvalidField { .. } => None,
        }
    }
}

/// Everything the engine consumes for one season, as exported by the record store.
#[derive(Debug, Clone)]
pub struct SeasonRecords {
    pub config: SeasonConfig,
    pub participants: Vec<Participant>,
    pub routes: Vec<Route>,
    pub results: Vec<ClimbResult>,
    pub visits: Vec<VenueVisit>,
}

impl SeasonRecords {
    /// Reads the season files from `dir`. `visits.csv` is optional; the others are required.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, RecordImportError> {
        let dir = dir.as_ref();
        let visits = match open(dir, VISITS_FILE) {
            Ok(file) => parse_visits(file)?,
            Err(RecordImportError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Vec::new()
            }
            Err(err) => return Err(err),
        };

        Ok(Self {
            config: parse_config(open(dir, SEASON_FILE)?)?,
            participants: parse_participants(open(dir, PARTICIPANTS_FILE)?)?,
            routes: parse_routes(open(dir, ROUTES_FILE)?)?,
            results: parse_results(open(dir, RESULTS_FILE)?)?,
            visits,
        })
    }

    pub fn route_index(&self) -> RouteIndex {
        route_index(&self.routes)
    }
}

fn open(dir: &Path, name: &str) -> Result<File, RecordImportError> {
    File::open(dir.join(name)).map_err(|source| RecordImportError::Io {
        file: name.to_string(),
        source,
    })
}

pub fn parse_config<R: Read>(reader: R) -> Result<SeasonConfig, RecordImportError> {
    serde_json::from_reader(reader).map_err(|source| RecordImportError::Json {
        file: SEASON_FILE.to_string(),
        source,
    })
}

pub fn parse_participants<R: Read>(reader: R) -> Result<Vec<Participant>, RecordImportError> {
    parser::parse_participants(reader)
        .map_err(|err| RecordImportError::from_parse(PARTICIPANTS_FILE, err))
}

pub fn parse_routes<R: Read>(reader: R) -> Result<Vec<Route>, RecordImportError> {
    parser::parse_routes(reader).map_err(|err| RecordImportError::from_parse(ROUTES_FILE, err))
}

pub fn parse_results<R: Read>(reader: R) -> Result<Vec<ClimbResult>, RecordImportError> {
    parser::parse_results(reader).map_err(|err| RecordImportError::from_parse(RESULTS_FILE, err))
}

pub fn parse_visits<R: Read>(reader: R) -> Result<Vec<VenueVisit>, RecordImportError> {
    parser::parse_visits(reader).map_err(|err| RecordImportError::from_parse(VISITS_FILE, err))
}
