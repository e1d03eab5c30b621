//! Record rendering
//!
//! Projects completed records into the two export shapes: a structured object
//! for JSON-style consumers and a flat positional row for spreadsheets. Team
//! names come from the record, as captured at interpretation time, and are
//! oriented by the subject's roster slot: home slots (0-2) keep the configured
//! order, away slots (3-5) swap it.

use crate::record::{EventRecord, Secondary};
use crate::types::{Location, Result, Subject};
use serde::Serialize;
use std::fmt;

/// Column names of [`FlatRow`], in order
pub const FLAT_HEADER: [&str; FLAT_COLUMNS] = [
    "Team",
    "Opponent Team",
    "Player",
    "Boost",
    "X of player",
    "Y of player",
    "Z of player",
    "Event",
    "Outcome",
    "Secondary Player",
    "Secondary X",
    "Secondary Y",
    "Secondary Z",
    "Assisted",
    "Timestamp",
];

/// Number of cells in a flat row
pub const FLAT_COLUMNS: usize = 15;

/// Secondary data as exported in the structured shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StructuredSecondary {
    Participant(String),
    Location(Location),
}

/// Structured export shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredRecord {
    pub my_team_name: String,
    pub opponent_team_name: String,
    pub player: Subject,
    pub event: String,
    pub outcome: String,
    pub secondary: Option<StructuredSecondary>,
    pub assisted: Option<bool>,
    pub timestamp: f64,
}

/// A single value in a flat row
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
    /// No value for this column; `null` in JSON, blank in CSV
    Empty,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(v) => write!(f, "{}", v),
            Cell::Number(v) => write!(f, "{}", v),
            Cell::Empty => Ok(()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// Flat export shape; see [`FLAT_HEADER`] for the column order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FlatRow(pub Vec<Cell>);

impl FlatRow {
    pub fn cells(&self) -> &[Cell] {
        &self.0
    }

    /// Cells as strings, for CSV writers
    pub fn fields(&self) -> Vec<String> {
        self.0.iter().map(Cell::to_string).collect()
    }
}

/// Renders records into the export shapes. Holds no session state; everything
/// a row needs is carried by the record.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Render the structured shape. Fails with `IncompleteRecord` while the
    /// record still waits for its location.
    pub fn structured(&self, record: &EventRecord) -> Result<StructuredRecord> {
        record.ensure_complete()?;

        let (my_team, opponent) = record.teams().oriented(record.subject_index());
        let secondary = match record.secondary() {
            Secondary::Participant(name) => Some(StructuredSecondary::Participant(name.clone())),
            Secondary::Location(_) => record.location().map(StructuredSecondary::Location),
            Secondary::None | Secondary::Assist(_) => None,
        };

        Ok(StructuredRecord {
            my_team_name: my_team.to_string(),
            opponent_team_name: opponent.to_string(),
            player: record.subject().clone(),
            event: record.event().to_string(),
            outcome: record.outcome().to_string(),
            secondary,
            assisted: record.assisted(),
            timestamp: record.timestamp(),
        })
    }

    /// Render the flat shape. Fails with `IncompleteRecord` while the record
    /// still waits for its location.
    pub fn flat(&self, record: &EventRecord) -> Result<FlatRow> {
        record.ensure_complete()?;

        let (my_team, opponent) = record.teams().oriented(record.subject_index());
        let subject = record.subject();

        let secondary: [Cell; 4] = match (record.secondary(), record.location()) {
            (Secondary::Location(_), Some(at)) => {
                [Cell::Empty, at.x.into(), at.y.into(), at.z.into()]
            }
            (Secondary::Participant(name), _) => {
                [name.as_str().into(), Cell::Empty, Cell::Empty, Cell::Empty]
            }
            _ => [Cell::Empty, Cell::Empty, Cell::Empty, Cell::Empty],
        };

        let mut cells: Vec<Cell> = Vec::with_capacity(FLAT_COLUMNS);
        cells.push(my_team.into());
        cells.push(opponent.into());
        cells.push(subject.name.as_str().into());
        cells.push(subject.boost.into());
        cells.push(subject.location.x.into());
        cells.push(subject.location.y.into());
        cells.push(subject.location.z.into());
        cells.push(record.event().into());
        cells.push(record.outcome().into());
        cells.extend(secondary);
        let assisted: f64 = if record.assisted().unwrap_or(false) { 1.0 } else { 0.0 };
        cells.push(assisted.into());
        cells.push(record.timestamp().into());

        log::debug!("Rendered flat row for {} at {}", record.event(), record.timestamp());
        Ok(FlatRow(cells))
    }
}
