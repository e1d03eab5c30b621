//! Core types for the event code decoder library
//!
//! This module defines the session snapshot the interpreter reads from and the
//! error type shared by interpretation, completion and rendering. The snapshot
//! is copied into records at interpretation time - later changes to session
//! state never reach an already-built record.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Number of subject slots in a session (three per team)
pub const ROSTER_SIZE: usize = 6;

/// Subjects at indices below this value belong to the home roster
pub const HOME_ROSTER_SIZE: usize = 3;

/// Errors that can occur while interpreting, completing or rendering a record
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecoderError {
    #[error("Empty event code")]
    EmptyCode,

    #[error("Invalid event '{event}'")]
    UnknownEvent { event: char },

    /// `outcome` is `None` when the code stops after the event character
    #[error(
        "Invalid outcome {} for event {event}",
        .outcome.map_or_else(|| "(none given)".to_string(), |c| format!("'{}'", c))
    )]
    UnknownOutcome { outcome: Option<char>, event: String },

    #[error("Secondary for event {event} not found in event code '{code}'")]
    MissingSecondary { event: String, code: String },

    #[error("Invalid secondary player selection '{secondary}' for event {event}")]
    InvalidSecondaryFormat { secondary: char, event: String },

    #[error("Secondary player selection must be between 1 and 6 (got {index})")]
    SecondaryOutOfRange { index: u32 },

    #[error("Invalid secondary '{flag}' for event {event} (must be 'y' or 'n')")]
    InvalidAssistFlag { flag: char, event: String },

    #[error("Event {event} does not accept a location (already complete)")]
    ImproperCompletion { event: String },

    #[error("Event {event} is still waiting for its location")]
    IncompleteRecord { event: String },

    #[error("Invalid session snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Invalid event grammar: {0}")]
    InvalidGrammar(String),
}

impl DecoderError {
    /// True for mistakes in the typed code itself, which the operator can fix
    /// by re-entering the code. Everything else is a caller contract violation.
    pub fn is_input_error(&self) -> bool {
        !matches!(
            self,
            DecoderError::ImproperCompletion { .. }
                | DecoderError::IncompleteRecord { .. }
                | DecoderError::InvalidSnapshot(_)
                | DecoderError::InvalidGrammar(_)
        )
    }
}

/// A point on the field as reported by the live feed
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    #[serde(rename = "Z")]
    pub z: f64,
}

impl Location {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A participant in the session as seen by the live feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    /// Display name (the feed's name until overridden by a custom name)
    pub name: String,
    /// Boost amount at snapshot time
    pub boost: f64,
    /// Position at snapshot time
    pub location: Location,
}

impl Subject {
    pub fn new(name: impl Into<String>, boost: f64, location: Location) -> Self {
        Self {
            name: name.into(),
            boost,
            location,
        }
    }
}

/// The two custom team names, home first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamNames {
    pub home: String,
    pub away: String,
}

impl TeamNames {
    pub fn new(home: impl Into<String>, away: impl Into<String>) -> Self {
        Self {
            home: home.into(),
            away: away.into(),
        }
    }

    /// Build from a name list. Entries past the second are ignored.
    pub fn from_slice(names: &[String]) -> Result<Self> {
        match names {
            [home, away, ..] => Ok(Self::new(home.clone(), away.clone())),
            _ => Err(DecoderError::InvalidSnapshot(format!(
                "expected two team names, found {}",
                names.len()
            ))),
        }
    }

    /// Team names as (my team, opponent team) for the subject at `subject_index`
    pub fn oriented(&self, subject_index: usize) -> (&str, &str) {
        if subject_index < HOME_ROSTER_SIZE {
            (&self.home, &self.away)
        } else {
            (&self.away, &self.home)
        }
    }
}

/// Read-only view of session state at the moment a code is interpreted
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    subjects: Vec<Subject>,
    selected: usize,
    custom_names: Vec<String>,
    teams: TeamNames,
    elapsed: f64,
}

impl SessionSnapshot {
    /// Create a snapshot, checking that the selection and name lists line up
    /// with the roster.
    pub fn new(
        subjects: Vec<Subject>,
        selected: usize,
        custom_names: Vec<String>,
        teams: TeamNames,
        elapsed: f64,
    ) -> Result<Self> {
        if selected >= ROSTER_SIZE {
            return Err(DecoderError::InvalidSnapshot(format!(
                "selected subject {} outside 0..={}",
                selected,
                ROSTER_SIZE - 1
            )));
        }
        if selected >= subjects.len() {
            return Err(DecoderError::InvalidSnapshot(format!(
                "selected subject {} but feed only has {} subjects",
                selected,
                subjects.len()
            )));
        }
        if custom_names.len() < subjects.len().min(ROSTER_SIZE) {
            return Err(DecoderError::InvalidSnapshot(format!(
                "{} custom names for {} subjects",
                custom_names.len(),
                subjects.len()
            )));
        }

        Ok(Self {
            subjects,
            selected,
            custom_names,
            teams,
            elapsed,
        })
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn custom_names(&self) -> &[String] {
        &self.custom_names
    }

    pub fn teams(&self) -> &TeamNames {
        &self.teams
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// The selected subject with its display name replaced by the custom name
    pub fn acting_subject(&self) -> Subject {
        let mut subject = self.subjects[self.selected].clone();
        subject.name = self.custom_names[self.selected].clone();
        subject
    }

    /// Custom display name for a 0-based slot
    pub fn custom_name(&self, index: usize) -> Option<&str> {
        self.custom_names.get(index).map(String::as_str)
    }
}
