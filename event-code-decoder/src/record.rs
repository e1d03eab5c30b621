//! Event records
//!
//! An [`EventRecord`] is the output of the interpreter. Records are built only
//! by [`crate::Interpreter`]; the single permitted mutation is attaching the
//! location of a play whose event type defers it.

use crate::types::{DecoderError, Location, Result, Subject, TeamNames};

/// Whether a deferred location has been supplied yet
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationState {
    /// Waiting for [`EventRecord::attach_location`]
    Pending,
    /// Location attached
    Complete(Location),
}

/// Secondary data carried by a record, determined by its event type
#[derive(Debug, Clone, PartialEq)]
pub enum Secondary {
    /// Event type carries no secondary data
    None,
    /// Custom display name of another subject
    Participant(String),
    /// Whether the goal was assisted
    Assist(bool),
    /// Location supplied after interpretation
    Location(LocationState),
}

/// A validated, decoded event
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    subject: Subject,
    subject_index: usize,
    teams: TeamNames,
    event: String,
    outcome: String,
    secondary: Secondary,
    timestamp: f64,
}

impl EventRecord {
    pub(crate) fn new(
        subject: Subject,
        subject_index: usize,
        teams: TeamNames,
        event: String,
        outcome: String,
        secondary: Secondary,
        timestamp: f64,
    ) -> Self {
        Self {
            subject,
            subject_index,
            teams,
            event,
            outcome,
            secondary,
            timestamp,
        }
    }

    /// Acting subject, with its custom display name
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    /// Roster slot of the acting subject at recording time
    pub fn subject_index(&self) -> usize {
        self.subject_index
    }

    /// Team names as configured when the code was interpreted
    pub fn teams(&self) -> &TeamNames {
        &self.teams
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn outcome(&self) -> &str {
        &self.outcome
    }

    pub fn secondary(&self) -> &Secondary {
        &self.secondary
    }

    /// Session elapsed time when the code was interpreted
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// Assist flag, for event types that carry one
    pub fn assisted(&self) -> Option<bool> {
        match self.secondary {
            Secondary::Assist(assisted) => Some(assisted),
            _ => None,
        }
    }

    /// Name of the other subject, for event types that reference one
    pub fn participant(&self) -> Option<&str> {
        match &self.secondary {
            Secondary::Participant(name) => Some(name),
            _ => None,
        }
    }

    /// Attached location, once complete
    pub fn location(&self) -> Option<Location> {
        match self.secondary {
            Secondary::Location(LocationState::Complete(location)) => Some(location),
            _ => None,
        }
    }

    /// True while a deferred location is still missing
    pub fn needs_secondary(&self) -> bool {
        matches!(self.secondary, Secondary::Location(LocationState::Pending))
    }

    /// Supply the deferred location. Valid exactly once, and only for event
    /// types that defer their location.
    pub fn attach_location(&mut self, location: Location) -> Result<()> {
        match self.secondary {
            Secondary::Location(LocationState::Pending) => {
                log::debug!("Attaching location {} to {}", location, self.event);
                self.secondary = Secondary::Location(LocationState::Complete(location));
                Ok(())
            }
            _ => Err(DecoderError::ImproperCompletion {
                event: self.event.clone(),
            }),
        }
    }

    /// Fail with `IncompleteRecord` if the record is still pending
    pub fn ensure_complete(&self) -> Result<()> {
        if self.needs_secondary() {
            return Err(DecoderError::IncompleteRecord {
                event: self.event.clone(),
            });
        }
        Ok(())
    }
}
