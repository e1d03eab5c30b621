//! Event grammar
//!
//! Maps event identifier characters to event names, and (event, outcome)
//! identifier pairs to outcome names. Each event also declares what the third
//! code position must carry. The built-in grammar is created once per process
//! and shared read-only; replacement grammars are validated when built.

use crate::types::{DecoderError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// What the third code position carries for an event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecondaryRequirement {
    /// Nothing; extra characters are ignored
    #[default]
    None,
    /// 1-based index of another subject (1-6)
    Participant,
    /// 'y' or 'n'
    Assist,
    /// Not in the code; a location is attached after interpretation
    Location,
}

impl fmt::Display for SecondaryRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecondaryRequirement::None => write!(f, "none"),
            SecondaryRequirement::Participant => write!(f, "participant"),
            SecondaryRequirement::Assist => write!(f, "assist"),
            SecondaryRequirement::Location => write!(f, "location"),
        }
    }
}

/// An outcome of an event type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeDefinition {
    pub id: char,
    pub name: String,
}

/// A single event type in the grammar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDefinition {
    /// Identifier character (first code position)
    pub id: char,
    /// Human-readable event name
    pub name: String,
    /// Third-position handling
    #[serde(default)]
    pub secondary: SecondaryRequirement,
    /// Outcomes accepted in the second code position
    pub outcomes: Vec<OutcomeDefinition>,
}

impl EventDefinition {
    /// Look up an outcome name by identifier
    pub fn outcome(&self, id: char) -> Option<&str> {
        self.outcomes
            .iter()
            .find(|o| o.id == id)
            .map(|o| o.name.as_str())
    }
}

/// Statistics about a grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrammarStats {
    pub num_events: usize,
    pub num_outcomes: usize,
}

/// Immutable event/outcome lookup table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventGrammar {
    events: BTreeMap<char, EventDefinition>,
}

static STANDARD: Lazy<EventGrammar> = Lazy::new(|| EventGrammar {
    events: standard_definitions()
        .into_iter()
        .map(|definition| (definition.id, definition))
        .collect(),
});

fn event(
    id: char,
    name: &str,
    secondary: SecondaryRequirement,
    outcomes: &[(char, &str)],
) -> EventDefinition {
    EventDefinition {
        id,
        name: name.to_string(),
        secondary,
        outcomes: outcomes
            .iter()
            .map(|&(id, name)| OutcomeDefinition {
                id,
                name: name.to_string(),
            })
            .collect(),
    }
}

fn standard_definitions() -> Vec<EventDefinition> {
    use SecondaryRequirement::{Assist, Location, Participant};

    vec![
        event(
            'c',
            "Challenge (50/50)",
            Participant,
            &[('w', "Won"), ('l', "Lost"), ('s', "Stalemate")],
        ),
        event(
            'g',
            "Goal",
            Assist,
            &[
                ('a', "Aerial"),
                ('g', "Ground"),
                ('d', "Dribble"),
                ('r', "Rebound"),
                ('o', "Own goal"),
            ],
        ),
        event(
            'u',
            "Uncontested play",
            Location,
            &[('p', "Pass"), ('d', "Dribble"), ('c', "Clear"), ('s', "Shot")],
        ),
        event(
            'k',
            "Kickoff",
            SecondaryRequirement::None,
            &[('w', "Won"), ('l', "Lost"), ('n', "Neutral")],
        ),
        event(
            's',
            "Shot",
            SecondaryRequirement::None,
            &[('o', "On target"), ('x', "Off target"), ('b', "Blocked")],
        ),
        event(
            'v',
            "Save",
            SecondaryRequirement::None,
            &[('a', "Aerial"), ('g', "Ground"), ('e', "Epic")],
        ),
        event(
            'd',
            "Demolition",
            SecondaryRequirement::None,
            &[('s', "Successful"), ('f', "Failed")],
        ),
    ]
}

impl EventGrammar {
    /// The built-in grammar
    pub fn standard() -> &'static EventGrammar {
        &STANDARD
    }

    /// Build a grammar from event definitions.
    ///
    /// Identifiers must be lowercase single characters (codes are lowercased
    /// before lookup), unique per level, and every event needs at least one
    /// outcome.
    pub fn from_definitions(definitions: Vec<EventDefinition>) -> Result<Self> {
        let mut events = BTreeMap::new();

        for definition in definitions {
            check_identifier(definition.id, &definition.name)?;

            if definition.outcomes.is_empty() {
                return Err(DecoderError::InvalidGrammar(format!(
                    "event '{}' ({}) has no outcomes",
                    definition.id, definition.name
                )));
            }

            let mut seen = HashSet::new();
            for outcome in &definition.outcomes {
                check_identifier(outcome.id, &outcome.name)?;
                if !seen.insert(outcome.id) {
                    return Err(DecoderError::InvalidGrammar(format!(
                        "duplicate outcome '{}' for event {}",
                        outcome.id, definition.name
                    )));
                }
            }

            if let Some(previous) = events.insert(definition.id, definition) {
                return Err(DecoderError::InvalidGrammar(format!(
                    "duplicate event identifier '{}'",
                    previous.id
                )));
            }
        }

        if events.is_empty() {
            return Err(DecoderError::InvalidGrammar("no events defined".to_string()));
        }

        log::debug!("Event grammar built with {} events", events.len());
        Ok(Self { events })
    }

    /// Look up an event definition by identifier
    pub fn event(&self, id: char) -> Option<&EventDefinition> {
        self.events.get(&id)
    }

    /// Look up an outcome name for an event
    pub fn outcome(&self, event: char, outcome: char) -> Option<&str> {
        self.event(event).and_then(|e| e.outcome(outcome))
    }

    /// All event definitions, ordered by identifier
    pub fn events(&self) -> impl Iterator<Item = &EventDefinition> {
        self.events.values()
    }

    pub fn stats(&self) -> GrammarStats {
        GrammarStats {
            num_events: self.events.len(),
            num_outcomes: self.events.values().map(|e| e.outcomes.len()).sum(),
        }
    }
}

/// Codes are lowercased before lookup, so only characters that lowercase to
/// themselves can ever match.
fn check_identifier(id: char, name: &str) -> Result<()> {
    if id.is_whitespace() || !id.to_lowercase().eq(std::iter::once(id)) {
        return Err(DecoderError::InvalidGrammar(format!(
            "identifier '{}' for {} must be a lowercase, non-blank character",
            id, name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_grammar() {
        let grammar = EventGrammar::standard();
        let stats = grammar.stats();
        assert_eq!(stats.num_events, 7);
        assert_eq!(stats.num_outcomes, 23);
        assert!(EventGrammar::from_definitions(standard_definitions()).is_ok());

        assert_eq!(grammar.event('c').unwrap().name, "Challenge (50/50)");
        assert_eq!(
            grammar.event('c').unwrap().secondary,
            SecondaryRequirement::Participant
        );
        assert_eq!(grammar.event('g').unwrap().secondary, SecondaryRequirement::Assist);
        assert_eq!(grammar.event('u').unwrap().secondary, SecondaryRequirement::Location);
        assert_eq!(grammar.outcome('c', 's'), Some("Stalemate"));
        assert_eq!(grammar.outcome('g', 'a'), Some("Aerial"));
    }

    #[test]
    fn test_outcomes_are_scoped_to_event() {
        let grammar = EventGrammar::standard();
        // 'p' is an uncontested outcome but not a kickoff outcome
        assert_eq!(grammar.outcome('u', 'p'), Some("Pass"));
        assert_eq!(grammar.outcome('k', 'p'), None);
        assert_eq!(grammar.outcome('z', 'p'), None);
    }

    #[test]
    fn test_rejects_duplicate_event() {
        let result = EventGrammar::from_definitions(vec![
            event('a', "One", SecondaryRequirement::None, &[('x', "X")]),
            event('a', "Two", SecondaryRequirement::None, &[('y', "Y")]),
        ]);
        assert!(matches!(result, Err(DecoderError::InvalidGrammar(_))));
    }

    #[test]
    fn test_rejects_bad_definitions() {
        let no_outcomes = EventGrammar::from_definitions(vec![event(
            'a',
            "One",
            SecondaryRequirement::None,
            &[],
        )]);
        assert!(no_outcomes.is_err());

        let uppercase = EventGrammar::from_definitions(vec![event(
            'A',
            "One",
            SecondaryRequirement::None,
            &[('x', "X")],
        )]);
        assert!(uppercase.is_err());

        // Titlecase and multi-char lowercase forms are unreachable too
        for id in ['ǅ', 'İ'] {
            let unreachable = EventGrammar::from_definitions(vec![event(
                'a',
                "One",
                SecondaryRequirement::None,
                &[(id, "X")],
            )]);
            assert!(
                matches!(unreachable, Err(DecoderError::InvalidGrammar(_))),
                "outcome id {}",
                id
            );
        }

        let duplicate_outcome = EventGrammar::from_definitions(vec![event(
            'a',
            "One",
            SecondaryRequirement::None,
            &[('x', "X"), ('x', "Again")],
        )]);
        assert!(duplicate_outcome.is_err());

        assert!(EventGrammar::from_definitions(Vec::new()).is_err());
    }

    #[test]
    fn test_definitions_deserialize() {
        let json = r#"{
            "id": "t",
            "name": "Touch",
            "secondary": "participant",
            "outcomes": [{ "id": "f", "name": "First" }]
        }"#;
        let definition: EventDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(definition.secondary, SecondaryRequirement::Participant);
        assert_eq!(definition.outcome('f'), Some("First"));

        let json = r#"{ "id": "t", "name": "Touch", "outcomes": [{ "id": "f", "name": "First" }] }"#;
        let definition: EventDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(definition.secondary, SecondaryRequirement::None);
    }
}
