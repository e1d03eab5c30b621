//! Code interpreter
//!
//! Turns an operator-typed event code plus a session snapshot into an
//! [`EventRecord`]. Codes are positional and case-insensitive:
//!
//! | position | meaning |
//! |----------|---------|
//! | 0 | event identifier |
//! | 1 | outcome identifier (scoped to the event) |
//! | 2 | secondary qualifier, depending on the event type |

use crate::grammar::{EventDefinition, EventGrammar, SecondaryRequirement};
use crate::record::{EventRecord, LocationState, Secondary};
use crate::types::{DecoderError, Result, SessionSnapshot, ROSTER_SIZE};

/// Interprets event codes against a grammar
#[derive(Debug, Clone, Copy)]
pub struct Interpreter<'g> {
    grammar: &'g EventGrammar,
}

impl Interpreter<'static> {
    /// Interpreter over the built-in grammar
    pub fn standard() -> Self {
        Self::new(EventGrammar::standard())
    }
}

impl Default for Interpreter<'static> {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'g> Interpreter<'g> {
    pub fn new(grammar: &'g EventGrammar) -> Self {
        Self { grammar }
    }

    pub fn grammar(&self) -> &'g EventGrammar {
        self.grammar
    }

    /// Interpret a code typed as a string, e.g. `"cs3"`
    ///
    /// # Example
    /// ```
    /// use event_code_decoder::{Interpreter, Location, SessionSnapshot, Subject, TeamNames};
    ///
    /// let subjects: Vec<Subject> = (0..6)
    ///     .map(|i| Subject::new(format!("P{}", i), 100.0, Location::default()))
    ///     .collect();
    /// let names = ["A", "B", "C", "D", "E", "F"].map(String::from).to_vec();
    /// let snapshot =
    ///     SessionSnapshot::new(subjects, 0, names, TeamNames::new("Blue", "Orange"), 42.0).unwrap();
    ///
    /// let record = Interpreter::standard().interpret("CS3", &snapshot).unwrap();
    /// assert_eq!(record.participant(), Some("C"));
    /// assert_eq!(record.timestamp(), 42.0);
    /// ```
    pub fn interpret(&self, code: &str, snapshot: &SessionSnapshot) -> Result<EventRecord> {
        let chars: Vec<char> = code.trim().chars().collect();
        self.interpret_chars(&chars, snapshot)
    }

    /// Interpret a code given as individual characters
    pub fn interpret_chars(&self, code: &[char], snapshot: &SessionSnapshot) -> Result<EventRecord> {
        // One char in, one char out: multi-char lowercase forms keep the
        // original so positions stay aligned with what was typed.
        let code: Vec<char> = code.iter().map(|&c| fold_case(c)).collect();

        let (&event_id, rest) = code.split_first().ok_or(DecoderError::EmptyCode)?;

        let definition = self
            .grammar
            .event(event_id)
            .ok_or(DecoderError::UnknownEvent { event: event_id })?;

        let outcome_id = rest.first().copied();
        let outcome = outcome_id
            .and_then(|id| definition.outcome(id))
            .ok_or_else(|| DecoderError::UnknownOutcome {
                outcome: outcome_id,
                event: definition.name.clone(),
            })?;

        let secondary = resolve_secondary(definition, &code, snapshot)?;

        let used = match definition.secondary {
            SecondaryRequirement::Participant | SecondaryRequirement::Assist => 3,
            SecondaryRequirement::None | SecondaryRequirement::Location => 2,
        };
        if code.len() > used {
            log::warn!(
                "Ignoring trailing characters '{}' in event code '{}'",
                code[used..].iter().collect::<String>(),
                code.iter().collect::<String>()
            );
        }

        let record = EventRecord::new(
            snapshot.acting_subject(),
            snapshot.selected(),
            snapshot.teams().clone(),
            definition.name.clone(),
            outcome.to_string(),
            secondary,
            snapshot.elapsed(),
        );

        log::debug!(
            "Interpreted '{}' as {} / {} for subject {} at {}",
            code.iter().collect::<String>(),
            record.event(),
            record.outcome(),
            record.subject_index(),
            record.timestamp()
        );

        Ok(record)
    }
}

fn fold_case(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(single), None) => single,
        _ => c,
    }
}

fn resolve_secondary(
    definition: &EventDefinition,
    code: &[char],
    snapshot: &SessionSnapshot,
) -> Result<Secondary> {
    let qualifier = || {
        code.get(2).copied().ok_or_else(|| DecoderError::MissingSecondary {
            event: definition.name.clone(),
            code: code.iter().collect(),
        })
    };

    match definition.secondary {
        SecondaryRequirement::None => Ok(Secondary::None),

        SecondaryRequirement::Participant => {
            let c = qualifier()?;
            let number = c.to_digit(10).ok_or_else(|| DecoderError::InvalidSecondaryFormat {
                secondary: c,
                event: definition.name.clone(),
            })?;

            // Codes are 1-based
            if number < 1 || number as usize > ROSTER_SIZE {
                return Err(DecoderError::SecondaryOutOfRange { index: number });
            }
            let index = number as usize - 1;

            let name = snapshot.custom_name(index).ok_or_else(|| {
                DecoderError::InvalidSnapshot(format!("no custom name for subject {}", index))
            })?;
            Ok(Secondary::Participant(name.to_string()))
        }

        SecondaryRequirement::Assist => match qualifier()? {
            'y' => Ok(Secondary::Assist(true)),
            'n' => Ok(Secondary::Assist(false)),
            other => Err(DecoderError::InvalidAssistFlag {
                flag: other,
                event: definition.name.clone(),
            }),
        },

        SecondaryRequirement::Location => Ok(Secondary::Location(LocationState::Pending)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Location, Subject, TeamNames};

    fn snapshot(selected: usize) -> SessionSnapshot {
        let subjects = (0..6)
            .map(|i| {
                Subject::new(
                    format!("feed{}", i),
                    10.0 * i as f64,
                    Location::new(i as f64, -(i as f64), 17.0),
                )
            })
            .collect();
        let names = ["A", "B", "C", "D", "E", "F"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        SessionSnapshot::new(subjects, selected, names, TeamNames::new("Home", "Away"), 95.5)
            .unwrap()
    }

    #[test]
    fn test_challenge_resolves_participant() {
        let record = Interpreter::standard()
            .interpret_chars(&['c', 's', '3'], &snapshot(0))
            .unwrap();

        assert_eq!(record.event(), "Challenge (50/50)");
        assert_eq!(record.outcome(), "Stalemate");
        assert_eq!(record.secondary(), &Secondary::Participant("C".to_string()));
        assert_eq!(record.assisted(), None);
        assert_eq!(record.subject().name, "A");
        assert_eq!(record.subject().boost, 0.0);
        assert_eq!(record.timestamp(), 95.5);
        assert!(!record.needs_secondary());
    }

    #[test]
    fn test_participant_indices() {
        let interpreter = Interpreter::standard();
        let snap = snapshot(0);
        let expected = ["A", "B", "C", "D", "E", "F"];
        for (digit, name) in ('1'..='6').zip(expected) {
            let record = interpreter.interpret_chars(&['c', 'w', digit], &snap).unwrap();
            assert_eq!(record.participant(), Some(name));
        }

        assert_eq!(
            interpreter.interpret("cw0", &snap),
            Err(DecoderError::SecondaryOutOfRange { index: 0 })
        );
        assert_eq!(
            interpreter.interpret("cw7", &snap),
            Err(DecoderError::SecondaryOutOfRange { index: 7 })
        );
        assert!(matches!(
            interpreter.interpret("cwx", &snap),
            Err(DecoderError::InvalidSecondaryFormat { secondary: 'x', .. })
        ));
        assert!(matches!(
            interpreter.interpret("cw", &snap),
            Err(DecoderError::MissingSecondary { .. })
        ));
    }

    #[test]
    fn test_participant_may_be_acting_subject() {
        let record = Interpreter::standard().interpret("cl2", &snapshot(1)).unwrap();
        assert_eq!(record.subject().name, "B");
        assert_eq!(record.participant(), Some("B"));
    }

    #[test]
    fn test_goal_assist_flag() {
        let interpreter = Interpreter::standard();
        let snap = snapshot(2);

        let assisted = interpreter.interpret_chars(&['g', 'a', 'y'], &snap).unwrap();
        assert_eq!(assisted.assisted(), Some(true));
        assert_eq!(assisted.event(), "Goal");
        assert_eq!(assisted.outcome(), "Aerial");

        let solo = interpreter.interpret("gan", &snap).unwrap();
        assert_eq!(solo.assisted(), Some(false));

        assert_eq!(
            interpreter.interpret_chars(&['g', 'a', 'z'], &snap),
            Err(DecoderError::InvalidAssistFlag {
                flag: 'z',
                event: "Goal".to_string()
            })
        );
        assert!(matches!(
            interpreter.interpret("ga", &snap),
            Err(DecoderError::MissingSecondary { .. })
        ));
    }

    #[test]
    fn test_uncontested_is_pending() {
        let record = Interpreter::standard().interpret("up", &snapshot(0)).unwrap();
        assert!(record.needs_secondary());
        assert_eq!(record.secondary(), &Secondary::Location(LocationState::Pending));
        assert_eq!(record.event(), "Uncontested play");
        assert_eq!(record.outcome(), "Pass");
    }

    #[test]
    fn test_plain_event_ignores_trailing() {
        let record = Interpreter::standard().interpret("kw9", &snapshot(0)).unwrap();
        assert_eq!(record.secondary(), &Secondary::None);
        assert!(!record.needs_secondary());
    }

    #[test]
    fn test_case_insensitive() {
        let interpreter = Interpreter::standard();
        let snap = snapshot(0);
        assert_eq!(
            interpreter.interpret("GAY", &snap).unwrap(),
            interpreter.interpret("gay", &snap).unwrap()
        );
        assert!(interpreter.interpret("  Kw ", &snap).is_ok());
    }

    #[test]
    fn test_rejections() {
        let interpreter = Interpreter::standard();
        let snap = snapshot(0);

        assert_eq!(interpreter.interpret("", &snap), Err(DecoderError::EmptyCode));
        assert_eq!(interpreter.interpret_chars(&[], &snap), Err(DecoderError::EmptyCode));
        assert_eq!(
            interpreter.interpret("zw", &snap),
            Err(DecoderError::UnknownEvent { event: 'z' })
        );
        assert_eq!(
            interpreter.interpret("k", &snap),
            Err(DecoderError::UnknownOutcome {
                outcome: None,
                event: "Kickoff".to_string()
            })
        );
        assert_eq!(
            interpreter.interpret("kp", &snap),
            Err(DecoderError::UnknownOutcome {
                outcome: Some('p'),
                event: "Kickoff".to_string()
            })
        );
    }

    #[test]
    fn test_multi_char_lowercase_keeps_positions() {
        let interpreter = Interpreter::standard();
        let snap = snapshot(0);

        // 'İ' lowercases to two chars; it must stay in the flag position
        assert_eq!(
            interpreter.interpret("gaİ", &snap),
            Err(DecoderError::InvalidAssistFlag {
                flag: 'İ',
                event: "Goal".to_string()
            })
        );
        assert_eq!(
            interpreter.interpret("kİ", &snap),
            Err(DecoderError::UnknownOutcome {
                outcome: Some('İ'),
                event: "Kickoff".to_string()
            })
        );
        assert_eq!(fold_case('G'), 'g');
        assert_eq!(fold_case('İ'), 'İ');
    }

    #[test]
    fn test_custom_grammar() {
        use crate::grammar::OutcomeDefinition;

        let grammar = EventGrammar::from_definitions(vec![EventDefinition {
            id: 't',
            name: "Touch".to_string(),
            secondary: SecondaryRequirement::Assist,
            outcomes: vec![OutcomeDefinition {
                id: 'f',
                name: "First".to_string(),
            }],
        }])
        .unwrap();

        let interpreter = Interpreter::new(&grammar);
        let record = interpreter.interpret("tfy", &snapshot(0)).unwrap();
        assert_eq!(record.event(), "Touch");
        assert_eq!(record.assisted(), Some(true));
        assert!(matches!(
            interpreter.interpret("cs3", &snapshot(0)),
            Err(DecoderError::UnknownEvent { event: 'c' })
        ));
    }
}
