//! Event Code Decoder Library
//!
//! A stateless library that turns short operator-typed event codes from a live
//! match feed into validated event records, and renders those records for
//! export.
//!
//! # Architecture
//!
//! The library is a one-way pipeline:
//! - [`EventGrammar`] maps event and outcome identifier characters to names
//! - [`Interpreter`] validates a code against the grammar and a
//!   [`SessionSnapshot`], producing an [`EventRecord`]
//! - [`Renderer`] projects completed records into a structured object or a
//!   flat spreadsheet row
//!
//! The library does NOT:
//! - Capture codes or decide when an event happened
//! - Persist session settings (custom names, team names, selection)
//! - Read the live feed or write export files
//!
//! Those concerns live in the application layer (event-code-cli).
//!
//! # Example Usage
//!
//! ```
//! use event_code_decoder::{
//!     Interpreter, Location, Renderer, SessionSnapshot, Subject, TeamNames,
//! };
//!
//! let subjects: Vec<Subject> = (0..6)
//!     .map(|i| Subject::new(format!("Feed {}", i), 33.0, Location::new(0.0, 0.0, 17.0)))
//!     .collect();
//! let names = ["A", "B", "C", "D", "E", "F"].map(String::from).to_vec();
//! let teams = TeamNames::new("Blue", "Orange");
//! let snapshot = SessionSnapshot::new(subjects, 0, names, teams, 120.0).unwrap();
//!
//! let interpreter = Interpreter::standard();
//! let renderer = Renderer::new();
//!
//! // Uncontested plays need their location before they can be exported
//! let mut record = interpreter.interpret("up", &snapshot).unwrap();
//! assert!(renderer.flat(&record).is_err());
//! record.attach_location(Location::new(-1200.0, 800.0, 17.0)).unwrap();
//!
//! let row = renderer.flat(&record).unwrap();
//! println!("{}", row.fields().join(","));
//! ```

// Public modules
pub mod grammar;
pub mod interpreter;
pub mod record;
pub mod render;
pub mod types;

// Re-export main types for convenience
pub use grammar::{
    EventDefinition, EventGrammar, GrammarStats, OutcomeDefinition, SecondaryRequirement,
};
pub use interpreter::Interpreter;
pub use record::{EventRecord, LocationState, Secondary};
pub use render::{
    Cell, FlatRow, Renderer, StructuredRecord, StructuredSecondary, FLAT_COLUMNS, FLAT_HEADER,
};
pub use types::{
    DecoderError, Location, Result, SessionSnapshot, Subject, TeamNames, HOME_ROSTER_SIZE,
    ROSTER_SIZE,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: the built-in grammar is available
        let interpreter = Interpreter::standard();
        let stats = interpreter.grammar().stats();
        assert!(stats.num_events > 0);
        assert_eq!(FLAT_HEADER.len(), FLAT_COLUMNS);
    }
}
