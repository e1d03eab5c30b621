//! Export of recorded events
//!
//! JSON exports an array of structured records; CSV exports a header row and
//! one flat row per record.

use crate::config::OutputFormat;
use crate::state::EventLog;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use event_code_decoder::{Renderer, FLAT_HEADER};
use std::io::Write;

/// Write all records in the requested format
pub fn export<W: Write>(
    events: &EventLog,
    renderer: &Renderer,
    format: OutputFormat,
    writer: W,
) -> Result<()> {
    if let Some(pending) = events.pending() {
        bail!(
            "Cannot export while {} at {}s is waiting for its location",
            pending.event(),
            pending.timestamp()
        );
    }
    if events.is_empty() {
        log::warn!("No events recorded, exporting an empty {:?} file", format);
    }

    match format {
        OutputFormat::Json => write_json(events, renderer, writer),
        OutputFormat::Csv => write_csv(events, renderer, writer),
    }
}

pub fn write_json<W: Write>(events: &EventLog, renderer: &Renderer, mut writer: W) -> Result<()> {
    let rows = events
        .records()
        .iter()
        .map(|record| renderer.structured(record))
        .collect::<event_code_decoder::Result<Vec<_>>>()
        .context("Cannot export incomplete records")?;

    serde_json::to_writer_pretty(&mut writer, &rows).context("Failed to write JSON export")?;
    writeln!(writer)?;
    Ok(())
}

pub fn write_csv<W: Write>(events: &EventLog, renderer: &Renderer, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(FLAT_HEADER)?;

    for record in events.records() {
        let row = renderer
            .flat(record)
            .context("Cannot export incomplete records")?;
        csv.write_record(row.fields())?;
    }

    csv.flush().context("Failed to write CSV export")?;
    Ok(())
}

/// File name used when exporting into a directory
pub fn default_file_name(format: OutputFormat, now: DateTime<Local>) -> String {
    format!("events-{}.{}", now.format("%Y%m%d-%H%M%S"), format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use event_code_decoder::{Interpreter, Location, SessionSnapshot, Subject, TeamNames};

    fn recorded(codes: &[&str]) -> EventLog {
        let subjects = (0..6)
            .map(|i| Subject::new(format!("p{}", i), 40.0, Location::new(1.0, 2.0, 3.0)))
            .collect();
        let names = ["A", "B", "C", "D", "E", "F"].iter().map(|s| s.to_string()).collect();
        let snapshot =
            SessionSnapshot::new(subjects, 0, names, TeamNames::new("Blue", "Orange"), 7.5)
                .unwrap();

        let interpreter = Interpreter::standard();
        let mut log = EventLog::new();
        for code in codes {
            log.record(interpreter.interpret(code, &snapshot).unwrap()).unwrap();
        }
        log
    }

    fn renderer() -> Renderer {
        Renderer::new()
    }

    #[test]
    fn test_csv_export() {
        let log = recorded(&["cs3", "gay"]);
        let mut out = Vec::new();
        export(&log, &renderer(), OutputFormat::Csv, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Team,Opponent Team,Player,Boost"));
        assert_eq!(
            lines[1],
            "Blue,Orange,A,40,1,2,3,Challenge (50/50),Stalemate,C,,,,0,7.5"
        );
        assert_eq!(lines[2], "Blue,Orange,A,40,1,2,3,Goal,Aerial,,,,,1,7.5");
    }

    #[test]
    fn test_json_export() {
        let log = recorded(&["kw"]);
        let mut out = Vec::new();
        export(&log, &renderer(), OutputFormat::Json, &mut out).unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["event"], "Kickoff");
        assert_eq!(rows[0]["myTeamName"], "Blue");
        assert!(rows[0]["assisted"].is_null());
    }

    #[test]
    fn test_pending_record_blocks_export() {
        let log = recorded(&["kw", "up"]);
        assert!(export(&log, &renderer(), OutputFormat::Json, Vec::new()).is_err());
        assert!(export(&log, &renderer(), OutputFormat::Csv, Vec::new()).is_err());
    }

    #[test]
    fn test_default_file_name() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        assert_eq!(default_file_name(OutputFormat::Csv, now), "events-20240309-140500.csv");
        assert_eq!(default_file_name(OutputFormat::Json, now), "events-20240309-140500.json");
    }
}
