//! Recorded events
//!
//! Holds records in capture order and coordinates the two-phase lifecycle of
//! plays whose location arrives after the code. At most one record is pending
//! at a time, and it is always the newest.

use anyhow::{bail, Result};
use event_code_decoder::{EventRecord, Location};

#[derive(Debug, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a freshly interpreted record
    pub fn record(&mut self, record: EventRecord) -> Result<()> {
        if let Some(pending) = self.pending() {
            bail!(
                "Cannot record {} while {} at {}s is waiting for its location",
                record.event(),
                pending.event(),
                pending.timestamp()
            );
        }

        log::info!(
            "Recorded {} / {} for {} at {}s",
            record.event(),
            record.outcome(),
            record.subject().name,
            record.timestamp()
        );
        self.records.push(record);
        Ok(())
    }

    /// The record waiting for a location, if any
    pub fn pending(&self) -> Option<&EventRecord> {
        self.records.last().filter(|r| r.needs_secondary())
    }

    /// Attach a location to the pending record
    pub fn complete_pending(&mut self, location: Location) -> Result<()> {
        match self.records.last_mut() {
            Some(record) if record.needs_secondary() => {
                record.attach_location(location)?;
                Ok(())
            }
            _ => bail!("No recorded event is waiting for a location"),
        }
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
