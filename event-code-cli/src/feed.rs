//! Live feed snapshot loading
//!
//! The feed is a JSON dump of the match state: elapsed game time plus the
//! roster with each player's name, boost and location.

use crate::config::SessionSettings;
use anyhow::{Context, Result};
use event_code_decoder::{SessionSnapshot, Subject};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct FeedSnapshot {
    pub game: GameInfo,
    pub players: Vec<Subject>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameInfo {
    /// Seconds since kickoff
    pub elapsed: f64,
}

impl FeedSnapshot {
    /// Combine the feed with the operator's session settings
    pub fn session_snapshot(&self, settings: &SessionSettings) -> Result<SessionSnapshot> {
        let snapshot = SessionSnapshot::new(
            self.players.clone(),
            settings.selected_id,
            settings.players.clone(),
            settings.team_names()?,
            self.game.elapsed,
        )
        .context("Feed does not match session settings")?;
        Ok(snapshot)
    }
}

pub fn parse_feed(content: &str) -> Result<FeedSnapshot> {
    let feed: FeedSnapshot = serde_json::from_str(content).context("Malformed feed snapshot")?;
    log::debug!(
        "Feed snapshot: {} players at {}s",
        feed.players.len(),
        feed.game.elapsed
    );
    Ok(feed)
}

/// Load a feed snapshot from a JSON file
pub fn load_feed(path: &Path) -> Result<FeedSnapshot> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read feed file: {:?}", path))?;
    parse_feed(&content).with_context(|| format!("Failed to parse feed file: {:?}", path))
}
