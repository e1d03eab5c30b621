//! Configuration loading and session persistence
//!
//! Two TOML files are involved:
//! - the application config (`--config`): output settings and an optional
//!   replacement event grammar
//! - the session file (`--session`): subject selection plus custom player and
//!   team names, kept across runs

use anyhow::{bail, Context, Result};
use event_code_decoder::{EventDefinition, EventGrammar, TeamNames, ROSTER_SIZE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub grammar: Option<GrammarConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

/// Replacement event grammar
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GrammarConfig {
    pub events: Vec<EventDefinition>,
}

impl GrammarConfig {
    /// Validate the definitions and build the grammar
    pub fn build(&self) -> Result<EventGrammar> {
        let grammar = EventGrammar::from_definitions(self.events.clone())
            .context("Invalid [grammar] section in config")?;
        Ok(grammar)
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

/// Session settings persisted between runs
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionSettings {
    /// Roster slot of the subject being recorded (0-5)
    #[serde(default)]
    pub selected_id: usize,
    /// Custom display name per roster slot
    #[serde(default = "default_players")]
    pub players: Vec<String>,
    /// Custom team names, home first
    #[serde(default = "default_teams")]
    pub teams: Vec<String>,
}

fn default_players() -> Vec<String> {
    (1..=ROSTER_SIZE).map(|i| format!("Player {}", i)).collect()
}

fn default_teams() -> Vec<String> {
    vec!["Team 1".to_string(), "Team 2".to_string()]
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            selected_id: 0,
            players: default_players(),
            teams: default_teams(),
        }
    }
}

impl SessionSettings {
    /// Change the selected subject
    pub fn select(&mut self, id: usize) -> Result<()> {
        if id >= ROSTER_SIZE {
            bail!("Selected player must be between 0 and {} (got {})", ROSTER_SIZE - 1, id);
        }
        self.selected_id = id;
        Ok(())
    }

    pub fn team_names(&self) -> Result<TeamNames> {
        Ok(TeamNames::from_slice(&self.teams)?)
    }

    /// Keep exactly two team names and one name per roster slot
    fn normalize(&mut self) {
        let teams = default_teams();
        self.teams.truncate(2);
        while self.teams.len() < 2 {
            self.teams.push(teams[self.teams.len()].clone());
        }

        let players = default_players();
        while self.players.len() < ROSTER_SIZE {
            self.players.push(players[self.players.len()].clone());
        }
    }
}

/// Load session settings; a missing file yields the defaults
pub fn load_session(path: &Path) -> Result<SessionSettings> {
    if !path.exists() {
        log::info!("No session file at {:?}, using defaults", path);
        return Ok(SessionSettings::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read session file: {:?}", path))?;

    let mut settings: SessionSettings = toml::from_str(&content)
        .with_context(|| format!("Failed to parse session file: {:?}", path))?;

    if settings.selected_id >= ROSTER_SIZE {
        bail!(
            "Session file {:?} selects player {}, must be between 0 and {}",
            path,
            settings.selected_id,
            ROSTER_SIZE - 1
        );
    }
    settings.normalize();

    log::debug!("Session loaded: selected player {}", settings.selected_id);
    Ok(settings)
}

/// Persist session settings
pub fn save_session(path: &Path, settings: &SessionSettings) -> Result<()> {
    let mut settings = settings.clone();
    settings.normalize();

    let content = toml::to_string_pretty(&settings).context("Failed to serialize session")?;
    fs::write(path, content).with_context(|| format!("Failed to write session file: {:?}", path))?;

    log::info!("Session saved to {:?}", path);
    Ok(())
}
