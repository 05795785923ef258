use herb_common::{Mode, Player, SessionConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Cosmic,
    Plain,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Cosmic => Theme::Plain,
            Theme::Plain => Theme::Cosmic,
        }
    }

    fn from_string(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosmic" => Some(Theme::Cosmic),
            "plain" => Some(Theme::Plain),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub ai_delay_ms: u64,
    pub starting_player: Player,
    pub default_mode: Mode,
    pub emoji: bool,
    pub theme: Theme,
    pub ai_seed: Option<u64>,
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ai_delay_ms: 500,
            starting_player: Player::X,
            default_mode: Mode::VsAi,
            emoji: true,
            theme: Theme::Cosmic,
            ai_seed: None,
            log_file: Some("client.log".to_string()),
        }
    }
}

impl Config {
    pub fn load_from(config_path: &str) -> std::result::Result<Config, Box<dyn std::error::Error>> {
        if Path::new(config_path).exists() {
            let content = fs::read_to_string(config_path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, config_path: &str) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }

    /// `HERB_AI_DELAY_MS` and `HERB_THEME` win over the file.
    /// Returns a message for every value that was ignored, to be logged once logging is up.
    pub fn apply_env_overrides(&mut self) -> Vec<String> {
        let mut rejected = vec![];
        if let Ok(delay) = std::env::var("HERB_AI_DELAY_MS") {
            match delay.trim().parse() {
                Ok(ms) => self.ai_delay_ms = ms,
                Err(_) => rejected.push(format!("Ignoring invalid HERB_AI_DELAY_MS={delay}")),
            }
        }
        if let Ok(theme) = std::env::var("HERB_THEME") {
            match Theme::from_string(&theme) {
                Some(t) => self.theme = t,
                None => rejected.push(format!("Ignoring invalid HERB_THEME={theme}")),
            }
        }
        rejected
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            starting_player: self.starting_player,
            mode: self.default_mode,
            ai_seed: self.ai_seed,
            ..SessionConfig::default()
        }
    }
}
