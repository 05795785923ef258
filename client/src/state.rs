use crate::config::*;
use herb_common::{Activation, GameSession};

pub struct SessionState {
    pub config: Config,
    pub config_path: String,
    pub activation: Activation,
    /// Lives as long as the program so the score survives closing the game
    pub game: GameSession,
}

impl SessionState {
    pub fn from_config(config: Config, config_path: &str) -> Self {
        SessionState {
            game: GameSession::new(config.session_config()),
            config,
            config_path: config_path.to_string(),
            activation: Activation::new(),
        }
    }

    pub fn toggle_theme(&mut self) -> std::result::Result<(), Box<dyn std::error::Error>> {
        self.config.theme = self.config.theme.toggled();
        self.save_config()
    }

    pub fn save_config(&self) -> std::result::Result<(), Box<dyn std::error::Error>> {
        self.config.save_to(&self.config_path)
    }
}
