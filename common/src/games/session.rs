use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ai;
use super::tic_tac_toe::{apply_move, BoardResult, GameState, Outcome, Player, Score};
use super::GameError;

/// Who plays the second side
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    VsAi,
    VsHuman,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::VsAi => Mode::VsHuman,
            Mode::VsHuman => Mode::VsAi,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::VsAi => write!(f, "vs AI"),
            Mode::VsHuman => write!(f, "vs friend"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub starting_player: Player,
    pub mode: Mode,
    /// Side played by the AI in `Mode::VsAi`
    pub ai_player: Player,
    /// Fixed seed for the AI's random choices, entropy when None
    pub ai_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_player: Player::X,
            mode: Mode::VsAi,
            ai_player: Player::O,
            ai_seed: None,
        }
    }
}

/// Everything the presentation layer needs to redraw
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GameSnapshot {
    pub state: GameState,
    pub score: Score,
    pub mode: Mode,
    pub generation: u64,
    pub ai_pending: bool,
}

impl GameSnapshot {
    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }
}

/// Notifications produced by session operations
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GameEvent {
    #[serde(rename = "state_changed")]
    StateChanged { snapshot: GameSnapshot },
    #[serde(rename = "terminal")]
    Terminal { outcome: Outcome },
    /// The AI should move after its delay; hand the generation back to `ai_move`
    #[serde(rename = "ai_move_scheduled")]
    AiMoveScheduled { generation: u64 },
}

/// Owns the current game, the score and the AI.
///
/// Every game gets a new generation number. A delayed AI move carries the
/// generation it was scheduled for and is dropped if the game was reset
/// in the meantime.
pub struct GameSession {
    config: SessionConfig,
    mode: Mode,
    state: GameState,
    score: Score,
    generation: u64,
    ai_pending: Option<u64>,
    rng: StdRng,
}

impl GameSession {
    pub fn new(config: SessionConfig) -> Self {
        let rng = match config.ai_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            mode: config.mode,
            state: GameState::new(config.starting_player),
            score: Score::default(),
            generation: 0,
            ai_pending: None,
            rng,
            config,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_ai_pending(&self) -> bool {
        self.ai_pending.is_some()
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            state: self.state.clone(),
            score: self.score,
            mode: self.mode,
            generation: self.generation,
            ai_pending: self.ai_pending.is_some(),
        }
    }

    /// Switch mode and start over
    pub fn new_game(&mut self, mode: Mode) -> Vec<GameEvent> {
        self.mode = mode;
        self.reset()
    }

    /// Start a fresh game in the current mode. The score is kept.
    pub fn reset(&mut self) -> Vec<GameEvent> {
        self.generation += 1;
        self.ai_pending = None;
        self.state = GameState::new(self.config.starting_player);
        log::info!("New game {} ({})", self.generation, self.mode);

        let mut events = vec![];
        self.schedule_ai_if_needed(&mut events);
        events.push(self.state_changed());
        events
    }

    pub fn reset_score(&mut self) -> Vec<GameEvent> {
        self.score = Score::default();
        vec![self.state_changed()]
    }

    /// Human input for the cell at `index`
    pub fn player_move(&mut self, index: usize) -> Result<Vec<GameEvent>, GameError> {
        if self.ai_pending.is_some() {
            return Err(GameError::AiThinking);
        }
        if self.is_ai_turn() && !self.state.is_over {
            return Err(GameError::NotYourTurn);
        }

        let player = self.state.current_player;
        self.play(index, player)
    }

    /// Timer callback for a scheduled AI move
    pub fn ai_move(&mut self, generation: u64) -> Result<Vec<GameEvent>, GameError> {
        if generation != self.generation {
            return Err(GameError::StaleGeneration {
                expected: self.generation,
                found: generation,
            });
        }
        if self.ai_pending != Some(generation) {
            return Err(GameError::NoPendingMove);
        }
        self.ai_pending = None;

        let ai = self.state.current_player;
        let index = ai::choose_move(&self.state.board, ai, ai.other(), &mut self.rng)
            .ok_or(GameError::GameOver)?;
        log::debug!("AI {ai} plays {index}");
        self.play(index, ai)
    }

    fn play(&mut self, index: usize, player: Player) -> Result<Vec<GameEvent>, GameError> {
        let result = apply_move(&mut self.state, &mut self.score, index, player)?;
        log::debug!("{player} played {index} in game {}", self.generation);

        let mut events = vec![];
        match result {
            BoardResult::Winner(winner) => events.push(GameEvent::Terminal {
                outcome: Outcome::Win(winner),
            }),
            BoardResult::Draw => events.push(GameEvent::Terminal {
                outcome: Outcome::Draw,
            }),
            BoardResult::NoWinner => self.schedule_ai_if_needed(&mut events),
        }
        if let Some(GameEvent::Terminal { outcome }) = events.first() {
            log::info!("Game {} finished: {outcome}", self.generation);
        }
        events.insert(0, self.state_changed());
        Ok(events)
    }

    fn is_ai_turn(&self) -> bool {
        self.mode == Mode::VsAi && self.state.current_player == self.config.ai_player
    }

    fn schedule_ai_if_needed(&mut self, events: &mut Vec<GameEvent>) {
        if self.is_ai_turn() && !self.state.is_over {
            self.ai_pending = Some(self.generation);
            events.push(GameEvent::AiMoveScheduled {
                generation: self.generation,
            });
        }
    }

    fn state_changed(&self) -> GameEvent {
        GameEvent::StateChanged {
            snapshot: self.snapshot(),
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tic_tac_toe::Board;

    fn session(mode: Mode) -> GameSession {
        let mut session = GameSession::new(SessionConfig {
            mode,
            ai_seed: Some(42),
            ..SessionConfig::default()
        });
        session.reset();
        session
    }

    fn scheduled(events: &[GameEvent]) -> Option<u64> {
        events.iter().find_map(|e| match e {
            GameEvent::AiMoveScheduled { generation } => Some(*generation),
            _ => None,
        })
    }

    fn terminal(events: &[GameEvent]) -> Option<Outcome> {
        events.iter().find_map(|e| match e {
            GameEvent::Terminal { outcome } => Some(*outcome),
            _ => None,
        })
    }

    #[test]
    fn test_human_center_move() {
        let mut session = session(Mode::VsHuman);
        let events = session.player_move(4).unwrap();

        assert_eq!(session.state().board.get(4), Some(Player::X));
        assert_eq!(session.state().current_player, Player::O);
        assert!(!session.state().is_over);
        assert!(matches!(events[0], GameEvent::StateChanged { .. }));
        assert_eq!(scheduled(&events), None);
    }

    #[test]
    fn test_hot_seat_alternates() {
        let mut session = session(Mode::VsHuman);
        session.player_move(0).unwrap();
        session.player_move(4).unwrap();
        assert_eq!(session.state().board.get(4), Some(Player::O));
        assert_eq!(session.state().current_player, Player::X);
    }

    #[test]
    fn test_repeated_move_is_noop() {
        let mut session = session(Mode::VsHuman);
        session.player_move(3).unwrap();
        let before = session.snapshot();

        assert_eq!(session.player_move(3), Err(GameError::CellOccupied(3)));
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_ai_reply_is_scheduled_then_played() {
        let mut session = session(Mode::VsAi);
        let events = session.player_move(0).unwrap();
        let generation = scheduled(&events).expect("AI move should be scheduled");
        assert!(session.is_ai_pending());

        let events = session.ai_move(generation).unwrap();

        assert!(!session.is_ai_pending());
        assert_eq!(session.state().board.get(4), Some(Player::O));
        assert_eq!(session.state().current_player, Player::X);
        assert_eq!(scheduled(&events), None);
    }

    #[test]
    fn test_input_rejected_while_ai_pending() {
        let mut session = session(Mode::VsAi);
        session.player_move(0).unwrap();
        let before = session.snapshot();

        assert_eq!(session.player_move(1), Err(GameError::AiThinking));
        assert_eq!(session.snapshot(), before);
    }

    #[test]
    fn test_stale_ai_move_dropped_after_reset() {
        let mut session = session(Mode::VsAi);
        let events = session.player_move(0).unwrap();
        let stale = scheduled(&events).unwrap();

        session.reset();
        let result = session.ai_move(stale);

        assert_eq!(
            result,
            Err(GameError::StaleGeneration {
                expected: stale + 1,
                found: stale
            })
        );
        assert_eq!(session.state().board, Board::new());
        assert_eq!(session.state().current_player, Player::X);
    }

    #[test]
    fn test_ai_move_only_fires_once() {
        let mut session = session(Mode::VsAi);
        let events = session.player_move(0).unwrap();
        let generation = scheduled(&events).unwrap();
        session.ai_move(generation).unwrap();

        assert_eq!(session.ai_move(generation), Err(GameError::NoPendingMove));
        assert_eq!(session.state().board.empty_cells().len(), 7);
    }

    #[test]
    fn test_reset_restores_fresh_game_and_keeps_mode() {
        let mut session = session(Mode::VsHuman);
        session.player_move(0).unwrap();
        session.player_move(1).unwrap();
        let generation = session.generation();

        session.reset();

        let state = session.state();
        assert_eq!(state.board, Board::new());
        assert!(!state.is_over);
        assert_eq!(state.winner, None);
        assert_eq!(state.current_player, Player::X);
        assert_eq!(session.mode(), Mode::VsHuman);
        assert_eq!(session.generation(), generation + 1);
    }

    #[test]
    fn test_win_and_tie_bump_one_counter() {
        let mut session = session(Mode::VsHuman);
        // X: 0 1 2, O: 3 4
        for index in [0, 3, 1, 4] {
            session.player_move(index).unwrap();
            assert_eq!(session.score().total(), 0);
        }
        let events = session.player_move(2).unwrap();
        assert_eq!(terminal(&events), Some(Outcome::Win(Player::X)));
        assert_eq!(session.score(), Score { wins_x: 1, wins_o: 0, ties: 0 });
        assert_eq!(session.player_move(5), Err(GameError::GameOver));

        session.reset();
        // X O X / X O O / O X X
        for index in [0, 1, 2, 4, 3, 5, 7, 6] {
            session.player_move(index).unwrap();
        }
        let events = session.player_move(8).unwrap();
        assert_eq!(terminal(&events), Some(Outcome::Draw));
        assert_eq!(session.score(), Score { wins_x: 1, wins_o: 0, ties: 1 });
    }

    #[test]
    fn test_reset_score_keeps_game() {
        let mut session = session(Mode::VsHuman);
        for index in [0, 3, 1, 4, 2] {
            session.player_move(index).unwrap();
        }
        session.reset_score();
        assert_eq!(session.score(), Score::default());
        assert!(session.state().is_over);
    }

    #[test]
    fn test_ai_starts_when_it_opens() {
        let mut session = GameSession::new(SessionConfig {
            starting_player: Player::O,
            ai_seed: Some(1),
            ..SessionConfig::default()
        });
        let events = session.new_game(Mode::VsAi);
        let generation = scheduled(&events).expect("AI opens the game");

        assert_eq!(session.player_move(0), Err(GameError::AiThinking));
        session.ai_move(generation).unwrap();
        assert_eq!(session.state().board.get(4), Some(Player::O));
        assert_eq!(session.state().current_player, Player::X);
    }

    #[test]
    fn test_switching_mode_starts_new_game() {
        let mut session = session(Mode::VsAi);
        let events = session.player_move(0).unwrap();
        let stale = scheduled(&events).unwrap();

        session.new_game(Mode::VsHuman);

        assert_eq!(session.mode(), Mode::VsHuman);
        assert!(!session.is_ai_pending());
        assert!(session.ai_move(stale).is_err());
        assert!(session.player_move(0).is_ok());
    }

    #[test]
    fn test_ai_wins_and_scores() {
        let mut session = session(Mode::VsAi);
        // X 0, O 4 (center), X 1, O blocks at 2, X 8, O wins 2-4-6
        let g = scheduled(&session.player_move(0).unwrap()).unwrap();
        session.ai_move(g).unwrap();
        let g = scheduled(&session.player_move(1).unwrap()).unwrap();
        session.ai_move(g).unwrap();
        assert_eq!(session.state().board.get(2), Some(Player::O));
        let g = scheduled(&session.player_move(8).unwrap()).unwrap();
        let events = session.ai_move(g).unwrap();

        assert_eq!(terminal(&events), Some(Outcome::Win(Player::O)));
        assert_eq!(session.state().board.get(6), Some(Player::O));
        assert_eq!(session.score().wins(Player::O), 1);
    }

    #[test]
    fn test_snapshot_json() {
        let mut session = session(Mode::VsHuman);
        session.player_move(4).unwrap();
        let snapshot = session.snapshot();
        let parsed = GameSnapshot::from_json(&snapshot.to_json()).unwrap();
        assert_eq!(parsed, snapshot);
        assert!(snapshot.to_json().contains("\"vs_human\""));
    }
}
