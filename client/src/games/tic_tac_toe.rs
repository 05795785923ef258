use colored::*;
use crossterm::event::{KeyCode, KeyEvent};
use herb_common::*;
use tokio::time::{sleep, Duration};

use crate::config::Config;
use crate::scheduler::AiScheduler;
use crate::state::SessionState;
use crate::ui::*;

/// What a key press asks the game to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    Cell(usize),
    NewGame,
    SwitchMode,
    ResetScore,
    ToggleTheme,
    Close,
}

pub fn action_for_key(key: &KeyEvent) -> Option<GameAction> {
    if is_ctrl_c(key) {
        return Some(GameAction::Close);
    }
    match key.code {
        KeyCode::Char(c @ '1'..='9') => {
            // Keys count across rows, like the numbers drawn in empty cells
            let n = c as usize - '1' as usize;
            Board::coords_to_index(n / 3, n % 3).map(GameAction::Cell)
        }
        KeyCode::Char('n') => Some(GameAction::NewGame),
        KeyCode::Char('m') => Some(GameAction::SwitchMode),
        KeyCode::Char('r') => Some(GameAction::ResetScore),
        KeyCode::Char('t') => Some(GameAction::ToggleTheme),
        KeyCode::Char('q') | KeyCode::Esc => Some(GameAction::Close),
        _ => None,
    }
}

pub fn glyph(player: Player, emoji: bool) -> &'static str {
    match (player, emoji) {
        (Player::X, true) => "🌿",
        (Player::O, true) => "🌙",
        (Player::X, false) => "X",
        (Player::O, false) => "O",
    }
}

fn colored_glyph(player: Player, emoji: bool) -> ColoredString {
    match player {
        Player::X => glyph(player, emoji).bright_green().bold(),
        Player::O => glyph(player, emoji).bright_yellow().bold(),
    }
}

pub fn status_text(snapshot: &GameSnapshot, emoji: bool) -> String {
    let state = &snapshot.state;
    match state.outcome() {
        Some(Outcome::Win(player)) => format!("Player {} wins!", glyph(player, emoji)),
        Some(Outcome::Draw) => {
            if emoji {
                "It's a tie! 🤝".to_string()
            } else {
                "It's a tie!".to_string()
            }
        }
        None if snapshot.ai_pending => format!("{} is thinking...", glyph(state.current_player, emoji)),
        None => format!("Player {} turn", glyph(state.current_player, emoji)),
    }
}

pub fn render_game(snapshot: &GameSnapshot, config: &Config, message: Option<&str>) -> String {
    let emoji = config.emoji;
    let mut out = String::new();

    out.push_str(&format!("\n  {}\n", "🌿 Herb Tic Tac Toe 🌙".bright_magenta().bold()));
    out.push_str(&format!("  {}\n\n", format!("A cosmic twist on the classic game ({})", snapshot.mode).dimmed()));

    // Empty cells show their key; glyphs can be two columns wide
    let width = if emoji { 2 } else { 1 };
    for row in 0..3 {
        let cells: Vec<String> = (0..3)
            .map(|col| {
                let index = row * 3 + col;
                match snapshot.state.board.get(index) {
                    Some(player) => colored_glyph(player, emoji).to_string(),
                    None => format!("{:<width$}", index + 1).dimmed().to_string(),
                }
            })
            .collect();
        out.push_str(&format!("     {} │ {} │ {}\n", cells[0], cells[1], cells[2]));
        if row < 2 {
            let bar = "─".repeat(width + 2);
            out.push_str(&format!("    {bar}┼{bar}┼{bar}\n"));
        }
    }

    let status = status_text(snapshot, emoji);
    let status = match snapshot.state.outcome() {
        Some(Outcome::Win(_)) => status.bright_green().bold(),
        Some(Outcome::Draw) => status.bright_yellow(),
        None => status.cyan(),
    };
    out.push_str(&format!("\n  {status}\n"));

    let score = snapshot.score;
    out.push_str(&format!(
        "  {} {}   {} {}   ties {}\n",
        glyph(Player::X, emoji),
        score.wins_x,
        glyph(Player::O, emoji),
        score.wins_o,
        score.ties
    ));

    if let Some(msg) = message {
        out.push_str(&format!("\n  {}\n", msg.yellow()));
    }

    out.push_str(&format!(
        "\n  {}\n",
        "1-9 play · n new game · m switch mode · r reset score · t theme · q close".dimmed()
    ));
    out
}

const BURST_FRAMES: [&str; 4] = [
    "            ·  ✦  ·",
    "        ✧  ·  ✦ ✦  ·  ✧",
    "    ✦  ✧  ·  ✦  ✺  ✦  ·  ✧  ✦",
    "  ·    ✧     ·     ✦     ·    ✧    ·",
];

/// Cosmic burst around the board after a win
async fn celebrate(board: &str) -> std::io::Result<()> {
    for frame in BURST_FRAMES {
        clear_screen()?;
        print_block(board)?;
        print_block(&format!("{}", frame.bright_magenta()))?;
        sleep(Duration::from_millis(150)).await;
    }
    Ok(())
}

/// Run the game screen until the player closes it
pub async fn run_game(session: &mut SessionState, mode: Mode) -> Result<(), Box<dyn std::error::Error>> {
    let delay = Duration::from_millis(session.config.ai_delay_ms);
    let (mut scheduler, mut ai_rx) = AiScheduler::new(delay);
    let mut input = InputReader::start()?;
    let mut message: Option<String> = None;

    let events = session.game.new_game(mode);
    handle_events(session, &mut scheduler, &events).await?;

    loop {
        tokio::select! {
            key = input.next() => {
                let Some(key) = key else { break };
                let Some(action) = action_for_key(&key) else { continue };
                message = None;

                let events = match action {
                    GameAction::Close => break,
                    GameAction::Cell(index) => match session.game.player_move(index) {
                        Ok(events) => events,
                        Err(e) => {
                            log::warn!("Move rejected: {e}");
                            message = Some(rejection_message(&e));
                            vec![]
                        }
                    },
                    GameAction::NewGame => {
                        scheduler.cancel();
                        session.game.reset()
                    }
                    GameAction::SwitchMode => {
                        scheduler.cancel();
                        let mode = session.game.mode().toggled();
                        session.game.new_game(mode)
                    }
                    GameAction::ResetScore => session.game.reset_score(),
                    GameAction::ToggleTheme => {
                        if let Err(e) = session.toggle_theme() {
                            log::warn!("Failed to save theme: {e}");
                            message = Some("Could not save theme preference".to_string());
                        }
                        apply_theme(session.config.theme);
                        vec![]
                    }
                };

                handle_events(session, &mut scheduler, &events).await?;
                if events.is_empty() {
                    redraw(session, message.as_deref())?;
                }
            }
            Some(generation) = ai_rx.recv() => {
                match session.game.ai_move(generation) {
                    Ok(events) => handle_events(session, &mut scheduler, &events).await?,
                    Err(e) => log::debug!("Dropped AI move: {e}"),
                }
            }
        }
    }

    scheduler.cancel();
    input.shutdown().await;
    session.activation.close();
    log::info!("Game closed, score {:?}", session.game.score());
    Ok(())
}

async fn handle_events(
    session: &SessionState,
    scheduler: &mut AiScheduler,
    events: &[GameEvent],
) -> std::io::Result<()> {
    let mut celebrate_win = false;
    for event in events {
        match event {
            GameEvent::StateChanged { snapshot } => log::debug!("State: {}", snapshot.to_json()),
            GameEvent::AiMoveScheduled { generation } => scheduler.schedule(*generation),
            GameEvent::Terminal { outcome } => celebrate_win = matches!(outcome, Outcome::Win(_)),
        }
    }

    if events.is_empty() {
        return Ok(());
    }

    let board = render_game(&session.game.snapshot(), &session.config, None);
    if celebrate_win {
        celebrate(&board).await?;
    }
    clear_screen()?;
    print_block(&board)
}

fn redraw(session: &SessionState, message: Option<&str>) -> std::io::Result<()> {
    clear_screen()?;
    print_block(&render_game(&session.game.snapshot(), &session.config, message))
}

fn rejection_message(error: &GameError) -> String {
    match error {
        GameError::CellOccupied(index) => format!("Cell {} is taken", index + 1),
        GameError::GameOver => "Game over, press n for a new game".to_string(),
        GameError::AiThinking | GameError::NotYourTurn => "Wait for your turn".to_string(),
        other => other.to_string(),
    }
}
