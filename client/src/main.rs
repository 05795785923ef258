pub mod config;
pub mod games;
pub mod landing;
pub mod scheduler;
pub mod state;
pub mod ui;

use std::fs::OpenOptions;
use std::io;

use colored::*;
use herb_common::Mode;
use rustyline::DefaultEditor;

use config::Config;
use landing::Landing;
use state::*;
use ui::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.json".to_string());

    if let Err(e) = start_app(&config_path).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Logs go to a file so they never end up on top of the board
fn init_logging(config: &Config) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    match &config.log_file {
        Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => {
                eprintln!("Cannot open log file {path}: {e}");
                builder.filter_level(log::LevelFilter::Off);
            }
        },
        None => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }

    let _ = builder.try_init();
}

async fn start_app(config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load_from(config_path)?;
    let rejected = config.apply_env_overrides();
    init_logging(&config);
    for warning in &rejected {
        log::warn!("{warning}");
    }

    let mut session = SessionState::from_config(config, config_path);
    apply_theme(session.config.theme);
    log::info!("Starting v{VERSION} with config {config_path}");

    loop {
        match landing::run_landing(&mut session).await? {
            Landing::Quit => {
                clear_screen()?;
                println!("{}", "Goodbye!".cyan());
                break;
            }
            Landing::Activated(trigger) => {
                log::info!("Activated via {trigger:?}");
                match read_mode_choice(session.config.default_mode)? {
                    Some(mode) => games::tic_tac_toe::run_game(&mut session, mode).await?,
                    None => session.activation.close(),
                }
            }
        }
    }

    Ok(())
}

fn display_menu(title: &str, items: &[(String, String)]) {
    clear_screen().ok();

    println!();
    println!("{}", "🌿 Herb Tic Tac Toe 🌙".bright_magenta().bold());
    println!("{}", "A cosmic twist on the classic game!".dimmed());
    println!();

    println!("{}", title.dimmed());
    println!();

    for (num, text) in items {
        println!("  {}. {}", num.bright_yellow(), text);
    }

    println!();
}

/// Ask which mode to play. None means go back to the landing screen.
fn read_mode_choice(default_mode: Mode) -> io::Result<Option<Mode>> {
    let menu_items = vec![
        ("1".to_string(), "Play vs AI".to_string()),
        ("2".to_string(), "Play vs a friend".to_string()),
        ("3".to_string(), "Back".to_string()),
    ];

    display_menu(&format!("Enter for {default_mode}"), &menu_items);

    let mut rl = DefaultEditor::new().map_err(io::Error::other)?;

    loop {
        match rl.readline("Select option: ") {
            Ok(line) => match line.trim() {
                "" => return Ok(Some(default_mode)),
                "1" => return Ok(Some(Mode::VsAi)),
                "2" => return Ok(Some(Mode::VsHuman)),
                "3" => return Ok(None),
                _ => {
                    println!("{}", format!("Invalid choice. Please enter 1-{}.", menu_items.len()).red());
                }
            },
            Err(_) => return Ok(None),
        }
    }
}
