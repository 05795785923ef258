use colored::*;
use crossterm::event::KeyCode;
use herb_common::Trigger;
use std::io;

use crate::state::SessionState;
use crate::ui::*;

pub enum Landing {
    Activated(Trigger),
    Quit,
}

fn display_landing() -> io::Result<()> {
    clear_screen()?;

    let banner = [
        "      .        *          .     ✦        .",
        "  ✦        C O D E V E R S E        *     ",
        "       .        ✧       .        .      ✦ ",
    ];
    print_block("\n")?;
    for line in banner {
        print_block(&format!("{}", line.bright_magenta()))?;
    }
    print_block("")?;
    print_block(&format!("{}", format!("v{VERSION}").dimmed()))?;
    print_block("")?;
    print_block(&format!("{}", "Something is hidden among the stars...".bright_cyan()))?;
    print_block(&format!("{}", "Try typing \"initiate()\" to discover something special.".bright_magenta()))?;
    print_block("")?;
    print_block(&format!("{}", "Esc to leave".dimmed()))?;
    Ok(())
}

/// Wait on the landing screen until the game is activated or the user quits
pub async fn run_landing(state: &mut SessionState) -> io::Result<Landing> {
    display_landing()?;

    let mut input = InputReader::start()?;
    let result = loop {
        let Some(key) = input.next().await else {
            break Landing::Quit;
        };

        if is_ctrl_c(&key) || key.code == KeyCode::Esc {
            break Landing::Quit;
        }

        if let Some(trigger) = state.activation.feed(to_activation_key(&key)) {
            break Landing::Activated(trigger);
        }
    };
    input.shutdown().await;

    Ok(result)
}
