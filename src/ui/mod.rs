pub mod app;
pub mod render;

pub use app::App;

use std::io::{stdout, Stdout, Write};
use std::panic;
use std::sync::Once;

use anyhow::{Context, Result};
use crossterm::{
    terminal::{
        disable_raw_mode, enable_raw_mode, is_raw_mode_enabled, EnterAlternateScreen,
        LeaveAlternateScreen, SetTitle,
    },
    ExecutableCommand,
};
use log::debug;
use ratatui::{backend::CrosstermBackend, Terminal};

pub const WINDOW_TITLE: &str = "Soft Pomodoro";

type Tui = Terminal<CrosstermBackend<Stdout>>;

static PANIC_HOOK: Once = Once::new();

/// Chains a panic hook that hands the terminal back before the previous
/// hook prints the message. Installed once per process.
pub fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if is_raw_mode_enabled().unwrap_or(false) {
                let _ = disable_raw_mode();
                let _ = stdout().execute(LeaveAlternateScreen);
            }
            previous(info);
        }));
    });
}

fn enter() -> Result<Tui> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut out = stdout();
    out.execute(EnterAlternateScreen)
        .context("Failed to enter the alternate screen")?;
    set_title(&mut out);

    let mut terminal = Terminal::new(CrosstermBackend::new(out))?;
    terminal.hide_cursor()?;
    terminal.clear()?;
    Ok(terminal)
}

/// Best effort: a terminal that rejects the title only leaves a log record.
fn set_title<W: Write>(out: &mut W) -> bool {
    match out.execute(SetTitle(WINDOW_TITLE)) {
        Ok(_) => true,
        Err(err) => {
            debug!("terminal rejected the window title: {err}");
            false
        }
    }
}

fn leave(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    terminal
        .backend_mut()
        .execute(LeaveAlternateScreen)
        .context("Failed to leave the alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

/// Owns the terminal for the lifetime of `app` and always hands it back.
pub async fn run_app(app: &mut App) -> Result<()> {
    install_panic_hook();
    let mut terminal = match enter() {
        Ok(terminal) => terminal,
        Err(err) => {
            let _ = disable_raw_mode();
            let _ = stdout().execute(LeaveAlternateScreen);
            return Err(err);
        }
    };

    let result = app.run(&mut terminal).await;
    let restored = leave(&mut terminal);
    result.and(restored)
}
