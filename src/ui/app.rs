use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use tokio::time::{self, MissedTickBehavior};

use super::render::{self, DialView};
use crate::settings::Settings;
use crate::timer::TimerController;

const MIN_MINUTES: i64 = 1;
const MAX_MINUTES: i64 = 999;

/// The window: key handling plus the fixed-cadence redraw. It only ever
/// reads the timer, except through the Start/Pause/Reset actions.
pub struct App {
    controller: TimerController,
    focus_minutes: i64,
    break_minutes: i64,
    frame_interval: Duration,
    should_quit: bool,
}

impl App {
    pub fn new(controller: TimerController, settings: &Settings) -> Self {
        Self {
            controller,
            focus_minutes: settings.focus_minutes,
            break_minutes: settings.break_minutes,
            frame_interval: Duration::from_millis(settings.frame_interval_ms.max(1)),
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub(crate) fn focus_minutes(&self) -> i64 {
        self.focus_minutes
    }

    pub(crate) fn break_minutes(&self) -> i64 {
        self.break_minutes
    }

    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let mut frames = time::interval(self.frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while !self.should_quit {
            frames.tick().await;
            self.handle_events().await?;
            self.render(terminal).await?;
        }

        Ok(())
    }

    /// Drains pending input without waiting for more.
    async fn handle_events(&mut self) -> Result<()> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key).await;
                }
            }
        }
        Ok(())
    }

    /// One redraw. Reads a snapshot and never touches the session.
    pub async fn render<B: Backend>(&self, terminal: &mut Terminal<B>) -> Result<()> {
        let snapshot = self.controller.current_display().await;
        let view = DialView::new(&snapshot, self.focus_minutes, self.break_minutes);
        terminal.draw(|frame| render::draw(frame, &view))?;
        Ok(())
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        let running = self.controller.current_display().await.running;

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('s') if !running => self.controller.start().await,
            KeyCode::Char('p') | KeyCode::Char(' ') if running => {
                self.controller.pause_toggle().await
            }
            KeyCode::Char('r') if running => self.controller.reset().await,
            KeyCode::Char('f') => self.adjust_focus(1).await,
            KeyCode::Char('F') => self.adjust_focus(-1).await,
            KeyCode::Char('b') => self.adjust_break(1).await,
            KeyCode::Char('B') => self.adjust_break(-1).await,
            _ => {}
        }
    }

    async fn adjust_focus(&mut self, delta: i64) {
        self.focus_minutes = (self.focus_minutes + delta).clamp(MIN_MINUTES, MAX_MINUTES);
        self.controller.set_focus_minutes(self.focus_minutes).await;
    }

    async fn adjust_break(&mut self, delta: i64) {
        self.break_minutes = (self.break_minutes + delta).clamp(MIN_MINUTES, MAX_MINUTES);
        self.controller.set_break_minutes(self.break_minutes).await;
    }
}
