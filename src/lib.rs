pub mod audio;
pub mod cli;
pub mod settings;
pub mod timer;
pub mod ui;
pub mod utils;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use audio::AlertPlayer;
use cli::Args;
use settings::Settings;
use timer::{AlertHook, SilentAlert, TimerController};
use ui::App;

pub fn build_alert(settings: &Settings) -> Arc<dyn AlertHook> {
    if settings.alert.enabled {
        Arc::new(AlertPlayer::new(settings.alert.clone()))
    } else {
        Arc::new(SilentAlert)
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::resolve(&args)?;

    utils::init_logging(&settings.log_file, settings.debug)?;
    log::info!("Soft Pomodoro starting up...");
    log::info!(
        "focus {}m, break {}m, sound {}",
        settings.focus_minutes,
        settings.break_minutes,
        if settings.alert.enabled { "on" } else { "off" }
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(async {
        let controller = TimerController::new(
            settings.focus_minutes,
            settings.break_minutes,
            build_alert(&settings),
        );
        let mut app = App::new(controller.clone(), &settings);

        let result = ui::run_app(&mut app).await;
        controller.reset().await;
        result
    })?;

    log::info!("Soft Pomodoro shut down");
    Ok(())
}
