pub mod chime;

use chime::Chime;

use anyhow::{anyhow, Result};
use rodio::{OutputStream, Sink};
use std::sync::{
    mpsc::{self, Sender},
    Arc, Mutex,
};
use std::thread;
use std::time::Duration;

use crate::settings::AlertSettings;
use crate::timer::AlertHook;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_warn};

enum AudioCommand {
    Chime {
        frequency: f32,
        duration: Duration,
        volume: f32,
    },
}

/// Plays alert chimes on a dedicated thread that owns the non-Send output
/// stream. Sending never blocks the caller.
pub struct AlertPlayer {
    tx: Arc<Mutex<Option<Sender<AudioCommand>>>>,
    settings: AlertSettings,
}

impl AlertPlayer {
    pub fn new(settings: AlertSettings) -> Self {
        Self {
            tx: Arc::new(Mutex::new(None)),
            settings,
        }
    }

    fn ensure_thread(&self) -> Result<Sender<AudioCommand>> {
        let mut guard = self.tx.lock().map_err(|e| anyhow!(e.to_string()))?;
        if let Some(tx) = guard.as_ref() {
            return Ok(tx.clone());
        }

        let (tx, rx) = mpsc::channel::<AudioCommand>();

        thread::Builder::new()
            .name("audio-alert".to_string())
            .spawn(move || {
                let mut _stream: Option<OutputStream> = None;
                let mut sink: Option<Sink> = None;

                fn ensure_sink(
                    stream: &mut Option<OutputStream>,
                    sink: &mut Option<Sink>,
                ) -> Result<()> {
                    if sink.is_none() {
                        let (s, handle) = OutputStream::try_default()
                            .map_err(|e| anyhow!("Failed to create audio output stream: {}", e))?;
                        let new_sink = Sink::try_new(&handle)
                            .map_err(|e| anyhow!("Failed to create audio sink: {}", e))?;
                        *stream = Some(s);
                        *sink = Some(new_sink);
                    }
                    Ok(())
                }

                while let Ok(cmd) = rx.recv() {
                    match cmd {
                        AudioCommand::Chime {
                            frequency,
                            duration,
                            volume,
                        } => {
                            if let Err(err) = ensure_sink(&mut _stream, &mut sink) {
                                log_warn!("alert chime dropped: {err:#}");
                                continue;
                            }
                            if let Some(ref s) = sink {
                                s.append(Chime::new(frequency, duration, volume));
                            }
                        }
                    }
                }
                log_debug!("audio-alert thread exiting");
            })
            .map_err(|e| anyhow!("Failed to spawn audio thread: {e}"))?;

        *guard = Some(tx.clone());
        Ok(tx)
    }

    pub fn chime(&self) -> Result<()> {
        let tx = self.ensure_thread()?;
        tx.send(AudioCommand::Chime {
            frequency: self.settings.frequency_hz,
            duration: Duration::from_millis(self.settings.duration_ms),
            volume: self.settings.volume,
        })
        .map_err(|e| anyhow!(e.to_string()))
    }
}

impl AlertHook for AlertPlayer {
    fn emit(&self) {
        if let Err(err) = self.chime() {
            log_error!("Failed to queue alert chime: {err:#}");
        }
    }
}
