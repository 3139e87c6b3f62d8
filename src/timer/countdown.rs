use std::sync::Arc;

use tokio::sync::{Mutex, Notify};
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::{AlertHook, Phase, SessionState};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Everything a countdown task shares with the controller.
#[derive(Clone)]
pub(crate) struct CountdownContext {
    pub state: Arc<Mutex<SessionState>>,
    pub resume: Arc<Notify>,
    pub alert: Arc<dyn AlertHook>,
    pub tick_interval: Duration,
}

#[derive(Debug, PartialEq, Eq)]
enum PhaseOutcome {
    Expired,
    Superseded,
}

/// Drives one session run: the Focus countdown, then the Break countdown,
/// then back to Idle. Exits silently as soon as its generation goes stale.
pub(crate) async fn countdown_task(
    ctx: CountdownContext,
    mut generation: u64,
    cancel_token: CancellationToken,
) {
    loop {
        if run_phase(&ctx, generation, &cancel_token).await == PhaseOutcome::Superseded {
            log_debug!("countdown generation {} stopped", generation);
            return;
        }

        let mut guard = ctx.state.lock().await;
        if !guard.owns(generation) {
            return;
        }

        // Must stay under the lock: a reset that got here first has already
        // made this generation stale.
        ctx.alert.emit();

        match guard.phase {
            Phase::Focus => {
                generation = guard.begin_break();
                log_info!(
                    "Focus finished; break started for {}s",
                    guard.total_secs
                );
            }
            Phase::Break | Phase::Idle => {
                guard.reset();
                log_info!("Break finished; session back to idle");
                return;
            }
        }
    }
}

async fn run_phase(
    ctx: &CountdownContext,
    generation: u64,
    cancel_token: &CancellationToken,
) -> PhaseOutcome {
    let period = ctx.tick_interval;
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let paused = {
            let guard = ctx.state.lock().await;
            if !guard.owns(generation) {
                return PhaseOutcome::Superseded;
            }
            if guard.is_expired() {
                return PhaseOutcome::Expired;
            }
            guard.paused
        };

        if paused {
            tokio::select! {
                _ = ctx.resume.notified() => {
                    // Full second after resuming before the next decrement.
                    ticker.reset();
                    continue;
                }
                _ = cancel_token.cancelled() => return PhaseOutcome::Superseded,
            }
        }

        tokio::select! {
            _ = ticker.tick() => {}
            _ = cancel_token.cancelled() => return PhaseOutcome::Superseded,
        }

        let mut guard = ctx.state.lock().await;
        if !guard.owns(generation) {
            return PhaseOutcome::Superseded;
        }
        guard.tick();
    }
}
