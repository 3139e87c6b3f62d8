use std::{sync::Arc, time::Duration};

use log::{debug, info};
use tokio::{
    sync::{Mutex, Notify},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use super::countdown::{countdown_task, CountdownContext};
use super::{AlertHook, SessionState, TimerSnapshot};

struct Ticker {
    handle: JoinHandle<()>,
    cancel_token: CancellationToken,
}

impl Ticker {
    fn stop(self) {
        self.cancel_token.cancel();
        self.handle.abort();
    }
}

#[derive(Clone)]
pub struct TimerController {
    state: Arc<Mutex<SessionState>>,
    ticker: Arc<Mutex<Option<Ticker>>>,
    resume: Arc<Notify>,
    alert: Arc<dyn AlertHook>,
    tick_interval: Duration,
}

impl TimerController {
    pub fn new(focus_minutes: i64, break_minutes: i64, alert: Arc<dyn AlertHook>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::new(focus_minutes, break_minutes))),
            ticker: Arc::new(Mutex::new(None)),
            resume: Arc::new(Notify::new()),
            alert,
            tick_interval: Duration::from_secs(1),
        }
    }

    pub async fn get_state(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    pub async fn current_display(&self) -> TimerSnapshot {
        self.state.lock().await.snapshot()
    }

    pub async fn start(&self) {
        // The state lock is held until the new ticker is stored, so a racing
        // reset or start cannot interleave between the two.
        let mut state = self.state.lock().await;
        if state.running {
            debug!("start ignored: {} already running", state.phase.label());
            return;
        }

        let generation = state.begin_focus();
        info!(
            "Focus started for {}s (generation {})",
            state.total_secs, generation
        );

        self.spawn_ticker(generation).await;
    }

    pub async fn pause_toggle(&self) {
        let mut state = self.state.lock().await;
        if !state.toggle_pause() {
            debug!("pause ignored: timer is idle");
            return;
        }

        if state.paused {
            info!("Paused with {}s remaining", state.remaining_secs);
        } else {
            info!("Resumed with {}s remaining", state.remaining_secs);
            self.resume.notify_one();
        }
    }

    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        let was = state.phase;
        state.reset();
        self.cancel_ticker().await;
        info!("Reset from {}", was.label());
    }

    pub async fn set_focus_minutes(&self, minutes: i64) {
        self.state.lock().await.focus_minutes = minutes;
    }

    pub async fn set_break_minutes(&self, minutes: i64) {
        self.state.lock().await.break_minutes = minutes;
    }

    async fn spawn_ticker(&self, generation: u64) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(previous) = ticker_guard.take() {
            previous.stop();
        }

        let ctx = CountdownContext {
            state: self.state.clone(),
            resume: self.resume.clone(),
            alert: self.alert.clone(),
            tick_interval: self.tick_interval,
        };
        let cancel_token = CancellationToken::new();
        let handle = tokio::spawn(countdown_task(ctx, generation, cancel_token.clone()));

        *ticker_guard = Some(Ticker {
            handle,
            cancel_token,
        });
    }

    async fn cancel_ticker(&self) {
        if let Some(ticker) = self.ticker.lock().await.take() {
            ticker.stop();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::timer::Phase;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    fn counting_controller(focus: i64, rest: i64) -> (TimerController, Arc<AtomicUsize>) {
        let alerts = Arc::new(AtomicUsize::new(0));
        let counter = alerts.clone();
        let controller = TimerController::new(
            focus,
            rest,
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        (controller, alerts)
    }

    mod start {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn should_begin_focus_with_full_countdown() {
            let (controller, _) = counting_controller(25, 5);
            controller.start().await;

            let snapshot = controller.current_display().await;
            assert_eq!(snapshot.remaining_secs, 1500);
            assert_eq!(snapshot.total_secs, 1500);
            assert_eq!(snapshot.phase, Phase::Focus);
            assert!(snapshot.running);
        }

        #[tokio::test(start_paused = true)]
        async fn should_be_idempotent_while_running() {
            let (controller, _) = counting_controller(1, 1);
            controller.start().await;
            let once = controller.get_state().await;
            controller.start().await;
            let twice = controller.get_state().await;

            assert_eq!(once.snapshot(), twice.snapshot());
            assert_eq!(once.generation, twice.generation);

            // Two live loops would drain the countdown twice as fast.
            sleep(Duration::from_millis(5_500)).await;
            assert_eq!(controller.current_display().await.remaining_secs, 55);
        }

        #[tokio::test(start_paused = true)]
        async fn should_expire_an_empty_focus_immediately() {
            let (controller, alerts) = counting_controller(0, 1);
            controller.start().await;
            sleep(Duration::from_millis(500)).await;

            let snapshot = controller.current_display().await;
            assert_eq!(snapshot.phase, Phase::Break);
            assert_eq!(snapshot.remaining_secs, 60);
            assert_eq!(alerts.load(Ordering::SeqCst), 1);
        }

        #[tokio::test(start_paused = true)]
        async fn should_go_straight_to_idle_after_an_empty_break() {
            let (controller, alerts) = counting_controller(1, 0);
            controller.start().await;
            sleep(Duration::from_millis(60_500)).await;

            let snapshot = controller.current_display().await;
            assert_eq!(
                (snapshot.remaining_secs, snapshot.total_secs, snapshot.phase),
                (0, 0, Phase::Idle)
            );
            assert!(!snapshot.running);
            assert_eq!(alerts.load(Ordering::SeqCst), 2);
        }
    }

    mod pause_toggle {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn should_do_nothing_when_idle() {
            let (controller, _) = counting_controller(1, 1);
            controller.pause_toggle().await;

            let snapshot = controller.current_display().await;
            assert!(!snapshot.paused);
            assert_eq!(snapshot.phase, Phase::Idle);
        }

        #[tokio::test(start_paused = true)]
        async fn should_freeze_the_countdown_until_resumed() {
            let (controller, _) = counting_controller(1, 1);
            controller.start().await;
            sleep(Duration::from_millis(3_500)).await;
            controller.pause_toggle().await;

            sleep(Duration::from_secs(30)).await;
            let snapshot = controller.current_display().await;
            assert!(snapshot.paused);
            assert_eq!(snapshot.remaining_secs, 57);

            controller.pause_toggle().await;
            sleep(Duration::from_millis(2_500)).await;
            let snapshot = controller.current_display().await;
            assert!(!snapshot.paused);
            assert_eq!(snapshot.remaining_secs, 55);
        }

        #[tokio::test(start_paused = true)]
        async fn should_restore_state_after_two_toggles() {
            let (controller, _) = counting_controller(1, 1);
            controller.start().await;
            let before = controller.current_display().await;

            controller.pause_toggle().await;
            controller.pause_toggle().await;

            assert_eq!(controller.current_display().await, before);
        }
    }

    mod set_minutes {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn should_not_touch_the_phase_in_progress() {
            let (controller, _) = counting_controller(1, 1);
            controller.start().await;
            controller.set_focus_minutes(10).await;
            controller.set_break_minutes(2).await;

            let snapshot = controller.current_display().await;
            assert_eq!(snapshot.total_secs, 60);

            sleep(Duration::from_millis(60_500)).await;
            let snapshot = controller.current_display().await;
            assert_eq!(snapshot.phase, Phase::Break);
            assert_eq!(snapshot.total_secs, 120);

            controller.reset().await;
            controller.start().await;
            assert_eq!(controller.current_display().await.total_secs, 600);
        }
    }

    mod reset {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn should_suppress_the_pending_alert() {
            let (controller, alerts) = counting_controller(1, 1);
            controller.start().await;
            sleep(Duration::from_millis(59_500)).await;
            controller.reset().await;
            sleep(Duration::from_secs(5)).await;

            assert_eq!(alerts.load(Ordering::SeqCst), 0);
            assert_eq!(controller.current_display().await.phase, Phase::Idle);
        }

        #[tokio::test(start_paused = true)]
        async fn should_allow_a_clean_restart() {
            let (controller, _) = counting_controller(1, 1);
            controller.start().await;
            sleep(Duration::from_millis(10_500)).await;
            controller.reset().await;
            controller.start().await;
            sleep(Duration::from_millis(3_500)).await;

            let snapshot = controller.current_display().await;
            assert_eq!(snapshot.phase, Phase::Focus);
            assert_eq!(snapshot.remaining_secs, 57);
        }

        #[tokio::test(start_paused = true)]
        async fn should_end_a_break_without_a_second_alert() {
            let (controller, alerts) = counting_controller(1, 1);
            controller.start().await;
            sleep(Duration::from_millis(70_500)).await;
            assert_eq!(controller.current_display().await.phase, Phase::Break);

            controller.reset().await;
            let snapshot = controller.current_display().await;
            assert_eq!(
                (snapshot.remaining_secs, snapshot.total_secs, snapshot.phase),
                (0, 0, Phase::Idle)
            );

            sleep(Duration::from_secs(120)).await;
            assert_eq!(controller.current_display().await.phase, Phase::Idle);
            assert_eq!(alerts.load(Ordering::SeqCst), 1);
        }

        #[tokio::test(start_paused = true)]
        async fn should_release_a_parked_countdown() {
            let (controller, alerts) = counting_controller(1, 1);
            controller.start().await;
            sleep(Duration::from_millis(5_500)).await;
            controller.pause_toggle().await;

            // Let the loop see the pause and park before cancelling it.
            sleep(Duration::from_secs(1)).await;
            assert_eq!(controller.current_display().await.remaining_secs, 55);

            controller.reset().await;
            controller.start().await;
            sleep(Duration::from_millis(3_500)).await;

            let snapshot = controller.current_display().await;
            assert_eq!(snapshot.phase, Phase::Focus);
            assert_eq!(snapshot.remaining_secs, 57);
            assert!(!snapshot.paused);
            assert_eq!(alerts.load(Ordering::SeqCst), 0);
        }
    }
}
