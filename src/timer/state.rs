pub const DEFAULT_FOCUS_MINUTES: i64 = 25;
pub const DEFAULT_BREAK_MINUTES: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Focus,
    Break,
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Idle
    }
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Focus => "Focus",
            Phase::Break => "Break",
        }
    }
}

/// What the render loop sees on each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub remaining_secs: u64,
    pub total_secs: u64,
    pub phase: Phase,
    pub running: bool,
    pub paused: bool,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub focus_minutes: i64,
    pub break_minutes: i64,
    pub phase: Phase,
    pub total_secs: u64,
    pub remaining_secs: u64,
    pub running: bool,
    pub paused: bool,
    /// Bumped whenever a phase begins or the session resets. A countdown loop
    /// only mutates the session while its own generation is current.
    pub generation: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            focus_minutes: DEFAULT_FOCUS_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
            phase: Phase::Idle,
            total_secs: 0,
            remaining_secs: 0,
            running: false,
            paused: false,
            generation: 0,
        }
    }
}

/// Zero and negative minutes collapse to an empty phase.
pub fn minutes_to_secs(minutes: i64) -> u64 {
    u64::try_from(minutes.saturating_mul(60)).unwrap_or(0)
}

impl SessionState {
    pub fn new(focus_minutes: i64, break_minutes: i64) -> Self {
        Self {
            focus_minutes,
            break_minutes,
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs,
            phase: self.phase,
            running: self.running,
            paused: self.paused,
        }
    }

    /// True while the loop started under `generation` is still the live one.
    pub fn owns(&self, generation: u64) -> bool {
        self.running && self.generation == generation
    }

    pub fn begin_focus(&mut self) -> u64 {
        let total = minutes_to_secs(self.focus_minutes);
        self.begin_phase(Phase::Focus, total)
    }

    pub fn begin_break(&mut self) -> u64 {
        let total = minutes_to_secs(self.break_minutes);
        self.begin_phase(Phase::Break, total)
    }

    fn begin_phase(&mut self, phase: Phase, total_secs: u64) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.phase = phase;
        self.total_secs = total_secs;
        self.remaining_secs = total_secs;
        self.running = true;
        self.paused = false;
        self.generation
    }

    /// Returns whether the toggle applied.
    pub fn toggle_pause(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.paused = !self.paused;
        true
    }

    /// One elapsed second. Returns whether `remaining_secs` changed.
    pub fn tick(&mut self) -> bool {
        if !self.running || self.paused || self.remaining_secs == 0 {
            return false;
        }
        self.remaining_secs -= 1;
        true
    }

    pub fn is_expired(&self) -> bool {
        self.running && self.remaining_secs == 0
    }

    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.phase = Phase::Idle;
        self.total_secs = 0;
        self.remaining_secs = 0;
        self.running = false;
        self.paused = false;
    }
}
