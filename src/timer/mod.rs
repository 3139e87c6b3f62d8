pub mod alert;
pub mod controller;
mod countdown;
pub mod state;

pub use alert::{AlertHook, SilentAlert};
pub use controller::TimerController;
pub use state::{Phase, SessionState, TimerSnapshot};
