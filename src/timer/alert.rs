use log::info;

/// Fired once per phase expiry. Implementations must return promptly; the
/// controller calls this while it holds the session lock.
pub trait AlertHook: Send + Sync {
    fn emit(&self);
}

impl<F> AlertHook for F
where
    F: Fn() + Send + Sync,
{
    fn emit(&self) {
        self()
    }
}

/// Used when sound is turned off.
pub struct SilentAlert;

impl AlertHook for SilentAlert {
    fn emit(&self) {
        info!("Phase expired (sound disabled)");
    }
}
