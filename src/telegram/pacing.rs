use std::time::Duration;

/// Where pacing and retry delays are spent.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// Blocks the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
