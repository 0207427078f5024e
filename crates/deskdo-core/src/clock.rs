use chrono::{DateTime, Local};

/// Source of the current time, used for `created_at` and id generation.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// Wall-clock time of the local machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
