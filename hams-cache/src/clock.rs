//! Time sources for probes whose behaviour depends on elapsed time
//!
//! Components never read the wall clock directly. They are handed a [Clock] on
//! construction so that tests can move time along without sleeping.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Return the current time
    fn now(&self) -> SystemTime;
}

/// Any thread safe closure returning a [SystemTime] is a [Clock]
impl<F> Clock for F
where
    F: Fn() -> SystemTime + Send + Sync,
{
    fn now(&self) -> SystemTime {
        self()
    }
}

/// Real wall clock time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A clock which only moves when told to.
///
/// Clones share the same time so one handle can be given to the component
/// under test while another is used to advance it.
#[derive(Clone)]
pub struct ManualClock {
    now: Arc<Mutex<SystemTime>>,
}

impl ManualClock {
    /// Create a clock fixed at `start`
    pub fn new(start: SystemTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Set the clock to a specific time
    pub fn set(&self, time: SystemTime) {
        *self.lock() = time;
    }

    /// Move the clock forward by `by`
    pub fn advance(&self, by: Duration) {
        let mut now = self.lock();
        *now += by;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SystemTime> {
        // A poisoned clock still holds a valid time
        self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.lock()
    }
}

impl fmt::Debug for ManualClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ManualClock({:?})", self.now())
    }
}

impl fmt::Debug for dyn Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Clock({:?})", self.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_is_shared_between_clones() {
        let start = SystemTime::UNIX_EPOCH + Duration::from_secs(1_606_816_800);
        let clock = ManualClock::new(start);
        let handle = clock.clone();

        assert_eq!(clock.now(), start);

        handle.advance(Duration::from_secs(29));
        assert_eq!(clock.now(), start + Duration::from_secs(29));

        handle.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn closure_is_a_clock() {
        let fixed = SystemTime::UNIX_EPOCH + Duration::from_secs(10);
        let clock: Arc<dyn Clock> = Arc::new(move || fixed);

        assert_eq!(clock.now(), fixed);
    }

    #[test]
    fn system_clock_moves_forward() {
        let before = SystemTime::now();
        let now = SystemClock.now();

        assert!(now >= before);
    }
}
