/// Millisecond clock and sleep primitive injected into the transmitter
///
/// Timestamps are `u32` milliseconds since an arbitrary origin and wrap
/// like a firmware uptime counter. Elapsed time must be computed with
/// `wrapping_sub`.
use std::cell::Cell;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

pub trait Clock {
    /// Current uptime in milliseconds
    fn now_ms(&self) -> u32;

    /// Yield for `ms` milliseconds
    fn sleep_ms(&self, ms: u32);

    /// Milliseconds elapsed since `since`
    fn elapsed_since(&self, since: u32) -> u32 {
        self.now_ms().wrapping_sub(since)
    }
}

/// Wall clock backed by `Instant`, origin at construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u32 {
        self.origin.elapsed().as_millis() as u32
    }

    fn sleep_ms(&self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

/// Simulated clock for deterministic tests
///
/// Clones share the same time source, so a radio double can hold one
/// clone while the transmitter holds another. Sleeping advances time
/// instantly.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<u32>>,
}

impl ManualClock {
    /// Create a clock reading `start_ms`
    pub fn starting_at(start_ms: u32) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn advance_ms(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }

    pub fn set_ms(&self, ms: u32) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }

    fn sleep_ms(&self, ms: u32) {
        self.advance_ms(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::starting_at(1000);
        let other = clock.clone();

        clock.sleep_ms(25);
        assert_eq!(other.now_ms(), 1025);

        other.set_ms(5);
        assert_eq!(clock.now_ms(), 5);
    }

    #[test]
    fn test_elapsed_wraps() {
        let clock = ManualClock::starting_at(u32::MAX - 4);
        let start = clock.now_ms();
        clock.advance_ms(10);
        assert_eq!(clock.now_ms(), 5);
        assert_eq!(clock.elapsed_since(start), 10);
    }

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        clock.sleep_ms(2);
        assert!(clock.now_ms() >= a + 2);
    }
}
