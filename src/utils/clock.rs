//! Time sources for episode timing.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Monotonic time in seconds since an arbitrary origin.
pub trait Clock {
    fn now(&self) -> f64;
}

/// Wall clock backed by `Instant`.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self { Self { origin: Instant::now() } }
}

impl Default for SystemClock {
    fn default() -> Self { Self::new() }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 { self.origin.elapsed().as_secs_f64() }
}

/// Clock advanced by hand. Clones share the same reading.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self { Self::default() }

    pub fn set(&self, seconds: f64) { self.bits.store(seconds.to_bits(), Ordering::SeqCst) }

    pub fn advance(&self, seconds: f64) { self.set(self.now() + seconds) }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 { f64::from_bits(self.bits.load(Ordering::SeqCst)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_is_shared() {
        let c = ManualClock::new();
        let view = c.clone();
        assert_eq!(view.now(), 0.0);
        c.advance(1.5);
        c.advance(0.5);
        assert_eq!(view.now(), 2.0);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let c = SystemClock::new();
        let a = c.now();
        let b = c.now();
        assert!(b >= a);
    }
}
