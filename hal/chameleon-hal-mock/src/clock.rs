//! Simulated time

use core::cell::Cell;

use chameleon_hal::Clock;
use embedded_hal::delay::DelayNs;

/// Monotonic clock that only moves when told to
///
/// Interior mutability lets the clock be shared by reference between the
/// event bus, the frame scheduler, and test applications that simulate
/// work by advancing it.
#[derive(Debug, Default)]
pub struct MockClock {
    now_ns: Cell<u64>,
}

impl MockClock {
    /// Create a clock at t = 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock starting at the given time
    pub fn starting_at_us(us: u64) -> Self {
        Self {
            now_ns: Cell::new(us * 1000),
        }
    }

    /// Advance by microseconds
    pub fn advance_us(&self, us: u64) {
        self.advance_ns(us * 1000);
    }

    /// Advance by nanoseconds
    pub fn advance_ns(&self, ns: u64) {
        self.now_ns.set(self.now_ns.get() + ns);
    }

    /// Current time in nanoseconds
    pub fn now_ns(&self) -> u64 {
        self.now_ns.get()
    }
}

impl Clock for MockClock {
    fn now_us(&self) -> u64 {
        self.now_ns.get() / 1000
    }
}

/// Delay provider that advances a [`MockClock`] instead of sleeping
#[derive(Debug)]
pub struct MockDelay<'c> {
    clock: &'c MockClock,
    total_ns: u64,
    calls: u32,
}

impl<'c> MockDelay<'c> {
    /// Create a delay bound to a clock
    pub fn new(clock: &'c MockClock) -> Self {
        Self {
            clock,
            total_ns: 0,
            calls: 0,
        }
    }

    /// Total time slept, in microseconds
    pub fn total_us(&self) -> u64 {
        self.total_ns / 1000
    }

    /// Number of delay requests (a long delay may be split into several)
    pub fn calls(&self) -> u32 {
        self.calls
    }
}

impl DelayNs for MockDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.advance_ns(ns as u64);
        self.total_ns += ns as u64;
        self.calls += 1;
    }
}
