//! The timestamp source drawables measure their draw durations with.

/// A monotonic tick counter. The unit (microseconds, milliseconds, core cycles) is whatever the
/// platform provides; durations are reported in the same unit.
pub trait Clock {
    fn now(&self) -> u32;

    /// Ticks elapsed since `start`, a value previously returned by `now`. Implementations must
    /// handle counter wrap-around.
    fn elapsed_since(&self, start: u32) -> u32 {
        self.now().wrapping_sub(start)
    }
}


#[cfg(test)]
mod tests {
    use super::fake::FakeClock;
    use super::Clock;

    #[test]
    fn elapsed_wraps() {
        let clock = FakeClock::new(u32::max_value() - 5);
        let start = clock.now();
        clock.advance(10);
        assert_eq!(clock.elapsed_since(start), 10);
    }
}
