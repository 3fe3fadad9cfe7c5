/*
 * A cancellable delayed trigger used to coalesce bursts of input events into a
 * single action. The debouncer holds no clock of its own: the caller arms it,
 * schedules a timer for `delay()` with whatever timer facility it has, and
 * calls `fire()` when that timer elapses. Every `arm()` supersedes the
 * previous one by bumping a generation counter; a tick that arrives after a
 * cancel finds nothing pending and is discarded.
 */
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    pending_generation: Option<u64>,
    next_generation: u64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            pending_generation: None,
            next_generation: 1,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Delay in whole milliseconds, saturated to `u32` for native timer APIs.
    pub fn delay_millis_u32(&self) -> u32 {
        u32::try_from(self.delay.as_millis()).unwrap_or(u32::MAX)
    }

    pub fn is_pending(&self) -> bool {
        self.pending_generation.is_some()
    }

    /*
     * Arms the trigger, replacing any pending one, and returns the generation
     * of the new arming.
     */
    pub fn arm(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        if let Some(previous) = self.pending_generation.replace(generation) {
            log::trace!("Debouncer: Generation {previous} superseded by {generation}.");
        }
        generation
    }

    /// Cancels a pending trigger. Returns true if something was pending.
    pub fn cancel(&mut self) -> bool {
        self.pending_generation.take().is_some()
    }

    /*
     * Consumes the pending trigger, if any. Returns the generation that fired;
     * `None` means the tick is stale and must be ignored.
     */
    pub fn fire(&mut self) -> Option<u64> {
        self.pending_generation.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_debouncer_is_idle() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.delay(), Duration::from_millis(500));
        assert_eq!(debouncer.delay_millis_u32(), 500);
        assert_eq!(debouncer.fire(), None);
    }

    #[test]
    fn test_arm_then_fire_consumes_once() {
        let mut debouncer = Debouncer::new(Duration::from_millis(100));
        let generation = debouncer.arm();

        assert!(debouncer.is_pending());
        assert_eq!(debouncer.fire(), Some(generation));
        assert_eq!(debouncer.fire(), None, "A second tick must not fire again");
    }

    #[test]
    fn test_burst_of_arms_fires_once_with_latest_generation() {
        let mut debouncer = Debouncer::new(Duration::from_millis(100));
        let first = debouncer.arm();
        let second = debouncer.arm();
        let third = debouncer.arm();

        assert!(first < second && second < third);
        assert_eq!(debouncer.fire(), Some(third));
        assert_eq!(debouncer.fire(), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_cancel_discards_pending_tick() {
        let mut debouncer = Debouncer::new(Duration::from_millis(100));
        debouncer.arm();

        assert!(debouncer.cancel());
        assert!(!debouncer.cancel(), "Nothing left to cancel");
        assert_eq!(debouncer.fire(), None);
    }

    #[test]
    fn test_delay_millis_saturates() {
        let debouncer = Debouncer::new(Duration::from_secs(u64::MAX / 1000));
        assert_eq!(debouncer.delay_millis_u32(), u32::MAX);
    }
}
