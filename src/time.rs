use std::cell::OnceCell;
use std::time::Instant;

/// Monotonic seconds, measured from the first reading.
#[derive(Debug, Default)]
pub(crate) struct Clock {
    epoch: OnceCell<Instant>,
}

impl Clock {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Seconds since the first call.  The first call returns exactly `0.0`.
    pub(crate) fn seconds(&self) -> f64 {
        let now = Instant::now();
        let epoch = *self.epoch.get_or_init(|| now);
        now.saturating_duration_since(epoch).as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_reading_is_zero() {
        let clock = Clock::new();
        assert_eq!(clock.seconds(), 0.0);
    }

    #[test]
    fn readings_never_decrease() {
        let clock = Clock::new();
        let mut last = clock.seconds();
        for _ in 0..1000 {
            let t = clock.seconds();
            assert!(t >= last);
            last = t;
        }
    }

    #[test]
    fn tracks_wall_time() {
        let clock = Clock::new();
        clock.seconds();
        std::thread::sleep(std::time::Duration::from_millis(20));
        assert!(clock.seconds() >= 0.02);
    }
}
