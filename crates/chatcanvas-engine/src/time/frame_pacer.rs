use std::time::{Duration, Instant};

/// What the host should do when it is about to go idle.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Pace {
    /// No fixed rate: redraw continuously.
    Continuous,
    /// Redraw now; the one after is due at `next`.
    Redraw { next: Instant },
    /// Nothing due before `until`.
    Wait { until: Instant },
}

/// Deadline scheduler for a fixed frame rate.
///
/// Deadlines advance by whole intervals so the rate does not drift. After a
/// stall longer than one interval the schedule restarts from `now` instead of
/// bursting to catch up.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Option<Duration>,
    next: Option<Instant>,
}

impl FramePacer {
    /// `frame_rate == 0` defers to the host's natural cadence.
    pub fn new(frame_rate: u32) -> Self {
        let interval =
            (frame_rate > 0).then(|| Duration::from_nanos(1_000_000_000 / u64::from(frame_rate)));
        Self { interval, next: None }
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn poll(&mut self, now: Instant) -> Pace {
        let Some(interval) = self.interval else {
            return Pace::Continuous;
        };

        match self.next {
            Some(due) if now < due => Pace::Wait { until: due },
            Some(due) if now - due < interval => {
                let next = due + interval;
                self.next = Some(next);
                Pace::Redraw { next }
            }
            _ => {
                let next = now + interval;
                self.next = Some(next);
                Pace::Redraw { next }
            }
        }
    }
}
