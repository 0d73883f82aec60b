//! Minimum-interval gate for the client list fetch

use tokio::time::{Duration, Instant};

/// Outcome of asking the throttle whether a call may run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate<T> {
    /// Call may run; the gate timestamp has been recorded
    Open,
    /// Call arrived inside the interval; carries the last completed result
    Closed(Option<T>),
}

/// Lets a call through at most once per `interval` and remembers the
/// result of the last call that ran. No queuing, no bursts.
#[derive(Debug)]
pub struct Throttle<T> {
    interval: Duration,
    last_call: Option<Instant>,
    last_value: Option<T>,
}

impl<T: Clone> Throttle<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_call: None,
            last_value: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn acquire(&mut self) -> Gate<T> {
        self.acquire_at(Instant::now())
    }

    pub fn acquire_at(&mut self, now: Instant) -> Gate<T> {
        if let Some(last) = self.last_call {
            if now.saturating_duration_since(last) < self.interval {
                return Gate::Closed(self.last_value.clone());
            }
        }

        self.last_call = Some(now);
        Gate::Open
    }

    /// Store the result of a call admitted by `acquire`
    pub fn complete(&mut self, value: T) {
        self.last_value = Some(value);
    }

    pub fn last_value(&self) -> Option<&T> {
        self.last_value.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_call_is_open() {
        let mut throttle: Throttle<bool> = Throttle::new(Duration::from_secs(30));
        assert_eq!(throttle.acquire_at(Instant::now()), Gate::Open);
    }

    #[test]
    fn test_call_inside_interval_returns_last_value() {
        let start = Instant::now();
        let mut throttle = Throttle::new(Duration::from_secs(30));

        assert_eq!(throttle.acquire_at(start), Gate::Open);
        throttle.complete(true);

        assert_eq!(
            throttle.acquire_at(start + Duration::from_secs(29)),
            Gate::Closed(Some(true))
        );
    }

    #[test]
    fn test_call_after_interval_is_open() {
        let start = Instant::now();
        let mut throttle = Throttle::new(Duration::from_secs(30));

        assert_eq!(throttle.acquire_at(start), Gate::Open);
        throttle.complete(false);

        assert_eq!(throttle.acquire_at(start + Duration::from_secs(30)), Gate::Open);
        assert_eq!(
            throttle.acquire_at(start + Duration::from_secs(45)),
            Gate::Closed(Some(false))
        );
    }

    #[test]
    fn test_closed_calls_do_not_extend_window() {
        let start = Instant::now();
        let mut throttle = Throttle::new(Duration::from_secs(30));

        assert_eq!(throttle.acquire_at(start), Gate::Open);
        throttle.complete(true);
        assert!(matches!(
            throttle.acquire_at(start + Duration::from_secs(20)),
            Gate::Closed(_)
        ));

        assert_eq!(throttle.acquire_at(start + Duration::from_secs(31)), Gate::Open);
    }

    #[test]
    fn test_closed_before_completion_has_no_value() {
        let start = Instant::now();
        let mut throttle: Throttle<bool> = Throttle::new(Duration::from_secs(30));

        assert_eq!(throttle.acquire_at(start), Gate::Open);
        assert_eq!(throttle.acquire_at(start), Gate::Closed(None));
    }
}
