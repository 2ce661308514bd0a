//! Exponential backoff schedule for transient API failures.

use std::time::Duration;

/// Tunable parameters for the exponential-backoff strategy.
#[derive(Debug, Clone)]
pub struct BackoffConfig {
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

/// Calculate the next backoff delay from the current delay and config.
///
/// The result is clamped to [`BackoffConfig::max_delay`].
pub fn next_delay(current: Duration, config: &BackoffConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_delay)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_grows_by_multiplier() {
        let config = BackoffConfig::default();
        assert_eq!(
            next_delay(Duration::from_millis(500), &config),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn delay_clamps_at_max() {
        let config = BackoffConfig {
            max_delay: Duration::from_secs(4),
            ..Default::default()
        };
        assert_eq!(
            next_delay(Duration::from_secs(3), &config),
            Duration::from_secs(4)
        );
        assert_eq!(
            next_delay(Duration::from_secs(4), &config),
            Duration::from_secs(4)
        );
    }

    #[test]
    fn default_schedule() {
        let config = BackoffConfig::default();
        let mut delay = config.initial_delay;
        let expected_ms = [500, 1000, 2000, 4000, 8000, 10000, 10000];

        for &ms in &expected_ms {
            assert_eq!(delay, Duration::from_millis(ms));
            delay = next_delay(delay, &config);
        }
    }
}
