//! Message retention policy

use chrono::{DateTime, Duration, Utc};

/// How long messages live before the retention sweep deletes them.
///
/// A message is expired when `created_at < now - window`. A message
/// created exactly `window` ago is not yet expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    window: Duration,
}

impl RetentionPolicy {
    /// Default message lifetime: 24 hours
    pub const DEFAULT_HOURS: i64 = 24;

    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn from_hours(hours: i64) -> Self {
        Self::new(Duration::hours(hours))
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Cutoff timestamp for the given wall-clock time
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.window
    }

    /// Whether a message created at the given time has expired
    pub fn is_expired(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        created_at < self.cutoff(now)
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::from_hours(Self::DEFAULT_HOURS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_is_exclusive() {
        let policy = RetentionPolicy::default();
        let now = Utc::now();
        let exactly = now - Duration::hours(24);

        assert!(!policy.is_expired(exactly, now));
        assert!(policy.is_expired(exactly - Duration::seconds(1), now));
        assert!(!policy.is_expired(exactly + Duration::seconds(1), now));
    }

    #[test]
    fn test_custom_window() {
        let policy = RetentionPolicy::from_hours(1);
        let now = Utc::now();
        assert_eq!(policy.cutoff(now), now - Duration::hours(1));
    }
}
