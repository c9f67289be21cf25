//! Classification cache policy.

use std::time::Duration;

/// What `classify` answers when the external classifier is unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Permissive: fall back to the last stored verdict if one exists
    /// (however stale), otherwise treat the text as clean.
    FailOpen,
    /// Restrictive: treat unclassifiable text as sensitive.
    FailClosed,
}

/// Freshness and failure behavior of the verdict cache.
#[derive(Debug, Clone, Copy)]
pub struct ClassifyPolicy {
    /// How long a stored verdict stays authoritative. `None` means
    /// verdicts never expire.
    pub ttl: Option<Duration>,
    pub on_failure: FailurePolicy,
}

impl ClassifyPolicy {
    /// Permanent verdicts, sensitive-by-default on classifier failure.
    pub fn permanent(on_failure: FailurePolicy) -> Self {
        Self { ttl: None, on_failure }
    }

    /// Verdicts refreshed after `ttl`.
    pub fn with_ttl(ttl: Duration, on_failure: FailurePolicy) -> Self {
        Self { ttl: Some(ttl), on_failure }
    }

    /// Whether a verdict produced at `checked_at` (unix seconds) is still
    /// authoritative at `now`.
    pub fn is_fresh(&self, checked_at: i64, now: i64) -> bool {
        match self.ttl {
            None => true,
            Some(ttl) => now.saturating_sub(checked_at) <= ttl.as_secs() as i64,
        }
    }
}

impl Default for ClassifyPolicy {
    /// Matches the shipped plugin: permanent cache, fail-closed.
    fn default() -> Self {
        Self::permanent(FailurePolicy::FailClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_ttl_is_always_fresh() {
        let policy = ClassifyPolicy::permanent(FailurePolicy::FailClosed);
        assert!(policy.is_fresh(0, i64::MAX));
    }

    #[test]
    fn ttl_bounds_freshness() {
        let week = Duration::from_secs(7 * 86_400);
        let policy = ClassifyPolicy::with_ttl(week, FailurePolicy::FailOpen);
        let now = 10_000_000;
        assert!(policy.is_fresh(now - 86_400, now));
        assert!(policy.is_fresh(now - 7 * 86_400, now));
        assert!(!policy.is_fresh(now - 8 * 86_400, now));
    }
}
