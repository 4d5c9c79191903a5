//! In-memory quota tracking for the AI endpoints.
//!
//! Two independent fixed-window counters per client: a short request window
//! (abuse control) and a daily token budget (cost control). Each dimension
//! rolls on its own boundary; a request-window roll never touches the token
//! counter and vice versa.
//!
//! The fixed-window design accepts a burst at the window seam (up to 2x the
//! ceiling across the boundary). That is an intentional trade-off, not a bug;
//! see DESIGN.md before "fixing" it with a sliding window.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde::Serialize;

use crate::config::RateLimitConfig;

/// Per-client counters. Created lazily on first reference.
#[derive(Debug, Clone)]
struct QuotaEntry {
    request_count: u32,
    request_reset_at: Instant,
    tokens_used: u64,
    token_reset_at: Instant,
}

impl QuotaEntry {
    fn new(now: Instant, config: &RateLimitConfig) -> Self {
        Self {
            request_count: 0,
            request_reset_at: now + config.request_window,
            tokens_used: 0,
            token_reset_at: now + config.token_window,
        }
    }

    /// Rolls each dimension independently if its window has elapsed.
    /// Must run before any read or increment of the counters.
    fn roll(&mut self, now: Instant, config: &RateLimitConfig) {
        if now >= self.request_reset_at {
            self.request_count = 0;
            self.request_reset_at = now + config.request_window;
        }
        if now >= self.token_reset_at {
            self.tokens_used = 0;
            self.token_reset_at = now + config.token_window;
        }
    }
}

/// Result of a quota check, consumed by the request boundary to build
/// a 429 response (Retry-After + advisory X-RateLimit-* headers).
#[derive(Debug, Clone, Serialize)]
pub struct QuotaCheck {
    pub allowed: bool,
    pub remaining_requests: u32,
    pub remaining_tokens: u64,
    pub request_limit: u32,
    pub token_budget: u64,
    /// Seconds until the request window resets. Used as Retry-After.
    pub request_reset_secs: u64,
    pub token_reset_secs: u64,
}

impl QuotaCheck {
    /// Fail-closed result for a missing or blank client identifier.
    fn denied(config: &RateLimitConfig) -> Self {
        Self {
            allowed: false,
            remaining_requests: 0,
            remaining_tokens: 0,
            request_limit: config.request_limit,
            token_budget: config.token_budget,
            request_reset_secs: config.request_window.as_secs(),
            token_reset_secs: config.token_window.as_secs(),
        }
    }
}

/// Dual-window quota tracker keyed by an opaque client identifier
/// (typically the forwarded client address).
///
/// `check` is a pure read; callers enforce the ceiling by checking before
/// consuming. The mutex makes each call atomic, but the check-then-consume
/// seam across two calls is not — under concurrent requests for the same
/// client the ceiling can be overshot by the race width. Accepted for
/// advisory abuse prevention; this is not billing-grade enforcement.
#[derive(Clone)]
pub struct RateLimiter {
    entries: Arc<Mutex<HashMap<String, QuotaEntry>>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            config,
        }
    }

    /// Reports whether `client_id` may dispatch another AI request.
    /// Never increments a counter. A blank identifier is denied outright.
    pub fn check(&self, client_id: &str) -> QuotaCheck {
        self.check_at(client_id, Instant::now())
    }

    /// Records one dispatched request for `client_id`.
    /// Does not enforce the ceiling — call `check` first.
    pub fn consume_request(&self, client_id: &str) {
        self.consume_request_at(client_id, Instant::now());
    }

    /// Adds `n` tokens to the client's daily usage.
    pub fn consume_tokens(&self, client_id: &str, n: u64) {
        self.consume_tokens_at(client_id, n, Instant::now());
    }

    /// Drops entries whose windows have both expired. Memory hygiene only:
    /// a fresh entry after expiry behaves identically to a swept one.
    pub fn cleanup_expired_entries(&self) {
        self.cleanup_expired_entries_at(Instant::now());
    }

    fn check_at(&self, client_id: &str, now: Instant) -> QuotaCheck {
        if client_id.trim().is_empty() {
            return QuotaCheck::denied(&self.config);
        }

        let mut entries = self.entries.lock().expect("quota map poisoned");
        let entry = entries
            .entry(client_id.to_string())
            .or_insert_with(|| QuotaEntry::new(now, &self.config));
        entry.roll(now, &self.config);

        QuotaCheck {
            allowed: entry.request_count < self.config.request_limit
                && entry.tokens_used < self.config.token_budget,
            remaining_requests: self.config.request_limit.saturating_sub(entry.request_count),
            remaining_tokens: self.config.token_budget.saturating_sub(entry.tokens_used),
            request_limit: self.config.request_limit,
            token_budget: self.config.token_budget,
            request_reset_secs: entry
                .request_reset_at
                .saturating_duration_since(now)
                .as_secs(),
            token_reset_secs: entry.token_reset_at.saturating_duration_since(now).as_secs(),
        }
    }

    fn consume_request_at(&self, client_id: &str, now: Instant) {
        if client_id.trim().is_empty() {
            return;
        }
        let mut entries = self.entries.lock().expect("quota map poisoned");
        let entry = entries
            .entry(client_id.to_string())
            .or_insert_with(|| QuotaEntry::new(now, &self.config));
        entry.roll(now, &self.config);
        entry.request_count = entry.request_count.saturating_add(1);
    }

    fn consume_tokens_at(&self, client_id: &str, n: u64, now: Instant) {
        if client_id.trim().is_empty() {
            return;
        }
        let mut entries = self.entries.lock().expect("quota map poisoned");
        let entry = entries
            .entry(client_id.to_string())
            .or_insert_with(|| QuotaEntry::new(now, &self.config));
        entry.roll(now, &self.config);
        entry.tokens_used = entry.tokens_used.saturating_add(n);
    }

    fn cleanup_expired_entries_at(&self, now: Instant) {
        let mut entries = self.entries.lock().expect("quota map poisoned");
        entries.retain(|_, e| now < e.request_reset_at || now < e.token_reset_at);
    }

    #[cfg(test)]
    fn entry_count(&self) -> usize {
        self.entries.lock().expect("quota map poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn test_config() -> RateLimitConfig {
        RateLimitConfig {
            request_limit: 5,
            request_window: Duration::from_secs(60),
            token_budget: 10_000,
            token_window: Duration::from_secs(86_400),
        }
    }

    #[test]
    fn test_fresh_client_has_full_quota() {
        let limiter = RateLimiter::new(test_config());
        let quota = limiter.check("203.0.113.7");
        assert!(quota.allowed);
        assert_eq!(quota.remaining_requests, 5);
        assert_eq!(quota.remaining_tokens, 10_000);
    }

    #[test]
    fn test_remaining_decreases_per_consumed_request() {
        let limiter = RateLimiter::new(test_config());
        for k in 1..=4u32 {
            limiter.consume_request("client-a");
            let quota = limiter.check("client-a");
            assert_eq!(quota.remaining_requests, 5 - k);
            assert!(quota.allowed, "should still be allowed at k={k}");
        }
    }

    #[test]
    fn test_ceiling_denies_after_limit_reached() {
        let limiter = RateLimiter::new(test_config());
        for _ in 0..5 {
            limiter.consume_request("client-a");
        }
        let quota = limiter.check("client-a");
        assert!(!quota.allowed);
        assert_eq!(quota.remaining_requests, 0);
    }

    #[test]
    fn test_clients_are_isolated() {
        let limiter = RateLimiter::new(test_config());
        for _ in 0..5 {
            limiter.consume_request("client-a");
        }
        let quota = limiter.check("client-b");
        assert!(quota.allowed);
        assert_eq!(quota.remaining_requests, 5);
        assert_eq!(quota.remaining_tokens, 10_000);
    }

    #[test]
    fn test_blank_client_id_fails_closed() {
        let limiter = RateLimiter::new(test_config());
        for id in ["", "   "] {
            let quota = limiter.check(id);
            assert!(!quota.allowed);
            assert_eq!(quota.remaining_requests, 0);
            assert_eq!(quota.remaining_tokens, 0);
        }
        // Blank consumes are dropped rather than pooled into a shared bucket.
        limiter.consume_request("");
        limiter.consume_tokens("", 500);
        assert_eq!(limiter.entry_count(), 0);
    }

    #[test]
    fn test_tokens_accumulate() {
        let limiter = RateLimiter::new(test_config());
        limiter.consume_tokens("client-a", 1_000);
        assert_eq!(limiter.check("client-a").remaining_tokens, 9_000);
        limiter.consume_tokens("client-a", 200);
        assert_eq!(limiter.check("client-a").remaining_tokens, 8_800);
    }

    #[test]
    fn test_token_budget_exhaustion_denies_without_underflow() {
        let limiter = RateLimiter::new(test_config());
        limiter.consume_tokens("client-a", 10_001);
        let quota = limiter.check("client-a");
        assert!(!quota.allowed);
        assert_eq!(quota.remaining_tokens, 0);
        // Requests alone would still be within quota.
        assert_eq!(quota.remaining_requests, 5);
    }

    #[test]
    fn test_request_window_rolls_independently_of_tokens() {
        let config = test_config();
        let limiter = RateLimiter::new(config);
        let start = Instant::now();

        for _ in 0..5 {
            limiter.consume_request_at("client-a", start);
        }
        limiter.consume_tokens_at("client-a", 4_000, start);
        assert!(!limiter.check_at("client-a", start).allowed);

        // Just past the request window: request count resets, tokens do not.
        let later = start + config.request_window + Duration::from_secs(1);
        let quota = limiter.check_at("client-a", later);
        assert!(quota.allowed);
        assert_eq!(quota.remaining_requests, 5);
        assert_eq!(quota.remaining_tokens, 6_000);
    }

    #[test]
    fn test_token_window_roll_resets_daily_usage() {
        let config = test_config();
        let limiter = RateLimiter::new(config);
        let start = Instant::now();

        limiter.consume_tokens_at("client-a", 10_500, start);
        assert!(!limiter.check_at("client-a", start).allowed);

        let tomorrow = start + config.token_window + Duration::from_secs(1);
        let quota = limiter.check_at("client-a", tomorrow);
        assert!(quota.allowed);
        assert_eq!(quota.remaining_tokens, 10_000);
    }

    #[test]
    fn test_check_does_not_consume() {
        let limiter = RateLimiter::new(test_config());
        for _ in 0..20 {
            limiter.check("client-a");
        }
        assert_eq!(limiter.check("client-a").remaining_requests, 5);
    }

    #[test]
    fn test_retry_after_is_bounded_by_window() {
        let config = test_config();
        let limiter = RateLimiter::new(config);
        let quota = limiter.check("client-a");
        assert!(quota.request_reset_secs <= config.request_window.as_secs());
        assert!(quota.token_reset_secs <= config.token_window.as_secs());
    }

    #[test]
    fn test_cleanup_sweeps_only_fully_expired_entries() {
        let config = test_config();
        let limiter = RateLimiter::new(config);
        let start = Instant::now();

        limiter.consume_request_at("client-a", start);
        assert_eq!(limiter.entry_count(), 1);

        // Request window elapsed, token window still live: entry survives.
        limiter.cleanup_expired_entries_at(start + config.request_window + Duration::from_secs(1));
        assert_eq!(limiter.entry_count(), 1);

        // Both windows elapsed: entry is swept, and a subsequent check
        // behaves exactly like a never-seen client.
        let far = start + config.token_window + Duration::from_secs(1);
        limiter.cleanup_expired_entries_at(far);
        assert_eq!(limiter.entry_count(), 0);
        let quota = limiter.check_at("client-a", far);
        assert!(quota.allowed);
        assert_eq!(quota.remaining_requests, config.request_limit);
    }
}
