//! Per-identity admission control (sliding-window rate limiting).
//!
//! Each caller identity (typically a client address) gets its own window of
//! request timestamps. A check evicts expired entries, then either records
//! the request and admits it, or denies it without touching state. Windows
//! are self-pruning, so identities live for the process lifetime without
//! explicit teardown.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

use crate::config::RateLimitConfig;

/// Counters describing admission activity.
#[derive(Debug, Clone)]
pub struct AdmissionStats {
    /// Number of identities with a live window.
    pub identities: usize,
    /// Total requests admitted.
    pub total_admitted: u64,
    /// Total requests denied.
    pub total_denied: u64,
}

struct AdmissionInner {
    windows: HashMap<String, Vec<u64>>,
    total_admitted: u64,
    total_denied: u64,
}

/// Sliding-window rate limiter keyed by caller identity.
///
/// A single coarse lock guards the window map; the critical section is a
/// vector retain + push per check.
pub struct AdmissionController {
    config: RateLimitConfig,
    inner: Mutex<AdmissionInner>,
}

impl AdmissionController {
    /// Create a controller from configuration.
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(AdmissionInner {
                windows: HashMap::new(),
                total_admitted: 0,
                total_denied: 0,
            }),
        }
    }

    /// Check the identity against its window using the wall clock.
    ///
    /// Returns `true` when the request is admitted (and recorded).
    pub fn admit(&self, identity: &str) -> bool {
        let now_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.admit_at(identity, now_secs)
    }

    /// Clock-injected admission check.
    ///
    /// Entries at or before `now_secs - window_seconds` are evicted first.
    /// If the remaining count has reached `max_requests`, the request is
    /// denied and the window is left unchanged; otherwise `now_secs` is
    /// recorded and the request is admitted.
    pub fn admit_at(&self, identity: &str, now_secs: u64) -> bool {
        if self.config.bypass {
            return true;
        }

        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let window = inner.windows.entry(identity.to_string()).or_default();

        let cutoff = now_secs.saturating_sub(self.config.window_seconds);
        window.retain(|&t| t > cutoff);

        if window.len() >= self.config.max_requests as usize {
            inner.total_denied += 1;
            return false;
        }

        window.push(now_secs);
        inner.total_admitted += 1;
        true
    }

    /// Seconds a denied caller should wait before retrying.
    #[must_use]
    pub fn retry_after_secs(&self) -> u64 {
        self.config.window_seconds
    }

    /// Whether admission control is bypassed (test mode).
    #[must_use]
    pub fn is_bypassed(&self) -> bool {
        self.config.bypass
    }

    /// Current admission counters.
    #[must_use]
    pub fn stats(&self) -> AdmissionStats {
        let inner = self.inner.lock();
        AdmissionStats {
            identities: inner.windows.len(),
            total_admitted: inner.total_admitted,
            total_denied: inner.total_denied,
        }
    }

    /// Drop all windows and counters. Useful between test cases.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.windows.clear();
        inner.total_admitted = 0;
        inner.total_denied = 0;
    }
}

impl std::fmt::Debug for AdmissionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionController")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
