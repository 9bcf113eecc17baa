use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::config::BookingPolicy;

// Opportunistic prune threshold; keeps the map from accumulating expired
// entries under slug/IP churn.
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug)]
struct Entry {
    count: u32,
    window_started: Instant,
}

/// Fixed-window request throttle keyed by (client IP, event type slug).
///
/// Purely in-memory and single-process: state is lost on restart and not
/// shared across replicas. That is acceptable because this is a
/// denial-of-abuse control; the correctness backstop for double-booking is
/// the storage-level uniqueness constraint.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    entries: Mutex<HashMap<(IpAddr, String), Entry>>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_policy(policy: &BookingPolicy) -> Self {
        Self::new(
            Duration::from_secs(policy.rate_limit_window_secs),
            policy.rate_limit_max_requests,
        )
    }

    pub fn allow(&self, client_ip: IpAddr, slug: &str) -> bool {
        self.allow_at(client_ip, slug, Instant::now())
    }

    fn allow_at(&self, client_ip: IpAddr, slug: &str, now: Instant) -> bool {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if entries.len() > PRUNE_THRESHOLD {
            let window = self.window;
            entries.retain(|_, e| now.duration_since(e.window_started) < window);
        }

        let entry = entries
            .entry((client_ip, slug.to_string()))
            .or_insert(Entry {
                count: 0,
                window_started: now,
            });

        if now.duration_since(entry.window_started) >= self.window {
            entry.count = 0;
            entry.window_started = now;
        }

        entry.count += 1;
        entry.count <= self.max_requests
    }
}
