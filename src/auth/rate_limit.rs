use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const MAX_ATTEMPTS: usize = 5;
const WINDOW_SECS: u64 = 900; // 15 minutes

/// Per-IP counter of failed session exchanges.
#[derive(Clone)]
pub struct RateLimiter {
    attempts: Arc<Mutex<HashMap<IpAddr, Vec<Instant>>>>,
    max_attempts: usize,
    window: Duration,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(MAX_ATTEMPTS, Duration::from_secs(WINDOW_SECS))
    }
}

impl RateLimiter {
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self {
            attempts: Arc::new(Mutex::new(HashMap::new())),
            max_attempts,
            window,
        }
    }

    /// True once `ip` has used up its failures inside the window. Expired
    /// entries for `ip` are dropped on the way.
    pub fn is_blocked(&self, ip: IpAddr) -> bool {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        let Some(timestamps) = map.get_mut(&ip) else {
            return false;
        };
        timestamps.retain(|t| now.duration_since(*t) < self.window);
        if timestamps.is_empty() {
            map.remove(&ip);
            return false;
        }
        timestamps.len() >= self.max_attempts
    }

    /// Count a failure for `ip`. Addresses whose failures have all expired
    /// are dropped so the map stays bounded by recent traffic.
    pub fn record_failure(&self, ip: IpAddr) {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        map.retain(|_, timestamps| {
            timestamps.retain(|t| now.duration_since(*t) < self.window);
            !timestamps.is_empty()
        });
        map.entry(ip).or_default().push(now);
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.attempts.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Forget `ip` after a successful exchange.
    pub fn clear(&self, ip: IpAddr) {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(&ip);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn blocks_after_max_failures_and_clears() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let ip = IpAddr::V4(Ipv4Addr::LOCALHOST);
        assert!(!limiter.is_blocked(ip));
        limiter.record_failure(ip);
        assert!(!limiter.is_blocked(ip));
        limiter.record_failure(ip);
        assert!(limiter.is_blocked(ip));
        limiter.clear(ip);
        assert!(!limiter.is_blocked(ip));
    }

    #[test]
    fn failures_expire_after_window() {
        let limiter = RateLimiter::new(1, Duration::from_millis(10));
        let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        limiter.record_failure(ip);
        assert!(limiter.is_blocked(ip));
        std::thread::sleep(Duration::from_millis(25));
        assert!(!limiter.is_blocked(ip));
    }

    #[test]
    fn expired_addresses_are_pruned() {
        let limiter = RateLimiter::new(5, Duration::from_millis(5));
        for i in 0..1000u32 {
            limiter.record_failure(IpAddr::V4(Ipv4Addr::from(i)));
        }
        assert_eq!(limiter.tracked(), 1000);
        std::thread::sleep(Duration::from_millis(20));

        limiter.record_failure(IpAddr::V4(Ipv4Addr::new(192, 168, 0, 1)));
        assert_eq!(limiter.tracked(), 1);

        std::thread::sleep(Duration::from_millis(20));
        assert!(!limiter.is_blocked(IpAddr::V4(Ipv4Addr::new(192, 168, 0, 1))));
        assert_eq!(limiter.tracked(), 0);
    }

    #[test]
    fn other_addresses_are_unaffected() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        limiter.record_failure(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)));
        assert!(!limiter.is_blocked(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2))));
    }
}
