//! Shared rate-limit state.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use crate::state::StateStore;

/// Cooldown applied when the provider gives no reset time.
pub const DEFAULT_COOLDOWN: Duration = Duration::hours(1);

/// Margin added to a provider-supplied reset time.
pub const RESET_MARGIN: Duration = Duration::seconds(30);

/// Receives rate-limit transitions, e.g. to show a notice in a UI.
pub trait RateLimitObserver: Send + Sync {
    /// Requests are suspended until `reset_at`.
    fn on_rate_limited(&self, reset_at: DateTime<Utc>);

    /// The limit was cleared by hand.
    fn on_cleared(&self) {}
}

/// Observer that writes transitions to the log.
#[derive(Debug, Default)]
pub struct LoggingObserver;

impl RateLimitObserver for LoggingObserver {
    fn on_rate_limited(&self, reset_at: DateTime<Utc>) {
        let minutes = (reset_at - Utc::now()).num_minutes().max(0);
        tracing::warn!(
            "Rate limit reached; remote requests paused until {} ({} min)",
            reset_at.to_rfc3339(),
            minutes
        );
    }

    fn on_cleared(&self) {
        tracing::info!("Rate limit cleared");
    }
}

/// Owner of the process-wide rate-limit reset time.
///
/// All reads and writes of the reset time go through one mutex; the
/// persisted copy is written while that mutex is held so the file never
/// lags behind a later in-memory update.
pub struct RateLimiter {
    store: StateStore,
    reset_at: Mutex<DateTime<Utc>>,
    observers: RwLock<Vec<Arc<dyn RateLimitObserver>>>,
}

impl RateLimiter {
    /// Create a limiter, restoring any reset time persisted by an earlier
    /// process.
    pub fn new(store: StateStore) -> Self {
        let reset_at = store.load_or_default().rate_limit_reset_at();
        if reset_at > Utc::now() {
            tracing::debug!("Restored rate limit until {}", reset_at.to_rfc3339());
        }

        Self {
            store,
            reset_at: Mutex::new(reset_at),
            observers: RwLock::new(vec![Arc::new(LoggingObserver)]),
        }
    }

    /// Register an additional observer.
    pub fn add_observer(&self, observer: Arc<dyn RateLimitObserver>) {
        match self.observers.write() {
            Ok(mut observers) => observers.push(observer),
            Err(poisoned) => poisoned.into_inner().push(observer),
        }
    }

    /// Whether a request to `endpoint` may be issued now.
    pub fn can_make_request(&self, endpoint: &str) -> bool {
        let reset_at = *self.lock();
        if Utc::now() < reset_at {
            tracing::debug!(
                "Skipping {}: rate limited until {}",
                endpoint,
                reset_at.to_rfc3339()
            );
            return false;
        }
        true
    }

    /// Record a refusal without a reset time: pause for one hour.
    ///
    /// An already later reset time is kept.
    pub fn handle_rate_limit(&self) {
        self.extend_to(Utc::now() + DEFAULT_COOLDOWN);
    }

    /// Record a refusal with a provider-supplied reset time.
    ///
    /// A 30 second margin is added. The reset time never moves backwards.
    pub fn handle_rate_limit_until(&self, reset: DateTime<Utc>) {
        self.extend_to(reset + RESET_MARGIN);
    }

    /// Whether requests are currently suspended.
    pub fn is_rate_limited(&self) -> bool {
        Utc::now() < *self.lock()
    }

    /// Reset time while the limit is active.
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        let reset_at = *self.lock();
        (Utc::now() < reset_at).then_some(reset_at)
    }

    /// Lift the limit immediately.
    pub fn clear_rate_limit(&self) {
        {
            let mut reset_at = self.lock();
            *reset_at = DateTime::<Utc>::MIN_UTC;
            self.persist(None);
        }
        self.notify(|o| o.on_cleared());
    }

    fn extend_to(&self, candidate: DateTime<Utc>) {
        if candidate <= Utc::now() {
            tracing::debug!("Ignoring rate-limit reset {} in the past", candidate.to_rfc3339());
            return;
        }

        let changed = {
            let mut reset_at = self.lock();
            if candidate > *reset_at {
                *reset_at = candidate;
                self.persist(Some(candidate));
                true
            } else {
                false
            }
        };

        if changed {
            self.notify(|o| o.on_rate_limited(candidate));
        }
    }

    fn persist(&self, reset_at: Option<DateTime<Utc>>) {
        if let Err(e) = self.store.update(|s| s.rate_limit_reset_time = reset_at) {
            tracing::warn!(
                "Failed to persist rate limit to {}: {}",
                self.store.path().display(),
                e
            );
        }
    }

    fn notify(&self, f: impl Fn(&dyn RateLimitObserver)) {
        let observers = match self.observers.read() {
            Ok(observers) => observers,
            Err(poisoned) => poisoned.into_inner(),
        };
        for observer in observers.iter() {
            f(observer.as_ref());
        }
    }

    fn lock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.reset_at.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use tempfile::TempDir;

    fn limiter(temp: &TempDir) -> RateLimiter {
        RateLimiter::new(StateStore::in_dir(temp.path()))
    }

    #[derive(Default)]
    struct Counting {
        limited: AtomicUsize,
        cleared: AtomicUsize,
    }

    impl RateLimitObserver for Counting {
        fn on_rate_limited(&self, _reset_at: DateTime<Utc>) {
            self.limited.fetch_add(1, Ordering::SeqCst);
        }

        fn on_cleared(&self) {
            self.cleared.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn fresh_limiter_allows_requests() {
        let temp = TempDir::new().unwrap();
        let limiter = limiter(&temp);

        assert!(limiter.can_make_request("commits"));
        assert!(!limiter.is_rate_limited());
        assert!(limiter.reset_at().is_none());
    }

    #[test]
    fn default_cooldown_is_one_hour() {
        let temp = TempDir::new().unwrap();
        let limiter = limiter(&temp);

        limiter.handle_rate_limit();

        let reset = limiter.reset_at().unwrap();
        let minutes = (reset - Utc::now()).num_minutes();
        assert!((59..=60).contains(&minutes));
        assert!(!limiter.can_make_request("commits"));
    }

    #[test]
    fn provider_reset_gets_margin() {
        let temp = TempDir::new().unwrap();
        let limiter = limiter(&temp);
        let reset = Utc::now() + Duration::minutes(5);

        limiter.handle_rate_limit_until(reset);

        assert_eq!(limiter.reset_at(), Some(reset + RESET_MARGIN));
    }

    #[test]
    fn reset_time_never_moves_backwards() {
        let temp = TempDir::new().unwrap();
        let limiter = limiter(&temp);
        let late = Utc::now() + Duration::hours(3);

        limiter.handle_rate_limit_until(late);
        limiter.handle_rate_limit_until(Utc::now() + Duration::minutes(1));
        limiter.handle_rate_limit();

        assert_eq!(limiter.reset_at(), Some(late + RESET_MARGIN));
    }

    #[test]
    fn past_reset_does_not_limit() {
        let temp = TempDir::new().unwrap();
        let limiter = limiter(&temp);

        limiter.handle_rate_limit_until(Utc::now() - Duration::hours(1));

        assert!(!limiter.is_rate_limited());
    }

    #[test]
    fn past_reset_is_neither_persisted_nor_announced() {
        let temp = TempDir::new().unwrap();
        let limiter = limiter(&temp);
        let counting = Arc::new(Counting::default());
        limiter.add_observer(counting.clone());

        limiter.handle_rate_limit_until(Utc::now() - Duration::minutes(5));

        assert_eq!(counting.limited.load(Ordering::SeqCst), 0);
        assert!(StateStore::in_dir(temp.path())
            .load_or_default()
            .rate_limit_reset_time
            .is_none());
    }

    #[test]
    fn limit_survives_restart() {
        let temp = TempDir::new().unwrap();
        let reset = Utc::now() + Duration::minutes(20);

        limiter(&temp).handle_rate_limit_until(reset);

        let restarted = limiter(&temp);
        assert!(restarted.is_rate_limited());
        assert_eq!(restarted.reset_at(), Some(reset + RESET_MARGIN));
    }

    #[test]
    fn clear_lifts_limit_and_persists() {
        let temp = TempDir::new().unwrap();
        let limiter = limiter(&temp);
        limiter.handle_rate_limit();

        limiter.clear_rate_limit();

        assert!(!limiter.is_rate_limited());
        let reloaded = RateLimiter::new(StateStore::in_dir(temp.path()));
        assert!(!reloaded.is_rate_limited());
    }

    #[test]
    fn observers_see_transitions_once() {
        let temp = TempDir::new().unwrap();
        let limiter = limiter(&temp);
        let counting = Arc::new(Counting::default());
        limiter.add_observer(counting.clone());

        limiter.handle_rate_limit();
        limiter.handle_rate_limit();
        limiter.clear_rate_limit();

        assert_eq!(counting.limited.load(Ordering::SeqCst), 1);
        assert_eq!(counting.cleared.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_updates_keep_latest_reset() {
        let temp = TempDir::new().unwrap();
        let limiter = Arc::new(limiter(&temp));
        let base = Utc::now() + Duration::minutes(10);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let limiter = Arc::clone(&limiter);
                thread::spawn(move || limiter.handle_rate_limit_until(base + Duration::minutes(i)))
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let expected = base + Duration::minutes(7) + RESET_MARGIN;
        assert_eq!(limiter.reset_at(), Some(expected));

        let persisted = StateStore::in_dir(temp.path()).load().unwrap();
        assert_eq!(persisted.rate_limit_reset_time, Some(expected));
    }
}
