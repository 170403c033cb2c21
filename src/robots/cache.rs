//! Robots.txt caching implementation
//!
//! Each site's rules are computed at most once per cache and kept for the
//! cache's lifetime. There is no expiry; a long-running process that needs
//! fresh rules creates a new client.

use crate::robots::RuleSet;
use crate::url::Site;
use crate::RobotsError;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;

/// Cached robots.txt rules for a site
#[derive(Debug, Clone)]
pub struct CachedRobots {
    /// The parsed robots.txt rules
    pub rules: Arc<dyn RuleSet>,

    /// When the robots.txt was fetched
    pub fetched_at: DateTime<Utc>,
}

impl CachedRobots {
    /// Creates a new CachedRobots stamped with the current time
    pub fn new(rules: Arc<dyn RuleSet>) -> Self {
        Self {
            rules,
            fetched_at: Utc::now(),
        }
    }

    /// Returns the age of the cached robots.txt
    pub fn age(&self) -> Duration {
        Utc::now() - self.fetched_at
    }

    /// Checks if a request path is allowed by the cached rules
    pub fn is_allowed(&self, path: &str) -> bool {
        self.rules.allows(path)
    }
}

/// Per-site populate-once cache of robots.txt rules
///
/// The map lock is only held to find or create a site's slot. Each slot is a
/// [`OnceCell`], so concurrent first requests for the same site wait on a
/// single fetch instead of issuing their own. A failed fetch leaves the slot
/// empty and the next request tries again.
#[derive(Debug, Default)]
pub struct RobotsCache {
    entries: Mutex<HashMap<Site, Arc<OnceCell<CachedRobots>>>>,
}

impl RobotsCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached rules for `site`, computing them on first use
    ///
    /// # Arguments
    ///
    /// * `site` - The cache key
    /// * `fetch_and_parse` - Produces the rules on a miss; not called on a hit
    ///
    /// # Returns
    ///
    /// * `Ok(CachedRobots)` - The stored entry; every call for the same site
    ///   sees the same rule set instance
    /// * `Err(RobotsError)` - `fetch_and_parse` failed; nothing was stored
    pub async fn get_or_fetch<F, Fut>(
        &self,
        site: &Site,
        fetch_and_parse: F,
    ) -> Result<CachedRobots, RobotsError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<dyn RuleSet>, RobotsError>>,
    {
        let slot = self.slot(site);

        if let Some(cached) = slot.get() {
            tracing::debug!(
                "Using cached robots.txt for {} (age {}s)",
                site,
                cached.age().num_seconds()
            );
            return Ok(cached.clone());
        }

        let cached = slot
            .get_or_try_init(move || async move {
                let rules = fetch_and_parse().await?;
                tracing::info!("Cached robots.txt for {}", site);
                Ok::<_, RobotsError>(CachedRobots::new(rules))
            })
            .await?;

        Ok(cached.clone())
    }

    /// Returns the cached rules for `site` without fetching
    pub fn get(&self, site: &Site) -> Option<CachedRobots> {
        self.lock()
            .get(site)
            .and_then(|slot| slot.get().cloned())
    }

    /// Returns the number of sites with cached rules
    pub fn len(&self) -> usize {
        self.lock()
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    /// Returns true if no site has cached rules
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, site: &Site) -> Arc<OnceCell<CachedRobots>> {
        self.lock().entry(site.clone()).or_default().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Site, Arc<OnceCell<CachedRobots>>>> {
        // Slots are only inserted under the lock, so a poisoned map is still consistent
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
