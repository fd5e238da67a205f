//! Site lookup cache for the widget.
//!
//! Resolving an api key costs a full-table scan against the data service,
//! so resolved sites are held for a short TTL. Expiry is the only
//! invalidation that happens in practice; `invalidate` exists for embedders
//! that rotate keys. Concurrent misses for the same key may each fetch;
//! there is no request coalescing.

use crate::models::Site;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;

/// Time source. Swappable so expiry is testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct Entry {
    site: Site,
    stored_at: DateTime<Utc>,
}

pub struct SiteCache {
    entries: DashMap<String, Entry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl SiteCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        SiteCache {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    /// Five-minute TTL.
    pub fn with_default_ttl(clock: Arc<dyn Clock>) -> Self {
        Self::new(Duration::minutes(5), clock)
    }

    pub fn get(&self, api_key: &str) -> Option<Site> {
        let expired = match self.entries.get(api_key) {
            Some(entry) => {
                if self.clock.now() - entry.stored_at < self.ttl {
                    return Some(entry.site.clone());
                }
                true
            }
            None => false,
        };
        if expired {
            self.entries.remove(api_key);
        }
        None
    }

    pub fn put(&self, site: Site) {
        let entry = Entry {
            stored_at: self.clock.now(),
            site,
        };
        self.entries.insert(entry.site.api_key.clone(), entry);
    }

    pub fn invalidate(&self, api_key: &str) {
        self.entries.remove(api_key);
    }
}
