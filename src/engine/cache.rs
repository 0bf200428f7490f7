// Txfeed Engine — Response Cache
// Key/TTL policy over an injected key-value abstraction. First pages go
// stale quickly (new activity lands there), continuation pages reference a
// fixed historical cursor and can live longer.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::atoms::error::HistoryResult;
use crate::atoms::types::TxHistoryPage;

/// TTL for first-page entries.
pub const FIRST_PAGE_TTL: Duration = Duration::from_secs(60);
/// TTL for pageKey-bearing (continuation) entries.
pub const DEEP_PAGE_TTL: Duration = Duration::from_secs(300);

/// Cache key: chain, lowercased address, and the page cursor (or "first").
pub fn cache_key(chain_id: u64, address: &str, page_key: Option<&str>) -> String {
    format!(
        "history:{}:{}:{}",
        chain_id,
        address.to_lowercase(),
        page_key.unwrap_or("first")
    )
}

/// Injected cache store. Writes may fail (a real store can be remote); the
/// pipeline demotes such failures to warnings.
#[async_trait]
pub trait HistoryCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<TxHistoryPage>;
    async fn set(&self, key: &str, page: TxHistoryPage, ttl: Duration) -> HistoryResult<()>;
}

/// Process-local TTL cache. Entries expire lazily on read; overwrites are
/// idempotent, so concurrent same-key writers need no coordination.
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (Instant, TxHistoryPage)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HistoryCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<TxHistoryPage> {
        let mut entries = self.entries.lock();
        let expired = match entries.get(key) {
            Some((deadline, page)) if Instant::now() < *deadline => return Some(page.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(key);
        }
        None
    }

    async fn set(&self, key: &str, page: TxHistoryPage, ttl: Duration) -> HistoryResult<()> {
        self.entries
            .lock()
            .insert(key.to_string(), (Instant::now() + ttl, page));
        Ok(())
    }
}
