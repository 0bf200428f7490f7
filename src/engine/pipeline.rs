// Txfeed Engine — Aggregation Pipeline
// The orchestrator callers invoke: validate → cache lookup → dual-direction
// fetch → normalize → merge/dedup/sort → cache write. Validation and inbound
// failures abort; outbound and cache-store failures degrade with a warning.

use std::collections::HashMap;
use std::sync::Arc;

use super::cache::{cache_key, HistoryCache, DEEP_PAGE_TTL, FIRST_PAGE_TTL};
use super::chains::resolve_chain;
use super::client::{TransferQuery, DEFAULT_CATEGORIES};
use super::fetch::{fetch_both_directions, OutboundFetch};
use super::normalize::normalize;
use super::validate::{clamp_page_size, validate_address};
use crate::atoms::error::HistoryResult;
use crate::atoms::types::{HistoryRequest, TxHistoryPage, TxItem};

/// Hard cap on items per page, matching the upstream per-query maximum.
pub const MAX_PAGE_SIZE: usize = 100;

/// Transfer history aggregation service. One instance is shared process-wide;
/// each request runs an independent pipeline over the shared cache.
pub struct HistoryService {
    client: Arc<dyn TransferQuery>,
    cache: Arc<dyn HistoryCache>,
    max_page_size: usize,
}

impl HistoryService {
    pub fn new(client: Arc<dyn TransferQuery>, cache: Arc<dyn HistoryCache>) -> Self {
        Self {
            client,
            cache,
            max_page_size: MAX_PAGE_SIZE,
        }
    }

    pub fn with_max_page_size(mut self, max_page_size: usize) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    /// Fetch one normalized, deduplicated, newest-first page of transfer
    /// history for an address.
    pub async fn fetch_history(
        &self,
        creds: &HashMap<String, String>,
        req: &HistoryRequest,
    ) -> HistoryResult<TxHistoryPage> {
        // 1. Validate chain, address, page size — all before any I/O.
        let resolved = resolve_chain(req.chain_id, creds)?;
        validate_address(&req.address)?;
        let page_size = clamp_page_size(req.page_size, self.max_page_size)?;

        // 2. Cache lookup. A hit short-circuits the whole pipeline.
        let key = cache_key(req.chain_id, &req.address, req.page_key.as_deref());
        if let Some(page) = self.cache.get(&key).await {
            log::debug!("history cache hit for chain {}", req.chain_id);
            return Ok(page);
        }

        // 3. Fetch. Inbound failure aborts; outbound failure is tolerated
        //    inside fetch_both_directions.
        let from_block = req.from_block.as_deref().unwrap_or("0x0");
        let categories: Vec<String> = match &req.categories {
            Some(c) => c.clone(),
            None => DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        };
        let outcome = fetch_both_directions(
            self.client.as_ref(),
            &resolved.endpoint_url,
            &req.address,
            from_block,
            &categories,
            page_size,
            req.page_key.as_deref(),
        )
        .await?;

        // Only the inbound cursor is resumable.
        let next_page_key = outcome.inbound.page_key.clone();

        // 4. Normalize everything the successful queries returned.
        let mut items: Vec<TxItem> = outcome
            .inbound
            .transfers
            .iter()
            .map(|raw| normalize(raw, resolved.chain, &req.address))
            .collect();
        if let OutboundFetch::Fetched(batch) = &outcome.outbound {
            items.extend(
                batch
                    .transfers
                    .iter()
                    .map(|raw| normalize(raw, resolved.chain, &req.address)),
            );
        }

        // 5. Dedup by hash (duplicates across directions are field-identical,
        //    last seen wins), sort newest-first, cap at the page size.
        let mut index_by_hash: HashMap<String, usize> = HashMap::new();
        let mut merged: Vec<TxItem> = Vec::with_capacity(items.len());
        for item in items {
            match index_by_hash.get(&item.hash) {
                Some(&i) => merged[i] = item,
                None => {
                    index_by_hash.insert(item.hash.clone(), merged.len());
                    merged.push(item);
                }
            }
        }
        // Canonical UTC timestamps compare lexicographically; stable sort
        // keeps fetch order for ties.
        merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        merged.truncate(page_size);

        let page = TxHistoryPage {
            items: merged,
            next_page_key,
        };

        // 6. Cache write — failure must not fail the request.
        let ttl = if req.page_key.is_none() {
            FIRST_PAGE_TTL
        } else {
            DEEP_PAGE_TTL
        };
        if let Err(e) = self.cache.set(&key, page.clone(), ttl).await {
            log::warn!("failed to store history page in cache: {}", e);
        }

        Ok(page)
    }
}
