// Txfeed Engine — Dual-Direction Fetch
// The upstream API filters on one side of a transfer per call, so a complete
// first page needs two queries: inbound (toAddress) plus outbound
// (fromAddress). Cursors are direction-specific — a continuation page can
// only resume the inbound series, and outbound history past the first page
// is not retrievable. That completeness gap is an accepted upstream
// limitation, not something to paper over here.

use futures::join;

use super::client::{QueryDirection, TransferQuery, TransferQueryParams};
use crate::atoms::error::HistoryResult;
use crate::atoms::types::TransferBatch;

/// Outcome of the best-effort outbound query.
#[derive(Debug)]
pub enum OutboundFetch {
    /// Outbound query ran and succeeded.
    Fetched(TransferBatch),
    /// Continuation page: outbound cannot be resumed, so it was not issued.
    Skipped,
    /// Outbound query failed; the failure was logged and tolerated.
    Degraded,
}

/// Combined result of one fetch round. The inbound batch is mandatory — its
/// failure aborts the request upstream of this struct.
#[derive(Debug)]
pub struct FetchOutcome {
    pub inbound: TransferBatch,
    pub outbound: OutboundFetch,
}

/// Issue the inbound query, and on a first page also the outbound query.
/// The two first-page queries are independent and run concurrently.
pub async fn fetch_both_directions(
    client: &dyn TransferQuery,
    endpoint: &str,
    address: &str,
    from_block: &str,
    categories: &[String],
    page_size: usize,
    page_key: Option<&str>,
) -> HistoryResult<FetchOutcome> {
    let inbound_params = TransferQueryParams {
        direction: QueryDirection::Inbound,
        address: address.to_string(),
        from_block: from_block.to_string(),
        categories: categories.to_vec(),
        max_count: page_size,
        page_key: page_key.map(str::to_string),
    };

    if page_key.is_some() {
        let inbound = client.asset_transfers(endpoint, &inbound_params).await?;
        return Ok(FetchOutcome {
            inbound,
            outbound: OutboundFetch::Skipped,
        });
    }

    let outbound_params = TransferQueryParams {
        direction: QueryDirection::Outbound,
        page_key: None,
        ..inbound_params.clone()
    };

    let (inbound, outbound) = join!(
        client.asset_transfers(endpoint, &inbound_params),
        client.asset_transfers(endpoint, &outbound_params),
    );

    let inbound = inbound?;
    let outbound = match outbound {
        Ok(batch) => OutboundFetch::Fetched(batch),
        Err(e) => {
            log::warn!(
                "outbound transfer query failed, returning inbound results only: {}",
                e
            );
            OutboundFetch::Degraded
        }
    };

    Ok(FetchOutcome { inbound, outbound })
}
