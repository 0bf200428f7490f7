// Txfeed Engine — Upstream JSON-RPC Transfer Query
// The `TransferQuery` trait is the injected seam between the pipeline and the
// provider; `AlchemyClient` is the production implementation. The three
// upstream failure modes stay distinguishable: transport (non-2xx / network),
// malformed body, and embedded protocol error.

use std::time::Duration;

use async_trait::async_trait;

use crate::atoms::error::{HistoryError, HistoryResult};
use crate::atoms::types::TransferBatch;

/// Categories requested when the caller does not narrow them.
pub const DEFAULT_CATEGORIES: &[&str] = &["external", "erc20", "erc721", "erc1155"];

const RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// Which side of the transfer the query filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryDirection {
    /// `toAddress = target` — transfers received by the target.
    Inbound,
    /// `fromAddress = target` — transfers sent by the target.
    Outbound,
}

/// Parameters for one single-direction upstream transfer query.
#[derive(Debug, Clone)]
pub struct TransferQueryParams {
    pub direction: QueryDirection,
    pub address: String,
    pub from_block: String,
    pub categories: Vec<String>,
    pub max_count: usize,
    pub page_key: Option<String>,
}

/// Abstract upstream transfer-query capability.
#[async_trait]
pub trait TransferQuery: Send + Sync {
    async fn asset_transfers(
        &self,
        endpoint: &str,
        params: &TransferQueryParams,
    ) -> HistoryResult<TransferBatch>;
}

/// Production client speaking `alchemy_getAssetTransfers` over HTTP.
pub struct AlchemyClient {
    http: reqwest::Client,
}

impl AlchemyClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for AlchemyClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransferQuery for AlchemyClient {
    async fn asset_transfers(
        &self,
        endpoint: &str,
        params: &TransferQueryParams,
    ) -> HistoryResult<TransferBatch> {
        let mut query = serde_json::json!({
            "fromBlock": params.from_block,
            "category": params.categories,
            "excludeZeroValue": true,
            "withMetadata": true,
            "maxCount": format!("0x{:x}", params.max_count),
            "order": "desc",
        });
        match params.direction {
            QueryDirection::Inbound => query["toAddress"] = serde_json::json!(params.address),
            QueryDirection::Outbound => query["fromAddress"] = serde_json::json!(params.address),
        }
        if let Some(pk) = &params.page_key {
            query["pageKey"] = serde_json::json!(pk);
        }

        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "method": "alchemy_getAssetTransfers",
            "params": [query],
            "id": 1
        });

        let resp = self
            .http
            .post(endpoint)
            .json(&body)
            .timeout(RPC_TIMEOUT)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(HistoryError::UpstreamTransport(format!(
                "upstream returned status {}",
                resp.status()
            )));
        }

        let envelope: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| HistoryError::UpstreamMalformed(e.without_url().to_string()))?;

        if let Some(err) = envelope.get("error") {
            let message = err
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unspecified upstream error");
            return Err(HistoryError::UpstreamProtocol(message.to_string()));
        }

        let result = envelope.get("result").ok_or_else(|| {
            HistoryError::UpstreamMalformed("response missing 'result' field".to_string())
        })?;

        serde_json::from_value(result.clone())
            .map_err(|e| HistoryError::UpstreamMalformed(e.to_string()))
    }
}
