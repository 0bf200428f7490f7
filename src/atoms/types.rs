// ── Txfeed Atoms: Data Model ───────────────────────────────────────────────
// Wire-level and canonical transfer types. `RawTransfer` mirrors the upstream
// `alchemy_getAssetTransfers` record and is untrusted: every field except the
// transaction hash and category may be absent. `TxItem` is the canonical
// output unit handed to callers.

use serde::{Deserialize, Serialize};

// ── Classification enums ───────────────────────────────────────────────────

/// Transfer direction relative to the target address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "in")]
    In,
    #[serde(rename = "out")]
    Out,
    #[serde(rename = "self")]
    Self_,
    #[serde(rename = "unknown")]
    Unknown,
}

/// Canonical asset class of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Native,
    Erc20,
    Erc721,
    Erc1155,
}

// ── Upstream (untrusted) shapes ────────────────────────────────────────────

/// Raw-units amount and contract details as reported upstream.
/// `value` is a hex-encoded arbitrary-precision integer and must never be
/// routed through a float.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContract {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub decimal: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferMetadata {
    #[serde(default)]
    pub block_timestamp: Option<String>,
}

/// One transfer record exactly as the upstream provider reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransfer {
    #[serde(default)]
    pub block_num: Option<String>,
    pub hash: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    /// Upstream's floating decimal approximation. Display fallback only.
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub asset: Option<String>,
    /// Upstream category: "external", "internal", "erc20", "erc721", "erc1155".
    pub category: String,
    #[serde(default)]
    pub raw_contract: Option<RawContract>,
    #[serde(default)]
    pub token_id: Option<String>,
    #[serde(default)]
    pub metadata: Option<TransferMetadata>,
}

/// One single-direction upstream query result: a batch of transfers plus the
/// provider's continuation cursor for that direction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferBatch {
    #[serde(default)]
    pub transfers: Vec<RawTransfer>,
    #[serde(default)]
    pub page_key: Option<String>,
}

// ── Canonical output shapes ────────────────────────────────────────────────

/// One normalized transaction item.
///
/// `value` is an exact base-10 string: no exponent notation, no trailing
/// zeros past the decimal point, `"0"` as the canonical zero. For NFT
/// categories it carries the token identifier instead of an amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxItem {
    pub hash: String,
    pub chain_id: u64,
    /// ISO-8601 UTC instant. Items sort descending on this field.
    pub timestamp: String,
    pub direction: Direction,
    pub asset_type: AssetType,
    pub from_address: String,
    pub to_address: String,
    pub value: String,
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    /// The upstream record this item was derived from.
    pub raw: RawTransfer,
}

/// One page of history: items unique by hash, ordered newest-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxHistoryPage {
    pub items: Vec<TxItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_key: Option<String>,
}

// ── Caller-facing request ──────────────────────────────────────────────────

/// Input of `HistoryService::fetch_history`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRequest {
    pub chain_id: u64,
    pub address: String,
    /// Upstream continuation cursor from a previous page, if any.
    #[serde(default)]
    pub page_key: Option<String>,
    /// Requested page size; signed so that out-of-range caller input is
    /// rejected by validation instead of silently wrapping.
    #[serde(default)]
    pub page_size: Option<i64>,
    /// Hex block cursor; defaults to "0x0" (full history).
    #[serde(default)]
    pub from_block: Option<String>,
    /// Upstream category filter; defaults to all supported categories.
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_transfer_deserializes_upstream_record() {
        let json = r#"{
            "blockNum": "0x11a2b3c",
            "hash": "0xaaa",
            "from": "0xABCDEF0000000000000000000000000000000001",
            "to": "0xabcdef0000000000000000000000000000000002",
            "value": 1.5,
            "asset": "ETH",
            "category": "external",
            "rawContract": {
                "value": "0x14d1120d7b160000",
                "address": null,
                "decimal": "0x12"
            },
            "metadata": { "blockTimestamp": "2024-05-01T12:00:00.000Z" }
        }"#;
        let t: RawTransfer = serde_json::from_str(json).unwrap();
        assert_eq!(t.hash, "0xaaa");
        assert_eq!(t.category, "external");
        let contract = t.raw_contract.unwrap();
        assert_eq!(contract.value.as_deref(), Some("0x14d1120d7b160000"));
        assert_eq!(contract.decimal.as_deref(), Some("0x12"));
        assert!(t.token_id.is_none());
    }

    #[test]
    fn raw_transfer_tolerates_sparse_record() {
        let t: RawTransfer =
            serde_json::from_str(r#"{"hash": "0xbbb", "category": "erc20"}"#).unwrap();
        assert!(t.from.is_none());
        assert!(t.value.is_none());
        assert!(t.raw_contract.is_none());
        assert!(t.metadata.is_none());
    }

    #[test]
    fn transfer_batch_without_cursor() {
        let b: TransferBatch = serde_json::from_str(r#"{"transfers": []}"#).unwrap();
        assert!(b.transfers.is_empty());
        assert!(b.page_key.is_none());
    }

    #[test]
    fn direction_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Direction::Self_).unwrap(), r#""self""#);
        assert_eq!(serde_json::to_string(&AssetType::Erc1155).unwrap(), r#""erc1155""#);
    }
}
