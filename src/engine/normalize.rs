// Txfeed Engine — Transfer Normalization
// One untrusted upstream record in, one canonical item out. Never fails:
// malformed fields degrade to documented defaults rather than dropping the
// transfer.

use chrono::{DateTime, SecondsFormat, Utc};

use super::amount;
use super::chains::Chain;
use crate::atoms::types::{AssetType, Direction, RawTransfer, TxItem};

/// Normalize one raw upstream transfer into a canonical transaction item.
pub fn normalize(raw: &RawTransfer, chain: Chain, target: &str) -> TxItem {
    let target_lc = target.to_lowercase();
    let from_address = raw.from.as_deref().unwrap_or("").to_lowercase();
    let to_address = raw.to.as_deref().unwrap_or("").to_lowercase();

    let direction = match (from_address == target_lc, to_address == target_lc) {
        (true, true) => Direction::Self_,
        (true, false) => Direction::Out,
        (false, true) => Direction::In,
        (false, false) => Direction::Unknown,
    };

    let asset_type = classify_category(&raw.category);

    let (value, symbol) = match asset_type {
        AssetType::Native => (
            native_value(raw),
            chain.native_symbol().to_string(),
        ),
        AssetType::Erc20 => (
            erc20_value(raw),
            raw.asset.clone().unwrap_or_else(|| "TOKEN".to_string()),
        ),
        AssetType::Erc721 | AssetType::Erc1155 => (
            raw.token_id.clone().unwrap_or_else(|| "1".to_string()),
            raw.asset.clone().unwrap_or_else(|| "NFT".to_string()),
        ),
    };

    let token_address = raw
        .raw_contract
        .as_ref()
        .and_then(|c| c.address.as_deref())
        .map(str::to_lowercase);

    TxItem {
        hash: raw.hash.clone(),
        chain_id: chain.id(),
        timestamp: canonical_timestamp(raw),
        direction,
        asset_type,
        from_address,
        to_address,
        value,
        symbol,
        token_address,
        token_id: raw.token_id.clone(),
        raw: raw.clone(),
    }
}

/// Upstream "external" and "internal" are both native-asset movements;
/// unrecognized categories are treated as fungible tokens.
fn classify_category(category: &str) -> AssetType {
    match category {
        "external" | "internal" => AssetType::Native,
        "erc721" => AssetType::Erc721,
        "erc1155" => AssetType::Erc1155,
        _ => AssetType::Erc20,
    }
}

/// Native amount: prefer the exact hex wei value at 18 decimals, fall back to
/// the upstream float approximation, then to "0".
fn native_value(raw: &RawTransfer) -> String {
    if let Some(hex) = raw.raw_contract.as_ref().and_then(|c| c.value.as_deref()) {
        match amount::hex_amount_to_decimal(hex, 18) {
            Ok(v) => return v,
            Err(_) => log::warn!("unparseable native amount in tx {}", raw.hash),
        }
    }
    raw.value
        .map(amount::format_approx)
        .unwrap_or_else(|| "0".to_string())
}

/// ERC-20 amount: decimals from the contract metadata (default 18), exact
/// hex conversion, "0" when no raw value was reported.
fn erc20_value(raw: &RawTransfer) -> String {
    let contract = raw.raw_contract.as_ref();
    let decimals = contract
        .and_then(|c| c.decimal.as_deref())
        .and_then(amount::hex_decimals)
        .unwrap_or(18);
    let hex = contract.and_then(|c| c.value.as_deref()).unwrap_or("0x0");
    amount::hex_amount_to_decimal(hex, decimals).unwrap_or_else(|_| {
        log::warn!("unparseable token amount in tx {}", raw.hash);
        "0".to_string()
    })
}

/// Canonical ISO-8601 UTC instant for the transfer. Falls back to the time
/// of normalization when upstream metadata is missing — a display-only
/// default that makes the item's timestamp non-deterministic.
fn canonical_timestamp(raw: &RawTransfer) -> String {
    raw.metadata
        .as_ref()
        .and_then(|m| m.block_timestamp.as_deref())
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::types::{RawContract, TransferMetadata};

    const TARGET: &str = "0xAAAA000000000000000000000000000000000001";
    const OTHER: &str = "0xbbbb000000000000000000000000000000000002";

    fn raw(from: &str, to: &str, category: &str) -> RawTransfer {
        RawTransfer {
            block_num: Some("0x10".to_string()),
            hash: "0xhash".to_string(),
            from: Some(from.to_string()),
            to: Some(to.to_string()),
            value: None,
            asset: None,
            category: category.to_string(),
            raw_contract: None,
            token_id: None,
            metadata: Some(TransferMetadata {
                block_timestamp: Some("2024-05-01T12:00:00.000Z".to_string()),
            }),
        }
    }

    #[test]
    fn direction_classification() {
        let item = normalize(&raw(TARGET, OTHER, "external"), Chain::Ethereum, TARGET);
        assert_eq!(item.direction, Direction::Out);

        let item = normalize(&raw(OTHER, TARGET, "external"), Chain::Ethereum, TARGET);
        assert_eq!(item.direction, Direction::In);

        let item = normalize(&raw(TARGET, TARGET, "external"), Chain::Ethereum, TARGET);
        assert_eq!(item.direction, Direction::Self_);

        let item = normalize(&raw(OTHER, OTHER, "external"), Chain::Ethereum, TARGET);
        assert_eq!(item.direction, Direction::Unknown);
    }

    #[test]
    fn direction_is_case_insensitive() {
        let item = normalize(
            &raw(&TARGET.to_uppercase().replace("0X", "0x"), OTHER, "external"),
            Chain::Ethereum,
            &TARGET.to_lowercase(),
        );
        assert_eq!(item.direction, Direction::Out);
        assert_eq!(item.from_address, TARGET.to_lowercase());
    }

    #[test]
    fn native_prefers_exact_hex_over_float() {
        let mut t = raw(OTHER, TARGET, "external");
        t.value = Some(1.0000000000000002); // lossy approximation
        t.raw_contract = Some(RawContract {
            value: Some("0xde0b6b3a7640000".to_string()),
            address: None,
            decimal: Some("0x12".to_string()),
        });
        let item = normalize(&t, Chain::Ethereum, TARGET);
        assert_eq!(item.value, "1");
        assert_eq!(item.symbol, "ETH");
        assert_eq!(item.asset_type, AssetType::Native);
    }

    #[test]
    fn native_falls_back_to_float_then_zero() {
        let mut t = raw(OTHER, TARGET, "external");
        t.value = Some(0.25);
        let item = normalize(&t, Chain::Ethereum, TARGET);
        assert_eq!(item.value, "0.25");

        let t = raw(OTHER, TARGET, "external");
        let item = normalize(&t, Chain::Ethereum, TARGET);
        assert_eq!(item.value, "0");
    }

    #[test]
    fn internal_category_maps_to_native() {
        let item = normalize(&raw(OTHER, TARGET, "internal"), Chain::Ethereum, TARGET);
        assert_eq!(item.asset_type, AssetType::Native);
    }

    #[test]
    fn erc20_uses_contract_decimals_and_defaults() {
        let mut t = raw(OTHER, TARGET, "erc20");
        t.asset = Some("USDC".to_string());
        t.raw_contract = Some(RawContract {
            value: Some("0x16e360".to_string()), // 1_500_000
            address: Some("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".to_string()),
            decimal: Some("0x6".to_string()),
        });
        let item = normalize(&t, Chain::Ethereum, TARGET);
        assert_eq!(item.value, "1.5");
        assert_eq!(item.symbol, "USDC");
        assert_eq!(
            item.token_address.as_deref(),
            Some("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48")
        );

        // No decimals field: assume 18. No symbol: default.
        let mut t = raw(OTHER, TARGET, "erc20");
        t.raw_contract = Some(RawContract {
            value: Some("0xde0b6b3a7640000".to_string()),
            address: None,
            decimal: None,
        });
        let item = normalize(&t, Chain::Ethereum, TARGET);
        assert_eq!(item.value, "1");
        assert_eq!(item.symbol, "TOKEN");
    }

    #[test]
    fn hostile_decimals_degrade_to_zero_instead_of_panicking() {
        // A corrupt record can claim 65536 decimals; normalization must keep
        // its never-fails contract and fall back to the zero value.
        let mut t = raw(OTHER, TARGET, "erc20");
        t.raw_contract = Some(RawContract {
            value: Some("0xde0b6b3a7640000".to_string()),
            address: None,
            decimal: Some("0x10000".to_string()),
        });
        let item = normalize(&t, Chain::Ethereum, TARGET);
        assert_eq!(item.value, "0");
        assert_eq!(item.asset_type, AssetType::Erc20);
    }

    #[test]
    fn nft_value_is_token_id_or_one() {
        let mut t = raw(OTHER, TARGET, "erc721");
        t.token_id = Some("0x2a".to_string());
        let item = normalize(&t, Chain::Ethereum, TARGET);
        assert_eq!(item.asset_type, AssetType::Erc721);
        assert_eq!(item.value, "0x2a");
        assert_eq!(item.symbol, "NFT");

        let t = raw(OTHER, TARGET, "erc1155");
        let item = normalize(&t, Chain::Ethereum, TARGET);
        assert_eq!(item.asset_type, AssetType::Erc1155);
        assert_eq!(item.value, "1");
    }

    #[test]
    fn timestamp_is_canonical_utc() {
        let item = normalize(&raw(OTHER, TARGET, "external"), Chain::Ethereum, TARGET);
        assert_eq!(item.timestamp, "2024-05-01T12:00:00Z");
    }

    #[test]
    fn missing_timestamp_falls_back_to_now() {
        // Edge case: the fallback is non-deterministic, so only shape is
        // asserted — ordering must not rely on it.
        let mut t = raw(OTHER, TARGET, "external");
        t.metadata = None;
        let item = normalize(&t, Chain::Ethereum, TARGET);
        assert!(item.timestamp.ends_with('Z'));
        assert!(item.timestamp.len() >= 20);
    }

    #[test]
    fn polygon_native_symbol() {
        let item = normalize(&raw(OTHER, TARGET, "external"), Chain::Polygon, TARGET);
        assert_eq!(item.symbol, "POL");
        assert_eq!(item.chain_id, 137);
    }
}
