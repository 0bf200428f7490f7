// Txfeed Engine — Chain Registry
// Supported chains as a closed enum with exhaustive matching: adding a chain
// is a compile-checked change, not a runtime table miss.

use std::collections::HashMap;

use crate::atoms::error::{HistoryError, HistoryResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chain {
    Ethereum,
    Sepolia,
    Polygon,
    Arbitrum,
    Optimism,
    Base,
}

impl Chain {
    /// Look up a chain by EVM chain id. Unknown ids are not resolvable.
    pub fn from_id(chain_id: u64) -> Option<Chain> {
        match chain_id {
            1 => Some(Chain::Ethereum),
            11155111 => Some(Chain::Sepolia),
            137 => Some(Chain::Polygon),
            42161 => Some(Chain::Arbitrum),
            10 => Some(Chain::Optimism),
            8453 => Some(Chain::Base),
            _ => None,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            Chain::Ethereum => 1,
            Chain::Sepolia => 11155111,
            Chain::Polygon => 137,
            Chain::Arbitrum => 42161,
            Chain::Optimism => 10,
            Chain::Base => 8453,
        }
    }

    /// Provider network slug used to build the endpoint hostname.
    pub fn network_slug(&self) -> &'static str {
        match self {
            Chain::Ethereum => "eth-mainnet",
            Chain::Sepolia => "eth-sepolia",
            Chain::Polygon => "polygon-mainnet",
            Chain::Arbitrum => "arb-mainnet",
            Chain::Optimism => "opt-mainnet",
            Chain::Base => "base-mainnet",
        }
    }

    /// Symbol of the chain's native asset.
    pub fn native_symbol(&self) -> &'static str {
        match self {
            Chain::Polygon => "POL",
            Chain::Ethereum
            | Chain::Sepolia
            | Chain::Arbitrum
            | Chain::Optimism
            | Chain::Base => "ETH",
        }
    }

    /// Name of the credential looked up to build the endpoint URL.
    /// One provider account covers every supported network.
    pub fn credential_key(&self) -> &'static str {
        "ALCHEMY_API_KEY"
    }
}

/// A chain with its upstream endpoint resolved. The URL embeds the API key
/// as a path segment — treat it as secret, never log it.
#[derive(Debug, Clone)]
pub struct ResolvedChain {
    pub chain: Chain,
    pub endpoint_url: String,
}

/// Resolve a chain id and its credential into a callable endpoint.
pub fn resolve_chain(
    chain_id: u64,
    creds: &HashMap<String, String>,
) -> HistoryResult<ResolvedChain> {
    let chain = Chain::from_id(chain_id).ok_or(HistoryError::UnsupportedChain(chain_id))?;
    let key = creds
        .get(chain.credential_key())
        .filter(|k| !k.is_empty())
        .ok_or_else(|| HistoryError::MissingCredential(chain.credential_key().to_string()))?;
    Ok(ResolvedChain {
        chain,
        endpoint_url: format!("https://{}.g.alchemy.com/v2/{}", chain.network_slug(), key),
    })
}
