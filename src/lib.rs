// ── Txfeed ─────────────────────────────────────────────────────────────────
// Normalized, paginated, deduplicated on-chain transfer history.
//
// The crate reconstructs a bidirectional transfer history from an upstream
// JSON-RPC provider whose queries are single-direction per call, converts the
// heterogeneous on-chain numeric encodings into exact decimal strings, and
// caches the merged result pages. The HTTP layer that exposes this to clients
// lives outside this crate; callers invoke `HistoryService::fetch_history`.

pub mod atoms;
pub mod engine;

pub use atoms::error::{HistoryError, HistoryResult};
pub use atoms::types::{
    AssetType, Direction, HistoryRequest, RawTransfer, TransferBatch, TxHistoryPage, TxItem,
};
pub use engine::cache::{HistoryCache, MemoryCache};
pub use engine::chains::Chain;
pub use engine::client::{AlchemyClient, TransferQuery};
pub use engine::pipeline::HistoryService;
