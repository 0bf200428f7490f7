// ── Txfeed Engine ──────────────────────────────────────────────────────────
// Transfer history aggregation pipeline, split into focused submodules:
//   chains    — chain registry + endpoint/credential resolution
//   validate  — address format and page-size clamping
//   amount    — exact hex → decimal string conversion (no floats)
//   normalize — raw upstream transfer → canonical transaction item
//   client    — upstream JSON-RPC transfer query
//   fetch     — dual-direction (inbound + best-effort outbound) fetch
//   cache     — response cache key and TTL policy
//   pipeline  — orchestration: validate → cache → fetch → normalize → merge

pub mod amount;
pub mod cache;
pub mod chains;
pub mod client;
pub mod fetch;
pub mod normalize;
pub mod pipeline;
pub mod validate;
