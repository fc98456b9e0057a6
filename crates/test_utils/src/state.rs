//! State fixtures.

pub use ledger_api::state::MemoryState;
use ledger_api::state::StateAccess;

/// Returns every key under `prefix`, in scan order.
pub fn keys_under(state: &dyn StateAccess, prefix: &[u8]) -> Vec<Vec<u8>> {
    state
        .prefix_scan(prefix)
        .map(|iter| {
            iter.filter_map(|res| res.ok())
                .map(|(k, _)| k.to_vec())
                .collect()
        })
        .unwrap_or_default()
}
