//! Batched retrieval of forward message bodies
//!
//! The provider accepts at most five identifiers per detail request. Batches
//! are fetched one after another, never in parallel, to keep the load on the
//! provider bounded.

use log::{debug, warn};

use crate::provider::api::ForwardMessageDetail;
use crate::provider::{ProviderApi, list_field, parse_list};

/// Provider limit on identifiers per `get_forward_messages` request
pub const MAX_IDS_PER_REQUEST: usize = 5;

/// Statistics from a batched detail fetch
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchStats {
    /// Number of detail requests issued
    pub batches_requested: usize,
    /// Number of batches that failed and contributed nothing
    pub batches_failed: usize,
    /// Number of detail records retrieved
    pub details_fetched: usize,
}

/// Fetch details for `ids`, batch by batch.
///
/// A failing batch is logged and skipped; it never aborts the fetch. Output
/// is the concatenation of every successful batch, in batch order.
pub fn fetch_forward_details(
    provider: &dyn ProviderApi,
    ids: &[i64],
) -> (Vec<ForwardMessageDetail>, BatchStats) {
    let mut stats = BatchStats::default();
    let mut details = Vec::new();

    for chunk in ids.chunks(MAX_IDS_PER_REQUEST) {
        stats.batches_requested += 1;

        match fetch_batch(provider, chunk) {
            Some(batch) => details.extend(batch),
            None => stats.batches_failed += 1,
        }
    }

    stats.details_fetched = details.len();
    debug!(
        "Fetched {} forward details for {} ids in {} batches ({} failed)",
        stats.details_fetched,
        ids.len(),
        stats.batches_requested,
        stats.batches_failed
    );

    (details, stats)
}

/// Fetch one batch; `None` when the request failed or the body had no list
fn fetch_batch(provider: &dyn ProviderApi, chunk: &[i64]) -> Option<Vec<ForwardMessageDetail>> {
    let response = match provider.get_forward_messages(chunk) {
        Ok(response) => response,
        Err(e) => {
            warn!("Failed to fetch forward message batch {:?}: {:#}", chunk, e);
            return None;
        }
    };

    let Some(items) = list_field(&response, "Messages") else {
        warn!("Forward message batch {:?} returned no Messages list", chunk);
        return None;
    };

    Some(parse_list(Some(items), "forward message"))
}
