//! Forward message reconciliation pipeline
//!
//! Joins provider statuses, bodies and error codes into coherent records.

mod batch;
mod forward;

pub use batch::{BatchStats, MAX_IDS_PER_REQUEST, fetch_forward_details};
pub use forward::reconcile_forward;
