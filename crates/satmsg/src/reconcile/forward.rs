//! Forward message reconciliation
//!
//! The provider spreads a forward message over three records: its status,
//! its body (detail) and the description of its error code. This module
//! joins them into one `MergedForwardRecord` per fetched detail.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::collections::HashMap;

use super::batch::fetch_forward_details;
use crate::models::{MergedForwardRecord, NO_ERROR, UNKNOWN_ERROR};
use crate::provider::api::{ErrorCode, ForwardMessageDetail, ForwardStatus};
use crate::provider::{ProviderApi, list_field, parse_list};

/// Fetch and reconcile every forward message with a status in the window.
///
/// Status and error-table failures are fatal. Detail batch failures only
/// drop the affected records.
pub fn reconcile_forward(
    provider: &dyn ProviderApi,
    start_utc: &str,
    end_utc: &str,
) -> Result<Vec<MergedForwardRecord>> {
    // 1. Statuses for the window
    let response = provider
        .get_forward_statuses(start_utc, end_utc)
        .context("Failed to fetch forward statuses")?;
    let statuses: Vec<ForwardStatus> = parse_list(list_field(&response, "Statuses"), "forward status");

    if statuses.is_empty() {
        warn!("No forward messages found between {} and {}", start_utc, end_utc);
        return Ok(Vec::new());
    }

    // 2. Bodies, in batches
    let ids: Vec<i64> = statuses
        .iter()
        .filter_map(|s| s.forward_message_id)
        .collect();
    let (details, stats) = fetch_forward_details(provider, &ids);
    if stats.batches_failed > 0 {
        warn!(
            "{} of {} forward detail batches failed; {} of {} records available",
            stats.batches_failed,
            stats.batches_requested,
            stats.details_fetched,
            ids.len()
        );
    }

    // 3. Error descriptions
    let error_table = provider
        .get_error_codes()
        .context("Failed to fetch provider error codes")?;
    let error_map = build_error_map(&error_table);

    // 4. Join
    let records: Vec<MergedForwardRecord> = details
        .into_iter()
        .map(|detail| merge_record(detail, &statuses, &error_map))
        .collect();

    debug!(
        "Reconciled {} forward records from {} statuses ({} with errors)",
        records.len(),
        statuses.len(),
        records.iter().filter(|r| r.has_error()).count()
    );

    Ok(records)
}

/// Build the `ID -> Description` lookup from the `info_errors` table.
///
/// A table that is not a list yields an empty lookup.
fn build_error_map(table: &serde_json::Value) -> HashMap<i64, String> {
    let codes: Vec<ErrorCode> = parse_list(table.as_array(), "error code");
    codes
        .into_iter()
        .filter_map(|code| code.description.map(|desc| (code.id, desc)))
        .collect()
}

/// Resolve the description for an error id
fn describe_error(error_id: Option<i64>, error_map: &HashMap<i64, String>) -> String {
    match error_id {
        None | Some(0) => NO_ERROR.to_string(),
        Some(id) => error_map
            .get(&id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
    }
}

/// Merge a detail with the first status sharing its id
fn merge_record(
    detail: ForwardMessageDetail,
    statuses: &[ForwardStatus],
    error_map: &HashMap<i64, String>,
) -> MergedForwardRecord {
    let status = statuses
        .iter()
        .find(|s| s.forward_message_id == Some(detail.id));

    let error_id = status.and_then(|s| s.error_id);

    MergedForwardRecord {
        id: detail.id,
        destination_id: detail.destination_id,
        create_utc: detail.create_utc,
        status_utc: status.and_then(|s| s.state_utc.clone()),
        state: status.and_then(|s| s.state),
        is_closed: status.and_then(|s| s.is_closed),
        payload: detail.payload,
        raw_payload: detail.raw_payload,
        error_id: error_id.unwrap_or(0),
        error_description: describe_error(error_id, error_map),
    }
}
