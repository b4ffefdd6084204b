//! Per-terminal chat threads
//!
//! Combines return messages (terminal to gateway) and reconciled forward
//! messages (gateway to terminal) into one thread per terminal.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use log::{debug, warn};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::models::{
    ChatThread, MergedForwardRecord, MobileOriginatedEntry, MobileTerminatedEntry, TerminalId,
};
use crate::provider::api::ReturnMessage;
use crate::provider::{ProviderApi, list_field, parse_list, parse_utc};
use crate::reconcile::reconcile_forward;

/// Fetch both directions for the window and group them by terminal.
///
/// The return-message fetch and forward reconciliation run concurrently and
/// both must succeed.
pub fn collect_chat_threads(
    provider: &dyn ProviderApi,
    start_utc: &str,
    end_utc: &str,
) -> Result<Vec<ChatThread>> {
    let (returns, forwards) = rayon::join(
        || {
            provider
                .get_return_messages(start_utc, end_utc)
                .context("Failed to fetch return messages")
        },
        || reconcile_forward(provider, start_utc, end_utc),
    );

    let returns = returns?;
    let forwards = forwards?;

    Ok(aggregate_threads(&returns, forwards))
}

/// Group a `get_return_messages` response and reconciled forward records
/// into threads.
///
/// Every terminal seen on either side gets exactly one thread. Threads come
/// back ordered by terminal id.
pub fn aggregate_threads(
    return_response: &Value,
    forward_records: Vec<MergedForwardRecord>,
) -> Vec<ChatThread> {
    let returns: Vec<ReturnMessage> =
        parse_list(list_field(return_response, "Messages"), "return message");

    let mut threads: BTreeMap<TerminalId, ChatThread> = BTreeMap::new();

    for msg in returns {
        let Some(terminal) = msg.mobile_id.as_deref().and_then(TerminalId::parse) else {
            warn!("Skipping return message {:?} without a MobileID", msg.id);
            continue;
        };
        threads
            .entry(terminal.clone())
            .or_insert_with(|| ChatThread::new(terminal))
            .mobile_originated
            .push(MobileOriginatedEntry::from(msg));
    }

    for record in forward_records {
        let Some(terminal) = record.destination_id.as_deref().and_then(TerminalId::parse) else {
            warn!("Skipping forward message {} without a DestinationID", record.id);
            continue;
        };
        threads
            .entry(terminal.clone())
            .or_insert_with(|| ChatThread::new(terminal))
            .mobile_terminated
            .push(MobileTerminatedEntry::from(record));
    }

    let mut threads: Vec<ChatThread> = threads.into_values().collect();
    for thread in &mut threads {
        thread
            .mobile_originated
            .sort_by_cached_key(|m| timestamp_key(m.message_utc.as_deref()));
        thread
            .mobile_terminated
            .sort_by_cached_key(|m| timestamp_key(m.create_utc.as_deref()));
    }

    debug!("Aggregated {} chat threads", threads.len());
    threads
}

/// Sort key: missing or unparseable timestamps first, then chronological
fn timestamp_key(raw: Option<&str>) -> Option<NaiveDateTime> {
    raw.and_then(parse_utc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NO_ERROR;
    use serde_json::json;

    fn record(id: i64, destination: &str, create_utc: &str) -> MergedForwardRecord {
        MergedForwardRecord {
            id,
            destination_id: Some(destination.to_string()),
            create_utc: Some(create_utc.to_string()),
            status_utc: None,
            state: None,
            is_closed: None,
            payload: None,
            raw_payload: None,
            error_id: 0,
            error_description: NO_ERROR.to_string(),
        }
    }

    #[test]
    fn test_padded_and_trimmed_ids_share_a_thread() {
        let returns = json!({
            "Messages": [{ "MobileID": " T1 ", "MessageUTC": "2024-01-01 00:00:00" }]
        });
        let threads = aggregate_threads(&returns, vec![record(1, "T1", "2024-01-01 00:00:05")]);

        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].terminal_id.as_str(), "T1");
        assert_eq!(threads[0].mobile_originated.len(), 1);
        assert_eq!(threads[0].mobile_terminated.len(), 1);
    }

    #[test]
    fn test_one_sided_terminals_get_threads() {
        let returns = json!({ "Messages": [{ "MobileID": "A" }] });
        let threads = aggregate_threads(&returns, vec![record(1, "B", "2024-01-01 00:00:00")]);

        assert_eq!(threads.len(), 2);
        let a = threads.iter().find(|t| t.terminal_id.as_str() == "A").unwrap();
        let b = threads.iter().find(|t| t.terminal_id.as_str() == "B").unwrap();
        assert_eq!((a.mobile_originated.len(), a.mobile_terminated.len()), (1, 0));
        assert_eq!((b.mobile_originated.len(), b.mobile_terminated.len()), (0, 1));
    }

    #[test]
    fn test_numeric_mobile_id_matches_string_destination() {
        let returns = json!({ "Messages": [{ "MobileID": 1234 }] });
        let threads = aggregate_threads(&returns, vec![record(1, "1234", "2024-01-01 00:00:00")]);

        assert_eq!(threads.len(), 1);
        assert_eq!(threads[0].message_count(), 2);
    }

    #[test]
    fn test_sequences_sorted_by_time_not_text() {
        let returns = json!({
            "Messages": [
                { "MobileID": "T1", "MessageUTC": "2024-1-10 00:00:00" },
                { "MobileID": "T1", "MessageUTC": "2024-1-9 00:00:00" },
                { "MobileID": "T1", "MessageUTC": "2024-1-9 00:00:01" }
            ]
        });
        let forwards = vec![
            record(1, "T1", "2024-01-02 10:00:00"),
            record(2, "T1", "2024-01-02 9:00:00"),
        ];

        let threads = aggregate_threads(&returns, forwards);
        let mo: Vec<&str> = threads[0]
            .mobile_originated
            .iter()
            .map(|m| m.message_utc.as_deref().unwrap())
            .collect();
        assert_eq!(
            mo,
            vec!["2024-1-9 00:00:00", "2024-1-9 00:00:01", "2024-1-10 00:00:00"]
        );
        let mt: Vec<&str> = threads[0]
            .mobile_terminated
            .iter()
            .map(|m| m.create_utc.as_deref().unwrap())
            .collect();
        assert_eq!(mt, vec!["2024-01-02 9:00:00", "2024-01-02 10:00:00"]);
    }

    #[test]
    fn test_missing_messages_field_is_empty() {
        let threads = aggregate_threads(&json!({ "ErrorID": 0 }), vec![]);
        assert!(threads.is_empty());

        let threads = aggregate_threads(&json!({ "Messages": null }), vec![record(1, "T1", "x")]);
        assert_eq!(threads.len(), 1);
    }

    #[test]
    fn test_entries_without_terminal_are_skipped() {
        let returns = json!({ "Messages": [{ "MobileID": "   " }, { "MessageUTC": "2024-01-01" }] });
        let mut no_destination = record(2, "", "2024-01-01 00:00:00");
        no_destination.destination_id = None;

        let threads = aggregate_threads(&returns, vec![no_destination, record(3, "  ", "x")]);
        assert!(threads.is_empty());
    }

    #[test]
    fn test_unparseable_timestamps_sort_first() {
        let returns = json!({
            "Messages": [
                { "MobileID": "T1", "MessageUTC": "2024-01-01 00:00:00" },
                { "MobileID": "T1", "MessageUTC": "garbage" },
                { "MobileID": "T1" }
            ]
        });
        let threads = aggregate_threads(&returns, vec![]);
        let mo = &threads[0].mobile_originated;

        assert_eq!(mo[0].message_utc.as_deref(), Some("garbage"));
        assert_eq!(mo[1].message_utc, None);
        assert_eq!(mo[2].message_utc.as_deref(), Some("2024-01-01 00:00:00"));
    }
}
