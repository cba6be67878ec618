// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Messaging bridge — send, mark-read, delete and read-status over a
// `MessagingPlatform`.
//
// Every operation comes in two forms:
//
//   try_*   returns `Result`, so callers can tell "nothing matched" from
//           "the platform failed";
//   plain   the shell-facing form, which logs the error and returns the
//           benign default (failed `SendOutcome`, 0, or the read-status
//           fallback). Nothing escapes to the caller.
//
// The bridge holds no state beyond its configuration; the platform store is
// the only source of truth.

use std::collections::HashSet;

use smsguard_core::BridgeConfig;
use smsguard_core::error::{Result, SmsError};
use smsguard_core::human_errors::humanize_error;
use smsguard_core::segment::split_segments;
use smsguard_core::types::{
    MAX_SELECTION_ARGS, OutboundMessage, Permission, ReadStatusMap, SendOutcome, Selection,
    SmsRecord, StoreUpdate, StoreUri, ThreadId,
};
use tracing::{debug, error, info, instrument, warn};

use crate::traits::MessagingPlatform;

/// Views whose observers are told about a mark-read.
const READ_NOTIFY_URIS: [StoreUri; 3] = [StoreUri::All, StoreUri::Inbox, StoreUri::Conversations];

/// SMS operations exposed to the application shell.
pub struct MessagingBridge<P> {
    platform: P,
    config: BridgeConfig,
}

impl<P: MessagingPlatform> MessagingBridge<P> {
    pub fn new(platform: P) -> Self {
        Self::with_config(platform, BridgeConfig::default())
    }

    pub fn with_config(platform: P, config: BridgeConfig) -> Self {
        Self { platform, config }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    // -- send ---------------------------------------------------------------

    /// Send `message`, returning the number of segments handed to the radio.
    ///
    /// Fails with `PermissionDenied` before touching the transport when
    /// SEND_SMS is missing. Every other failure (permission lookup, radio,
    /// sent-box write) is reported as `Transmission`.
    #[instrument(skip_all, fields(destination = %message.destination))]
    pub fn try_send(&self, message: &OutboundMessage) -> Result<usize> {
        match self.platform.check_permission(Permission::SendSms) {
            Ok(true) => {}
            Ok(false) => return Err(SmsError::PermissionDenied(Permission::SendSms)),
            Err(e) => return Err(as_transmission(e)),
        }

        let segments = split_segments(&message.body, self.config.segment_limit());
        self.platform
            .send_transport(&message.destination, &segments)
            .map_err(as_transmission)?;
        debug!(parts = segments.len(), "transport accepted message");

        if self.config.record_sent {
            let record = SmsRecord::sent_now(message);
            self.platform
                .insert_store(&StoreUri::Sent, &record)
                .map_err(|e| SmsError::Transmission(format!("could not record sent message: {e}")))?;
            debug!("message recorded in sent box");
        }

        Ok(segments.len())
    }

    /// Send `body` to `destination` and report the outcome for display.
    pub fn send(&self, destination: &str, body: &str) -> SendOutcome {
        let message = OutboundMessage::new(destination, body);
        match self.try_send(&message) {
            Ok(parts) => {
                info!(destination, parts, "SMS sent");
                SendOutcome::sent()
            }
            Err(e) => {
                match &e {
                    SmsError::PermissionDenied(_) => warn!(destination, "SMS permission not granted"),
                    _ => error!(destination, error = %e, "failed to send SMS"),
                }
                SendOutcome::failed(humanize_error(&e).message)
            }
        }
    }

    // -- mark read ----------------------------------------------------------

    /// Mark every unread inbox message of `thread_id` as read.
    ///
    /// Returns the number of rows changed. When that is non-zero, observers
    /// of all messages, the inbox and the conversation list are notified; a
    /// failed notification is logged but does not change the result.
    #[instrument(skip(self))]
    pub fn try_mark_thread_as_read(&self, thread_id: Option<&ThreadId>) -> Result<usize> {
        let thread_id = thread_id.ok_or(SmsError::MissingThreadId)?;

        if !self.platform.check_permission(Permission::ReadSms)? {
            return Err(SmsError::PermissionDenied(Permission::ReadSms));
        }

        let selection = Selection::thread(thread_id.clone()).unread();
        let updated =
            self.platform
                .update_store(&StoreUri::Inbox, &selection, &StoreUpdate::mark_read())?;
        info!(%thread_id, updated, "marked messages as read");

        if updated > 0 && self.config.notify_observers {
            for uri in &READ_NOTIFY_URIS {
                if let Err(e) = self.platform.notify_change(uri) {
                    warn!(%uri, error = %e, "change notification failed");
                }
            }
        }

        Ok(updated)
    }

    /// Shell-facing mark-read: 0 when the thread id is absent, permission is
    /// missing, or the store fails.
    pub fn mark_thread_as_read(&self, thread_id: Option<&ThreadId>) -> usize {
        self.try_mark_thread_as_read(thread_id)
            .unwrap_or_else(|e| {
                log_zero_fallback("mark thread as read", &e);
                0
            })
    }

    // -- delete -------------------------------------------------------------

    /// Delete every message of the conversation `thread_id`.
    #[instrument(skip(self))]
    pub fn try_delete_thread(&self, thread_id: Option<&ThreadId>) -> Result<usize> {
        let thread_id = thread_id.ok_or(SmsError::MissingThreadId)?;
        let deleted = self
            .platform
            .delete_store(&StoreUri::Conversation(thread_id.clone()), &Selection::any())?;
        debug!(%thread_id, deleted, "deleted conversation rows");
        Ok(deleted)
    }

    /// Shell-facing delete: 0 when the thread id is absent or the store fails.
    pub fn delete_thread(&self, thread_id: Option<&ThreadId>) -> usize {
        self.try_delete_thread(thread_id).unwrap_or_else(|e| {
            log_zero_fallback("delete thread", &e);
            0
        })
    }

    // -- read status --------------------------------------------------------

    /// Report, for each requested thread, whether it has no unread inbox
    /// messages. An empty request returns an empty map without a query.
    ///
    /// Ids are queried in batches of at most [`MAX_SELECTION_ARGS`]; a fault
    /// in any batch fails the whole request.
    #[instrument(skip_all, fields(threads = thread_ids.len()))]
    pub fn try_threads_read_status(&self, thread_ids: &[ThreadId]) -> Result<ReadStatusMap> {
        if thread_ids.is_empty() {
            return Ok(ReadStatusMap::new());
        }

        let mut unread: HashSet<ThreadId> = HashSet::new();
        for chunk in thread_ids.chunks(MAX_SELECTION_ARGS) {
            let selection = Selection::threads(chunk.iter().cloned()).unread();
            let rows = self.platform.query_store(&StoreUri::Inbox, &selection)?;
            unread.extend(rows.into_iter().map(|r| r.thread_id));
        }
        debug!(unread = unread.len(), "read status queried");

        Ok(thread_ids
            .iter()
            .map(|id| (id.clone(), !unread.contains(id)))
            .collect())
    }

    /// Shell-facing read status. On a query fault every requested thread
    /// gets the configured fallback value ("read" unless configured
    /// otherwise) instead of an error.
    pub fn threads_read_status(&self, thread_ids: &[ThreadId]) -> ReadStatusMap {
        self.try_threads_read_status(thread_ids).unwrap_or_else(|e| {
            let assumed = self.config.read_status_fallback.value();
            warn!(error = %e, assumed, "read status query failed, using fallback");
            thread_ids.iter().map(|id| (id.clone(), assumed)).collect()
        })
    }
}

fn as_transmission(e: SmsError) -> SmsError {
    match e {
        SmsError::Transmission(_) | SmsError::PermissionDenied(_) => e,
        other => SmsError::Transmission(other.to_string()),
    }
}

fn log_zero_fallback(operation: &str, e: &SmsError) {
    match e {
        SmsError::MissingThreadId => error!(operation, "cannot proceed: thread id is missing"),
        SmsError::PermissionDenied(p) => warn!(operation, permission = %p, "permission not granted"),
        _ => error!(operation, error = %e, "operation failed, reporting 0 rows"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{FaultPoint, InMemoryPlatform};
    use smsguard_core::config::ReadStatusFallback;

    fn bridge() -> MessagingBridge<InMemoryPlatform> {
        MessagingBridge::new(InMemoryPlatform::permissive())
    }

    fn tid(s: &str) -> ThreadId {
        ThreadId::from(s)
    }

    #[test]
    fn short_message_goes_out_as_one_segment() {
        let bridge = bridge();
        let outcome = bridge.send("+15550100", "see you at 8");
        assert!(outcome.success);

        let sent = bridge.platform().transmissions();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].segments, vec!["see you at 8".to_string()]);
    }

    #[test]
    fn long_message_is_multipart_and_reassembles() {
        let bridge = bridge();
        let body = "lorem ipsum ".repeat(30);
        assert!(bridge.send("+15550100", &body).success);

        let sent = bridge.platform().transmissions();
        assert!(sent[0].segments.len() > 1);
        assert_eq!(sent[0].segments.concat(), body);
    }

    #[test]
    fn successful_send_records_read_entry_in_sent_box() {
        let bridge = bridge();
        bridge.send("+15550100", "hello");

        let sent = bridge.platform().sent_messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].address, "+15550100");
        assert_eq!(sent[0].body, "hello");
        assert!(sent[0].read);
        assert!(sent[0].date_millis > 0);
    }

    #[test]
    fn send_without_permission_skips_transport() {
        let bridge = MessagingBridge::new(InMemoryPlatform::new());
        let outcome = bridge.send("+15550100", "hello");
        assert!(!outcome.success);
        assert!(outcome.message.contains("permission"));
        assert!(bridge.platform().transmissions().is_empty());
        assert!(bridge.platform().sent_messages().is_empty());
    }

    #[test]
    fn radio_failure_is_reported_not_raised() {
        let bridge = bridge();
        bridge.platform().fail(FaultPoint::Transport);
        let outcome = bridge.send("+15550100", "hello");
        assert!(!outcome.success);
        assert!(outcome.message.contains("radio off"));
        assert!(bridge.platform().sent_messages().is_empty());
    }

    #[test]
    fn sent_box_failure_is_a_transmission_error() {
        let bridge = bridge();
        bridge.platform().fail(FaultPoint::Insert);
        let err = bridge
            .try_send(&OutboundMessage::new("+15550100", "hello"))
            .unwrap_err();
        assert!(matches!(err, SmsError::Transmission(_)));
        assert!(!bridge.send("+15550100", "hello").success);
    }

    #[test]
    fn record_sent_can_be_disabled() {
        let config = BridgeConfig {
            record_sent: false,
            ..BridgeConfig::default()
        };
        let bridge = MessagingBridge::with_config(InMemoryPlatform::permissive(), config);
        assert!(bridge.send("+15550100", "hello").success);
        assert!(bridge.platform().sent_messages().is_empty());
    }

    #[test]
    fn mark_read_updates_unread_inbox_rows_and_notifies() {
        let bridge = bridge();
        bridge.platform().receive("3", "+1", "a", false);
        bridge.platform().receive("3", "+1", "b", false);
        bridge.platform().receive("3", "+1", "c", true);
        bridge.platform().receive("4", "+2", "d", false);

        assert_eq!(bridge.mark_thread_as_read(Some(&tid("3"))), 2);
        assert_eq!(
            bridge.platform().notifications(),
            vec![StoreUri::All, StoreUri::Inbox, StoreUri::Conversations]
        );

        let status = bridge.threads_read_status(&[tid("3"), tid("4")]);
        assert!(status[&tid("3")]);
        assert!(!status[&tid("4")]);
    }

    #[test]
    fn mark_read_on_read_thread_is_silent() {
        let bridge = bridge();
        bridge.platform().receive("3", "+1", "a", true);

        assert_eq!(bridge.mark_thread_as_read(Some(&tid("3"))), 0);
        assert!(bridge.platform().notifications().is_empty());
    }

    #[test]
    fn mark_read_without_permission_skips_update() {
        let platform = InMemoryPlatform::permissive();
        platform.revoke(Permission::ReadSms);
        platform.receive("3", "+1", "a", false);
        let bridge = MessagingBridge::new(platform);

        assert_eq!(bridge.mark_thread_as_read(Some(&tid("3"))), 0);
        assert_eq!(bridge.platform().update_calls(), 0);
        assert!(matches!(
            bridge.try_mark_thread_as_read(Some(&tid("3"))),
            Err(SmsError::PermissionDenied(Permission::ReadSms))
        ));
    }

    #[test]
    fn mark_read_without_thread_id_is_zero() {
        let bridge = bridge();
        assert_eq!(bridge.mark_thread_as_read(None), 0);
        assert!(matches!(
            bridge.try_mark_thread_as_read(None),
            Err(SmsError::MissingThreadId)
        ));
    }

    #[test]
    fn notify_failure_keeps_count() {
        let bridge = bridge();
        bridge.platform().receive("3", "+1", "a", false);
        bridge.platform().fail(FaultPoint::Notify);
        assert_eq!(bridge.mark_thread_as_read(Some(&tid("3"))), 1);
    }

    #[test]
    fn store_fault_distinguishable_from_no_match() {
        let bridge = bridge();
        assert_eq!(bridge.try_mark_thread_as_read(Some(&tid("9"))).unwrap(), 0);

        bridge.platform().fail(FaultPoint::Update);
        assert!(bridge.try_mark_thread_as_read(Some(&tid("9"))).is_err());
        assert_eq!(bridge.mark_thread_as_read(Some(&tid("9"))), 0);
    }

    #[test]
    fn delete_removes_whole_conversation() {
        let bridge = bridge();
        bridge.platform().receive("3", "+1", "a", false);
        bridge.platform().receive("3", "+1", "b", true);
        bridge.platform().receive("4", "+2", "c", true);
        bridge.send("+1", "reply");

        assert_eq!(bridge.delete_thread(Some(&tid("3"))), 3);
        let rows = bridge.platform().rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].thread_id, tid("4"));
    }

    #[test]
    fn delete_without_thread_or_on_fault_is_zero() {
        let bridge = bridge();
        bridge.platform().receive("3", "+1", "a", false);
        assert_eq!(bridge.delete_thread(None), 0);

        bridge.platform().fail(FaultPoint::Delete);
        assert_eq!(bridge.delete_thread(Some(&tid("3"))), 0);
        assert_eq!(bridge.platform().rows().len(), 1);
    }

    #[test]
    fn read_status_of_nothing_is_empty() {
        let bridge = bridge();
        bridge.platform().fail(FaultPoint::Query);
        assert!(bridge.threads_read_status(&[]).is_empty());
    }

    #[test]
    fn unknown_thread_reads_as_read() {
        let bridge = bridge();
        let status = bridge.threads_read_status(&[tid("77")]);
        assert_eq!(status.get(&tid("77")), Some(&true));
    }

    #[test]
    fn unread_sent_rows_do_not_count() {
        let bridge = bridge();
        bridge.platform().receive("3", "+1", "a", true);
        // Sent rows live outside the inbox view.
        let record = SmsRecord {
            read: false,
            ..SmsRecord::sent_now(&OutboundMessage::new("+1", "b"))
        };
        bridge.platform().insert_store(&StoreUri::Sent, &record).unwrap();

        assert!(bridge.threads_read_status(&[tid("3")])[&tid("3")]);
    }

    #[test]
    fn query_fault_assumes_read() {
        let bridge = bridge();
        bridge.platform().receive("3", "+1", "a", false);
        bridge.platform().fail(FaultPoint::Query);

        let status = bridge.threads_read_status(&[tid("3"), tid("4")]);
        assert_eq!(status.len(), 2);
        assert!(status.values().all(|read| *read));
    }

    #[test]
    fn large_read_status_request_is_batched() {
        let bridge = bridge();
        let ids: Vec<ThreadId> = (1..=2100).map(|i| ThreadId::from(i.to_string())).collect();
        bridge.platform().receive("5", "+1", "a", false);
        bridge.platform().receive("2050", "+2", "b", false);
        bridge.platform().receive("1200", "+3", "c", true);

        let status = bridge.try_threads_read_status(&ids).unwrap();
        assert_eq!(bridge.platform().query_calls(), 3);
        assert_eq!(bridge.platform().max_selection_args(), MAX_SELECTION_ARGS);
        assert_eq!(status.len(), 2100);
        assert!(!status[&tid("5")]);
        assert!(!status[&tid("2050")]);
        assert!(status[&tid("1200")]);
        assert_eq!(status.values().filter(|read| !**read).count(), 2);
    }

    #[test]
    fn oversized_segment_limit_still_splits() {
        let config = BridgeConfig {
            single_segment_limit: 10_000,
            ..BridgeConfig::default()
        };
        let bridge = MessagingBridge::with_config(InMemoryPlatform::permissive(), config);
        let body = "x".repeat(500);
        assert!(bridge.send("+15550100", &body).success);

        let sent = bridge.platform().transmissions();
        assert_eq!(sent[0].segments.len(), 4);
        assert_eq!(sent[0].segments.concat(), body);
    }

    #[test]
    fn permission_lookup_fault_is_a_transmission_error() {
        let bridge = bridge();
        bridge.platform().fail(FaultPoint::CheckPermission);

        let err = bridge
            .try_send(&OutboundMessage::new("+15550100", "hello"))
            .unwrap_err();
        assert!(matches!(err, SmsError::Transmission(_)));

        let outcome = bridge.send("+15550100", "hello");
        assert!(!outcome.success);
        assert!(outcome.message.starts_with("SMS sending failed"));
        assert!(bridge.platform().transmissions().is_empty());
    }

    #[test]
    fn permission_lookup_fault_marks_nothing_read() {
        let bridge = bridge();
        bridge.platform().receive("3", "+1", "a", false);
        bridge.platform().fail(FaultPoint::CheckPermission);

        assert!(matches!(
            bridge.try_mark_thread_as_read(Some(&tid("3"))),
            Err(SmsError::OperationFault(_))
        ));
        assert_eq!(bridge.mark_thread_as_read(Some(&tid("3"))), 0);
        assert_eq!(bridge.platform().update_calls(), 0);
        assert!(bridge.platform().notifications().is_empty());
    }

    #[test]
    fn query_fault_fallback_is_configurable() {
        let config = BridgeConfig {
            read_status_fallback: ReadStatusFallback::AssumeUnread,
            ..BridgeConfig::default()
        };
        let bridge = MessagingBridge::with_config(InMemoryPlatform::permissive(), config);
        bridge.platform().fail(FaultPoint::Query);

        let status = bridge.threads_read_status(&[tid("3")]);
        assert!(!status[&tid("3")]);
    }
}
