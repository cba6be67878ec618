// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the SMS Guard messaging bridge.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Opaque reference to a conversation in the platform message store.
///
/// The platform allocates these; the bridge never invents one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(pub String);

impl ThreadId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ThreadId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ThreadId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Mapping from thread id to "is fully read".
pub type ReadStatusMap = HashMap<ThreadId, bool>;

/// A message about to be handed to the transport. Never persisted by us.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub destination: String,
    pub body: String,
}

impl OutboundMessage {
    pub fn new(destination: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            body: body.into(),
        }
    }
}

/// Uniform result of a send request, returned to the application shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendOutcome {
    pub success: bool,
    /// Human-readable summary, suitable for display as-is.
    pub message: String,
}

impl SendOutcome {
    pub fn sent() -> Self {
        Self {
            success: true,
            message: "SMS sent successfully".into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Host permissions the bridge checks before privileged operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    SendSms,
    ReadSms,
}

impl Permission {
    /// Android manifest permission string.
    pub fn manifest_name(&self) -> &'static str {
        match self {
            Self::SendSms => "android.permission.SEND_SMS",
            Self::ReadSms => "android.permission.READ_SMS",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.manifest_name())
    }
}

/// Logical views of the platform message store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StoreUri {
    /// Every message, regardless of box.
    All,
    Inbox,
    Sent,
    /// The conversation list.
    Conversations,
    /// A single conversation, addressed by its thread id.
    Conversation(ThreadId),
}

impl StoreUri {
    /// Content provider URI for this view.
    pub fn as_content_uri(&self) -> String {
        match self {
            Self::All => "content://sms".into(),
            Self::Inbox => "content://sms/inbox".into(),
            Self::Sent => "content://sms/sent".into(),
            Self::Conversations => "content://sms/conversations".into(),
            Self::Conversation(id) => format!("content://sms/conversations/{id}"),
        }
    }
}

impl std::fmt::Display for StoreUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_content_uri())
    }
}

/// Column names of the Android `Telephony.Sms` table.
pub mod columns {
    pub const THREAD_ID: &str = "thread_id";
    pub const ADDRESS: &str = "address";
    pub const BODY: &str = "body";
    pub const DATE: &str = "date";
    pub const READ: &str = "read";
    pub const TYPE: &str = "type";
}

/// Most `?` arguments one selection may bind. SQLite builds older than 3.32
/// reject statements with more.
pub const MAX_SELECTION_ARGS: usize = 999;

/// Typed row filter for store queries, updates and deletes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Restrict to these threads. Empty means any thread.
    pub thread_ids: Vec<ThreadId>,
    /// Restrict to rows with `read = 0`.
    pub unread_only: bool,
}

impl Selection {
    /// Every row.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn thread(id: ThreadId) -> Self {
        Self {
            thread_ids: vec![id],
            unread_only: false,
        }
    }

    pub fn threads(ids: impl IntoIterator<Item = ThreadId>) -> Self {
        Self {
            thread_ids: ids.into_iter().collect(),
            unread_only: false,
        }
    }

    pub fn unread(mut self) -> Self {
        self.unread_only = true;
        self
    }

    /// Whether a row with the given thread and read flag matches.
    pub fn matches(&self, thread_id: &ThreadId, read: bool) -> bool {
        (self.thread_ids.is_empty() || self.thread_ids.contains(thread_id))
            && !(self.unread_only && read)
    }

    /// Render as a content resolver selection clause and its bound arguments.
    ///
    /// Thread ids are always passed as `?` arguments. Returns `(None, [])`
    /// when the selection matches every row.
    pub fn to_sql(&self) -> (Option<String>, Vec<String>) {
        let mut clauses = Vec::new();
        let mut args = Vec::new();

        match self.thread_ids.len() {
            0 => {}
            1 => {
                clauses.push(format!("{} = ?", columns::THREAD_ID));
                args.push(self.thread_ids[0].0.clone());
            }
            n => {
                let placeholders = vec!["?"; n].join(",");
                clauses.push(format!("{} IN ({placeholders})", columns::THREAD_ID));
                args.extend(self.thread_ids.iter().map(|id| id.0.clone()));
            }
        }

        if self.unread_only {
            clauses.push(format!("{} = 0", columns::READ));
        }

        if clauses.is_empty() {
            (None, args)
        } else {
            (Some(clauses.join(" AND ")), args)
        }
    }
}

/// One row returned by a store query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreRow {
    pub thread_id: ThreadId,
    pub read: bool,
}

/// Values written to a store row by an update. `None` leaves the column alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreUpdate {
    pub read: Option<bool>,
}

impl StoreUpdate {
    pub fn mark_read() -> Self {
        Self { read: Some(true) }
    }
}

/// Value of the Android `TYPE` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    Inbox,
    Sent,
}

impl MessageKind {
    pub fn as_column_value(&self) -> i32 {
        match self {
            Self::Inbox => 1,
            Self::Sent => 2,
        }
    }
}

/// A message row to be inserted into the platform store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsRecord {
    pub address: String,
    pub body: String,
    /// Milliseconds since the Unix epoch.
    pub date_millis: i64,
    pub read: bool,
    pub kind: MessageKind,
}

impl SmsRecord {
    /// A just-sent message, stamped with the current time and marked read.
    pub fn sent_now(message: &OutboundMessage) -> Self {
        Self {
            address: message.destination.clone(),
            body: message.body.clone(),
            date_millis: Utc::now().timestamp_millis(),
            read: true,
            kind: MessageKind::Sent,
        }
    }
}
