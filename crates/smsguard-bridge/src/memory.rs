// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory message store and transport recorder.
//
// Behaves like the Android SMS provider closely enough for the bridge's
// purposes: rows carry a thread id, a box (inbox/sent) and a read flag;
// sent messages join the thread of an existing conversation with the same
// address or open a new one. Permissions are granted explicitly and any
// platform call can be made to fail, so tests can exercise every fallback.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use smsguard_core::error::{Result, SmsError};
use smsguard_core::types::{
    MessageKind, Permission, Selection, SmsRecord, StoreRow, StoreUpdate, StoreUri, ThreadId,
};

use crate::traits::MessagingPlatform;

/// Platform call that can be made to fail with [`InMemoryPlatform::fail`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultPoint {
    CheckPermission,
    Query,
    Insert,
    Update,
    Delete,
    Notify,
    Transport,
}

/// A message row held by the in-memory store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRow {
    pub id: u64,
    pub thread_id: ThreadId,
    pub address: String,
    pub body: String,
    pub date_millis: i64,
    pub read: bool,
    pub kind: MessageKind,
}

/// A request accepted by the in-memory transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transmission {
    pub destination: String,
    pub segments: Vec<String>,
}

#[derive(Default)]
struct State {
    rows: Vec<MemoryRow>,
    next_id: u64,
    next_thread: u64,
    granted: HashSet<Permission>,
    faults: HashSet<FaultPoint>,
    notifications: Vec<StoreUri>,
    transmissions: Vec<Transmission>,
    update_calls: usize,
    query_calls: usize,
    max_selection_args: usize,
}

impl State {
    fn trip(&self, point: FaultPoint) -> Result<()> {
        if !self.faults.contains(&point) {
            return Ok(());
        }
        let err = match point {
            FaultPoint::Transport => SmsError::Transmission("radio off".into()),
            _ => SmsError::OperationFault(format!("injected {point:?} fault")),
        };
        Err(err)
    }

    fn thread_for_address(&mut self, address: &str) -> ThreadId {
        if let Some(row) = self.rows.iter().find(|r| r.address == address) {
            return row.thread_id.clone();
        }
        self.next_thread += 1;
        ThreadId(self.next_thread.to_string())
    }
}

fn in_view(uri: &StoreUri, row: &MemoryRow) -> bool {
    match uri {
        StoreUri::All | StoreUri::Conversations => true,
        StoreUri::Inbox => row.kind == MessageKind::Inbox,
        StoreUri::Sent => row.kind == MessageKind::Sent,
        StoreUri::Conversation(id) => &row.thread_id == id,
    }
}

/// In-memory implementation of [`MessagingPlatform`].
#[derive(Default)]
pub struct InMemoryPlatform {
    state: Mutex<State>,
}

impl InMemoryPlatform {
    /// Empty store with no permissions granted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store with every permission granted.
    pub fn permissive() -> Self {
        let platform = Self::new();
        platform.grant(Permission::SendSms);
        platform.grant(Permission::ReadSms);
        platform
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state
            .lock()
            .map_err(|_| SmsError::OperationFault("in-memory store lock poisoned".into()))
    }

    pub fn grant(&self, permission: Permission) {
        if let Ok(mut state) = self.state.lock() {
            state.granted.insert(permission);
        }
    }

    pub fn revoke(&self, permission: Permission) {
        if let Ok(mut state) = self.state.lock() {
            state.granted.remove(&permission);
        }
    }

    /// Make every subsequent call at `point` fail.
    pub fn fail(&self, point: FaultPoint) {
        if let Ok(mut state) = self.state.lock() {
            state.faults.insert(point);
        }
    }

    /// Seed an incoming message into `thread_id`.
    pub fn receive(&self, thread_id: impl Into<ThreadId>, address: &str, body: &str, read: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.next_id += 1;
            let row = MemoryRow {
                id: state.next_id,
                thread_id: thread_id.into(),
                address: address.to_owned(),
                body: body.to_owned(),
                date_millis: 0,
                read,
                kind: MessageKind::Inbox,
            };
            if let Ok(n) = row.thread_id.0.parse::<u64>() {
                state.next_thread = state.next_thread.max(n);
            }
            state.rows.push(row);
        }
    }

    /// Snapshot of every stored row.
    pub fn rows(&self) -> Vec<MemoryRow> {
        self.state
            .lock()
            .map(|s| s.rows.clone())
            .unwrap_or_default()
    }

    /// Rows in the sent box.
    pub fn sent_messages(&self) -> Vec<MemoryRow> {
        self.rows()
            .into_iter()
            .filter(|r| r.kind == MessageKind::Sent)
            .collect()
    }

    pub fn transmissions(&self) -> Vec<Transmission> {
        self.state
            .lock()
            .map(|s| s.transmissions.clone())
            .unwrap_or_default()
    }

    pub fn notifications(&self) -> Vec<StoreUri> {
        self.state
            .lock()
            .map(|s| s.notifications.clone())
            .unwrap_or_default()
    }

    /// Number of times `query_store` reached the store.
    pub fn query_calls(&self) -> usize {
        self.state.lock().map(|s| s.query_calls).unwrap_or(0)
    }

    /// Largest number of bound arguments any single query carried.
    pub fn max_selection_args(&self) -> usize {
        self.state.lock().map(|s| s.max_selection_args).unwrap_or(0)
    }

    /// Number of times `update_store` reached the store.
    pub fn update_calls(&self) -> usize {
        self.state.lock().map(|s| s.update_calls).unwrap_or(0)
    }
}

impl MessagingPlatform for InMemoryPlatform {
    fn platform_name(&self) -> &str {
        "In-memory"
    }

    fn check_permission(&self, permission: Permission) -> Result<bool> {
        let state = self.lock()?;
        state.trip(FaultPoint::CheckPermission)?;
        Ok(state.granted.contains(&permission))
    }

    fn query_store(&self, uri: &StoreUri, selection: &Selection) -> Result<Vec<StoreRow>> {
        let mut state = self.lock()?;
        state.trip(FaultPoint::Query)?;
        state.query_calls += 1;
        let bound = selection.to_sql().1.len();
        state.max_selection_args = state.max_selection_args.max(bound);
        Ok(state
            .rows
            .iter()
            .filter(|r| in_view(uri, r) && selection.matches(&r.thread_id, r.read))
            .map(|r| StoreRow {
                thread_id: r.thread_id.clone(),
                read: r.read,
            })
            .collect())
    }

    fn insert_store(&self, uri: &StoreUri, record: &SmsRecord) -> Result<()> {
        let mut state = self.lock()?;
        state.trip(FaultPoint::Insert)?;
        let kind = match uri {
            StoreUri::Inbox => MessageKind::Inbox,
            StoreUri::Sent => MessageKind::Sent,
            _ => record.kind,
        };
        let thread_id = state.thread_for_address(&record.address);
        state.next_id += 1;
        let row = MemoryRow {
            id: state.next_id,
            thread_id,
            address: record.address.clone(),
            body: record.body.clone(),
            date_millis: record.date_millis,
            read: record.read,
            kind,
        };
        state.rows.push(row);
        Ok(())
    }

    fn update_store(
        &self,
        uri: &StoreUri,
        selection: &Selection,
        update: &StoreUpdate,
    ) -> Result<usize> {
        let mut state = self.lock()?;
        state.trip(FaultPoint::Update)?;
        state.update_calls += 1;
        let mut changed = 0;
        for row in state
            .rows
            .iter_mut()
            .filter(|r| in_view(uri, r) && selection.matches(&r.thread_id, r.read))
        {
            if let Some(read) = update.read {
                row.read = read;
            }
            changed += 1;
        }
        Ok(changed)
    }

    fn delete_store(&self, uri: &StoreUri, selection: &Selection) -> Result<usize> {
        let mut state = self.lock()?;
        state.trip(FaultPoint::Delete)?;
        let before = state.rows.len();
        state
            .rows
            .retain(|r| !(in_view(uri, r) && selection.matches(&r.thread_id, r.read)));
        Ok(before - state.rows.len())
    }

    fn notify_change(&self, uri: &StoreUri) -> Result<()> {
        let mut state = self.lock()?;
        state.trip(FaultPoint::Notify)?;
        state.notifications.push(uri.clone());
        Ok(())
    }

    fn send_transport(&self, destination: &str, segments: &[String]) -> Result<()> {
        let mut state = self.lock()?;
        state.trip(FaultPoint::Transport)?;
        state.transmissions.push(Transmission {
            destination: destination.to_owned(),
            segments: segments.to_vec(),
        });
        Ok(())
    }
}
