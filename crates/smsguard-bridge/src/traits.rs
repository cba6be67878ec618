// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait for the host's message store and SMS transport.
//
// The bridge never talks to the OS directly; everything goes through this
// trait so tests can substitute the in-memory platform.

use smsguard_core::error::Result;
use smsguard_core::types::{Permission, Selection, SmsRecord, StoreRow, StoreUpdate, StoreUri};

/// Host services the messaging bridge delegates to.
///
/// Each call is independent: implementations acquire whatever handles they
/// need (JNI attachment, cursors) and release them before returning.
pub trait MessagingPlatform: Send + Sync {
    /// Human-readable platform name (e.g. "Android").
    fn platform_name(&self) -> &str;

    /// Whether the host has granted `permission` to this app.
    fn check_permission(&self, permission: Permission) -> Result<bool>;

    /// Return the rows of `uri` matching `selection`.
    fn query_store(&self, uri: &StoreUri, selection: &Selection) -> Result<Vec<StoreRow>>;

    /// Insert a row into `uri`.
    fn insert_store(&self, uri: &StoreUri, record: &SmsRecord) -> Result<()>;

    /// Apply `update` to rows of `uri` matching `selection`. Returns rows changed.
    fn update_store(&self, uri: &StoreUri, selection: &Selection, update: &StoreUpdate)
    -> Result<usize>;

    /// Delete rows of `uri` matching `selection`. Returns rows deleted.
    fn delete_store(&self, uri: &StoreUri, selection: &Selection) -> Result<usize>;

    /// Tell observers of `uri` that its contents changed.
    fn notify_change(&self, uri: &StoreUri) -> Result<()>;

    /// Hand `segments` to the radio for `destination`.
    ///
    /// One segment is sent as a plain text message, more as a multi-part
    /// message. Returns once the transport accepted the request; delivery
    /// is not awaited.
    fn send_transport(&self, destination: &str, segments: &[String]) -> Result<()>;
}

impl<P: MessagingPlatform + ?Sized> MessagingPlatform for Box<P> {
    fn platform_name(&self) -> &str {
        (**self).platform_name()
    }

    fn check_permission(&self, permission: Permission) -> Result<bool> {
        (**self).check_permission(permission)
    }

    fn query_store(&self, uri: &StoreUri, selection: &Selection) -> Result<Vec<StoreRow>> {
        (**self).query_store(uri, selection)
    }

    fn insert_store(&self, uri: &StoreUri, record: &SmsRecord) -> Result<()> {
        (**self).insert_store(uri, record)
    }

    fn update_store(
        &self,
        uri: &StoreUri,
        selection: &Selection,
        update: &StoreUpdate,
    ) -> Result<usize> {
        (**self).update_store(uri, selection, update)
    }

    fn delete_store(&self, uri: &StoreUri, selection: &Selection) -> Result<usize> {
        (**self).delete_store(uri, selection)
    }

    fn notify_change(&self, uri: &StoreUri) -> Result<()> {
        (**self).notify_change(uri)
    }

    fn send_transport(&self, destination: &str, segments: &[String]) -> Result<()> {
        (**self).send_transport(destination, segments)
    }
}
