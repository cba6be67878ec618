// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub platform for desktop/CI builds where there is no SMS stack.
//
// Every trait method returns `PlatformUnavailable` — the real implementation
// lives in the `android` module.

use smsguard_core::error::{Result, SmsError};
use smsguard_core::types::{Permission, Selection, SmsRecord, StoreRow, StoreUpdate, StoreUri};

use crate::traits::MessagingPlatform;

/// No-op platform returned on non-Android targets.
pub struct StubPlatform;

impl MessagingPlatform for StubPlatform {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }

    fn check_permission(&self, permission: Permission) -> Result<bool> {
        tracing::warn!(%permission, "check_permission called on stub platform");
        Err(SmsError::PlatformUnavailable)
    }

    fn query_store(&self, _uri: &StoreUri, _selection: &Selection) -> Result<Vec<StoreRow>> {
        tracing::warn!("query_store called on stub platform");
        Err(SmsError::PlatformUnavailable)
    }

    fn insert_store(&self, _uri: &StoreUri, _record: &SmsRecord) -> Result<()> {
        tracing::warn!("insert_store called on stub platform");
        Err(SmsError::PlatformUnavailable)
    }

    fn update_store(
        &self,
        _uri: &StoreUri,
        _selection: &Selection,
        _update: &StoreUpdate,
    ) -> Result<usize> {
        tracing::warn!("update_store called on stub platform");
        Err(SmsError::PlatformUnavailable)
    }

    fn delete_store(&self, _uri: &StoreUri, _selection: &Selection) -> Result<usize> {
        tracing::warn!("delete_store called on stub platform");
        Err(SmsError::PlatformUnavailable)
    }

    fn notify_change(&self, _uri: &StoreUri) -> Result<()> {
        tracing::warn!("notify_change called on stub platform");
        Err(SmsError::PlatformUnavailable)
    }

    fn send_transport(&self, _destination: &str, _segments: &[String]) -> Result<()> {
        tracing::warn!("send_transport called on stub platform");
        Err(SmsError::PlatformUnavailable)
    }
}
