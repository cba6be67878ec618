// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the application shell.
//
// Every technical error is mapped to a plain sentence with a suggestion. The
// shell shows `message` as-is in the send result. Channel error replies carry
// the suggestion, retriable flag and severity, which drive whether the shell
// offers a retry or a link to the permission settings.

use serde::{Deserialize, Serialize};

use crate::error::SmsError;
use crate::types::Permission;

/// Severity of an error from the user's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    /// Radio or store hiccup — trying again may work.
    Transient,
    /// User must do something (grant a permission, pick a conversation).
    ActionRequired,
    /// Cannot be fixed by retrying on this device.
    Permanent,
}

/// A human-readable error with a plain message and an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    pub message: String,
    pub suggestion: String,
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert an `SmsError` into something the user can act on.
pub fn humanize_error(err: &SmsError) -> HumanError {
    match err {
        SmsError::PermissionDenied(permission) => {
            let what = match permission {
                Permission::SendSms => "send SMS messages",
                Permission::ReadSms => "read your SMS messages",
            };
            HumanError {
                message: format!("SMS permission not granted: this app is not allowed to {what}."),
                suggestion: "Open the app settings and allow the SMS permission, then try again."
                    .into(),
                retriable: false,
                severity: Severity::ActionRequired,
            }
        }

        SmsError::Transmission(detail) => HumanError {
            message: format!("SMS sending failed: {detail}"),
            suggestion: "Check that you have mobile signal and credit, then try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        SmsError::OperationFault(detail) => HumanError {
            message: format!("The message store could not be updated: {detail}"),
            suggestion: "Try again in a moment.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        SmsError::MissingThreadId => HumanError {
            message: "No conversation was selected.".into(),
            suggestion: "Choose a conversation from the list, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        SmsError::InvalidRequest(detail) => HumanError {
            message: format!("The request could not be understood: {detail}"),
            suggestion: "Update the app to the latest version.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        SmsError::Bridge(detail) => HumanError {
            message: format!("The phone's messaging service did not respond: {detail}"),
            suggestion: "Restart the app and try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        SmsError::PlatformUnavailable => HumanError {
            message: "SMS is not available on this device.".into(),
            suggestion: "Use a phone with a SIM card to send messages.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        SmsError::Io(e) => HumanError {
            message: format!("A file could not be read or written: {e}"),
            suggestion: "Make sure the device has free storage space.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        SmsError::Serialization(e) => HumanError {
            message: format!("Settings data is damaged: {e}"),
            suggestion: "Reset the app settings.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}
