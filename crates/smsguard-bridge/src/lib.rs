// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! SMS Guard — native messaging bridge.
//!
//! The [`MessagingBridge`] turns the application shell's four requests (send,
//! mark thread read, delete thread, read status) into calls on a
//! [`MessagingPlatform`], and [`MethodChannel`] serves them as JSON.
//! Android talks to the telephony stack over JNI; every other target gets a
//! stub, and [`memory::InMemoryPlatform`] stands in for tests.

pub mod channel;
pub mod memory;
pub mod messaging;
pub mod traits;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(target_os = "android"))]
pub mod stub;

pub use channel::{ChannelResponse, MethodChannel};
pub use messaging::MessagingBridge;
pub use traits::MessagingPlatform;

/// Retrieves the platform implementation for the target operating system.
///
/// RETURNS: A boxed trait object (`dyn MessagingPlatform`) that abstracts
/// away the underlying native SDK details.
pub fn platform_bridge() -> Box<dyn MessagingPlatform> {
    #[cfg(target_os = "android")]
    {
        // Android: Uses `jni-rs` to invoke SmsManager and the SMS provider.
        Box::new(android::AndroidPlatform::new())
    }
    #[cfg(not(target_os = "android"))]
    {
        // DESKTOP/CI: No SMS stack; every call reports PlatformUnavailable.
        Box::new(stub::StubPlatform)
    }
}

/// Logcat tag for every event the bridge emits on Android.
pub const LOG_TAG: &str = "SmsGuard";

fn log_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

/// Install the global `tracing` subscriber.
///
/// Filter comes from `RUST_LOG`, defaulting to `info`. On Android events go
/// to logcat under [`LOG_TAG`]; elsewhere they are formatted to stdout. Safe
/// to call more than once; only the first call installs anything.
#[cfg(target_os = "android")]
pub fn init_logging() {
    use tracing_subscriber::prelude::*;

    let registry = tracing_subscriber::registry().with(log_filter());
    match tracing_android::layer(LOG_TAG) {
        Ok(logcat) => {
            let _ = registry.with(logcat).try_init();
        }
        Err(_) => {
            let _ = registry.with(tracing_subscriber::fmt::layer()).try_init();
        }
    }
}

/// Install the global `tracing` subscriber.
///
/// Filter comes from `RUST_LOG`, defaulting to `info`. Safe to call more
/// than once; only the first call installs anything.
#[cfg(not(target_os = "android"))]
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use smsguard_core::{SmsError, ThreadId};

    #[cfg(not(target_os = "android"))]
    #[test]
    fn desktop_bridge_reports_unavailable() {
        init_logging();
        let bridge = MessagingBridge::new(platform_bridge());
        assert_eq!(bridge.platform().platform_name(), "Desktop (stub)");

        let outcome = bridge.send("+15550100", "hello");
        assert!(!outcome.success);
        assert!(matches!(
            bridge.try_delete_thread(Some(&ThreadId::from("1"))),
            Err(SmsError::PlatformUnavailable)
        ));
        // Read status degrades to the fallback rather than failing.
        let status = bridge.threads_read_status(&[ThreadId::from("1")]);
        assert_eq!(status.len(), 1);
    }

    #[test]
    fn init_logging_is_idempotent() {
        init_logging();
        init_logging();
    }
}
