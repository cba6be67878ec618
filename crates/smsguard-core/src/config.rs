// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::segment::SINGLE_SEGMENT_LIMIT;

/// What the read-status query reports when the store query faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadStatusFallback {
    /// Report every requested thread as read.
    AssumeRead,
    /// Report every requested thread as unread.
    AssumeUnread,
}

impl ReadStatusFallback {
    pub fn value(&self) -> bool {
        matches!(self, Self::AssumeRead)
    }
}

/// Settings for the messaging bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Bodies longer than this (UTF-16 units) are sent as multi-part messages.
    /// Values above [`SINGLE_SEGMENT_LIMIT`] are capped; see [`Self::segment_limit`].
    pub single_segment_limit: usize,
    /// Write each sent message into the platform's sent box.
    pub record_sent: bool,
    /// Broadcast change notifications after marking a thread read.
    pub notify_observers: bool,
    /// Read-status result when the store query fails.
    pub read_status_fallback: ReadStatusFallback,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            single_segment_limit: SINGLE_SEGMENT_LIMIT,
            record_sent: true,
            notify_observers: true,
            read_status_fallback: ReadStatusFallback::AssumeRead,
        }
    }
}

impl BridgeConfig {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let mut config: Self = serde_json::from_str(&data)?;
        if config.single_segment_limit > SINGLE_SEGMENT_LIMIT {
            tracing::warn!(
                configured = config.single_segment_limit,
                applied = SINGLE_SEGMENT_LIMIT,
                "single_segment_limit above the radio limit, capping"
            );
            config.single_segment_limit = SINGLE_SEGMENT_LIMIT;
        }
        Ok(config)
    }

    /// Single-segment limit actually applied, never above the radio's 160.
    pub fn segment_limit(&self) -> usize {
        self.single_segment_limit.min(SINGLE_SEGMENT_LIMIT)
    }

    /// Write settings to a JSON file.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Load settings, falling back to defaults if the file is absent or bad.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!(
                    path = %path.as_ref().display(),
                    error = %e,
                    "bridge config unavailable, using defaults"
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_platform_behaviour() {
        let cfg = BridgeConfig::default();
        assert_eq!(cfg.single_segment_limit, 160);
        assert!(cfg.record_sent);
        assert!(cfg.notify_observers);
        assert_eq!(cfg.read_status_fallback, ReadStatusFallback::AssumeRead);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge.json");
        std::fs::write(&path, r#"{ "record_sent": false }"#).unwrap();

        let cfg = BridgeConfig::load(&path).unwrap();
        assert!(!cfg.record_sent);
        assert_eq!(cfg.single_segment_limit, 160);
    }

    #[test]
    fn oversized_segment_limit_is_capped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge.json");
        std::fs::write(&path, r#"{ "single_segment_limit": 10000 }"#).unwrap();

        let cfg = BridgeConfig::load(&path).unwrap();
        assert_eq!(cfg.single_segment_limit, 160);

        let manual = BridgeConfig {
            single_segment_limit: 10_000,
            ..BridgeConfig::default()
        };
        assert_eq!(manual.segment_limit(), 160);

        let smaller = BridgeConfig {
            single_segment_limit: 70,
            ..BridgeConfig::default()
        };
        assert_eq!(smaller.segment_limit(), 70);
    }

    #[test]
    fn persist_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge.json");
        let cfg = BridgeConfig {
            read_status_fallback: ReadStatusFallback::AssumeUnread,
            ..BridgeConfig::default()
        };
        cfg.persist(&path).unwrap();

        let loaded = BridgeConfig::load(&path).unwrap();
        assert_eq!(loaded.read_status_fallback, ReadStatusFallback::AssumeUnread);
    }

    #[test]
    fn missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = BridgeConfig::load_or_default(dir.path().join("absent.json"));
        assert!(cfg.notify_observers);
    }
}
