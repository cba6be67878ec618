// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for SMS Guard.

use thiserror::Error;

use crate::types::Permission;

/// Top-level error type for all SMS Guard operations.
#[derive(Debug, Error)]
pub enum SmsError {
    // -- Surface failures --
    #[error("permission not granted: {0}")]
    PermissionDenied(Permission),

    #[error("SMS transmission failed: {0}")]
    Transmission(String),

    #[error("message store operation failed: {0}")]
    OperationFault(String),

    // -- Request errors --
    #[error("no thread id given")]
    MissingThreadId,

    #[error("invalid channel request: {0}")]
    InvalidRequest(String),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,

    // -- Persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SmsError {
    /// Short machine-readable code, used in method channel error replies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::PermissionDenied(_) => "permissionDenied",
            Self::Transmission(_) => "transmissionError",
            Self::OperationFault(_) => "operationFault",
            Self::MissingThreadId => "missingThreadId",
            Self::InvalidRequest(_) => "invalidRequest",
            Self::Bridge(_) => "bridgeError",
            Self::PlatformUnavailable => "platformUnavailable",
            Self::Io(_) => "ioError",
            Self::Serialization(_) => "serializationError",
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SmsError>;
