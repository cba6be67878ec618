// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SMS Guard — Core types, errors, configuration and segmentation shared by
// the bridge and its platform implementations.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod segment;
pub mod types;

pub use config::BridgeConfig;
pub use error::SmsError;
pub use types::*;
