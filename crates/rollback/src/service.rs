// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One managed service, as declared in config.
///
/// A service is either containerized (`container` set) or unit-managed
/// (`unit` set); with neither set, only its data directory is handled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSpec {
    pub name: String,
    pub data_dir: PathBuf,
    /// Docker container name, when the service runs in a container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    /// systemd unit name, for host services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}
