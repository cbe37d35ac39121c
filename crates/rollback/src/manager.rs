// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backup creation and best-effort rollback.

use crate::fsops::{copy_dir_recursive, sha256_file};
use crate::service::ServiceSpec;
use pr_core::{BackupId, Clock};
use pr_storage::{BackupPoint, RollbackLogEntry, Store, StoreError};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const CONTAINER_EXPORT_TIMEOUT: Duration = Duration::from_secs(60);
const SERVICE_CONTROL_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum RollbackError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where snapshots live and which config file to capture.
#[derive(Debug, Clone)]
pub struct RollbackConfig {
    pub backup_dir: PathBuf,
    /// Agent config file snapshotted into every backup, when it exists.
    pub config_path: Option<PathBuf>,
}

/// Outcome of one rollback attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct RollbackReport {
    pub backup_id: BackupId,
    pub success: bool,
    pub restored_count: u32,
    pub failed_services: Vec<String>,
}

/// Creates backup points and restores them service by service.
///
/// Restore is best effort: one service failing never aborts the others.
/// Containers are restored data-only; the exported tar stays on disk for
/// manual `docker import` if the image itself is gone.
pub struct RollbackManager<C: Clock> {
    store: Store,
    config: RollbackConfig,
    services: Vec<ServiceSpec>,
    clock: C,
}

impl<C: Clock> RollbackManager<C> {
    pub fn new(store: Store, config: RollbackConfig, services: Vec<ServiceSpec>, clock: C) -> Self {
        Self {
            store,
            config,
            services,
            clock,
        }
    }

    fn service(&self, name: &str) -> Option<&ServiceSpec> {
        self.services.iter().find(|s| s.name == name)
    }

    /// Snapshot config and data for the named services. Per-service
    /// failures are logged and skipped; the backup still records whatever
    /// was captured.
    pub async fn create_backup(
        &self,
        service_names: &[String],
        description: &str,
    ) -> Result<BackupId, RollbackError> {
        let backup_id = BackupId::generate();
        let backup_path = self.config.backup_dir.join(backup_id.as_str());
        std::fs::create_dir_all(&backup_path)?;

        tracing::info!(backup = %backup_id, services = ?service_names, "creating backup");

        let mut config_snapshot_path = None;
        let mut config_digest = None;
        if let Some(config_path) = &self.config.config_path {
            if config_path.exists() {
                let snapshot = backup_path.join("config.snapshot");
                std::fs::copy(config_path, &snapshot)?;
                config_digest = Some(sha256_file(&snapshot)?);
                config_snapshot_path = Some(snapshot);
            }
        }

        let mut data_snapshot_paths = BTreeMap::new();
        let mut container_snapshot_paths = BTreeMap::new();
        for name in service_names {
            let Some(spec) = self.service(name) else {
                tracing::warn!(service = %name, "unknown service, skipping");
                continue;
            };

            if spec.data_dir.exists() {
                let target = backup_path.join(format!("{name}_data"));
                match copy_dir_recursive(&spec.data_dir, &target) {
                    Ok(files) => {
                        tracing::info!(service = %name, files, "data snapshot complete");
                        data_snapshot_paths.insert(name.clone(), target);
                    }
                    Err(err) => {
                        tracing::warn!(service = %name, error = %err, "data snapshot failed");
                    }
                }
            }

            if let Some(container) = &spec.container {
                let tar = backup_path.join(format!("{name}_container.tar"));
                let tar_str = tar.display().to_string();
                let exported = run_quiet(
                    &["docker", "export", "-o", &tar_str, container],
                    CONTAINER_EXPORT_TIMEOUT,
                )
                .await;
                if exported {
                    container_snapshot_paths.insert(name.clone(), tar);
                } else {
                    tracing::warn!(service = %name, container = %container, "container export failed");
                }
            }
        }

        let backup = BackupPoint {
            backup_id: backup_id.clone(),
            timestamp: self.clock.utc_now(),
            description: description.to_string(),
            services: service_names.to_vec(),
            config_snapshot_path,
            config_digest,
            data_snapshot_paths,
            container_snapshot_paths,
        };
        self.store.record_backup(backup)?;

        tracing::info!(backup = %backup_id, "backup recorded");
        Ok(backup_id)
    }

    /// Restore a backup point. Stops and removes each service, restores
    /// config and data, then restarts what restored cleanly. The attempt
    /// is logged to the store regardless of outcome.
    pub async fn rollback(&self, backup_id: &BackupId) -> Result<RollbackReport, RollbackError> {
        let backup = self
            .store
            .backup(backup_id)
            .ok_or_else(|| StoreError::UnknownBackup(backup_id.clone()))?;

        tracing::info!(
            backup = %backup_id,
            services = ?backup.services,
            "rolling back"
        );

        let mut restored_count: u32 = 0;
        let mut failed_services: Vec<String> = Vec::new();

        for name in &backup.services {
            if let Some(spec) = self.service(name) {
                self.stop_service(spec).await;
                self.remove_service(spec).await;
            }
        }

        if let (Some(snapshot), Some(target)) =
            (&backup.config_snapshot_path, &self.config.config_path)
        {
            match sha256_file(snapshot) {
                Ok(digest) if backup.config_digest.as_deref() == Some(digest.as_str()) => {
                    if let Err(err) = std::fs::copy(snapshot, target) {
                        tracing::error!(error = %err, "config restore failed");
                    } else {
                        tracing::info!("configuration restored");
                    }
                }
                Ok(_) => {
                    tracing::error!(
                        snapshot = %snapshot.display(),
                        "config snapshot digest mismatch, not restoring"
                    );
                }
                Err(err) => {
                    tracing::error!(error = %err, "config snapshot unreadable, not restoring");
                }
            }
        }

        for name in &backup.services {
            let Some(snapshot) = backup.data_snapshot_paths.get(name) else {
                continue;
            };
            let Some(spec) = self.service(name) else {
                tracing::error!(service = %name, "service no longer configured, cannot restore");
                failed_services.push(name.clone());
                continue;
            };

            let result = (|| -> std::io::Result<()> {
                if spec.data_dir.exists() {
                    std::fs::remove_dir_all(&spec.data_dir)?;
                }
                copy_dir_recursive(snapshot, &spec.data_dir)?;
                Ok(())
            })();

            match result {
                Ok(()) => {
                    tracing::info!(service = %name, "data restored");
                    restored_count += 1;
                }
                Err(err) => {
                    tracing::error!(service = %name, error = %err, "data restore failed");
                    failed_services.push(name.clone());
                }
            }
        }

        for name in &backup.services {
            if failed_services.contains(name) {
                continue;
            }
            if let Some(spec) = self.service(name) {
                if !self.start_service(spec).await {
                    failed_services.push(name.clone());
                }
            }
        }

        let report = RollbackReport {
            backup_id: backup_id.clone(),
            success: failed_services.is_empty(),
            restored_count,
            failed_services,
        };

        self.store.append_rollback_log(RollbackLogEntry {
            backup_id: backup_id.clone(),
            timestamp: self.clock.utc_now(),
            success: report.success,
            restored_count: report.restored_count,
            failed_services: report.failed_services.clone(),
        })?;

        Ok(report)
    }

    pub fn list_backups(&self) -> Vec<BackupPoint> {
        self.store.backups()
    }

    /// Delete a backup's files, then its ledger row.
    pub fn delete_backup(&self, backup_id: &BackupId) -> Result<(), RollbackError> {
        let backup = self
            .store
            .backup(backup_id)
            .ok_or_else(|| StoreError::UnknownBackup(backup_id.clone()))?;

        let backup_path = self.config.backup_dir.join(backup.backup_id.as_str());
        if backup_path.exists() {
            if let Err(err) = std::fs::remove_dir_all(&backup_path) {
                tracing::error!(error = %err, "failed to delete backup files");
            }
        }
        self.store.delete_backup(backup_id)?;
        Ok(())
    }

    async fn stop_service(&self, spec: &ServiceSpec) {
        if let Some(container) = &spec.container {
            run_quiet(&["docker", "stop", container], SERVICE_CONTROL_TIMEOUT).await;
        } else if let Some(unit) = &spec.unit {
            run_quiet(&["sudo", "systemctl", "stop", unit], SERVICE_CONTROL_TIMEOUT).await;
        }
    }

    async fn remove_service(&self, spec: &ServiceSpec) {
        if let Some(container) = &spec.container {
            run_quiet(&["docker", "rm", container], SERVICE_CONTROL_TIMEOUT).await;
        }
    }

    async fn start_service(&self, spec: &ServiceSpec) -> bool {
        if let Some(container) = &spec.container {
            run_quiet(&["docker", "start", container], SERVICE_CONTROL_TIMEOUT).await
        } else if let Some(unit) = &spec.unit {
            run_quiet(&["sudo", "systemctl", "start", unit], SERVICE_CONTROL_TIMEOUT).await
        } else {
            true
        }
    }
}

/// Spawn an argv and report whether it exited zero within the timeout.
/// Output is discarded; failures are the caller's to interpret.
async fn run_quiet(argv: &[&str], timeout: Duration) -> bool {
    let Some((program, args)) = argv.split_first() else {
        return false;
    };
    let mut command = tokio::process::Command::new(program);
    command
        .args(args)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .kill_on_drop(true);

    let child = match command.spawn() {
        Ok(child) => child,
        Err(err) => {
            tracing::warn!(program = %program, error = %err, "spawn failed");
            return false;
        }
    };

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => output.status.success(),
        Ok(Err(err)) => {
            tracing::warn!(program = %program, error = %err, "wait failed");
            false
        }
        Err(_) => {
            tracing::warn!(program = %program, timeout_secs = timeout.as_secs(), "timed out");
            false
        }
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
