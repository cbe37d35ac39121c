// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Specs for `planrun backup`: create, list, rollback, delete.

use crate::prelude::*;

fn project_with_service() -> Project {
    let project = Project::new();
    let data_dir = project.path("srv/jellyfin");
    project.file("srv/jellyfin/library.db", "original library");
    project.config(&format!(
        "\n[[services]]\nname = \"jellyfin\"\ndata_dir = \"{}\"\n",
        data_dir.display()
    ));
    project
}

fn only_backup_id(project: &Project) -> String {
    let backups = project.store().backups();
    assert_eq!(backups.len(), 1);
    backups[0].backup_id.as_str().to_string()
}

#[test]
#[serial]
fn create_then_list_then_delete() {
    let project = project_with_service();

    project
        .planrun()
        .args(&["backup", "create", "--services", "jellyfin"])
        .passes()
        .stdout_has("Created backup bkp-");

    let id = only_backup_id(&project);
    project
        .planrun()
        .args(&["backup", "list"])
        .passes()
        .stdout_has(&id)
        .stdout_has("jellyfin");

    project
        .planrun()
        .args(&["backup", "delete", &id])
        .passes()
        .stdout_has("Deleted backup");
    project
        .planrun()
        .args(&["backup", "list"])
        .passes()
        .stdout_has("No backups");
}

#[test]
#[serial]
fn rollback_restores_service_data() {
    let project = project_with_service();
    let data_file = project.path("srv/jellyfin/library.db");

    project
        .planrun()
        .args(&["backup", "create", "--services", "jellyfin"])
        .passes();
    let id = only_backup_id(&project);

    std::fs::write(&data_file, "corrupted").unwrap();

    project
        .planrun()
        .args(&["backup", "rollback", &id, "--yes"])
        .passes()
        .stdout_has("Restored 1 service(s)");

    assert_eq!(std::fs::read_to_string(&data_file).unwrap(), "original library");

    let log = project.store().rollback_log();
    assert_eq!(log.len(), 1);
    assert!(log[0].success);
}

#[test]
#[serial]
fn rollback_of_unknown_backup_fails() {
    let project = Project::new();
    project
        .planrun()
        .args(&["backup", "rollback", "bkp-missing", "--yes"])
        .fails()
        .stderr_has("unknown backup");
}
