//! Scenario: releases are installed, activated and pruned.

use std::fs;

use shipyard::application::{DeployAction, DeployRequest, ExecutionError};
use shipyard::domain::entities::Task;
use shipyard::domain::policies::PolicyEngine;
use shipyard::{ActionFailure, ActionRunner, Filter};

use crate::common::*;

fn runner() -> ActionRunner {
    ActionRunner::new(PolicyEngine::new(Vec::new()))
}

#[test]
fn deploy_installs_and_activates_release() {
    let site = Site::new(&["prod"]);
    let v1 = release("v1");
    site.publish(&v1, &[("index.html", "one")]);

    let action = DeployAction::new(site.repository(), site.store());
    let report = runner()
        .run(
            &action,
            &DeployRequest {
                release: v1,
                target: Filter::parse("web:acme:prod").unwrap(),
            },
        )
        .unwrap();

    assert!(report.is_success(), "{:?}", report);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(site.current_number("prod"), Some(1));
    assert_eq!(site.read_current("prod", "index.html"), "one");

    let instance = site.instance("prod");
    assert_eq!(instance.current_release_name(), Some("v1"));
    assert!(!site
        .installation_path("prod", 1)
        .join(release("v1").archive_name())
        .exists());
}

#[test]
fn redeploys_keep_only_configured_installations() {
    let site = Site::with_keep_releases(&["prod"], 2);
    let action = DeployAction::new(site.repository(), site.store());

    for name in ["v1", "v2", "v3"] {
        let release = release(name);
        site.publish(&release, &[("VERSION", name)]);
        let report = runner()
            .run(
                &action,
                &DeployRequest {
                    release,
                    target: Filter::parse("*:*:prod").unwrap(),
                },
            )
            .unwrap();
        assert!(report.is_success(), "{:?}", report);
    }

    assert_eq!(site.installation_numbers("prod"), vec![2, 3]);
    assert_eq!(site.current_number("prod"), Some(3));
    assert_eq!(site.read_current("prod", "VERSION"), "v3");
}

#[test]
fn shared_folders_are_linked_and_deploy_task_runs_inside_installation() {
    let site = Site::new(&["prod"]);
    let v1 = release("v1");
    site.publish(&v1, &[("app.txt", "app")]);
    site.write_shared("prod", "uploads/logo.png", "png");

    let action = DeployAction::new(site.repository(), site.store())
        .with_shared_folders(vec!["uploads".to_string()])
        .with_deploy_task(Task::new("deploy").with_commands(vec!["touch warmed".to_string()]));
    let report = runner()
        .run(
            &action,
            &DeployRequest {
                release: v1,
                target: Filter::all(),
            },
        )
        .unwrap();

    assert!(report.is_success(), "{:?}", report);
    let installation = site.installation_path("prod", 1);
    assert!(installation.join("warmed").exists());
    assert!(fs::symlink_metadata(installation.join("uploads"))
        .unwrap()
        .file_type()
        .is_symlink());
    assert_eq!(site.read_current("prod", "uploads/logo.png"), "png");
}

#[test]
fn failing_instance_does_not_block_the_others() {
    let site = Site::new(&["staging", "prod"]);
    let v1 = release("v1");
    site.publish(&v1, &[("index.html", "one")]);
    // a real directory where the symlink belongs cannot be replaced
    fs::create_dir_all(site.stage_path("staging").join("current").join("stale")).unwrap();

    let action = DeployAction::new(site.repository(), site.store());
    let report = runner()
        .run(
            &action,
            &DeployRequest {
                release: v1,
                target: Filter::parse("web:acme:*").unwrap(),
            },
        )
        .unwrap();

    assert!(!report.is_success());
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.failed(), 1);
    assert_eq!(site.current_number("prod"), Some(1));

    let (description, failure) = report.failures().next().unwrap();
    assert!(description.contains("staging"), "{}", description);
    assert_eq!(failure.kind(), "execution_failed");
}

#[test]
fn unpublished_release_without_build_fails() {
    let site = Site::new(&["prod"]);
    let action = DeployAction::new(site.repository(), site.store());

    let report = runner()
        .run(
            &action,
            &DeployRequest {
                release: release("v9"),
                target: Filter::all(),
            },
        )
        .unwrap();

    let (_, failure) = report.failures().next().unwrap();
    assert!(matches!(
        failure,
        ActionFailure::ExecutionFailed(ExecutionError::ArchiveMissing { release }) if release == "v9"
    ));
    assert!(site.installation_numbers("prod").is_empty());
}

#[test]
fn empty_selection_is_reported() {
    let site = Site::new(&["prod"]);
    let action = DeployAction::new(site.repository(), site.store());

    let report = runner()
        .run(
            &action,
            &DeployRequest {
                release: release("v1"),
                target: Filter::parse("*:*:qa").unwrap(),
            },
        )
        .unwrap();

    assert!(!report.is_success());
    let (_, failure) = report.failures().next().unwrap();
    assert_eq!(failure.kind(), "selection_empty");
    assert_eq!(failure.to_string(), "no instances match *:*:qa");
}
