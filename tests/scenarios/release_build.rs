//! Scenario: a release is built from a git repository and published.

use shipyard::application::{DeployAction, DeployRequest, ReleaseAction, ReleaseBuilder};
use shipyard::domain::entities::Task;
use shipyard::domain::policies::{Policy, PolicyEngine};
use shipyard::domain::ports::ReleaseStore;
use shipyard::infrastructure::LocalConnection;
use shipyard::{ActionRunner, Filter, Release};
use std::sync::Arc;

use crate::common::*;

fn builder(site: &Site, repository: &str) -> ReleaseBuilder {
    let task = Task::new("release").with_commands(vec!["cat app.txt > BUILT".to_string()]);
    ReleaseBuilder::new(
        Arc::new(LocalConnection::new()),
        repository,
        site.root().join("build"),
        task,
    )
}

#[test]
fn release_is_built_and_published() {
    let site = Site::new(&["prod"]);
    let origin = site.root().join("origin");
    if !git_repository(&origin, &[("app.txt", "hello")], "v1") {
        return;
    }
    let repository = format!("file://{}", origin.display());

    let action = ReleaseAction::new(builder(&site, &repository), site.store());
    let report = ActionRunner::new(PolicyEngine::new(Vec::new()))
        .run(&action, &Release::new("v1", None))
        .unwrap();

    assert!(report.is_success(), "{:?}", report);
    assert!(site.store().fetch(&release("v1")).unwrap().is_some());
    assert!(!site.root().join("build").exists());

    // the published archive deploys like any other
    let deploy = DeployAction::new(site.repository(), site.store());
    let report = ActionRunner::new(PolicyEngine::new(Vec::new()))
        .run(
            &deploy,
            &DeployRequest {
                release: release("v1"),
                target: Filter::all(),
            },
        )
        .unwrap();
    assert!(report.is_success(), "{:?}", report);
    assert_eq!(site.read_current("prod", "BUILT"), "hello");
}

#[test]
fn release_whitelist_blocks_unknown_commitish() {
    let site = Site::new(&["prod"]);
    let action = ReleaseAction::new(builder(&site, "acme/shop"), site.store());
    let runner = ActionRunner::new(PolicyEngine::new(vec![Policy::release_whitelist(["main"])]));

    let report = runner.run(&action, &Release::new("feature-x", None)).unwrap();

    let (_, failure) = report.failures().next().unwrap();
    assert_eq!(failure.kind(), "policy_denied");
    assert_eq!(
        failure.to_string(),
        "denied by release_whitelist policy: commitish feature-x is not whitelisted."
    );
    assert!(site.store().fetch(&release("feature-x")).unwrap().is_none());
}

#[test]
fn deploy_builds_missing_release_when_whitelisted() {
    let site = Site::new(&["prod"]);
    let origin = site.root().join("origin");
    if !git_repository(&origin, &[("app.txt", "hello")], "stable") {
        return;
    }
    let repository = format!("file://{}", origin.display());

    let deploy = DeployAction::new(site.repository(), site.store()).with_builder(
        builder(&site, &repository),
        PolicyEngine::new(vec![Policy::release_whitelist(["stable"])]),
    );
    let report = ActionRunner::new(PolicyEngine::new(Vec::new()))
        .run(
            &deploy,
            &DeployRequest {
                release: release("stable"),
                target: Filter::all(),
            },
        )
        .unwrap();

    assert!(report.is_success(), "{:?}", report);
    assert!(site.store().fetch(&release("stable")).unwrap().is_some());
    assert_eq!(site.read_current("prod", "BUILT"), "hello");
}

#[test]
fn deploy_does_not_build_release_outside_whitelist() {
    let site = Site::new(&["prod"]);
    let origin = site.root().join("origin");
    if !git_repository(&origin, &[("app.txt", "hello")], "feature-x") {
        return;
    }
    let repository = format!("file://{}", origin.display());

    let deploy = DeployAction::new(site.repository(), site.store()).with_builder(
        builder(&site, &repository),
        PolicyEngine::new(vec![Policy::release_whitelist(["main"])]),
    );
    let report = ActionRunner::new(PolicyEngine::new(Vec::new()))
        .run(
            &deploy,
            &DeployRequest {
                release: release("feature-x"),
                target: Filter::all(),
            },
        )
        .unwrap();

    assert_eq!(report.failed(), 1);
    let (_, failure) = report.failures().next().unwrap();
    assert_eq!(failure.kind(), "policy_denied");
    assert!(site.store().fetch(&release("feature-x")).unwrap().is_none());
    assert!(!site.root().join("build").exists());
    assert!(site.installation_numbers("prod").is_empty());
}
