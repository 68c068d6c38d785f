//! Scenario: shared data is copied between stages under policy control.

use shipyard::application::{CopySharedAction, CopySharedRequest};
use shipyard::domain::policies::{Policy, PolicyEngine};
use shipyard::domain::value_objects::StageLayers;
use shipyard::{ActionFailure, ActionReport, ActionRunner, Filter};

use crate::common::*;

fn copy(site: &Site, policies: Vec<Policy>, target: &str, source_stage: &str) -> ActionReport {
    let action = CopySharedAction::new(site.repository(), vec!["uploads".to_string()]);
    ActionRunner::new(PolicyEngine::new(policies))
        .run(
            &action,
            &CopySharedRequest {
                target: Filter::parse(target).unwrap(),
                source_stage: source_stage.to_string(),
            },
        )
        .unwrap()
}

fn layers() -> StageLayers {
    StageLayers::new(vec![
        vec!["dev".to_string()],
        vec!["staging".to_string()],
        vec!["prod".to_string()],
    ])
}

#[test]
fn copies_shared_folders_from_source_stage() {
    let site = Site::new(&["staging", "prod"]);
    site.write_shared("prod", "uploads/a.txt", "from prod");
    site.write_shared("staging", "uploads/a.txt", "old");

    let report = copy(&site, Vec::new(), "*:acme:staging", "prod");

    assert!(report.is_success(), "{:?}", report);
    assert_eq!(site.read_shared("staging", "uploads/a.txt").as_deref(), Some("from prod"));
    assert_eq!(site.read_shared("prod", "uploads/a.txt").as_deref(), Some("from prod"));
}

#[test]
fn same_release_policy_denies_when_target_is_empty() {
    let site = Site::new(&["staging", "prod"]);
    site.seed("prod", &["v1"], Some(1));
    site.write_shared("prod", "uploads/a.txt", "from prod");

    let report = copy(&site, vec![Policy::same_release()], "*:acme:staging", "prod");

    let (_, failure) = report.failures().next().unwrap();
    match failure {
        ActionFailure::PolicyDenied { policy, reason } => {
            assert_eq!(*policy, "same_release");
            assert_eq!(reason, "target has no active installation.");
        }
        other => panic!("unexpected failure {:?}", other),
    }
    assert_eq!(site.read_shared("staging", "uploads/a.txt"), None);
}

#[test]
fn same_release_policy_allows_matching_releases() {
    let site = Site::new(&["staging", "prod"]);
    site.seed("prod", &["v1", "v2"], Some(2));
    site.seed("staging", &["v2"], Some(1));
    site.write_shared("prod", "uploads/a.txt", "from prod");

    let report = copy(&site, vec![Policy::same_release()], "*:acme:staging", "prod");

    assert!(report.is_success(), "{:?}", report);
    assert_eq!(site.read_shared("staging", "uploads/a.txt").as_deref(), Some("from prod"));
}

#[test]
fn stage_write_down_blocks_skipping_a_layer() {
    let site = Site::new(&["dev", "staging", "prod"]);
    site.write_shared("staging", "uploads/a.txt", "from staging");

    let report = copy(
        &site,
        vec![Policy::stage_write_down(layers())],
        "*:acme:prod",
        "staging",
    );

    let (_, failure) = report.failures().next().unwrap();
    assert_eq!(
        failure.to_string(),
        "denied by stage_write_down policy: target stage not within same or next lower stage as source stage. target stage prod, source stage staging."
    );
    assert_eq!(site.read_shared("prod", "uploads/a.txt"), None);
}

#[test]
fn missing_source_stage_is_reported() {
    let site = Site::new(&["staging"]);

    let report = copy(&site, Vec::new(), "*:acme:staging", "prod");

    let (_, failure) = report.failures().next().unwrap();
    assert_eq!(failure.kind(), "selection_empty");
}

#[test]
fn copying_a_stage_onto_itself_is_invalid() {
    let site = Site::new(&["prod"]);
    site.write_shared("prod", "uploads/a.txt", "x");

    let report = copy(&site, Vec::new(), "*:acme:prod", "prod");

    let (_, failure) = report.failures().next().unwrap();
    assert_eq!(failure.kind(), "payload_invalid");
}
