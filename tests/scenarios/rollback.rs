//! Scenario: an operator rolls an instance back to an older installation.

use shipyard::application::{RollbackAction, RollbackRequest};
use shipyard::domain::policies::PolicyEngine;
use shipyard::{ActionReport, ActionRunner, Filter};

use crate::common::*;

fn rollback(site: &Site, to: Option<&str>, from: Option<&str>) -> ActionReport {
    let action = RollbackAction::new(site.repository());
    ActionRunner::new(PolicyEngine::new(Vec::new()))
        .run(
            &action,
            &RollbackRequest {
                target: Filter::parse("*:*:prod").unwrap(),
                rollback_to: to.map(str::to_string),
                rollback_from: from.map(str::to_string),
            },
        )
        .unwrap()
}

#[test]
fn rollback_without_options_activates_previous_installation() {
    let site = Site::with_keep_releases(&["prod"], 5);
    site.seed("prod", &["v1", "v2", "v3"], Some(3));

    let report = rollback(&site, None, None);

    assert!(report.is_success(), "{:?}", report);
    assert_eq!(site.current_number("prod"), Some(2));
    assert_eq!(site.instance("prod").current_release_name(), Some("v2"));
}

#[test]
fn rollback_to_named_release() {
    let site = Site::with_keep_releases(&["prod"], 5);
    site.seed("prod", &["v1", "v2", "v3"], Some(3));

    let report = rollback(&site, Some("v1"), Some("v3"));

    assert!(report.is_success(), "{:?}", report);
    assert_eq!(site.current_number("prod"), Some(1));
    // installations are kept for later roll-forward
    assert_eq!(site.installation_numbers("prod"), vec![1, 2, 3]);
}

#[test]
fn stale_rollback_from_leaves_instance_untouched() {
    let site = Site::with_keep_releases(&["prod"], 5);
    site.seed("prod", &["v1", "v2", "v3"], Some(3));

    let report = rollback(&site, None, Some("v1"));

    assert!(!report.is_success());
    let (_, failure) = report.failures().next().unwrap();
    assert_eq!(failure.kind(), "selection_empty");
    assert_eq!(site.current_number("prod"), Some(3));
}

#[test]
fn nothing_to_roll_back_to_on_first_installation() {
    let site = Site::new(&["prod"]);
    site.seed("prod", &["v1"], Some(1));

    let report = rollback(&site, None, None);

    assert_eq!(report.failed(), 1);
    assert_eq!(site.current_number("prod"), Some(1));
}

#[test]
fn rollback_to_active_release_is_refused() {
    let site = Site::with_keep_releases(&["prod"], 5);
    site.seed("prod", &["v1", "v2", "v2"], Some(3));

    let report = rollback(&site, Some("v2"), None);

    assert_eq!(report.failed(), 1);
    assert_eq!(site.current_number("prod"), Some(3));
}
