//! Property tests for installation ordering, pruning and rollback resolution.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use shipyard::domain::entities::{Environment, Server};
use shipyard::infrastructure::LocalConnection;
use shipyard::{Installation, Instance, Release};

fn instance(keep: usize, installs: &[(u32, u8)], current: Option<u32>) -> Instance {
    let server = Arc::new(Server::new("web", "/srv", Arc::new(LocalConnection::new()), keep));
    let installations = installs
        .iter()
        .map(|(number, release)| {
            Installation::new(
                *number,
                Release::new(format!("v{}", release), None),
                Utc.timestamp_opt(1_700_000_000 + i64::from(*number), 0).unwrap(),
            )
        })
        .collect();
    Instance::with_installations(server, Environment::new("acme"), "prod", installations, current)
        .unwrap()
}

/// Distinct installation numbers with a small release alphabet, in random order
fn installs() -> impl Strategy<Value = Vec<(u32, u8)>> {
    proptest::collection::btree_map(1u32..60, 0u8..4, 1..12)
        .prop_map(|map| map.into_iter().collect::<Vec<_>>())
        .prop_shuffle()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Installations are ascending by number regardless of insertion order.
    #[test]
    fn property_installations_stay_sorted(installs in installs()) {
        let instance = instance(2, &installs, None);
        let numbers: Vec<u32> = instance.installations().iter().map(Installation::number).collect();
        let mut expected: Vec<u32> = installs.iter().map(|(n, _)| *n).collect();
        expected.sort_unstable();
        prop_assert_eq!(numbers, expected);
    }

    /// PROPERTY: The next number is always above every existing installation.
    #[test]
    fn property_next_number_is_fresh(installs in installs()) {
        let instance = instance(2, &installs, None);
        let next = instance.next_installation_number();
        prop_assert!(installs.iter().all(|(n, _)| *n < next));
    }

    /// PROPERTY: Pruning never selects the active installation and leaves at
    /// most `keep` installations behind.
    #[test]
    fn property_prune_respects_current_and_keep(
        installs in installs(),
        keep in 1usize..5,
        pick in any::<prop::sample::Index>(),
    ) {
        let current = installs[pick.index(installs.len())].0;
        let instance = instance(keep, &installs, Some(current));
        let prune = instance.installations_to_prune();

        prop_assert!(!prune.contains(&current));
        prop_assert!(installs.len() - prune.len() <= keep.max(1));
        let mut sorted = prune.clone();
        sorted.sort_unstable();
        prop_assert_eq!(prune, sorted);
    }

    /// PROPERTY: Previous installation is the greatest number below current.
    #[test]
    fn property_previous_installation(
        installs in installs(),
        pick in any::<prop::sample::Index>(),
    ) {
        let current = installs[pick.index(installs.len())].0;
        let instance = instance(2, &installs, Some(current));
        let expected = installs.iter().map(|(n, _)| *n).filter(|n| *n < current).max();
        prop_assert_eq!(instance.previous_installation().map(Installation::number), expected);
    }

    /// PROPERTY: A rollback target is always older than current and never the
    /// active release when a release is requested.
    #[test]
    fn property_rollback_target_is_older(
        installs in installs(),
        pick in any::<prop::sample::Index>(),
        to in proptest::option::of(0u8..4),
    ) {
        let current = installs[pick.index(installs.len())].0;
        let instance = instance(2, &installs, Some(current));
        let to = to.map(|r| format!("v{}", r));

        if let Some(target) = instance.rollback_target(to.as_deref(), None) {
            prop_assert!(target.number() < current);
            if let Some(name) = &to {
                prop_assert_eq!(target.release().name(), name.as_str());
                prop_assert!(!instance.is_current_release(name));
            }
        }
    }

    /// PROPERTY: Without a current installation nothing can be rolled back.
    #[test]
    fn property_no_rollback_without_current(installs in installs()) {
        let instance = instance(2, &installs, None);
        prop_assert!(instance.rollback_target(None, None).is_none());
        prop_assert!(instance.previous_installation().is_none());
    }
}
