//! Property tests for target filters.

use proptest::prelude::*;

use shipyard::Filter;

fn name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9-]{0,8}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: An exact filter matches its own identity and nothing that
    /// differs in a single dimension.
    #[test]
    fn property_exact_filter_matches_only_itself(
        server in name(),
        environment in name(),
        stage in name(),
        other in name(),
    ) {
        let filter = Filter::exact(&server, &environment, &stage);
        prop_assert!(filter.matches_identity(&server, &environment, &stage));
        if other != stage {
            prop_assert!(!filter.matches_identity(&server, &environment, &other));
        }
        if other != server {
            prop_assert!(!filter.matches_identity(&other, &environment, &stage));
        }
    }

    /// PROPERTY: Wildcards accept any value in their dimension.
    #[test]
    fn property_wildcards_match_everything(
        server in name(),
        environment in name(),
        stage in name(),
    ) {
        let filter = Filter::parse("*:*:*").unwrap();
        prop_assert!(filter.matches_identity(&server, &environment, &stage));
    }

    /// PROPERTY: Parsing the displayed form yields the same filter.
    #[test]
    fn property_display_parses_back(
        servers in proptest::collection::btree_set(name(), 0..3),
        environments in proptest::collection::btree_set(name(), 0..3),
        stages in proptest::collection::btree_set(name(), 0..3),
    ) {
        let filter = Filter::new(servers, environments, stages);
        let reparsed = Filter::parse(&filter.to_string()).unwrap();
        prop_assert_eq!(reparsed, filter);
    }

    /// PROPERTY: Parsing never panics.
    #[test]
    fn property_parse_never_panics(spec in "(?s).{0,64}") {
        let _ = Filter::parse(&spec);
    }
}
