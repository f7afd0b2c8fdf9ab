use proptest::prelude::*;
use shellsense::cache::{CacheScope, QuickCorrectionCache};
use shellsense::command::{CommandParser, DEFAULT_SUBCOMMAND_COMMANDS};
use shellsense::validation::similarity::{bounded_edit_distance, score, MAX_EDIT_DISTANCE};

fn word() -> impl Strategy<Value = String> {
    r"[a-z][a-z0-9./_]{0,8}"
}

fn flag() -> impl Strategy<Value = String> {
    prop_oneof![
        r"-[a-zA-Z]{1,3}",
        r"--[a-z][a-z-]{1,8}",
        r"--[a-z]{2,8}=[a-z0-9]{1,5}",
    ]
}

fn token() -> impl Strategy<Value = String> {
    prop_oneof![word(), flag()]
}

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #[test]
        fn test_unquoted_commands_round_trip(
            base in r"[a-z][a-z0-9-]{0,8}",
            rest in prop::collection::vec(token(), 0..8),
        ) {
            let mut words = vec![base];
            words.extend(rest);
            let raw = words.join(" ");

            let structure = CommandParser::default().parse(&raw).unwrap();
            prop_assert_eq!(structure.to_command_line(), raw);
        }

        #[test]
        fn test_plain_commands_never_get_a_subcommand(
            base in r"[a-z]{2,8}",
            rest in prop::collection::vec(token(), 0..6),
        ) {
            prop_assume!(!DEFAULT_SUBCOMMAND_COMMANDS.contains(&base.as_str()));
            let raw = std::iter::once(base).chain(rest).collect::<Vec<_>>().join(" ");

            let structure = CommandParser::default().parse(&raw).unwrap();
            prop_assert_eq!(structure.subcommand(), None);
        }

        #[test]
        fn test_score_is_symmetric(a in r"[a-z-]{0,10}", b in r"[a-z-]{0,10}") {
            prop_assert_eq!(score(&a, &b), score(&b, &a));
        }

        #[test]
        fn test_bounded_distance_respects_bound(a in r"[a-z]{0,12}", b in r"[a-z]{0,12}") {
            if let Some(d) = bounded_edit_distance(&a, &b, MAX_EDIT_DISTANCE) {
                prop_assert!(d <= MAX_EDIT_DISTANCE);
            }
            if a == b {
                prop_assert_eq!(bounded_edit_distance(&a, &b, MAX_EDIT_DISTANCE), Some(0));
            }
        }

        #[test]
        fn test_cache_never_stores_no_ops(
            entries in prop::collection::vec((r"[a-zA-Z]{1,6}", r"[a-zA-Z ]{0,6}"), 0..20),
        ) {
            let cache = QuickCorrectionCache::new();
            for (token, correction) in &entries {
                cache.store(CacheScope::Base, token, correction);
            }
            for (token, _) in &entries {
                if let Some(stored) = cache.lookup(CacheScope::Base, token) {
                    prop_assert_ne!(stored.to_lowercase(), token.to_lowercase());
                    prop_assert!(!stored.trim().is_empty());
                }
            }
        }
    }
}
