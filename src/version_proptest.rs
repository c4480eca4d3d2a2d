//! Property-based tests for schema version normalization.
//!
//! These tests use proptest to generate version spellings and verify that
//! normalization invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::error::Error;
    use crate::version::{normalize, SchemaVersion};
    use proptest::prelude::*;

    fn supported_version() -> impl Strategy<Value = SchemaVersion> {
        prop::sample::select(SchemaVersion::ALL.to_vec())
    }

    proptest! {
        /// Property: every accepted spelling of a version normalizes to it
        #[test]
        fn spellings_of_a_version_are_equivalent(
            version in supported_version(),
            prefix in any::<bool>(),
            dashes in any::<bool>(),
        ) {
            let mut spelled = version.as_str().to_string();
            if dashes {
                spelled = spelled.replace('.', "-");
            }
            if prefix {
                spelled.insert(0, 'v');
            }
            prop_assert_eq!(normalize(&spelled).unwrap(), version);
        }

        /// Property: normalization is idempotent on its own output
        #[test]
        fn normalize_is_idempotent(version in supported_version()) {
            let once = normalize(version.as_str()).unwrap();
            let twice = normalize(once.as_str()).unwrap();
            prop_assert_eq!(once, twice);
        }

        /// Property: three numeric groups are never a format error
        #[test]
        fn well_formed_versions_are_never_format_errors(
            major in 0u32..100,
            minor in 0u32..100,
            patch in 0u32..100,
        ) {
            let input = format!("{major}.{minor}.{patch}");
            match normalize(&input) {
                Ok(version) => prop_assert_eq!(version.as_str(), input.as_str()),
                Err(Error::UnsupportedVersion { version, .. }) => prop_assert_eq!(version, input),
                Err(other) => prop_assert!(false, "unexpected error for {}: {}", input, other),
            }
        }

        /// Property: inputs with letters after the optional prefix are rejected
        #[test]
        fn non_numeric_groups_are_format_errors(group in "[a-uw-z]{1,4}") {
            let input = format!("1.{group}.0");
            prop_assert!(
                matches!(normalize(&input), Err(Error::InvalidVersionFormat { .. })),
                "expected format error for {}",
                input
            );
        }

        /// Property: two numeric groups are never enough
        #[test]
        fn two_groups_are_format_errors(major in 0u32..100, minor in 0u32..100) {
            let input = format!("{major}.{minor}");
            prop_assert!(
                matches!(normalize(&input), Err(Error::InvalidVersionFormat { .. })),
                "expected format error for {}",
                input
            );
        }
    }
}
