//! # Error Suggestions
//!
//! Helpers for command-line errors that tell users what went wrong and how
//! to fix it.
//!
//! ```rust,ignore
//! use component_generator::suggestions;
//!
//! return Err(suggestions::config_not_found(path));
//! ```

use std::path::Path;

use crate::version::VersionRegistry;

/// The configuration file given with `-c/--config` does not exist.
pub fn config_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration file not found: {path}\n\n\
         hint: Use -c/--config to point at an existing configuration file\n\
         hint: Set the COMPONENT_GENERATOR_CONFIG environment variable\n\
         hint: Omit --config and pass --name, --title and --doc-version instead",
        path = path.display()
    )
}

/// Imperative mode was selected but some required flags are missing.
///
/// `missing` holds the flag names without dashes, in declaration order.
pub fn missing_imperative_flags(missing: &[&str]) -> anyhow::Error {
    let flags = missing
        .iter()
        .map(|flag| format!("--{flag}"))
        .collect::<Vec<_>>()
        .join(", ");

    anyhow::anyhow!(
        "Missing required flag(s) without a configuration file: {flags}\n\n\
         hint: Pass --name, --title and --doc-version together with one or more --local sources\n\
         hint: Or use -c/--config to read everything from a configuration file"
    )
}

/// The requested schema version could not be used.
pub fn unsupported_version(input: &str, error: &crate::error::Error) -> anyhow::Error {
    let registry = VersionRegistry::builtin();
    let closest = find_similar(input, &registry.supported())
        .map(|candidate| format!("\nhint: Did you mean '{candidate}'?"))
        .unwrap_or_default();

    anyhow::anyhow!(
        "{error}{closest}\n\n\
         hint: Supported versions are {supported}\n\
         hint: 'v1.0.4' and '1-0-4' are accepted spellings of '1.0.4'",
        supported = registry.supported()
    )
}

/// Finds the supported version closest to `input` (edit distance <= 2).
fn find_similar(input: &str, supported: &str) -> Option<String> {
    let normalized = input.strip_prefix('v').unwrap_or(input).replace('-', ".");
    supported
        .split(", ")
        .map(|candidate| (candidate, edit_distance(&normalized, candidate)))
        .filter(|(_, distance)| *distance > 0 && *distance <= 2)
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate.to_string())
}

/// Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    for (i, a_char) in a_chars.iter().enumerate() {
        let mut current = vec![i + 1; b_chars.len() + 1];
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            current[j + 1] = (previous[j] + cost)
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        previous = current;
    }
    previous[b_chars.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_config_not_found_mentions_env_var() {
        let msg = config_not_found(Path::new("missing.yaml")).to_string();
        assert!(msg.contains("missing.yaml"));
        assert!(msg.contains("COMPONENT_GENERATOR_CONFIG"));
    }

    #[test]
    fn test_missing_imperative_flags_lists_flags() {
        let msg = missing_imperative_flags(&["title", "doc-version"]).to_string();
        assert!(msg.contains("--title, --doc-version"));
    }

    #[test]
    fn test_unsupported_version_suggests_closest() {
        let error = Error::UnsupportedVersion {
            version: "1.0.44".to_string(),
            supported: String::new(),
        };
        let msg = unsupported_version("v1-0-44", &error).to_string();
        assert!(msg.contains("Did you mean '1.0.4'"), "{msg}");
        assert!(msg.contains("1.1.1"));
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("1.0.4", "1.0.4"), 0);
        assert_eq!(edit_distance("1.0.7", "1.0.6"), 1);
        assert_eq!(edit_distance("", "abc"), 3);
    }
}
