//! Immutable snapshot of the process environment.
//!
//! Every bootstrap decision reads from a single [`EnvSnapshot`] captured at
//! process start. Steps never consult `std::env` directly, so the whole
//! pipeline is deterministic for a given snapshot and trivially testable.

use std::collections::BTreeMap;

/// A frozen view of the environment variables at capture time.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the current process environment.
    #[must_use]
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Build a snapshot from explicit pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up a variable. Empty values are treated as unset, matching how
    /// the hosting platforms clear markers.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Whether a variable is present and non-empty.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Whether a variable holds a truthy value (`1`, `true`, `yes`, `on`,
    /// any capitalization).
    #[must_use]
    pub fn is_truthy(&self, key: &str) -> bool {
        match self.get(key) {
            Some(v) => matches!(
                v.to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            ),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_are_unset() {
        let env = EnvSnapshot::from_pairs([("RENDER", "")]);
        assert!(!env.contains("RENDER"));
        assert_eq!(env.get("RENDER"), None);
    }

    #[test]
    fn truthy_accepts_common_spellings() {
        let env = EnvSnapshot::from_pairs([
            ("A", "1"),
            ("B", "true"),
            ("C", "True"),
            ("D", "yes"),
            ("E", "on"),
            ("F", "0"),
            ("G", "false"),
        ]);
        for key in ["A", "B", "C", "D", "E"] {
            assert!(env.is_truthy(key), "{key} should be truthy");
        }
        assert!(!env.is_truthy("F"));
        assert!(!env.is_truthy("G"));
        assert!(!env.is_truthy("MISSING"));
    }

    #[test]
    fn capture_sees_process_env() {
        // PATH is set in any sane test environment.
        let env = EnvSnapshot::capture();
        assert!(env.contains("PATH"));
    }
}
