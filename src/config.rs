//! Session configuration.

use serde::{Deserialize, Serialize};

/// Behavior switches for a [`Session`](crate::Session).
///
/// Both flags default to off: operations silently tolerate host-level
/// violations, and event delivery goes through the task queue until
/// [`flush_messages`](crate::Session::flush_messages) runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Raise the host's errors at violated preconditions instead of
    /// no-opping.
    pub simulate_errors: bool,
    /// Deliver events and UI messages inline instead of queueing them.
    pub without_timeout: bool,
}

impl Config {
    /// A config with error simulation on; the usual choice for tests
    /// that assert on failure paths.
    pub fn strict() -> Self {
        Self {
            simulate_errors: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_permissive() {
        let config = Config::default();
        assert!(!config.simulate_errors);
        assert!(!config.without_timeout);
    }

    #[test]
    fn strict_enables_error_simulation_only() {
        let config = Config::strict();
        assert!(config.simulate_errors);
        assert!(!config.without_timeout);
    }

    #[test]
    fn deserializes_with_missing_fields() {
        let config: Config = serde_json::from_str("{\"simulateErrors\": true}").unwrap();
        assert!(config.simulate_errors);
        assert!(!config.without_timeout);
    }
}
