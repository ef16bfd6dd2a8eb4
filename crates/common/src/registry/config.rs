use serde::{Deserialize, Serialize};

/// Default length of a single fragment in the external store (64 KiB)
pub const DEFAULT_FRAGMENT_LENGTH: u64 = 0x10000;
/// Default cap on outstanding follow requests per user
pub const DEFAULT_MAX_PENDING_FOLLOW_REQUESTS: usize = 100;
/// Default tolerance when checking that donation fractions sum to one
pub const DEFAULT_FRACTION_TOLERANCE: f64 = 0.001;

/// Tunables for a [`Registry`](super::Registry).
///
/// Every fragment is assumed to be exactly `fragment_length` bytes; quota and
/// usage are both counted in whole fragments of this size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub fragment_length: u64,
    pub max_pending_follow_requests: usize,
    pub fraction_tolerance: f64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            fragment_length: DEFAULT_FRAGMENT_LENGTH,
            max_pending_follow_requests: DEFAULT_MAX_PENDING_FOLLOW_REQUESTS,
            fraction_tolerance: DEFAULT_FRACTION_TOLERANCE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config: RegistryConfig =
            serde_json::from_str(r#"{ "fragment_length": 4096 }"#).unwrap();
        assert_eq!(config.fragment_length, 4096);
        assert_eq!(
            config.max_pending_follow_requests,
            DEFAULT_MAX_PENDING_FOLLOW_REQUESTS
        );
        assert_eq!(config.fraction_tolerance, DEFAULT_FRACTION_TOLERANCE);
    }
}
