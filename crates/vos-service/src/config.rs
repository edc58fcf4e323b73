use serde::{Deserialize, Serialize};

/// Limits applied by [`crate::ObjectStoreService`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Largest accepted body; larger writes are malformed requests.
    pub max_body_bytes: usize,
    /// Page size when a list request names none.
    pub default_list_limit: u32,
    /// Largest page size a list request may ask for.
    pub max_list_limit: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 10 * 1024 * 1024,
            default_list_limit: 100,
            max_list_limit: 1000,
        }
    }
}

impl ServiceConfig {
    /// Describe every invalid limit. Empty means valid.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.max_body_bytes == 0 {
            problems.push("service.max_body_bytes must be greater than zero".to_string());
        }
        if self.default_list_limit == 0 {
            problems.push("service.default_list_limit must be greater than zero".to_string());
        }
        if self.max_list_limit < self.default_list_limit {
            problems.push(format!(
                "service.max_list_limit ({}) is below default_list_limit ({})",
                self.max_list_limit, self.default_list_limit
            ));
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ServiceConfig::default();
        assert_eq!(config.max_body_bytes, 10 * 1024 * 1024);
        assert!(config.problems().is_empty());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: ServiceConfig = toml::from_str("max_list_limit = 50").unwrap();
        assert_eq!(config.max_list_limit, 50);
        assert_eq!(config.default_list_limit, 100);
        assert_eq!(config.problems().len(), 1);
    }

    #[test]
    fn zero_limits_are_rejected() {
        let config = ServiceConfig {
            max_body_bytes: 0,
            default_list_limit: 0,
            max_list_limit: 0,
        };
        assert_eq!(config.problems().len(), 2);
    }
}
