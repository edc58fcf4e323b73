use serde::{Deserialize, Serialize};
use vos_types::{Principal, Role};

use crate::registry::ApiKeyRecord;

/// Authentication settings and the seed contents of the in-memory registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Minimum role a resolved principal must hold.
    pub required_role: Role,
    pub principals: Vec<Principal>,
    pub api_keys: Vec<ApiKeyRecord>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            required_role: Role::Admin,
            principals: Vec::new(),
            api_keys: Vec::new(),
        }
    }
}

impl AuthConfig {
    /// Describe every inconsistency in the seed data. Empty means valid.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for p in &self.principals {
            if !seen.insert((p.org_id, p.id)) {
                problems.push(format!("duplicate principal id {} in {}", p.id, p.org_id));
            }
        }
        let mut hashes = std::collections::HashSet::new();
        for key in &self.api_keys {
            if !hashes.insert(key.hash.as_str()) {
                problems.push(format!("api key {:?}: duplicate hash", key.name));
            }
            if let Some(sa) = key.service_account_id {
                let known = self
                    .principals
                    .iter()
                    .any(|p| p.id == sa && p.org_id == key.org_id);
                if !known {
                    problems.push(format!(
                        "api key {:?} references unknown principal {} in {}",
                        key.name, sa, key.org_id
                    ));
                }
            }
        }
        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = r#"
        required_role = "editor"

        [[principals]]
        id = 1
        login = "fake"
        org_id = 1
        role = "admin"
        service_account = true

        [[api_keys]]
        id = 10
        name = "ci"
        org_id = 1
        hash = "abc"
        service_account_id = 1
        expires_ms = 1700000000000
    "#;

    #[test]
    fn parses_seed_toml() {
        let config: AuthConfig = toml::from_str(SEED).unwrap();
        assert_eq!(config.required_role, Role::Editor);
        assert_eq!(config.principals[0].login, "fake");
        assert!(!config.principals[0].disabled);
        let key = &config.api_keys[0];
        assert_eq!(key.expires.map(|t| t.as_millis()), Some(1_700_000_000_000));
        assert!(!key.revoked);
        assert!(config.problems().is_empty());
    }

    #[test]
    fn default_requires_admin() {
        assert_eq!(AuthConfig::default().required_role, Role::Admin);
        let empty: AuthConfig = toml::from_str("").unwrap();
        assert_eq!(empty, AuthConfig::default());
    }

    #[test]
    fn reports_inconsistent_seed() {
        let mut config: AuthConfig = toml::from_str(SEED).unwrap();
        config.principals.push(config.principals[0].clone());
        let mut orphan = config.api_keys[0].clone();
        orphan.name = "orphan".into();
        orphan.service_account_id = Some(99);
        config.api_keys.push(orphan);

        let problems = config.problems();
        assert_eq!(problems.len(), 3, "{problems:?}");
        assert!(problems.iter().any(|p| p.contains("duplicate principal")));
        assert!(problems.iter().any(|p| p.contains("duplicate hash")));
        assert!(problems.iter().any(|p| p.contains("unknown principal 99")));
    }
}
