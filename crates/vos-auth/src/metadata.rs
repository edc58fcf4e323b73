/// Name of the metadata entry carrying the bearer credential.
pub const AUTHORIZATION: &str = "authorization";

/// Ordered, case-insensitive multimap of request metadata.
///
/// Names are lowercased on insert. A name may carry several values, which is
/// how duplicate `authorization` entries are detected.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestMetadata {
    entries: Vec<(String, String)>,
}

impl RequestMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, keeping any existing values under the same name.
    pub fn append(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.entries
            .push((name.as_ref().to_ascii_lowercase(), value.into()));
    }

    /// Builder form of [`Self::append`].
    pub fn with(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.append(name, value);
        self
    }

    /// All values under `name`, in insertion order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        let name = name.to_ascii_lowercase();
        self.entries
            .iter()
            .filter(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// The single value under `name`, if exactly one is present.
    pub fn get(&self, name: &str) -> Option<&str> {
        match self.get_all(name).as_slice() {
            [one] => Some(*one),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        self.entries.iter().any(|(k, _)| *k == name)
    }

    /// Remove every value under `name`, returning them.
    pub fn remove(&mut self, name: &str) -> Vec<String> {
        let name = name.to_ascii_lowercase();
        let mut removed = Vec::new();
        self.entries.retain(|(k, v)| {
            if *k == name {
                removed.push(v.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for RequestMetadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut md = Self::new();
        for (k, v) in iter {
            md.append(k, v);
        }
        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_insensitive() {
        let md = RequestMetadata::new().with("Authorization", "Bearer x");
        assert_eq!(md.get("AUTHORIZATION"), Some("Bearer x"));
        assert!(md.contains(AUTHORIZATION));
    }

    #[test]
    fn duplicates_are_kept_and_removed_together() {
        let mut md: RequestMetadata = [
            ("authorization", "Bearer a"),
            ("x-request-id", "r1"),
            ("Authorization", "Bearer b"),
        ]
        .into_iter()
        .collect();
        assert_eq!(md.get_all(AUTHORIZATION), vec!["Bearer a", "Bearer b"]);
        assert_eq!(md.get(AUTHORIZATION), None);

        let removed = md.remove(AUTHORIZATION);
        assert_eq!(removed, vec!["Bearer a".to_string(), "Bearer b".to_string()]);
        assert!(!md.contains(AUTHORIZATION));
        assert_eq!(md.len(), 1);
        assert_eq!(md.iter().next(), Some(("x-request-id", "r1")));
    }
}
