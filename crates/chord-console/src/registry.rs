// Static registry of physical hosts

use std::collections::BTreeMap;

use chord_client::{ConsoleError, Result};

/// Mapping from a short label to a physical host's base address.
///
/// Read-only once built; labels iterate in sorted order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HostRegistry {
    hosts: BTreeMap<String, String>,
}

impl HostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, L, A>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (L, A)>,
        L: Into<String>,
        A: AsRef<str>,
    {
        let hosts = pairs
            .into_iter()
            .map(|(label, address)| {
                (
                    label.into(),
                    address.as_ref().trim_end_matches('/').to_string(),
                )
            })
            .collect();
        Self { hosts }
    }

    /// Base address registered under `label`
    pub fn resolve(&self, label: &str) -> Result<&str> {
        self.hosts
            .get(label)
            .map(String::as_str)
            .ok_or_else(|| {
                ConsoleError::validation(format!("Physical node `{}` does not exist", label))
            })
    }

    /// Label registered for a base address, if any
    pub fn label_of(&self, address: &str) -> Option<&str> {
        self.hosts
            .iter()
            .find(|(_, a)| a.as_str() == address)
            .map(|(label, _)| label.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.hosts.iter().map(|(l, a)| (l.as_str(), a.as_str()))
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        let registry = HostRegistry::from_pairs([("east", "http://east.example")]);
        assert_eq!(registry.resolve("east").unwrap(), "http://east.example");
        assert!(matches!(
            registry.resolve("west"),
            Err(ConsoleError::Validation(_))
        ));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let registry = HostRegistry::from_pairs([("vm1", "https://localhost/vm1/")]);
        assert_eq!(registry.resolve("vm1").unwrap(), "https://localhost/vm1");
        assert_eq!(registry.label_of("https://localhost/vm1"), Some("vm1"));
    }

    #[test]
    fn test_iteration_sorted() {
        let registry = HostRegistry::from_pairs([("vm2", "b"), ("vm1", "a")]);
        let labels: Vec<&str> = registry.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["vm1", "vm2"]);
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
    }
}
