//! Ordered map of SSH config directives harvested from a dry-run command.

/// SSH option name to value, in the order the options were first seen.
///
/// Keys are case-sensitive and unique. Inserting an existing key replaces
/// its value but keeps its original position, so rendered config blocks are
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SshOptions {
    entries: Vec<(String, String)>,
}

impl SshOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();

        if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(existing, value));
        }

        self.entries.push((key, value));
        None
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
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

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SshOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut options = Self::new();
        for (key, value) in iter {
            options.insert(key, value);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_position() {
        let mut options = SshOptions::new();
        options.insert("IdentityFile", "/a");
        options.insert("User", "bob");
        let previous = options.insert("IdentityFile", "/b");

        assert_eq!(previous.as_deref(), Some("/a"));
        let keys: Vec<_> = options.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["IdentityFile", "User"]);
        assert_eq!(options.get("IdentityFile"), Some("/b"));
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let options: SshOptions = [("User", "a"), ("user", "b")].into_iter().collect();
        assert_eq!(options.len(), 2);
        assert!(options.contains_key("User"));
        assert!(!options.contains_key("USER"));
    }

    #[test]
    fn test_empty() {
        let options = SshOptions::new();
        assert!(options.is_empty());
        assert_eq!(options.get("User"), None);
    }
}
