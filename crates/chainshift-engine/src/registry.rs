/// Ordered set of custom command names learned from a collect run.
///
/// Order is insertion order; duplicates are ignored. The on-disk format is
/// one name per line; blank lines and `#` comments are skipped on load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandRegistry {
    names: Vec<String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        for name in names {
            registry.insert(name.into());
        }
        registry
    }

    /// Parses the flat newline-delimited persistence format.
    pub fn parse(content: &str) -> Self {
        let mut registry = Self::new();
        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            registry.insert(trimmed.to_string());
        }
        registry
    }

    /// Returns true when the name was not already present.
    pub fn insert(&mut self, name: String) -> bool {
        if self.contains(&name) {
            false
        } else {
            self.names.push(name);
            true
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Serializes back to the flat file format, order preserved.
    pub fn to_file_string(&self) -> String {
        let mut out = String::new();
        for name in &self.names {
            out.push_str(name);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_blanks_and_comments() {
        let registry = CommandRegistry::parse("login\n\n# comment\nlogout\n");
        let names: Vec<&str> = registry.iter().collect();
        assert_eq!(names, vec!["login", "logout"]);
    }

    #[test]
    fn test_insert_preserves_order_and_dedupes() {
        let mut registry = CommandRegistry::new();
        assert!(registry.insert("b".into()));
        assert!(registry.insert("a".into()));
        assert!(!registry.insert("b".into()));
        assert_eq!(registry.iter().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_round_trip() {
        let registry = CommandRegistry::from_names(["login", "fillForm"]);
        let reloaded = CommandRegistry::parse(&registry.to_file_string());
        assert_eq!(registry, reloaded);
    }
}
