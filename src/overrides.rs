use regex::Regex;

use crate::errors::{ResolveError, Result};

/// Ordered table of `group/artifact` patterns mapped to clone URL templates.
///
/// The first pattern that matches wins. Templates may reference capture
/// groups (`$0`, `$1`, `${name}`); every match in the lookup string is
/// replaced by the expanded template.
///
/// Group references follow `regex` replacement syntax: a name runs for as
/// long as it is made of letters, digits and underscores. `$1abc` therefore
/// names a group called `1abc` (which expands to nothing), not group 1
/// followed by `abc`. Write `${1}abc` when a reference is followed by text,
/// as tables ported from Java-style `$1` templates often need.
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    rules: Vec<(Regex, String)>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(pattern, template)` pairs, keeping their order.
    pub fn from_pairs<I, P, T>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, T)>,
        P: AsRef<str>,
        T: Into<String>,
    {
        let mut table = Self::new();
        for (pattern, template) in pairs {
            table.push(pattern.as_ref(), template)?;
        }
        Ok(table)
    }

    /// Appends a rule with the lowest priority so far.
    pub fn push(&mut self, pattern: &str, template: impl Into<String>) -> Result<()> {
        let regex = Regex::new(pattern).map_err(|e| ResolveError::Config {
            message: format!("invalid override pattern '{}': {}", pattern, e),
        })?;
        self.rules.push((regex, template.into()));
        Ok(())
    }

    /// Returns the clone URL for `lookup` (`group/artifact`), if any rule
    /// matches.
    pub fn lookup(&self, lookup: &str) -> Option<String> {
        self.rules
            .iter()
            .find(|(regex, _)| regex.is_match(lookup))
            .map(|(regex, template)| regex.replace_all(lookup, template.as_str()).into_owned())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
