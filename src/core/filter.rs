// DayzWatch - core/filter.rs
//
// Ignore rules for log lines.
// Core layer: pure logic, no I/O dependencies.

/// Substring patterns that exclude a line from every window.
///
/// Matching is case-sensitive and any single pattern is enough. The set is
/// immutable once built; blank patterns are dropped at construction since an
/// empty pattern would match every line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreRuleSet {
    patterns: Vec<String>,
}

impl IgnoreRuleSet {
    /// Build from a list of patterns, discarding empty ones.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns = patterns
            .into_iter()
            .map(Into::into)
            .filter(|p| !p.is_empty())
            .collect();
        Self { patterns }
    }

    /// Parse the comma-separated form used by `LOG_IGNORE_FILTERS`.
    /// Items are trimmed; empty items are skipped.
    pub fn from_csv(value: &str) -> Self {
        Self::new(
            value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty()),
        )
    }

    /// Returns true if any pattern occurs in `line`.
    pub fn is_ignored(&self, line: &str) -> bool {
        self.patterns.iter().any(|p| line.contains(p.as_str()))
    }

    /// Returns true if no patterns are configured.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}
