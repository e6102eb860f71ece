//! Substring-based inclusion filtering of folded stack keys.

/// Retains keys that contain at least one configured substring
///
/// Terms are normalized once at construction (`.` replaced with `/`, the
/// separator used in rendered keys) so they match keys verbatim. Plain
/// substring containment - not regex, not anchored. Immutable for the run.
#[derive(Debug, Clone, Default)]
pub struct IncludeFilter {
    terms: Vec<String>,
}

impl IncludeFilter {
    /// Build a filter from raw CLI terms
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|term| term.as_ref().replace('.', "/"))
            .filter(|term| !term.is_empty())
            .collect();

        Self { terms }
    }

    /// An empty filter accepts every key
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of configured terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether a folded key should be aggregated
    pub fn accepts(&self, key: &str) -> bool {
        self.terms.is_empty() || self.terms.iter().any(|term| key.contains(term.as_str()))
    }
}
