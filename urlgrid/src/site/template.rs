//! Placeholder template parsing and expansion.
//!
//! A template is an absolute http(s) URI whose path or query carries
//! positional placeholders `{0}`, `{1}`, ... The numerals must form the
//! contiguous run `0..k-1` in order of first appearance, and every `{` must
//! have a matching `}`.

use std::sync::OnceLock;

use regex::Regex;

use super::SiteError;

/// Matches one placeholder and captures its numeral.
fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{(\d*)\}").expect("placeholder regex is valid"))
}

/// A validated placeholder template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    raw: String,
    placeholder_count: usize,
}

impl Template {
    /// Parses and validates a template string.
    ///
    /// Fails with [`SiteError::InvalidTemplate`] when the string does not
    /// start with an http(s) scheme, [`SiteError::UnbalancedBraces`] when
    /// `{`/`}` counts differ, and [`SiteError::PlaceholderOrder`] when the
    /// numerals are not exactly `0..k-1` in order of occurrence.
    pub fn parse(raw: impl Into<String>) -> Result<Self, SiteError> {
        let raw = raw.into();

        if !raw.starts_with("http://") && !raw.starts_with("https://") {
            return Err(SiteError::InvalidTemplate(raw));
        }

        let left = raw.matches('{').count();
        let right = raw.matches('}').count();
        if left != right {
            return Err(SiteError::UnbalancedBraces { left, right });
        }

        let mut placeholder_count = 0usize;
        for (position, caps) in placeholder_regex().captures_iter(&raw).enumerate() {
            let numeral = &caps[1];
            if numeral.parse::<usize>() != Ok(position) {
                return Err(SiteError::PlaceholderOrder {
                    position,
                    found: numeral.to_string(),
                });
            }
            placeholder_count = position + 1;
        }

        Ok(Self {
            raw,
            placeholder_count,
        })
    }

    /// The template text as given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Number of placeholders `k`, i.e. the template references `{0}..{k-1}`.
    pub fn placeholder_count(&self) -> usize {
        self.placeholder_count
    }

    /// Substitutes one item per placeholder, in order.
    ///
    /// Callers pass exactly `placeholder_count` items; extra items are
    /// ignored and missing ones leave their placeholder in place.
    pub fn expand<S: AsRef<str>>(&self, items: &[S]) -> String {
        let mut url = self.raw.clone();
        for (index, item) in items.iter().enumerate().take(self.placeholder_count) {
            url = url.replace(&format!("{{{index}}}"), item.as_ref());
        }
        url
    }
}
