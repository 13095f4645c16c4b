//! Sites: a placeholder template crossed with one search range per
//! placeholder.
//!
//! A [`Site`] owns its template and range list and keeps the derived URL
//! list consistent through every mutation: whenever the range count matches
//! the placeholder count and no range is empty, the full Cartesian product
//! is regenerated; otherwise the URL list is cleared. The end state alone
//! decides - a sequence of mutations that lands back on a matching
//! configuration regenerates exactly as a single equivalent mutation would.
//!
//! # Example
//!
//! ```ignore
//! use urlgrid::range::SearchRange;
//! use urlgrid::site::Site;
//!
//! let site = Site::new(
//!     "http://example.com/{0}/{1}",
//!     vec![
//!         SearchRange::from_texts(["a1", "a2"])?,
//!         SearchRange::from_texts(["b1", "b2"])?,
//!     ],
//! )?;
//! assert_eq!(site.urls().len(), 4);
//! assert_eq!(site.urls()[0], "http://example.com/a1/b1");
//! ```

mod template;

pub use template::Template;

use regex::Regex;
use thiserror::Error;

use crate::range::SearchRange;

/// Errors raised while configuring a [`Site`].
#[derive(Debug, Error)]
pub enum SiteError {
    /// The template is not an absolute http(s) URI.
    #[error("template must be an absolute http(s) URI: {0}")]
    InvalidTemplate(String),

    /// `{` and `}` counts differ in the template.
    #[error("unbalanced curly braces in template: {left} opening vs {right} closing")]
    UnbalancedBraces { left: usize, right: usize },

    /// Placeholder numerals are not the contiguous ascending run `0..k-1`.
    #[error("placeholder {{{found}}} at occurrence {position} breaks the 0..k-1 run")]
    PlaceholderOrder { position: usize, found: String },

    /// A search range with zero items was attached.
    #[error("search range at index {index} has no items")]
    EmptyRange { index: usize },
}

/// A URL generator: one template plus an ordered list of search ranges.
///
/// The range list may transiently differ in length from the placeholder
/// count; the generated URL list is simply empty until they match again.
/// Range mutation is not synchronized with downloads - callers finish
/// configuring a site before handing it to a
/// [`Client`](crate::client::Client).
#[derive(Clone, Debug, Default)]
pub struct Site {
    template: Option<Template>,
    ranges: Vec<SearchRange>,
    urls: Vec<String>,
    extract_pattern: Option<Regex>,
    stop_pattern: Option<Regex>,
}

impl Site {
    /// Creates a site from a template and its search ranges.
    pub fn new<I>(template: &str, ranges: I) -> Result<Self, SiteError>
    where
        I: IntoIterator<Item = SearchRange>,
    {
        let mut site = Self::with_template(template)?;
        site.set_ranges(ranges.into_iter().collect())?;
        Ok(site)
    }

    /// Creates a site with a template and no ranges yet.
    ///
    /// The URL list stays empty until enough ranges are attached.
    pub fn with_template(template: &str) -> Result<Self, SiteError> {
        let mut site = Self {
            template: Some(Template::parse(template)?),
            ..Self::default()
        };
        site.refresh();
        Ok(site)
    }

    /// Creates a site around an already-resolved URL list.
    ///
    /// The result has no template and no ranges; its URL list is fixed.
    /// Attaching a template later turns it back into a generated site.
    /// This is the re-aggregation shape returned by
    /// [`Client::download_as_site`](crate::client::Client::download_as_site).
    pub fn from_urls(urls: Vec<String>) -> Self {
        Self {
            urls,
            ..Self::default()
        }
    }

    /// The template text, if this site generates its URLs.
    pub fn template(&self) -> Option<&str> {
        self.template.as_ref().map(Template::as_str)
    }

    /// Number of placeholders in the template (0 without a template).
    pub fn placeholder_count(&self) -> usize {
        self.template
            .as_ref()
            .map(Template::placeholder_count)
            .unwrap_or(0)
    }

    /// Replaces the template, re-validating and regenerating.
    ///
    /// The URL list is regenerated when the new placeholder count matches
    /// the current range count, and cleared otherwise.
    pub fn set_template(&mut self, template: &str) -> Result<(), SiteError> {
        self.template = Some(Template::parse(template)?);
        self.refresh();
        Ok(())
    }

    /// The attached search ranges, in placeholder order.
    pub fn ranges(&self) -> &[SearchRange] {
        &self.ranges
    }

    /// Replaces the whole range list.
    ///
    /// Fails with [`SiteError::EmptyRange`] if any range has zero items;
    /// the site is left unchanged in that case.
    pub fn set_ranges(&mut self, ranges: Vec<SearchRange>) -> Result<(), SiteError> {
        check_no_empty(&ranges)?;
        self.ranges = ranges;
        self.refresh();
        Ok(())
    }

    /// Appends a range.
    pub fn push_range(&mut self, range: SearchRange) -> Result<(), SiteError> {
        if range.is_empty() {
            return Err(SiteError::EmptyRange {
                index: self.ranges.len(),
            });
        }
        self.ranges.push(range);
        self.refresh();
        Ok(())
    }

    /// Inserts a range at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > ranges().len()`.
    pub fn insert_range(&mut self, index: usize, range: SearchRange) -> Result<(), SiteError> {
        if range.is_empty() {
            return Err(SiteError::EmptyRange { index });
        }
        self.ranges.insert(index, range);
        self.refresh();
        Ok(())
    }

    /// Removes and returns the range at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove_range(&mut self, index: usize) -> SearchRange {
        let removed = self.ranges.remove(index);
        self.refresh();
        removed
    }

    /// Replaces the range at `index`, returning the previous one.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn replace_range(
        &mut self,
        index: usize,
        range: SearchRange,
    ) -> Result<SearchRange, SiteError> {
        if range.is_empty() {
            return Err(SiteError::EmptyRange { index });
        }
        let previous = std::mem::replace(&mut self.ranges[index], range);
        self.refresh();
        Ok(previous)
    }

    /// Moves the range at `from` to position `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn move_range(&mut self, from: usize, to: usize) {
        let range = self.ranges.remove(from);
        self.ranges.insert(to, range);
        self.refresh();
    }

    /// Removes every range, clearing the URL list.
    pub fn clear_ranges(&mut self) {
        self.ranges.clear();
        self.refresh();
    }

    /// The generated (or fixed) URL list.
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// Pattern applied to downloaded text; each match becomes one result.
    pub fn extract_pattern(&self) -> Option<&Regex> {
        self.extract_pattern.as_ref()
    }

    pub fn set_extract_pattern(&mut self, pattern: Option<Regex>) {
        self.extract_pattern = pattern;
    }

    /// Pattern that stops this site's remaining downloads when matched.
    pub fn stop_pattern(&self) -> Option<&Regex> {
        self.stop_pattern.as_ref()
    }

    pub fn set_stop_pattern(&mut self, pattern: Option<Regex>) {
        self.stop_pattern = pattern;
    }

    /// Re-evaluates generation after a mutation.
    ///
    /// Regenerates when the range count matches the placeholder count, at
    /// least one range is attached, and no range is empty; clears otherwise.
    /// A site built by [`Site::from_urls`] keeps its fixed list.
    fn refresh(&mut self) {
        let Some(template) = &self.template else {
            return;
        };
        let matching = !self.ranges.is_empty()
            && self.ranges.len() == template.placeholder_count()
            && self.ranges.iter().all(|r| !r.is_empty());
        if matching {
            self.urls = cartesian(template, &self.ranges);
        } else {
            self.urls.clear();
        }
    }
}

fn check_no_empty(ranges: &[SearchRange]) -> Result<(), SiteError> {
    match ranges.iter().position(SearchRange::is_empty) {
        Some(index) => Err(SiteError::EmptyRange { index }),
        None => Ok(()),
    }
}

/// Row-major Cartesian product: the first range varies slowest, the last
/// varies fastest.
fn cartesian(template: &Template, ranges: &[SearchRange]) -> Vec<String> {
    if ranges.is_empty() || ranges.iter().any(SearchRange::is_empty) {
        return Vec::new();
    }

    let total: usize = ranges.iter().map(SearchRange::len).product();
    let mut urls = Vec::with_capacity(total);
    let mut indices = vec![0usize; ranges.len()];

    'next: loop {
        let items: Vec<&str> = indices
            .iter()
            .zip(ranges)
            .map(|(&i, range)| range.items()[i].as_str())
            .collect();
        urls.push(template.expand(&items));

        let mut position = ranges.len();
        while position > 0 {
            position -= 1;
            indices[position] += 1;
            if indices[position] < ranges[position].len() {
                continue 'next;
            }
            indices[position] = 0;
        }
        break;
    }

    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(items: &[&str]) -> SearchRange {
        SearchRange::from_texts(items.iter().copied()).unwrap()
    }

    fn empty_range() -> SearchRange {
        let mut r = SearchRange::from_texts(["x"]).unwrap();
        r.set_items(Vec::new());
        r
    }

    fn sr1() -> SearchRange {
        range(&["a1", "a2", "a3", "a4"])
    }

    fn sr2() -> SearchRange {
        range(&["b1", "b2", "b3", "b4"])
    }

    fn sr3() -> SearchRange {
        range(&["c1", "c2", "c3", "c4"])
    }

    #[test]
    fn test_template_is_kept_verbatim() {
        let site = Site::with_template("http://google.com/").unwrap();
        assert_eq!(site.template(), Some("http://google.com/"));
    }

    #[test]
    fn test_ranges_from_constructor() {
        let site1 = Site::new("http://google.com/{0}", vec![sr1()]).unwrap();
        let site2 = Site::new("http://google.com/{0}/{1}", vec![sr1(), sr2()]).unwrap();

        assert_eq!(site1.ranges().len(), 1);
        assert_eq!(site2.ranges().len(), 2);
        assert_eq!(site2.ranges()[0], sr1());
        assert_eq!(site2.ranges()[1], sr2());
    }

    #[test]
    fn test_constructor_rejects_invalid_templates() {
        assert!(matches!(
            Site::with_template("http://google.com/{0}/{1"),
            Err(SiteError::UnbalancedBraces { .. })
        ));
        for raw in [
            "http://google.com/{1}/{0}",
            "http://google.com/{5}/{9}",
            "http://google.com/{20}",
        ] {
            assert!(matches!(
                Site::with_template(raw),
                Err(SiteError::PlaceholderOrder { .. })
            ));
        }
        assert!(Site::with_template("http://google.com/{0}/{1}").is_ok());
    }

    #[test]
    fn test_generates_cross_product_from_constructor() {
        let site1 = Site::new("http://google.com/{0}", vec![sr1()]).unwrap();
        let site2 = Site::new("http://google.com/{0}/{1}", vec![sr1(), sr2()]).unwrap();
        let site3 = Site::new("http://google.com/{0}/{1}/{2}", vec![sr1(), sr2(), sr3()]).unwrap();

        assert_eq!(site1.urls().len(), 4);
        assert_eq!(site1.urls()[0], "http://google.com/a1");

        assert_eq!(site2.urls().len(), 16);
        assert_eq!(site2.urls()[0], "http://google.com/a1/b1");

        assert_eq!(site3.urls().len(), 64);
        assert_eq!(site3.urls()[0], "http://google.com/a1/b1/c1");
    }

    #[test]
    fn test_row_major_enumeration_order() {
        let site = Site::new(
            "http://google.com/{0}/{1}",
            vec![range(&["a1", "a2"]), range(&["b1", "b2"])],
        )
        .unwrap();

        assert_eq!(
            site.urls(),
            &[
                "http://google.com/a1/b1",
                "http://google.com/a1/b2",
                "http://google.com/a2/b1",
                "http://google.com/a2/b2",
            ]
        );
    }

    #[test]
    fn test_no_ranges_and_no_placeholders_is_valid_and_empty() {
        let site = Site::with_template("http://google.com/").unwrap();
        assert!(site.urls().is_empty());
        assert!(site.ranges().is_empty());
    }

    #[test]
    fn test_not_enough_ranges_leaves_urls_empty() {
        let site = Site::new("http://google.com/{0}/{1}", vec![sr1()]).unwrap();
        assert!(site.urls().is_empty());
    }

    #[test]
    fn test_mismatched_count_is_queryable() {
        let matched = Site::new("http://google.com/{0}/{1}", vec![sr1(), sr2()]).unwrap();
        let mismatched = Site::new("http://google.com/{0}/{1}", vec![sr1()]).unwrap();

        assert_eq!(matched.ranges().len(), matched.placeholder_count());
        assert_ne!(mismatched.ranges().len(), mismatched.placeholder_count());
    }

    #[test]
    fn test_move_and_replace_rebuild_urls() {
        let mut site1 = Site::new("http://google.com/{0}/{1}", vec![sr1(), sr2()]).unwrap();
        let mut site2 = Site::new("http://google.com/{0}/{1}", vec![sr1(), sr2()]).unwrap();

        let before_move = site1.urls()[0].clone();
        site1.move_range(1, 0);
        let before_replace = site2.urls()[0].clone();
        site2.replace_range(1, sr3()).unwrap();

        assert_ne!(site1.urls()[0], before_move);
        assert_ne!(site2.urls()[0], before_replace);
        assert_eq!(site1.urls()[0], "http://google.com/b1/a1");
        assert_eq!(site2.urls()[0], "http://google.com/a1/c1");
        assert_eq!(site2.urls().len(), 16);
    }

    #[test]
    fn test_add_or_remove_clears_urls_on_count_mismatch() {
        let mut site1 = Site::new("http://google.com/{0}/{1}", vec![sr1(), sr2()]).unwrap();
        let mut site2 = Site::new("http://google.com/{0}/{1}", vec![sr1(), sr2()]).unwrap();

        site1.remove_range(0);
        site2.push_range(sr3()).unwrap();

        assert!(site1.urls().is_empty());
        assert!(site2.urls().is_empty());
    }

    #[test]
    fn test_composite_mutations_regenerate_from_end_state() {
        let mut site1 = Site::new("http://google.com/{0}/{1}", vec![sr1(), sr2()]).unwrap();
        let mut site2 = Site::new("http://google.com/{0}/{1}", vec![sr1(), sr2()]).unwrap();
        let mut site3 = Site::new("http://google.com/{0}/{1}", vec![sr1(), sr2()]).unwrap();
        let mut site4 = Site::new("http://google.com/{0}/{1}", vec![sr1(), sr2()]).unwrap();

        site1.push_range(sr3()).unwrap();
        site1.remove_range(1);

        site2.remove_range(1);
        site2.push_range(sr3()).unwrap();

        site3.remove_range(1);
        site3.remove_range(0);
        site3.push_range(sr1()).unwrap();
        site3.push_range(sr3()).unwrap();

        site4.push_range(sr1()).unwrap();
        site4.push_range(sr3()).unwrap();
        site4.remove_range(1);
        site4.remove_range(0);

        for site in [&site1, &site2, &site3, &site4] {
            assert_eq!(site.urls()[0], "http://google.com/a1/c1");
        }
    }

    #[test]
    fn test_clear_ranges_clears_urls() {
        let mut site = Site::new("http://google.com/{0}/{1}", vec![sr1(), sr2()]).unwrap();
        site.clear_ranges();
        assert!(site.urls().is_empty());
    }

    #[test]
    fn test_insert_clears_urls_on_count_mismatch() {
        let mut site = Site::new("http://google.com/{0}/{1}", vec![sr1(), sr2()]).unwrap();
        site.insert_range(1, sr3()).unwrap();
        assert!(site.urls().is_empty());
    }

    #[test]
    fn test_set_ranges_follows_the_same_rule() {
        let mut site1 = Site::new("http://google.com/{0}/{1}", vec![sr1(), sr2()]).unwrap();
        let mut site2 = Site::new("http://google.com/{0}/{1}", vec![sr1(), sr2()]).unwrap();

        site1.set_ranges(vec![sr2()]).unwrap();
        site2.set_ranges(vec![sr1(), sr3()]).unwrap();

        assert!(site1.urls().is_empty());
        assert_eq!(site2.urls()[0], "http://google.com/a1/c1");
    }

    #[test]
    fn test_empty_range_is_rejected_at_the_mutation_point() {
        assert!(matches!(
            Site::new("http://google.com/{0}", vec![empty_range()]),
            Err(SiteError::EmptyRange { index: 0 })
        ));

        let mut site = Site::with_template("http://google.com/{0}/{1}").unwrap();
        assert!(matches!(
            site.set_ranges(vec![sr1(), empty_range()]),
            Err(SiteError::EmptyRange { index: 1 })
        ));
        assert!(site.push_range(empty_range()).is_err());
        assert!(site.ranges().is_empty());
    }

    #[test]
    fn test_set_template_revalidates() {
        let mut site = Site::new("http://google.com/{0}/{1}", vec![sr1(), sr2()]).unwrap();

        assert!(matches!(
            site.set_template("http://google.com/{1}/{0}"),
            Err(SiteError::PlaceholderOrder { .. })
        ));
        assert!(matches!(
            site.set_template("http://google.com/{0}/{1"),
            Err(SiteError::UnbalancedBraces { .. })
        ));
        assert!(site.set_template("http://google.com/{0}/{1}").is_ok());
    }

    #[test]
    fn test_set_template_updates_placeholder_count() {
        let mut site = Site::new("http://google.com/{0}/{1}", vec![sr1(), sr2()]).unwrap();
        site.set_template("http://google.com/{0}/{1}/{2}").unwrap();
        assert_eq!(site.placeholder_count(), 3);
    }

    #[test]
    fn test_set_template_rebuilds_when_counts_match() {
        let mut site = Site::new("http://google.com/{0}/{1}", vec![sr1(), sr2()]).unwrap();
        site.set_template("http://google.com/?q={0}&p={1}").unwrap();

        assert!(!site.urls().is_empty());
        assert_eq!(site.urls()[0], "http://google.com/?q=a1&p=b1");
    }

    #[test]
    fn test_set_template_clears_when_counts_diverge() {
        let mut site1 = Site::with_template("http://google.com/{0}/{1}").unwrap();
        let mut site2 = Site::with_template("http://google.com/{0}/{1}").unwrap();

        site1.push_range(sr1()).unwrap();
        site1.set_template("http://google.com/?q={0}&p={1}").unwrap();

        site2.push_range(sr1()).unwrap();
        site2.push_range(sr2()).unwrap();
        site2.set_template("http://google.com/{0}/{1}/{2}").unwrap();

        assert!(site1.urls().is_empty());
        assert!(site2.urls().is_empty());
    }

    #[test]
    fn test_patterns_are_stored() {
        let mut site = Site::new("http://google.com/{0}", vec![sr1()]).unwrap();
        site.set_extract_pattern(Some(Regex::new(r"\d+").unwrap()));
        site.set_stop_pattern(Some(Regex::new(".*").unwrap()));

        assert_eq!(site.extract_pattern().unwrap().as_str(), r"\d+");
        assert_eq!(site.stop_pattern().unwrap().as_str(), ".*");
    }

    #[test]
    fn test_from_urls_keeps_fixed_list() {
        let mut site = Site::from_urls(vec![
            "http://google.pl/".to_string(),
            "http://allegro.pl/".to_string(),
        ]);

        assert_eq!(site.urls().len(), 2);
        assert_eq!(site.template(), None);
        assert_eq!(site.placeholder_count(), 0);

        // Range mutations have nothing to regenerate against.
        site.clear_ranges();
        assert_eq!(site.urls().len(), 2);
    }

    #[test]
    fn test_shared_range_is_cloned_not_aliased() {
        let shared = sr1();
        let site1 = Site::new("http://google.com/{0}", vec![shared.clone()]).unwrap();
        let mut site2 = Site::new("http://google.com/{0}", vec![shared]).unwrap();

        site2.replace_range(0, sr2()).unwrap();
        assert_eq!(site1.urls()[0], "http://google.com/a1");
        assert_eq!(site2.urls()[0], "http://google.com/b1");
    }
}
