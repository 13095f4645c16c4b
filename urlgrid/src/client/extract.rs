//! Regex extraction over downloaded text.
//!
//! Three shapes, decided by the site's extract pattern:
//!
//! - no pattern: the full downloaded text is one result;
//! - pattern without named groups: every match's text is one result;
//! - pattern with named groups: every match becomes one
//!   `name:value;name:value` record over its named groups, in declaration
//!   order (unnamed groups are skipped).

use regex::Regex;

/// How results are derived from downloaded text.
#[derive(Clone, Copy)]
pub(crate) enum ExtractMode<'a> {
    /// Full text or pattern matches, per the rules above.
    Standard,

    /// Only the value of this named capture group, one per match.
    Group(&'a str),
}

/// Applies the extraction rules to one downloaded document.
pub(crate) fn apply(mode: ExtractMode<'_>, pattern: Option<&Regex>, text: &str) -> Vec<String> {
    let Some(pattern) = pattern else {
        return match mode {
            ExtractMode::Standard => vec![text.to_string()],
            // Group mode is only reachable with a validated pattern.
            ExtractMode::Group(_) => Vec::new(),
        };
    };

    match mode {
        ExtractMode::Standard => {
            if has_named_groups(pattern) {
                pattern
                    .captures_iter(text)
                    .map(|caps| flatten_named_groups(pattern, &caps))
                    .collect()
            } else {
                pattern
                    .find_iter(text)
                    .map(|m| m.as_str().to_string())
                    .collect()
            }
        }
        ExtractMode::Group(name) => pattern
            .captures_iter(text)
            .filter_map(|caps| caps.name(name).map(|m| m.as_str().to_string()))
            .collect(),
    }
}

/// True when the regex declares at least one named capture group.
pub(crate) fn has_named_groups(pattern: &Regex) -> bool {
    pattern.capture_names().flatten().next().is_some()
}

/// `name:value;name:value` over the named groups of one match.
fn flatten_named_groups(pattern: &Regex, caps: &regex::Captures<'_>) -> String {
    pattern
        .capture_names()
        .flatten()
        .map(|name| {
            let value = caps.name(name).map(|m| m.as_str()).unwrap_or_default();
            format!("{name}:{value}")
        })
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINKS_PAGE: &str = concat!(
        "<body>\n",
        "<a href=\"http://google.pl\">Google</a>\n",
        "<a href=\"http://allegro.pl\">Allegro</a>\n",
        "<a href=\"http://facebook.com\">Facebook</a>\n",
        "<a href=\"http://ishootyou.com\">I shoot you</a>\n",
        "</body>\n",
    );

    #[test]
    fn test_no_pattern_keeps_full_text() {
        let results = apply(ExtractMode::Standard, None, "<html></html>");
        assert_eq!(results, vec!["<html></html>".to_string()]);
    }

    #[test]
    fn test_pattern_without_groups_yields_match_texts() {
        let pattern = Regex::new("<a href=\".*\">.*</a>").unwrap();
        let results = apply(ExtractMode::Standard, Some(&pattern), LINKS_PAGE);

        assert_eq!(results.len(), 4);
        assert_eq!(results[0], "<a href=\"http://google.pl\">Google</a>");
        assert_eq!(results[1], "<a href=\"http://allegro.pl\">Allegro</a>");
    }

    #[test]
    fn test_named_groups_flatten_to_records() {
        let pattern = Regex::new("<a href=\"(?P<Url>.*)\">(?P<Name>.*)</a>").unwrap();
        let results = apply(ExtractMode::Standard, Some(&pattern), LINKS_PAGE);

        assert_eq!(results.len(), 4);
        assert_eq!(results[0], "Url:http://google.pl;Name:Google");
        assert_eq!(results[1], "Url:http://allegro.pl;Name:Allegro");
    }

    #[test]
    fn test_no_matches_yield_nothing() {
        let pattern = Regex::new(r"\d{10}").unwrap();
        let results = apply(ExtractMode::Standard, Some(&pattern), LINKS_PAGE);
        assert!(results.is_empty());
    }

    #[test]
    fn test_group_mode_takes_only_that_group() {
        let pattern = Regex::new("<a href=\"(?P<Url>.*)\">(?P<Name>.*)</a>").unwrap();
        let results = apply(ExtractMode::Group("Url"), Some(&pattern), LINKS_PAGE);

        assert_eq!(results.len(), 4);
        assert_eq!(results[0], "http://google.pl");
        assert_eq!(results[3], "http://ishootyou.com");
    }

    #[test]
    fn test_has_named_groups() {
        assert!(has_named_groups(
            &Regex::new("(?P<Name>.*)").unwrap()
        ));
        assert!(!has_named_groups(&Regex::new("(.*)").unwrap()));
    }
}
