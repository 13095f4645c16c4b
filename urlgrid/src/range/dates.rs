//! Calendar date enumeration for date-based search ranges.

use chrono::{Datelike, Months, NaiveDate};

use super::RangeError;

/// Default rendering format for date items.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// The calendar unit a date range steps in.
///
/// `Days` steps from `from` itself. `Months` and `Years` anchor the
/// enumeration to the 1st of `from`'s month and to January 1st of `from`'s
/// year respectively - the day-of-month of `from` does not carry over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateUnit {
    #[default]
    Days,
    Months,
    Years,
}

/// Enumerates `from + i*step` units while `i*step` stays within the whole
/// unit span between the bounds, inclusive of the boundary.
///
/// Fails with [`RangeError::InvalidDates`] when the span is not positive,
/// `step < 1`, or `step` exceeds the span.
pub(super) fn build(
    from: NaiveDate,
    to: NaiveDate,
    step: u32,
    unit: DateUnit,
    format: &str,
) -> Result<Vec<String>, RangeError> {
    let span = span_in_units(from, to, unit);
    if span <= 0 || step < 1 || i64::from(step) > span {
        return Err(RangeError::InvalidDates { unit, step, span });
    }

    let anchor = anchor_date(from, unit);
    let mut items = Vec::with_capacity((span / i64::from(step) + 1) as usize);
    let mut offset: u32 = 0;
    while i64::from(offset) <= span {
        let Some(date) = advance(anchor, offset, unit) else {
            break;
        };
        items.push(date.format(format).to_string());
        offset += step;
    }
    Ok(items)
}

/// Whole calendar units between the bounds: days elapsed, month deltas
/// (`(to.year - from.year) * 12 + to.month - from.month`), or year deltas.
fn span_in_units(from: NaiveDate, to: NaiveDate, unit: DateUnit) -> i64 {
    match unit {
        DateUnit::Days => to.signed_duration_since(from).num_days(),
        DateUnit::Months => {
            i64::from(to.year() - from.year()) * 12 + i64::from(to.month()) - i64::from(from.month())
        }
        DateUnit::Years => i64::from(to.year() - from.year()),
    }
}

fn anchor_date(from: NaiveDate, unit: DateUnit) -> NaiveDate {
    match unit {
        DateUnit::Days => from,
        DateUnit::Months => from.with_day(1).unwrap_or(from),
        DateUnit::Years => NaiveDate::from_ymd_opt(from.year(), 1, 1).unwrap_or(from),
    }
}

fn advance(anchor: NaiveDate, offset: u32, unit: DateUnit) -> Option<NaiveDate> {
    match unit {
        DateUnit::Days => anchor.checked_add_days(chrono::Days::new(u64::from(offset))),
        DateUnit::Months => anchor.checked_add_months(Months::new(offset)),
        DateUnit::Years => anchor.checked_add_months(Months::new(offset.checked_mul(12)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::SearchRange;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_range() {
        let range = SearchRange::dates(date(2000, 1, 1), date(2000, 2, 1)).unwrap();

        assert_eq!(range.len(), 32);
        assert_eq!(range.items()[0], "2000-01-01");
        assert_eq!(range.items()[1], "2000-01-02");
        assert_eq!(range.items()[31], "2000-02-01");
    }

    #[test]
    fn test_day_range_with_step() {
        let range = SearchRange::dates_with(
            date(2000, 1, 1),
            date(2000, 2, 1),
            2,
            DateUnit::Days,
            DEFAULT_DATE_FORMAT,
        )
        .unwrap();

        assert_eq!(range.len(), 16);
        assert_eq!(range.items()[0], "2000-01-01");
        assert_eq!(range.items()[1], "2000-01-03");
        assert_eq!(range.items()[15], "2000-01-31");
    }

    #[test]
    fn test_month_range_anchors_to_first_of_month() {
        let range = SearchRange::dates_with(
            date(2000, 1, 20),
            date(2001, 12, 1),
            2,
            DateUnit::Months,
            DEFAULT_DATE_FORMAT,
        )
        .unwrap();

        assert_eq!(range.len(), 12);
        assert_eq!(range.items()[0], "2000-01-01");
        assert_eq!(range.items()[1], "2000-03-01");
        assert_eq!(range.items()[11], "2001-11-01");
    }

    #[test]
    fn test_year_range_anchors_to_january_first() {
        let range = SearchRange::dates_with(
            date(2000, 5, 14),
            date(2012, 2, 12),
            2,
            DateUnit::Years,
            DEFAULT_DATE_FORMAT,
        )
        .unwrap();

        assert_eq!(range.len(), 7);
        assert_eq!(range.items()[0], "2000-01-01");
        assert_eq!(range.items()[1], "2002-01-01");
        assert_eq!(range.items()[6], "2012-01-01");
    }

    #[test]
    fn test_custom_format() {
        let range = SearchRange::dates_with(
            date(2000, 1, 1),
            date(2000, 2, 1),
            1,
            DateUnit::Days,
            "%d-%m-%Y",
        )
        .unwrap();

        assert_eq!(range.len(), 32);
        assert_eq!(range.items()[0], "01-01-2000");
        assert_eq!(range.items()[1], "02-01-2000");
        assert_eq!(range.items()[31], "01-02-2000");
    }

    #[test]
    fn test_month_range_with_default_step() {
        let range = SearchRange::dates_with(
            date(2000, 1, 1),
            date(2000, 3, 1),
            1,
            DateUnit::Months,
            DEFAULT_DATE_FORMAT,
        )
        .unwrap();

        assert_eq!(range.len(), 3);
        assert_eq!(range.items()[0], "2000-01-01");
        assert_eq!(range.items()[2], "2000-03-01");
    }

    #[test]
    fn test_rejects_invalid_date_bounds() {
        let check = |from, to, step, unit| {
            let result = SearchRange::dates_with(from, to, step, unit, DEFAULT_DATE_FORMAT);
            assert!(
                matches!(result, Err(RangeError::InvalidDates { .. })),
                "expected InvalidDates for {:?}..{:?} step {} {:?}",
                from,
                to,
                step,
                unit
            );
        };

        check(date(2000, 1, 1), date(1999, 1, 1), 1, DateUnit::Days); // reversed
        check(date(1999, 1, 1), date(1999, 1, 1), 1, DateUnit::Days); // zero span
        check(date(1999, 1, 1), date(1999, 1, 2), 10, DateUnit::Days); // step beyond span
        check(date(1999, 1, 1), date(1999, 1, 2), 0, DateUnit::Days); // step of zero
        check(date(1999, 1, 1), date(1999, 1, 23), 1, DateUnit::Months); // same month
        check(date(1999, 1, 1), date(1999, 12, 1), 1, DateUnit::Years); // same year
    }
}
