//! Search ranges: the ordered substitution lists behind template placeholders.
//!
//! A [`SearchRange`] holds the ordered strings substituted for one `{N}`
//! placeholder of a site template. Ranges are built from explicit text
//! lists, numeric spans (optionally zero-padded), calendar date spans, or
//! predefined character sets:
//!
//! ```ignore
//! use urlgrid::range::{Charset, NumberStyle, SearchRange};
//!
//! let pages = SearchRange::numbers(1, 40)?;
//! let ids = SearchRange::numbers_with(1, 2000, 1, NumberStyle::ZeroPadded)?;
//! let letters = SearchRange::charset(Charset::EnglishLetters);
//! ```
//!
//! Bounds are validated at construction; a successfully constructed range is
//! never empty. Direct item replacement via [`SearchRange::set_items`] is
//! not re-validated here; emptiness is enforced by the owning
//! [`Site`](crate::site::Site) when a range is attached.

mod charset;
mod dates;

pub use charset::Charset;
pub use dates::{DateUnit, DEFAULT_DATE_FORMAT};

use thiserror::Error;

/// How numeric items are rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NumberStyle {
    /// `5` renders as `"5"`.
    #[default]
    Plain,

    /// `5` renders as `"0005"` when counting up to a four-digit `to`.
    ///
    /// Every item is left-padded with `'0'` to the decimal width of the
    /// upper bound, so all items share one string length.
    ZeroPadded,
}

/// Errors raised while constructing a [`SearchRange`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    /// An explicit-text range was given zero strings.
    #[error("a search range needs at least one text item")]
    EmptyTexts,

    /// Numeric bounds or step violate `from < to`, `step >= 1`,
    /// `step <= to - from`.
    #[error("invalid numeric range: from={from}, to={to}, step={step}")]
    InvalidNumbers { from: u64, to: u64, step: u64 },

    /// Date bounds or step violate the same ordering rule, measured in
    /// whole units.
    #[error("invalid date range: {span} {unit:?} between bounds, step={step}")]
    InvalidDates {
        unit: DateUnit,
        step: u32,
        span: i64,
    },
}

/// An ordered, non-empty list of substitution strings for one placeholder.
///
/// Duplicates are allowed and order is significant: generated URLs follow
/// item order exactly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchRange {
    items: Vec<String>,
}

impl SearchRange {
    /// Builds a range from explicit texts.
    ///
    /// Fails with [`RangeError::EmptyTexts`] when the iterator yields
    /// nothing.
    pub fn from_texts<I, S>(texts: I) -> Result<Self, RangeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = texts.into_iter().map(Into::into).collect();
        if items.is_empty() {
            return Err(RangeError::EmptyTexts);
        }
        Ok(Self { items })
    }

    /// Builds the numeric range `0, 1, .., to`.
    pub fn up_to(to: u64) -> Result<Self, RangeError> {
        Self::numbers_with(0, to, 1, NumberStyle::Plain)
    }

    /// Builds the numeric range `from, from+1, .., to` with step 1.
    pub fn numbers(from: u64, to: u64) -> Result<Self, RangeError> {
        Self::numbers_with(from, to, 1, NumberStyle::Plain)
    }

    /// Builds the numeric range `from, from+step, ..` up to the last value
    /// `<= to`.
    pub fn numbers_step(from: u64, to: u64, step: u64) -> Result<Self, RangeError> {
        Self::numbers_with(from, to, step, NumberStyle::Plain)
    }

    /// Builds a numeric range with an explicit rendering style.
    ///
    /// The enumeration stops at the last multiple of `step` from `from`
    /// that is `<= to`; the final item is not required to equal `to`.
    /// Fails with [`RangeError::InvalidNumbers`] when `from >= to`,
    /// `step < 1`, or `step > to - from`.
    pub fn numbers_with(
        from: u64,
        to: u64,
        step: u64,
        style: NumberStyle,
    ) -> Result<Self, RangeError> {
        if from >= to || step < 1 || step > to - from {
            return Err(RangeError::InvalidNumbers { from, to, step });
        }

        let width = to.to_string().len();
        let mut items = Vec::with_capacity(((to - from) / step + 1) as usize);
        let mut value = from;
        while value <= to {
            match style {
                NumberStyle::Plain => items.push(value.to_string()),
                NumberStyle::ZeroPadded => items.push(format!("{value:0width$}")),
            }
            value = match value.checked_add(step) {
                Some(next) => next,
                None => break,
            };
        }
        Ok(Self { items })
    }

    /// Builds a day-by-day date range formatted as `%Y-%m-%d`.
    pub fn dates(
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    ) -> Result<Self, RangeError> {
        Self::dates_with(from, to, 1, DateUnit::Days, DEFAULT_DATE_FORMAT)
    }

    /// Builds a date range with an explicit step, unit, and chrono format.
    ///
    /// See [`DateUnit`] for the anchoring rules of month and year spans.
    pub fn dates_with(
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
        step: u32,
        unit: DateUnit,
        format: &str,
    ) -> Result<Self, RangeError> {
        Ok(Self {
            items: dates::build(from, to, step, unit, format)?,
        })
    }

    /// Builds a range from a predefined character set.
    pub fn charset(set: Charset) -> Self {
        Self {
            items: charset::expand(set),
        }
    }

    /// The substitution items, in order.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Mutable access to the items.
    pub fn items_mut(&mut self) -> &mut Vec<String> {
        &mut self.items
    }

    /// Replaces the items wholesale, without validation.
    pub fn set_items(&mut self, items: Vec<String>) {
        self.items = items;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
