//! Culture information used for number and date parsing
//!
//! A [`Locale`] wraps a BCP 47 language identifier and derives the handful
//! of formatting conventions the primitive converter needs. The undetermined
//! language (`und`) doubles as the invariant culture.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;
use unic_langid::LanguageIdentifier;

/// Order of the fields in a short date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    MonthDayYear,
    DayMonthYear,
    YearMonthDay,
}

/// Culture used to interpret step argument text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Locale {
    id: LanguageIdentifier,
}

// Languages writing `1.234,5`
const COMMA_DECIMAL_DOT_GROUP: &[&str] = &["de", "es", "it", "nl", "pt", "da", "tr", "id", "el", "ro", "hr", "sl", "sr"];
// Languages writing `1 234,5`
const COMMA_DECIMAL_SPACE_GROUP: &[&str] = &["fr", "ru", "pl", "sv", "cs", "sk", "fi", "nb", "no", "uk", "hu", "lt", "bg"];
const YEAR_FIRST: &[&str] = &["ja", "zh", "ko", "hu", "lt", "sv"];

impl Locale {
    /// The invariant culture
    pub fn invariant() -> Self {
        Self::default()
    }

    /// Parse a language tag such as `de-DE`; an empty tag or `invariant`
    /// selects the invariant culture
    pub fn parse(tag: &str) -> Result<Self> {
        let tag = tag.trim();
        if tag.is_empty() || tag.eq_ignore_ascii_case("invariant") {
            return Ok(Self::invariant());
        }
        LanguageIdentifier::from_str(tag)
            .map(|id| Self { id })
            .map_err(|e| Error::configuration(format!("invalid locale '{}': {}", tag, e), None))
    }

    pub fn is_invariant(&self) -> bool {
        self.id == LanguageIdentifier::default()
    }

    pub fn language_identifier(&self) -> &LanguageIdentifier {
        &self.id
    }

    fn language(&self) -> &str {
        self.id.language.as_str()
    }

    fn region(&self) -> Option<&str> {
        self.id.region.as_ref().map(|r| r.as_str())
    }

    pub fn decimal_separator(&self) -> char {
        if self.region() == Some("CH") {
            return '.';
        }
        let lang = self.language();
        if COMMA_DECIMAL_DOT_GROUP.contains(&lang) || COMMA_DECIMAL_SPACE_GROUP.contains(&lang) {
            ','
        } else {
            '.'
        }
    }

    /// Group separators accepted when reading numbers
    pub fn group_separators(&self) -> &'static [char] {
        if self.region() == Some("CH") {
            return &['\'', '\u{2019}'];
        }
        let lang = self.language();
        if COMMA_DECIMAL_DOT_GROUP.contains(&lang) {
            &['.']
        } else if COMMA_DECIMAL_SPACE_GROUP.contains(&lang) {
            &[' ', '\u{a0}', '\u{202f}']
        } else {
            &[',']
        }
    }

    pub fn date_order(&self) -> DateOrder {
        let lang = self.language();
        if self.is_invariant() {
            return DateOrder::MonthDayYear;
        }
        if YEAR_FIRST.contains(&lang) {
            return DateOrder::YearMonthDay;
        }
        match (lang, self.region()) {
            ("en", None) | ("en", Some("US")) | ("en", Some("PH")) => DateOrder::MonthDayYear,
            _ => DateOrder::DayMonthYear,
        }
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_invariant() {
            write!(f, "invariant")
        } else {
            write!(f, "{}", self.id)
        }
    }
}
