//! Supported locales.

use std::fmt;
use std::str::FromStr;

use serde::{
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
};
use thiserror::Error;

/// A language the dashboard can be displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Locale {
    /// French (`fr`)
    Fr,
    /// English (`en`)
    En,
}

/// Error returned when a tag does not name a supported locale.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported locale '{0}'. Expected one of: fr, en")]
pub struct UnknownLocale(pub String);

impl Locale {
    /// All locales, in table order.
    pub const ALL: [Self; 2] = [Self::Fr, Self::En];

    /// Used whenever the persisted tag is absent or unrecognized.
    pub const FALLBACK: Self = Self::Fr;

    /// The tag stored in persistent storage and in `data-lang` attributes.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Fr => "fr",
            Self::En => "en",
        }
    }

    /// Matches a stored tag exactly.
    ///
    /// `"EN"` or `" fr"` are not tags. Use [`str::parse`] for user input.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|locale| locale.tag() == tag)
    }

    /// Maps an optional, possibly unrecognized tag to a locale.
    ///
    /// Absent or unknown tags resolve to [`Locale::FALLBACK`].
    #[must_use]
    pub fn resolve_tag(tag: Option<&str>) -> Self {
        tag.and_then(Self::from_tag).unwrap_or(Self::FALLBACK)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::FALLBACK
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = UnknownLocale;

    /// Lenient: surrounding whitespace and case are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|locale| locale.tag().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownLocale(s.to_string()))
    }
}

impl Serialize for Locale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[gtest]

    #[rstest]
    #[case("fr", Some(Locale::Fr))]
    #[case("en", Some(Locale::En))]
    #[case("EN", None)]
    #[case(" fr ", None)]
    #[case("de", None)]
    #[case("en-US", None)]
    #[case("", None)]
    fn test_from_tag(#[case] tag: &str, #[case] expected: Option<Locale>) {
        assert_that!(Locale::from_tag(tag), eq(expected));
    }

    #[gtest]

    #[rstest]
    #[case("EN", Locale::En)]
    #[case(" fr ", Locale::Fr)]
    #[case("Fr", Locale::Fr)]
    fn test_parse_is_lenient(#[case] input: &str, #[case] expected: Locale) {
        assert_that!(input.parse::<Locale>(), ok(eq(&expected)));
    }

    #[gtest]

    #[rstest]
    #[case::absent(None, Locale::Fr)]
    #[case::unknown(Some("xx"), Locale::Fr)]
    #[case::english(Some("en"), Locale::En)]
    #[case::uppercase(Some("EN"), Locale::Fr)]
    #[case::french(Some("fr"), Locale::Fr)]
    fn test_resolve_tag(#[case] tag: Option<&str>, #[case] expected: Locale) {
        assert_that!(Locale::resolve_tag(tag), eq(expected));
    }

    #[googletest::test]
    fn test_fallback_is_first_listed() {
        expect_that!(Locale::FALLBACK, eq(Locale::ALL[0]));
        expect_that!(Locale::default(), eq(Locale::Fr));
    }

    #[googletest::test]
    fn test_parse_unknown_reports_tag() {
        let result = "jp".parse::<Locale>();

        expect_that!(result, err(eq(&UnknownLocale("jp".to_string()))));
        expect_that!(result.unwrap_err().to_string(), contains_substring("'jp'"));
    }

    #[googletest::test]
    fn test_serde_uses_tag() {
        let json = serde_json::to_string(&Locale::En).unwrap();
        expect_that!(json, eq("\"en\""));

        let locale: Locale = serde_json::from_str("\"fr\"").unwrap();
        expect_that!(locale, eq(Locale::Fr));

        expect_that!(serde_json::from_str::<Locale>("\"es\""), err(anything()));
    }
}
