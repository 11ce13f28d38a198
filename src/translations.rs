//! Translation table for the dashboard
//!
//! The table is static and built once on first use. Lookups never fail: a key
//! missing from a locale is echoed back so the gap stays visible on the page.

use std::collections::{
    BTreeMap,
    BTreeSet,
    HashMap,
};
use std::sync::LazyLock;

use serde_json::{
    Map,
    Value,
};

use crate::locale::Locale;

/// Dashboard strings as `(key, fr, en)`.
const DASHBOARD_ENTRIES: &[(&str, &str, &str)] = &[
    // Header
    ("title", "PlexStaffAI Admin", "PlexStaffAI Admin"),
    ("subtitle", "IA Moderation Overseerr • Auto-Scan", "AI Moderation Overseerr • Auto-Scan"),
    ("version", "Smart Rules + ML Learning", "Smart Rules + ML Learning"),
    // Auto-scan badge
    ("autoScanActive", "Auto-Scan Actif • Toutes les", "Auto-Scan Active • Every"),
    ("systemLive", "Système Live • Cron Actif", "System Live • Cron Active"),
    // Review dashboard button
    ("reviewDashboard", "Review Dashboard", "Review Dashboard"),
    ("managePending", "Manage pending reviews", "Manage pending reviews"),
    ("pendingReviews", "Pending", "Pending"),
    ("reviews", "Reviews", "Reviews"),
    // Buttons
    ("moderateNow", "MODÉRER MAINTENANT", "MODERATE NOW"),
    ("refreshStats", "REFRESH STATS", "REFRESH STATS"),
    ("viewHistory", "VOIR HISTORIQUE", "VIEW HISTORY"),
    // Stats cards
    ("totalDecisions", "Total", "Total"),
    ("totalDecisionsDesc", "Décisions totales", "Total decisions"),
    ("approved", "Approuvés", "Approved"),
    ("approvedDesc", "Requests validées", "Validated requests"),
    ("rejected", "Rejetés", "Rejected"),
    ("rejectedDesc", "Requests refusées", "Declined requests"),
    ("approvalRate", "Taux", "Rate"),
    ("approvalRateDesc", "Taux d'approbation", "Approval rate"),
    // Results panel
    ("resultsTitle", "Résultats Modération IA", "AI Moderation Results"),
    ("resultsDesc", "Clique", "Click"),
    ("resultsDesc2", "pour scanner immédiatement", "to scan immediately"),
    ("autoScanInfo", "Le système scanne automatiquement toutes les", "System automatically scans every"),
    // Loading
    ("loading", "⏳ Modération en cours...", "⏳ Moderation in progress..."),
    // Quick links
    ("quickLinks", "Quick Links", "Quick Links"),
    ("apiDocs", "API Docs", "API Docs"),
    ("healthCheck", "Health Check", "Health Check"),
    ("fullReport", "Rapport Complet", "Full Report"),
    ("openaiStats", "OpenAI Stats", "OpenAI Stats"),
    // Footer
    ("poweredBy", "Powered by", "Powered by"),
    ("dockerHub", "Docker Hub", "Docker Hub"),
    // Misc
    ("minute", "minute", "minute"),
    ("minutes", "minutes", "minutes"),
];

/// The dashboard table, built on first access.
pub static DASHBOARD: LazyLock<TranslationTable> = LazyLock::new(|| {
    TranslationTable::from_entries(DASHBOARD_ENTRIES.iter().flat_map(|&(key, fr, en)| {
        [(Locale::Fr, key, fr), (Locale::En, key, en)]
    }))
});

/// A key present in some locale but missing from `locale`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTranslation {
    /// Locale lacking the key
    pub locale: Locale,
    /// The key itself
    pub key: String,
}

/// Locale → (key → localized text).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTable {
    /// Per-locale entries, ordered by key
    entries: HashMap<Locale, BTreeMap<String, String>>,
}

impl TranslationTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(locale, key, value)` triples. Later duplicates win.
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (Locale, K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::new();
        for (locale, key, value) in entries {
            table.insert(locale, key, value);
        }
        table
    }

    /// Adds or replaces a single translation.
    pub fn insert(&mut self, locale: Locale, key: impl Into<String>, value: impl Into<String>) {
        self.entries.entry(locale).or_default().insert(key.into(), value.into());
    }

    /// Looks up `key` without any fallback.
    #[must_use]
    pub fn get(&self, locale: Locale, key: &str) -> Option<&str> {
        self.entries.get(&locale)?.get(key).map(String::as_str)
    }

    /// Looks up `key`, echoing the key back when it has no translation.
    #[must_use]
    pub fn resolve<'a>(&'a self, locale: Locale, key: &'a str) -> &'a str {
        self.get(locale, key).unwrap_or(key)
    }

    /// Like [`TranslationTable::resolve`] but takes a raw locale tag.
    ///
    /// Absent or unrecognized tags use the fallback locale's table.
    #[must_use]
    pub fn resolve_tag<'a>(&'a self, tag: Option<&str>, key: &'a str) -> &'a str {
        self.resolve(Locale::resolve_tag(tag), key)
    }

    /// Whether `locale` has a translation for `key`.
    #[must_use]
    pub fn contains(&self, locale: Locale, key: &str) -> bool {
        self.get(locale, key).is_some()
    }

    /// Keys defined for `locale`, sorted.
    pub fn keys(&self, locale: Locale) -> impl Iterator<Item = &str> {
        self.entries.get(&locale).into_iter().flat_map(|map| map.keys().map(String::as_str))
    }

    /// Number of translations for `locale`.
    #[must_use]
    pub fn len(&self, locale: Locale) -> usize {
        self.entries.get(&locale).map_or(0, BTreeMap::len)
    }

    /// Whether no locale has any translation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(BTreeMap::is_empty)
    }

    /// Lists keys that exist in one locale but not in another.
    ///
    /// Results are ordered by locale, then key.
    #[must_use]
    pub fn audit(&self) -> Vec<MissingTranslation> {
        let all_keys: BTreeSet<&str> =
            Locale::ALL.into_iter().flat_map(|locale| self.keys(locale)).collect();

        Locale::ALL
            .into_iter()
            .flat_map(|locale| {
                all_keys
                    .iter()
                    .filter(move |key| !self.contains(locale, key))
                    .map(move |key| MissingTranslation { locale, key: (*key).to_string() })
            })
            .collect()
    }

    /// Exports the table as `{"fr": {...}, "en": {...}}`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut root = Map::new();
        for locale in Locale::ALL {
            let strings: Map<String, Value> = self
                .entries
                .get(&locale)
                .into_iter()
                .flatten()
                .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                .collect();
            root.insert(locale.tag().to_string(), Value::Object(strings));
        }
        Value::Object(root)
    }
}

/// Resolves `key` against the dashboard table.
#[must_use]
pub fn resolve(locale: Locale, key: &str) -> &str {
    DASHBOARD.resolve(locale, key)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[googletest::test]
    fn test_dashboard_table_is_complete() {
        expect_that!(DASHBOARD.audit(), is_empty());
        expect_that!(DASHBOARD.len(Locale::Fr), eq(DASHBOARD_ENTRIES.len()));
        expect_that!(DASHBOARD.len(Locale::En), eq(DASHBOARD_ENTRIES.len()));
    }

    #[googletest::test]
    fn test_dashboard_keys_are_unique() {
        let unique: BTreeSet<&str> = DASHBOARD_ENTRIES.iter().map(|(key, _, _)| *key).collect();

        expect_that!(unique.len(), eq(DASHBOARD_ENTRIES.len()));
    }

    #[gtest]

    #[rstest]
    #[case(Locale::Fr, "title", "PlexStaffAI Admin")]
    #[case(Locale::En, "title", "PlexStaffAI Admin")]
    #[case(Locale::En, "loading", "⏳ Moderation in progress...")]
    #[case(Locale::Fr, "loading", "⏳ Modération en cours...")]
    #[case(Locale::Fr, "moderateNow", "MODÉRER MAINTENANT")]
    #[case(Locale::En, "moderateNow", "MODERATE NOW")]
    #[case(Locale::En, "fullReport", "Full Report")]
    #[case(Locale::Fr, "fullReport", "Rapport Complet")]
    fn test_resolve_known_keys(#[case] locale: Locale, #[case] key: &str, #[case] expected: &str) {
        assert_that!(resolve(locale, key), eq(expected));
    }

    #[gtest]

    #[rstest]
    #[case(Locale::Fr)]
    #[case(Locale::En)]
    fn test_resolve_missing_key_echoes_key(#[case] locale: Locale) {
        assert_that!(resolve(locale, "nonexistent_key"), eq("nonexistent_key"));
        assert_that!(resolve(locale, ""), eq(""));
    }

    #[gtest]

    #[rstest]
    #[case::unknown_tag(Some("de"), "Rapport Complet")]
    #[case::absent_tag(None, "Rapport Complet")]
    #[case::english_tag(Some("en"), "Full Report")]
    fn test_resolve_tag_falls_back_to_default_table(
        #[case] tag: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_that!(DASHBOARD.resolve_tag(tag, "fullReport"), eq(expected));
    }

    #[googletest::test]
    fn test_audit_reports_asymmetry() {
        let table = TranslationTable::from_entries([
            (Locale::Fr, "shared", "Partagé"),
            (Locale::En, "shared", "Shared"),
            (Locale::Fr, "onlyFr", "Seulement"),
            (Locale::En, "onlyEn", "Only"),
        ]);

        let missing = table.audit();

        expect_that!(
            missing,
            elements_are![
                eq(&MissingTranslation { locale: Locale::Fr, key: "onlyEn".to_string() }),
                eq(&MissingTranslation { locale: Locale::En, key: "onlyFr".to_string() })
            ]
        );
    }

    #[googletest::test]
    fn test_missing_locale_degrades_to_key() {
        let table = TranslationTable::from_entries([(Locale::Fr, "hello", "Bonjour")]);

        expect_that!(table.resolve(Locale::En, "hello"), eq("hello"));
        expect_that!(table.len(Locale::En), eq(0));
        expect_that!(table.is_empty(), eq(false));
        expect_that!(TranslationTable::new().is_empty(), eq(true));
    }

    #[googletest::test]
    fn test_later_duplicates_win() {
        let table = TranslationTable::from_entries([
            (Locale::En, "greeting", "Hi"),
            (Locale::En, "greeting", "Hello"),
        ]);

        expect_that!(table.get(Locale::En, "greeting"), some(eq("Hello")));
    }

    #[googletest::test]
    fn test_to_json_nests_by_locale() {
        let json = DASHBOARD.to_json();

        expect_that!(json["fr"]["viewHistory"].as_str(), some(eq("VOIR HISTORIQUE")));
        expect_that!(json["en"]["viewHistory"].as_str(), some(eq("VIEW HISTORY")));
        expect_that!(json["en"].as_object().unwrap().len(), eq(DASHBOARD_ENTRIES.len()));
    }
}
