//! Locale selection and document synchronization

use crate::config::I18nSettings;
use crate::dom::Document;
use crate::locale::Locale;
use crate::storage::{
    Storage,
    StorageError,
};
use crate::translations::{
    DASHBOARD,
    TranslationTable,
};

/// Outcome of one synchronization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Locale the document was translated into
    pub locale: Locale,
    /// Elements whose text was overwritten
    pub texts_updated: usize,
    /// Elements left untouched because their translation was empty
    pub texts_skipped: usize,
    /// Elements whose placeholder was set
    pub placeholders_updated: usize,
    /// Whether a language switch control was marked active
    pub button_highlighted: bool,
}

/// Translates documents according to the persisted locale.
#[derive(Debug)]
pub struct I18n<S> {
    /// Markup contract
    settings: I18nSettings,
    /// Source of translations
    table: &'static TranslationTable,
    /// Where the active locale is persisted
    storage: S,
}

impl<S: Storage> I18n<S> {
    /// Creates a translator over the dashboard table with default settings.
    pub fn new(storage: S) -> Self {
        Self::with_settings(storage, I18nSettings::default())
    }

    /// Creates a translator over the dashboard table.
    pub fn with_settings(storage: S, settings: I18nSettings) -> Self {
        Self::with_table(storage, settings, &DASHBOARD)
    }

    /// Creates a translator over an arbitrary table.
    pub const fn with_table(
        storage: S,
        settings: I18nSettings,
        table: &'static TranslationTable,
    ) -> Self {
        Self { settings, table, storage }
    }

    /// Current settings.
    #[must_use]
    pub const fn settings(&self) -> &I18nSettings {
        &self.settings
    }

    /// The underlying storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// The raw persisted locale tag, if any.
    #[must_use]
    pub fn stored_tag(&self) -> Option<String> {
        self.storage.get_item(&self.settings.storage_key)
    }

    /// Reads the active locale.
    ///
    /// Absent or unrecognized tags yield the configured default. Nothing is
    /// written back.
    #[must_use]
    pub fn active_locale(&self) -> Locale {
        self.stored_tag()
            .as_deref()
            .and_then(Locale::from_tag)
            .unwrap_or_else(|| self.settings.default_locale())
    }

    /// Translates `key` into the active locale, echoing unknown keys.
    #[must_use]
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.table.resolve(self.active_locale(), key)
    }

    /// Persists `tag` as the active locale and re-synchronizes `document`.
    ///
    /// The tag is stored as given. An unsupported tag is not rejected; the
    /// document is then rendered in the default locale.
    ///
    /// # Errors
    /// Returns an error if the tag cannot be persisted. The document is left
    /// untouched in that case.
    pub fn set_active_locale<D: Document + ?Sized>(
        &mut self,
        document: &mut D,
        tag: &str,
    ) -> Result<SyncReport, StorageError> {
        if Locale::from_tag(tag).is_none() {
            tracing::warn!(tag, "Unsupported locale stored; using the default table");
        }
        self.storage.set_item(&self.settings.storage_key, tag)?;
        Ok(self.synchronize(document))
    }

    /// Applies the active locale to every marked element of `document`.
    ///
    /// Running it twice without a locale change leaves the document unchanged.
    pub fn synchronize<D: Document + ?Sized>(&self, document: &mut D) -> SyncReport {
        let locale = self.active_locale();
        let mut report = SyncReport { locale, ..SyncReport::default() };

        for node in document.elements_with_attribute(&self.settings.text_attribute) {
            let Some(key) = document.attribute(node, &self.settings.text_attribute) else {
                continue;
            };
            let text = self.table.resolve(locale, &key);
            // Empty translations would wipe the fallback markup.
            if text.is_empty() {
                report.texts_skipped += 1;
                continue;
            }
            document.set_text_content(node, text);
            report.texts_updated += 1;
        }

        for node in document.elements_with_attribute(&self.settings.placeholder_attribute) {
            let Some(key) = document.attribute(node, &self.settings.placeholder_attribute) else {
                continue;
            };
            let text = self.table.resolve(locale, &key);
            document.set_attribute(node, "placeholder", text);
            report.placeholders_updated += 1;
        }

        for button in document.elements_with_class(&self.settings.language_button_class) {
            document.remove_class(button, &self.settings.active_class);
        }
        if let Some(button) =
            document.find_by_attribute(&self.settings.language_attribute, locale.tag())
        {
            document.add_class(button, &self.settings.active_class);
            report.button_highlighted = true;
        }

        tracing::debug!(
            %locale,
            texts_updated = report.texts_updated,
            texts_skipped = report.texts_skipped,
            placeholders_updated = report.placeholders_updated,
            button_highlighted = report.button_highlighted,
            "Synchronized document"
        );

        report
    }
}

/// A page hosting a translated document.
///
/// Exposes the two entry points the page's event handlers call.
#[derive(Debug)]
pub struct Page<S, D> {
    /// Translator
    i18n: I18n<S>,
    /// The page's document
    document: D,
}

impl<S: Storage, D: Document> Page<S, D> {
    /// Wraps `document`; nothing is translated until the page is ready.
    pub const fn new(i18n: I18n<S>, document: D) -> Self {
        Self { i18n, document }
    }

    /// Page-ready handler: translates the document into the persisted locale.
    pub fn on_content_loaded(&mut self) -> SyncReport {
        self.i18n.synchronize(&mut self.document)
    }

    /// Language switch handler.
    ///
    /// # Errors
    /// Returns an error if the locale cannot be persisted.
    pub fn switch_language(&mut self, tag: &str) -> Result<SyncReport, StorageError> {
        tracing::debug!(tag, "Switching language");
        self.i18n.set_active_locale(&mut self.document, tag)
    }

    /// The translator.
    #[must_use]
    pub const fn i18n(&self) -> &I18n<S> {
        &self.i18n
    }

    /// The document.
    #[must_use]
    pub const fn document(&self) -> &D {
        &self.document
    }

    /// Releases the storage and document, e.g. to simulate a reload.
    pub fn into_parts(self) -> (I18n<S>, D) {
        (self.i18n, self.document)
    }
}
