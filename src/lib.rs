//! dashboard-i18n
//!
//! モデレーションダッシュボード向けの翻訳テーブルと、マークアップ属性に基づく
//! ドキュメント翻訳処理

pub mod cli;
pub mod config;
pub mod dom;
pub mod locale;
pub mod storage;
pub mod sync;
pub mod translations;

pub use locale::Locale;
pub use sync::{
    I18n,
    Page,
    SyncReport,
};
pub use translations::{
    DASHBOARD,
    TranslationTable,
    resolve,
};
