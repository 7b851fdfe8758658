//! Core library for on-device translation bridges.
//!
//! Sits between a method-call channel and a translation SDK: keeps a bounded
//! cache of live translators, tracks in-flight model downloads and maps SDK
//! outcomes onto coded channel responses.

pub mod channel;
pub mod config;
pub mod dispatcher;
pub mod download_tracker;
pub mod error;
pub mod language;
pub mod sdk;
pub mod translator_cache;

pub use channel::{Method, MethodCall, MethodResponse};
pub use config::{DownloadConditions, TranslatorConfig};
pub use dispatcher::Dispatcher;
pub use download_tracker::{DownloadGuard, DownloadTracker};
pub use error::{Error, Result, SdkError, SdkResult};
pub use language::LanguagePair;
pub use sdk::{TranslationSdk, Translator};
pub use translator_cache::{CacheStats, TranslatorCache, TranslatorHandle};
