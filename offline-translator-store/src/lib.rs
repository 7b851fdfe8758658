//! Filesystem-backed reference SDK for offline-translator.
//!
//! Language models are JSON glossary packages copied from a model repository
//! directory into a local models directory. Translation is word by word,
//! pivoting through English, which is built in.

pub mod error;
pub mod languages;
pub mod model;
pub mod sdk;
pub mod store;

pub use error::{Result, StoreError};
pub use languages::{ENGLISH, SUPPORTED_LANGUAGES};
pub use model::LanguageModel;
pub use sdk::{FilesystemSdk, FilesystemTranslator};
pub use store::ModelStore;
