//! Prompt language handling: detect the language of a request and bring
//! non-English prompts into English before they reach the music model.

pub mod detect;
pub mod translate;

pub use detect::{is_english, LanguageDetector, WhatlangDetector};
pub use translate::{TranslateError, Translation, TranslationModel, Translator};
