use std::sync::Arc;

use thiserror::Error;

use crate::detect::{is_english, LanguageDetector};

/// Sequence-to-sequence model turning foreign text into English.
pub trait TranslationModel: Send + Sync {
    /// `source_language` is the detector's code, passed as a hint.
    fn translate(&self, text: &str, source_language: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("translation failed: {0:#}")]
    Model(anyhow::Error),
    #[error("translation model returned empty text for {source_language} input")]
    EmptyTranslation { source_language: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    /// Detected language code, `None` when undecidable.
    pub source_language: Option<String>,
    pub translated: bool,
}

/// Detects the input language and translates anything that is not English.
pub struct Translator {
    detector: Arc<dyn LanguageDetector>,
    model: Arc<dyn TranslationModel>,
}

impl Translator {
    pub fn new(detector: Arc<dyn LanguageDetector>, model: Arc<dyn TranslationModel>) -> Self {
        Self { detector, model }
    }

    /// Blocking: may run model inference.
    pub fn to_english(&self, text: &str) -> Result<Translation, TranslateError> {
        let lang = match self.detector.detect(text) {
            Some(code) if !is_english(&code) => code,
            // English, or undecidable: pass through as-is
            other => {
                return Ok(Translation { text: text.to_string(), source_language: other, translated: false });
            }
        };

        tracing::info!(lang = %lang, "translating prompt");
        let out = self.model.translate(text, &lang).map_err(TranslateError::Model)?;
        let out = out.trim();
        if out.is_empty() {
            return Err(TranslateError::EmptyTranslation { source_language: lang });
        }
        tracing::info!(translated = out, "translation complete");
        Ok(Translation { text: out.to_string(), source_language: Some(lang), translated: true })
    }
}
