use whatlang::Lang;

/// Classifies the dominant language of a text.
pub trait LanguageDetector: Send + Sync {
    /// ISO 639-1 code where one exists (ISO 639-3 otherwise), `None` when undecidable.
    fn detect(&self, text: &str) -> Option<String>;
}

/// Trigram/script detector backed by `whatlang`.
#[derive(Clone, Copy, Debug, Default)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Option<String> {
        let info = whatlang::detect(text)?;
        // short Latin-script prompts get low-confidence guesses
        if !info.is_reliable() {
            tracing::debug!(lang = info.lang().code(), confidence = info.confidence(), "language guess discarded");
            return None;
        }
        Some(iso_639_1(info.lang()).unwrap_or_else(|| info.lang().code()).to_string())
    }
}

fn iso_639_1(lang: Lang) -> Option<&'static str> {
    Some(match lang {
        Lang::Eng => "en",
        Lang::Kor => "ko",
        Lang::Jpn => "ja",
        Lang::Cmn => "zh",
        Lang::Spa => "es",
        Lang::Fra => "fr",
        Lang::Deu => "de",
        Lang::Ita => "it",
        Lang::Por => "pt",
        Lang::Rus => "ru",
        Lang::Vie => "vi",
        Lang::Tha => "th",
        Lang::Ara => "ar",
        Lang::Hin => "hi",
        Lang::Nld => "nl",
        Lang::Pol => "pl",
        Lang::Tur => "tr",
        Lang::Ukr => "uk",
        Lang::Ind => "id",
        _ => return None,
    })
}

pub fn is_english(code: &str) -> bool {
    code.eq_ignore_ascii_case("en") || code.eq_ignore_ascii_case("eng")
}
