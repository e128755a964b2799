use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use image::{Rgb, RgbImage};
use music_gen::{MusicGenerator, MusicModel, OutputLayout, OutputNaming};
use pipeline::Pipeline;
use text_lang::{LanguageDetector, TranslationModel, Translator, WhatlangDetector};
use tune_core::{AudioClip, CategorySet, DecodingParams, FeatureVector, LoudnessParams};
use visual_tags::{encode_png, ImageEmbedder, Recommender, TextEmbedder};

pub fn categories() -> CategorySet {
    CategorySet::load_dir(&PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/categories")).unwrap()
}

/// Reports English for ASCII input, defers to whatlang otherwise.
pub struct AsciiIsEnglish;
impl LanguageDetector for AsciiIsEnglish {
    fn detect(&self, text: &str) -> Option<String> {
        if text.is_ascii() { Some("en".into()) } else { WhatlangDetector.detect(text) }
    }
}

#[derive(Default)]
pub struct CannedTranslation { pub calls: Mutex<Vec<String>> }
impl TranslationModel for CannedTranslation {
    fn translate(&self, text: &str, _source_language: &str) -> anyhow::Result<String> {
        self.calls.lock().unwrap().push(text.to_string());
        Ok("a calm piano melody".to_string())
    }
}

const DIM: usize = 256;

/// Hashed bag-of-words embedding.
pub fn bag(text: &str) -> FeatureVector {
    let mut v = vec![0f32; DIM];
    for word in text.split_whitespace() {
        let mut h = DefaultHasher::new();
        word.hash(&mut h);
        v[(h.finish() % DIM as u64) as usize] += 1.0;
    }
    FeatureVector::new(v)
}

pub struct BagText;
impl TextEmbedder for BagText {
    fn embed_text(&self, text: &str) -> anyhow::Result<FeatureVector> { Ok(bag(text)) }
}

pub struct FixedImage(pub FeatureVector);
impl ImageEmbedder for FixedImage {
    fn embed_image(&self, _image: &RgbImage) -> anyhow::Result<FeatureVector> { Ok(self.0.clone()) }
}

/// Short tone per prompt, recording every prompt it receives.
#[derive(Default)]
pub struct RecordingModel { pub prompts: Mutex<Vec<String>>, pub fail: bool }
impl MusicModel for RecordingModel {
    fn generate(&self, prompts: &[String], _params: &DecodingParams) -> anyhow::Result<Vec<AudioClip>> {
        if self.fail {
            anyhow::bail!("generation backend crashed");
        }
        self.prompts.lock().unwrap().extend(prompts.iter().cloned());
        Ok(prompts.iter().map(|_| AudioClip::mono(32_000, tone(3_200))).collect())
    }
}

fn tone(n: usize) -> Vec<f32> {
    (0..n).map(|i| 0.2 * (i as f32 * 0.09).sin()).collect()
}

pub struct Harness {
    pub pipeline: Pipeline,
    pub translation: Arc<CannedTranslation>,
    pub model: Arc<RecordingModel>,
}

pub fn harness(root: &Path, naming: OutputNaming, model: RecordingModel) -> Harness {
    let cats = categories();
    let ambient = bag(&cats.genre.get("Ambient").unwrap().description());
    let translation = Arc::new(CannedTranslation::default());
    let model = Arc::new(model);
    let pipeline = Pipeline::new(
        Translator::new(Arc::new(AsciiIsEnglish), translation.clone()),
        Recommender::new(Arc::new(FixedImage(ambient)), Arc::new(BagText), cats, true),
        MusicGenerator::new(model.clone(), DecodingParams::default(), LoudnessParams::default(), OutputLayout::new(root, naming)),
    );
    Harness { pipeline, translation, model }
}

pub fn png_bytes() -> Vec<u8> {
    encode_png(&RgbImage::from_pixel(16, 16, Rgb([120, 180, 220]))).unwrap()
}
