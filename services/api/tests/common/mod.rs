use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use api::{build_router, AppState};
use axum::Router;
use image::{Rgb, RgbImage};
use music_gen::{MusicGenerator, MusicModel, OutputLayout, OutputNaming};
use pipeline::Pipeline;
use text_lang::{LanguageDetector, TranslationModel, Translator};
use tune_core::{AudioClip, CategorySet, DecodingParams, FeatureVector, LoudnessParams};
use visual_tags::{encode_png, ImageEmbedder, Recommender, TextEmbedder};

/// ASCII is English, anything else Korean.
pub struct AsciiOrKorean;
impl LanguageDetector for AsciiOrKorean {
    fn detect(&self, text: &str) -> Option<String> {
        Some(if text.is_ascii() { "en" } else { "ko" }.to_string())
    }
}

pub struct CannedTranslation;
impl TranslationModel for CannedTranslation {
    fn translate(&self, _text: &str, _source_language: &str) -> anyhow::Result<String> {
        Ok("a calm piano melody".to_string())
    }
}

fn bag(text: &str) -> FeatureVector {
    let mut v = vec![0f32; 128];
    for word in text.split_whitespace() {
        let mut h = DefaultHasher::new();
        word.hash(&mut h);
        v[(h.finish() % 128) as usize] += 1.0;
    }
    FeatureVector::new(v)
}

pub struct BagText;
impl TextEmbedder for BagText {
    fn embed_text(&self, text: &str) -> anyhow::Result<FeatureVector> { Ok(bag(text)) }
}

pub struct FixedImage(FeatureVector);
impl ImageEmbedder for FixedImage {
    fn embed_image(&self, _image: &RgbImage) -> anyhow::Result<FeatureVector> { Ok(self.0.clone()) }
}

#[derive(Default)]
pub struct RecordingModel { pub prompts: Mutex<Vec<String>>, pub fail: bool }
impl MusicModel for RecordingModel {
    fn generate(&self, prompts: &[String], _params: &DecodingParams) -> anyhow::Result<Vec<AudioClip>> {
        if self.fail {
            anyhow::bail!("model weights not loaded");
        }
        self.prompts.lock().unwrap().extend(prompts.iter().cloned());
        let tone: Vec<f32> = (0..1_600).map(|i| 0.1 * (i as f32 * 0.07).sin()).collect();
        Ok(prompts.iter().map(|_| AudioClip::mono(32_000, tone.clone())).collect())
    }
}

pub struct TestApp {
    pub router: Router,
    pub model: Arc<RecordingModel>,
    pub output_dir: PathBuf,
}

pub fn test_app(root: &Path, model: RecordingModel) -> TestApp {
    let cats = CategorySet::load_dir(&PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/categories")).unwrap();
    let ambient = bag(&cats.genre.get("Ambient").unwrap().description());
    let output_dir = root.join("audio_files");
    let model = Arc::new(model);

    let pipeline = Pipeline::new(
        Translator::new(Arc::new(AsciiOrKorean), Arc::new(CannedTranslation)),
        Recommender::new(Arc::new(FixedImage(ambient)), Arc::new(BagText), cats, true),
        MusicGenerator::new(
            model.clone(),
            DecodingParams::default(),
            LoudnessParams::default(),
            OutputLayout::new(&output_dir, OutputNaming::Positional),
        ),
    );
    std::fs::create_dir_all(&output_dir).unwrap();
    let router = build_router(AppState::new(pipeline), &output_dir, "/audio_files", 1024 * 1024);
    TestApp { router, model, output_dir }
}

pub fn png_bytes() -> Vec<u8> {
    encode_png(&RgbImage::from_pixel(12, 12, Rgb([90, 140, 210]))).unwrap()
}

/// Hand-built multipart body with a single file field.
pub fn multipart(field: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let boundary = "tune-test-boundary";
    let mut body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"upload.png\"\r\nContent-Type: image/png\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}
