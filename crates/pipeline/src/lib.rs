//! Request flows: text → music and image → music.
//!
//! Model inference, image decoding and file writing are blocking; each step
//! runs on Tokio's blocking pool so the accept loop stays responsive. There
//! is no timeout and no cancellation: once started, a step runs to
//! completion even if the awaiting request goes away.

pub mod config;
pub mod error;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use model_clients::{RemoteEmbedder, RemoteMusicModel, RemoteTranslator};
use music_gen::{MusicGenerator, OutputLayout};
use text_lang::{Translator, WhatlangDetector};
use tokio::task::spawn_blocking;
use tune_core::{CategorySet, MusicDetails};
use visual_tags::{decode_image, Recommender};

pub use config::{GenerationSettings, ServerSettings, Settings};
pub use error::{ErrorClass, PipelineError};

/// Outcome of one generation request.
#[derive(Clone, Debug)]
pub struct Generated {
    /// Prompt the music model actually received.
    pub prompt: String,
    pub file_paths: Vec<PathBuf>,
    pub source_language: Option<String>,
    /// Set for image requests.
    pub details: Option<MusicDetails>,
}

impl Generated {
    pub fn first_path(&self) -> Option<&Path> {
        self.file_paths.first().map(PathBuf::as_path)
    }
}

pub struct Pipeline {
    translator: Arc<Translator>,
    recommender: Arc<Recommender>,
    generator: Arc<MusicGenerator>,
    max_image_side: u32,
}

impl Pipeline {
    pub fn new(translator: Translator, recommender: Recommender, generator: MusicGenerator) -> Self {
        Self {
            translator: Arc::new(translator),
            recommender: Arc::new(recommender),
            generator: Arc::new(generator),
            max_image_side: visual_tags::DEFAULT_MAX_SIDE,
        }
    }

    pub fn with_max_image_side(mut self, side: u32) -> Self {
        self.max_image_side = side;
        self
    }

    /// Wire the remote model clients described by `settings`. Loads the
    /// category tables and creates the output directory. Must run inside a
    /// Tokio runtime.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let categories = CategorySet::load_dir(&settings.categories_dir)
            .with_context(|| format!("loading categories from {}", settings.categories_dir.display()))?;
        std::fs::create_dir_all(&settings.output_dir)
            .with_context(|| format!("creating {}", settings.output_dir.display()))?;

        let t = &settings.translation;
        let translator = Translator::new(
            Arc::new(WhatlangDetector),
            Arc::new(RemoteTranslator::new(&t.endpoint, t.max_length, t.timeout())?),
        );

        let e = &settings.embedding;
        let embedder = Arc::new(RemoteEmbedder::new(&e.endpoint, e.max_length, e.timeout())?);
        let recommender = Recommender::new(embedder.clone(), embedder, categories, settings.cache_category_embeddings);

        let g = &settings.generation;
        let generator = MusicGenerator::new(
            Arc::new(RemoteMusicModel::new(&g.endpoint, &g.model, g.timeout())?),
            settings.decoding.clone(),
            settings.loudness.clone(),
            OutputLayout::new(&settings.output_dir, settings.output_naming),
        );

        tracing::info!(
            translation = %t.endpoint,
            embedding = %e.endpoint,
            generation = %g.endpoint,
            output_dir = %settings.output_dir.display(),
            "pipeline ready"
        );
        Ok(Self::new(translator, recommender, generator).with_max_image_side(settings.max_image_side))
    }

    pub fn recommender(&self) -> &Recommender { &self.recommender }
    pub fn generator(&self) -> &MusicGenerator { &self.generator }

    /// Detect language, translate if needed, generate.
    pub async fn text_to_music(&self, text: &str) -> Result<Generated, PipelineError> {
        if text.trim().is_empty() {
            return Err(PipelineError::Invalid("text must not be empty".to_string()));
        }
        tracing::info!(text, "music generation request");

        let translator = self.translator.clone();
        let input = text.to_string();
        let translation = spawn_blocking(move || translator.to_english(&input)).await??;

        let file_paths = self.generate(translation.text.clone()).await?;
        Ok(Generated {
            prompt: translation.text,
            file_paths,
            source_language: translation.source_language,
            details: None,
        })
    }

    /// Decode and tag the image, then generate from `"<genre>, <theme>, <mood>"`.
    pub async fn image_to_music(&self, bytes: Vec<u8>) -> Result<Generated, PipelineError> {
        let details = self.describe_image(bytes).await?;
        let prompt = details.prompt();
        tracing::info!(prompt = %prompt, "prompt composed from image");

        let file_paths = self.generate(prompt.clone()).await?;
        Ok(Generated { prompt, file_paths, source_language: None, details: Some(details) })
    }

    /// Tag an image without generating anything.
    pub async fn describe_image(&self, bytes: Vec<u8>) -> Result<MusicDetails, PipelineError> {
        let max_side = self.max_image_side;
        let image = spawn_blocking(move || decode_image(&bytes, max_side)).await??;

        let recommender = self.recommender.clone();
        Ok(spawn_blocking(move || recommender.recommend(&image)).await??)
    }

    async fn generate(&self, prompt: String) -> Result<Vec<PathBuf>, PipelineError> {
        let generator = self.generator.clone();
        Ok(spawn_blocking(move || generator.generate(&[prompt])).await??)
    }
}
