use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tune_core::{AudioClip, DecodingParams, LoudnessParams};

use crate::loudness::normalize_loudness;
use crate::output::{clip_file_name, OutputLayout};
use crate::wav::write_wav;

/// Text-to-music model. One clip per prompt, in prompt order.
pub trait MusicModel: Send + Sync {
    fn generate(&self, prompts: &[String], params: &DecodingParams) -> anyhow::Result<Vec<AudioClip>>;
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("no prompts to generate from")]
    NoPrompts,
    #[error("music generation failed: {0:#}")]
    Model(anyhow::Error),
    #[error("model returned {got} clips for {expected} prompts")]
    ClipCount { expected: usize, got: usize },
    #[error("cannot create output directory {path}: {source}")]
    CreateDir { path: PathBuf, source: std::io::Error },
    #[error("cannot write {path}: {source:#}")]
    Write { path: PathBuf, source: anyhow::Error },
}

pub struct MusicGenerator {
    model: Arc<dyn MusicModel>,
    params: DecodingParams,
    loudness: LoudnessParams,
    layout: OutputLayout,
}

impl MusicGenerator {
    pub fn new(model: Arc<dyn MusicModel>, params: DecodingParams, loudness: LoudnessParams, layout: OutputLayout) -> Self {
        Self { model, params, loudness, layout }
    }

    pub fn params(&self) -> &DecodingParams { &self.params }
    pub fn layout(&self) -> &OutputLayout { &self.layout }

    /// Generate one clip per prompt and write each as `output_<i>.wav`.
    /// Returns the written paths in prompt order. Blocking.
    pub fn generate(&self, prompts: &[String]) -> Result<Vec<PathBuf>, GenerateError> {
        if prompts.is_empty() {
            return Err(GenerateError::NoPrompts);
        }
        tracing::info!(n = prompts.len(), duration = self.params.duration, "generating music");
        let clips = self.model.generate(prompts, &self.params).map_err(GenerateError::Model)?;
        if clips.len() != prompts.len() {
            return Err(GenerateError::ClipCount { expected: prompts.len(), got: clips.len() });
        }
        let dir = self.layout.job_dir();
        std::fs::create_dir_all(&dir).map_err(|source| GenerateError::CreateDir { path: dir.clone(), source })?;

        let mut paths = Vec::with_capacity(clips.len());
        for (idx, mut clip) in clips.into_iter().enumerate() {
            normalize_loudness(&mut clip, &self.loudness);
            let path = dir.join(clip_file_name(idx));
            write_wav(&path, &clip).map_err(|source| GenerateError::Write { path: path.clone(), source })?;
            tracing::info!(path = %path.display(), secs = clip.duration_secs(), "wrote clip");
            paths.push(path);
        }
        Ok(paths)
    }
}
