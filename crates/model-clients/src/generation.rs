use std::time::Duration;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use music_gen::{decode_wav, MusicModel};
use serde::{Deserialize, Serialize};
use tune_core::{AudioClip, DecodingParams};

use crate::http::Endpoint;

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompts: &'a [String],
    params: &'a DecodingParams,
}

#[derive(Deserialize)]
struct GenerateReply {
    /// One base64 WAV per prompt.
    clips: Vec<String>,
}

/// Text-to-music server: `POST /generate`.
pub struct RemoteMusicModel { endpoint: Endpoint, model: String }

impl RemoteMusicModel {
    pub fn new(base: &str, model: &str, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self { endpoint: Endpoint::new(base, timeout)?, model: model.to_string() })
    }
}

impl MusicModel for RemoteMusicModel {
    fn generate(&self, prompts: &[String], params: &DecodingParams) -> Result<Vec<AudioClip>> {
        let req = GenerateRequest { model: &self.model, prompts, params };
        let reply: GenerateReply = self.endpoint.post_json("generate", &req)?;
        reply
            .clips
            .iter()
            .enumerate()
            .map(|(i, b64)| {
                let bytes = B64.decode(b64).with_context(|| format!("clip {i} is not valid base64"))?;
                decode_wav(&bytes).with_context(|| format!("clip {i}"))
            })
            .collect()
    }
}
