use std::time::Duration;

use anyhow::{bail, Result};
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use tune_core::FeatureVector;
use visual_tags::{encode_png, ImageEmbedder, TextEmbedder};

use crate::http::Endpoint;

#[derive(Serialize)]
struct ImageRequest { image_b64: String }

#[derive(Serialize)]
struct TextRequest<'a> { text: &'a str, max_length: usize }

#[derive(Deserialize)]
struct EmbeddingReply { embedding: Vec<f32> }

impl EmbeddingReply {
    fn into_vector(self) -> Result<FeatureVector> {
        if self.embedding.is_empty() {
            bail!("embedding server returned an empty vector");
        }
        Ok(FeatureVector::new(self.embedding))
    }
}

/// Vision-language encoder server: `POST /embed/image` and `POST /embed/text`
/// return vectors from the same embedding space.
pub struct RemoteEmbedder { endpoint: Endpoint, max_length: usize }

impl RemoteEmbedder {
    pub fn new(base: &str, max_length: usize, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self { endpoint: Endpoint::new(base, timeout)?, max_length })
    }
}

impl ImageEmbedder for RemoteEmbedder {
    fn embed_image(&self, image: &RgbImage) -> Result<FeatureVector> {
        let req = ImageRequest { image_b64: B64.encode(encode_png(image)?) };
        self.endpoint.post_json::<_, EmbeddingReply>("embed/image", &req)?.into_vector()
    }
}

impl TextEmbedder for RemoteEmbedder {
    fn embed_text(&self, text: &str) -> Result<FeatureVector> {
        let req = TextRequest { text, max_length: self.max_length };
        self.endpoint.post_json::<_, EmbeddingReply>("embed/text", &req)?.into_vector()
    }
}
