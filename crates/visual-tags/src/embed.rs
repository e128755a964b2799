use image::RgbImage;
use tune_core::FeatureVector;

/// Image half of a vision-language encoder.
pub trait ImageEmbedder: Send + Sync {
    fn embed_image(&self, image: &RgbImage) -> anyhow::Result<FeatureVector>;
}

/// Text half of the same encoder; vectors must share the image embedding space.
pub trait TextEmbedder: Send + Sync {
    fn embed_text(&self, text: &str) -> anyhow::Result<FeatureVector>;
}
