use std::sync::Arc;

use image::RgbImage;
use tune_core::{AttributeKind, CategoryMapping, CategorySet, MusicDetails};

use crate::embed::{ImageEmbedder, TextEmbedder};
use crate::matcher::{AttributeMatcher, CategoryIndex, MatchError};

/// Tags an image with one genre, theme and mood.
pub struct Recommender {
    image_embedder: Arc<dyn ImageEmbedder>,
    matcher: AttributeMatcher,
    genre: CategoryIndex,
    theme: CategoryIndex,
    mood: CategoryIndex,
}

impl Recommender {
    pub fn new(
        image_embedder: Arc<dyn ImageEmbedder>,
        text_embedder: Arc<dyn TextEmbedder>,
        categories: CategorySet,
        cache_descriptions: bool,
    ) -> Self {
        Self {
            image_embedder,
            matcher: AttributeMatcher::new(text_embedder, cache_descriptions),
            genre: CategoryIndex::new(categories.genre),
            theme: CategoryIndex::new(categories.theme),
            mood: CategoryIndex::new(categories.mood),
        }
    }

    pub fn categories(&self, kind: AttributeKind) -> &CategoryMapping {
        self.index(kind).mapping()
    }

    fn index(&self, kind: AttributeKind) -> &CategoryIndex {
        match kind {
            AttributeKind::Genre => &self.genre,
            AttributeKind::Theme => &self.theme,
            AttributeKind::Mood => &self.mood,
        }
    }

    /// Embeds the image once, then matches each table independently. Blocking.
    pub fn recommend(&self, image: &RgbImage) -> Result<MusicDetails, MatchError> {
        let features = self.image_embedder.embed_image(image).map_err(MatchError::ImageEmbedding)?;
        let pick = |kind| self.matcher.best_match(&features, self.index(kind)).map(str::to_string);
        let details = MusicDetails {
            genre: pick(AttributeKind::Genre)?,
            theme: pick(AttributeKind::Theme)?,
            mood: pick(AttributeKind::Mood)?,
        };
        tracing::info!(genre = %details.genre, theme = %details.theme, mood = %details.mood, "image tagged");
        Ok(details)
    }
}
