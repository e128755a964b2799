//! Best-match lookup of a feature vector against a category table.
//!
//! Every category's keyword list is joined into one description and embedded
//! with the text encoder; the category whose description is most
//! cosine-similar to the query wins. Ties keep the earliest category in
//! table order. Description embeddings are cached per table once computed
//! successfully, unless caching is switched off.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use thiserror::Error;
use tune_core::{AttributeKind, CategoryMapping, FeatureVector, VectorError};

use crate::embed::TextEmbedder;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("embedding the image failed: {0:#}")]
    ImageEmbedding(anyhow::Error),
    #[error("embedding {kind} category \"{category}\" failed: {source:#}")]
    TextEmbedding { kind: AttributeKind, category: String, source: anyhow::Error },
    #[error(transparent)]
    Vector(#[from] VectorError),
    #[error("{0} mapping has no categories")]
    EmptyMapping(AttributeKind),
}

/// A category table plus its lazily computed description embeddings.
#[derive(Debug)]
pub struct CategoryIndex {
    mapping: CategoryMapping,
    embeddings: OnceCell<Vec<FeatureVector>>,
}

impl CategoryIndex {
    pub fn new(mapping: CategoryMapping) -> Self {
        Self { mapping, embeddings: OnceCell::new() }
    }

    pub fn mapping(&self) -> &CategoryMapping { &self.mapping }

    pub fn is_warm(&self) -> bool { self.embeddings.get().is_some() }
}

#[derive(Clone)]
pub struct AttributeMatcher {
    embedder: Arc<dyn TextEmbedder>,
    cache: bool,
}

impl AttributeMatcher {
    pub fn new(embedder: Arc<dyn TextEmbedder>, cache: bool) -> Self {
        Self { embedder, cache }
    }

    /// Name of the category closest to `features`. Blocking.
    pub fn best_match<'a>(&self, features: &FeatureVector, index: &'a CategoryIndex) -> Result<&'a str, MatchError> {
        let mapping = &index.mapping;
        if self.cache {
            let embeddings = index.embeddings.get_or_try_init(|| self.embed_all(mapping))?;
            pick(features, mapping, embeddings)
        } else {
            let embeddings = self.embed_all(mapping)?;
            pick(features, mapping, &embeddings)
        }
    }

    fn embed_all(&self, mapping: &CategoryMapping) -> Result<Vec<FeatureVector>, MatchError> {
        tracing::debug!(kind = %mapping.kind(), n = mapping.len(), "embedding category descriptions");
        mapping
            .iter()
            .map(|c| {
                self.embedder.embed_text(&c.description()).map_err(|source| MatchError::TextEmbedding {
                    kind: mapping.kind(),
                    category: c.name.clone(),
                    source,
                })
            })
            .collect()
    }
}

fn pick<'a>(
    features: &FeatureVector,
    mapping: &'a CategoryMapping,
    embeddings: &[FeatureVector],
) -> Result<&'a str, MatchError> {
    let mut best: Option<(&'a str, f32)> = None;
    for (category, embedding) in mapping.iter().zip(embeddings) {
        let score = features.cosine_similarity(embedding)?;
        tracing::trace!(kind = %mapping.kind(), category = %category.name, score);
        let better = match best {
            None => true,
            Some((_, top)) => score > top || (top.is_nan() && !score.is_nan()),
        };
        if better {
            best = Some((category.name.as_str(), score));
        }
    }
    best.map(|(name, _)| name).ok_or(MatchError::EmptyMapping(mapping.kind()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tune_core::Category;

    /// Embeds known descriptions to fixed vectors, counting calls.
    struct Table { vectors: HashMap<String, Vec<f32>>, calls: AtomicUsize }

    impl Table {
        fn new(entries: &[(&str, [f32; 3])]) -> Self {
            let vectors = entries.iter().map(|(k, v)| (k.to_string(), v.to_vec())).collect();
            Self { vectors, calls: AtomicUsize::new(0) }
        }
    }

    impl TextEmbedder for Table {
        fn embed_text(&self, text: &str) -> anyhow::Result<FeatureVector> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.vectors
                .get(text)
                .map(|v| FeatureVector::new(v.clone()))
                .ok_or_else(|| anyhow::anyhow!("no vector for {text}"))
        }
    }

    fn mapping() -> CategoryMapping {
        CategoryMapping::new(
            AttributeKind::Genre,
            vec![
                Category::new("Ambient", &["calm", "airy"]),
                Category::new("Metal", &["loud", "heavy"]),
                Category::new("Jazz", &["swing"]),
            ],
        )
        .unwrap()
    }

    fn table() -> Arc<Table> {
        Arc::new(Table::new(&[
            ("calm airy", [1.0, 0.0, 0.0]),
            ("loud heavy", [0.0, 1.0, 0.0]),
            ("swing", [0.0, 0.0, 1.0]),
        ]))
    }

    #[test]
    fn picks_the_most_similar_description() {
        let index = CategoryIndex::new(mapping());
        let m = AttributeMatcher::new(table(), true);
        assert_eq!(m.best_match(&FeatureVector::new(vec![0.1, 0.9, 0.2]), &index).unwrap(), "Metal");
        assert_eq!(m.best_match(&FeatureVector::new(vec![0.9, 0.1, 0.0]), &index).unwrap(), "Ambient");
    }

    #[test]
    fn always_returns_a_key_of_the_mapping() {
        let index = CategoryIndex::new(mapping());
        let m = AttributeMatcher::new(table(), true);
        for v in [[0.0, 0.0, 0.0], [-1.0, -1.0, -1.0], [3.0, -2.0, 0.5], [0.0, 0.0, -7.0]] {
            let name = m.best_match(&FeatureVector::new(v.to_vec()), &index).unwrap();
            assert!(index.mapping().get(name).is_some());
        }
    }

    #[test]
    fn ties_go_to_the_first_category() {
        let index = CategoryIndex::new(mapping());
        let m = AttributeMatcher::new(table(), false);
        // equidistant from Ambient and Metal
        assert_eq!(m.best_match(&FeatureVector::new(vec![1.0, 1.0, 0.0]), &index).unwrap(), "Ambient");
        // zero query scores 0.0 everywhere
        assert_eq!(m.best_match(&FeatureVector::new(vec![0.0, 0.0, 0.0]), &index).unwrap(), "Ambient");
    }

    #[test]
    fn cache_embeds_each_category_once() {
        let embedder = table();
        let index = CategoryIndex::new(mapping());
        let m = AttributeMatcher::new(embedder.clone(), true);
        let q = FeatureVector::new(vec![0.0, 0.0, 1.0]);
        for _ in 0..4 {
            assert_eq!(m.best_match(&q, &index).unwrap(), "Jazz");
        }
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 3);
        assert!(index.is_warm());
    }

    #[test]
    fn uncached_matcher_embeds_on_every_call() {
        let embedder = table();
        let index = CategoryIndex::new(mapping());
        let m = AttributeMatcher::new(embedder.clone(), false);
        let q = FeatureVector::new(vec![0.0, 0.0, 1.0]);
        m.best_match(&q, &index).unwrap();
        m.best_match(&q, &index).unwrap();
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 6);
        assert!(!index.is_warm());
    }

    #[test]
    fn embedding_failure_is_not_cached() {
        let embedder = Arc::new(Table::new(&[("calm airy", [1.0, 0.0, 0.0]), ("swing", [0.0, 0.0, 1.0])]));
        let index = CategoryIndex::new(mapping());
        let m = AttributeMatcher::new(embedder, true);
        let err = m.best_match(&FeatureVector::new(vec![1.0, 0.0, 0.0]), &index).unwrap_err();
        assert!(matches!(err, MatchError::TextEmbedding { ref category, .. } if category == "Metal"));
        assert!(!index.is_warm());
    }

    #[test]
    fn dimension_mismatch_propagates() {
        let index = CategoryIndex::new(mapping());
        let m = AttributeMatcher::new(table(), true);
        let err = m.best_match(&FeatureVector::new(vec![1.0, 0.0]), &index).unwrap_err();
        assert!(matches!(err, MatchError::Vector(VectorError::DimensionMismatch { left: 2, right: 3 })));
    }
}
