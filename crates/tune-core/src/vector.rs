use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lower bound on the magnitude product, so zero vectors score 0.0 instead of NaN.
const NORM_EPS: f32 = 1e-8;

#[derive(Debug, Error, PartialEq)]
pub enum VectorError {
    #[error("feature vector length mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
}

/// Fixed-length embedding produced by an image or text encoder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    pub fn new(values: Vec<f32>) -> Self { Self(values) }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn as_slice(&self) -> &[f32] { &self.0 }
    pub fn into_inner(self) -> Vec<f32> { self.0 }

    pub fn cosine_similarity(&self, other: &FeatureVector) -> Result<f32, VectorError> {
        cosine_similarity(&self.0, &other.0)
    }
}

impl From<Vec<f32>> for FeatureVector {
    fn from(values: Vec<f32>) -> Self { Self(values) }
}

/// dot(a, b) / max(|a|·|b|, eps); accumulates in f64.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, VectorError> {
    if a.len() != b.len() {
        return Err(VectorError::DimensionMismatch { left: a.len(), right: b.len() });
    }
    let (mut dot, mut na, mut nb) = (0f64, 0f64, 0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    let denom = (na.sqrt() * nb.sqrt()).max(NORM_EPS as f64);
    Ok((dot / denom) as f32)
}
