//! Shared data model: feature vectors, category tables, prompt details,
//! generation parameters and in-memory audio.

pub mod audio;
pub mod category;
pub mod details;
pub mod params;
pub mod vector;

pub use audio::AudioClip;
pub use category::{AttributeKind, Category, CategoryError, CategoryMapping, CategorySet};
pub use details::MusicDetails;
pub use params::{DecodingParams, LoudnessParams};
pub use vector::{cosine_similarity, FeatureVector, VectorError};
