//! Image → (genre, theme, mood): decode the upload, embed it with a
//! vision-language encoder and pick the closest category description in
//! each table.

pub mod embed;
pub mod matcher;
pub mod prepare;
pub mod recommend;

pub use embed::{ImageEmbedder, TextEmbedder};
pub use matcher::{AttributeMatcher, CategoryIndex, MatchError};
pub use prepare::{decode_image, encode_png, ImageError, DEFAULT_MAX_SIDE};
pub use recommend::Recommender;
