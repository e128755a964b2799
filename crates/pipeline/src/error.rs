use music_gen::GenerateError;
use text_lang::TranslateError;
use thiserror::Error;
use visual_tags::{ImageError, MatchError};

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Request content failed validation.
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error(transparent)]
    Translate(#[from] TranslateError),
    #[error(transparent)]
    Match(#[from] MatchError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error("worker task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Who is at fault for a failed request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// Missing or empty input.
    Validation,
    /// Input present but unusable, e.g. an image that does not decode.
    BadInput,
    /// Model, filesystem or worker failure.
    Internal,
}

impl PipelineError {
    pub fn class(&self) -> ErrorClass {
        match self {
            PipelineError::Invalid(_) | PipelineError::Image(ImageError::Empty) => ErrorClass::Validation,
            PipelineError::Image(_) => ErrorClass::BadInput,
            _ => ErrorClass::Internal,
        }
    }
}
