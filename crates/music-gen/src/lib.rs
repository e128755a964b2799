//! Music Generator – prompts in, normalised WAV files out.
//!
//! The generative model itself sits behind [`MusicModel`]; this crate owns
//! everything after the samples come back: loudness normalisation, 16-bit
//! PCM encoding and where the files land on disk.

pub mod generator;
pub mod loudness;
pub mod output;
pub mod wav;

pub use generator::{GenerateError, MusicGenerator, MusicModel};
pub use loudness::{integrated_loudness, normalize_loudness};
pub use output::{clip_file_name, OutputLayout, OutputNaming};
pub use wav::{decode_wav, encode_wav_i16, write_wav};
