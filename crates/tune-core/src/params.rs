use serde::{Deserialize, Serialize};

/// Sampling knobs handed to the music model. Process-wide, never per request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodingParams {
    /// Clip length in seconds.
    pub duration: u32,
    pub top_k: u32,
    /// 0.0 disables nucleus sampling.
    pub top_p: f32,
    pub temperature: f32,
    /// Classifier-free guidance coefficient.
    pub cfg_coef: f32,
}

impl Default for DecodingParams {
    fn default() -> Self {
        Self { duration: 15, top_k: 250, top_p: 0.0, temperature: 1.0, cfg_coef: 3.0 }
    }
}

/// Loudness normalisation applied before clips hit the disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoudnessParams {
    /// Target is `-headroom_db` LUFS.
    pub headroom_db: f32,
    /// Soft-limit with tanh after the gain stage.
    pub compressor: bool,
    /// Clips with RMS below this are written untouched.
    pub energy_floor: f32,
}

impl Default for LoudnessParams {
    fn default() -> Self {
        Self { headroom_db: 16.0, compressor: true, energy_floor: 2e-3 }
    }
}
