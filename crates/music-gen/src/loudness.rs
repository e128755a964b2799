//! Integrated loudness (ITU-R BS.1770) and loudness normalisation.
//!
//! K-weighting is a +4 dB high shelf around 1.5 kHz followed by a 38 Hz
//! high-pass. Mean-square power is taken over 400 ms blocks with 75 %
//! overlap, gated absolutely at -70 LUFS and relatively at -10 LU.

use std::f64::consts::PI;

use tune_core::{AudioClip, LoudnessParams};

const ABSOLUTE_GATE_LUFS: f64 = -70.0;
const RELATIVE_GATE_LU: f64 = -10.0;
const BLOCK_SECS: f64 = 0.4;
const STEP_SECS: f64 = 0.1;

#[derive(Clone, Copy, Debug)]
struct Biquad { b0: f64, b1: f64, b2: f64, a1: f64, a2: f64 }

impl Biquad {
    fn normalized(b: [f64; 3], a: [f64; 3]) -> Self {
        Self { b0: b[0] / a[0], b1: b[1] / a[0], b2: b[2] / a[0], a1: a[1] / a[0], a2: a[2] / a[0] }
    }

    fn high_shelf(sample_rate: f64, fc: f64, gain_db: f64, q: f64) -> Self {
        let a = 10f64.powf(gain_db / 40.0);
        let w0 = 2.0 * PI * fc / sample_rate;
        let alpha = w0.sin() / (2.0 * q);
        let cos = w0.cos();
        let k = 2.0 * a.sqrt() * alpha;
        Self::normalized(
            [
                a * ((a + 1.0) + (a - 1.0) * cos + k),
                -2.0 * a * ((a - 1.0) + (a + 1.0) * cos),
                a * ((a + 1.0) + (a - 1.0) * cos - k),
            ],
            [
                (a + 1.0) - (a - 1.0) * cos + k,
                2.0 * ((a - 1.0) - (a + 1.0) * cos),
                (a + 1.0) - (a - 1.0) * cos - k,
            ],
        )
    }

    fn high_pass(sample_rate: f64, fc: f64, q: f64) -> Self {
        let w0 = 2.0 * PI * fc / sample_rate;
        let alpha = w0.sin() / (2.0 * q);
        let cos = w0.cos();
        Self::normalized(
            [(1.0 + cos) / 2.0, -(1.0 + cos), (1.0 + cos) / 2.0],
            [1.0 + alpha, -2.0 * cos, 1.0 - alpha],
        )
    }

    /// Direct form I, in place.
    fn run(&self, x: &mut [f64]) {
        let (mut x1, mut x2, mut y1, mut y2) = (0.0, 0.0, 0.0, 0.0);
        for s in x.iter_mut() {
            let x0 = *s;
            let y0 = self.b0 * x0 + self.b1 * x1 + self.b2 * x2 - self.a1 * y1 - self.a2 * y2;
            x2 = x1;
            x1 = x0;
            y2 = y1;
            y1 = y0;
            *s = y0;
        }
    }
}

fn channel_weight(channels: usize, c: usize) -> f64 {
    // surround channels of a 5-channel layout
    if channels == 5 && c >= 3 { 1.41 } else { 1.0 }
}

fn lufs(power: f64) -> f64 {
    if power <= 0.0 { f64::NEG_INFINITY } else { -0.691 + 10.0 * power.log10() }
}

/// Integrated loudness in LUFS; `-inf` for silence or an empty clip.
pub fn integrated_loudness(clip: &AudioClip) -> f64 {
    let channels = clip.channels as usize;
    let frames = clip.frames();
    if channels == 0 || frames == 0 || clip.sample_rate == 0 {
        return f64::NEG_INFINITY;
    }
    let sr = clip.sample_rate as f64;
    let shelf = Biquad::high_shelf(sr, 1500.0, 4.0, std::f64::consts::FRAC_1_SQRT_2);
    let hp = Biquad::high_pass(sr, 38.0, 0.5);

    let weighted: Vec<Vec<f64>> = (0..channels)
        .map(|c| {
            let mut x: Vec<f64> = (0..frames).map(|i| clip.samples[i * channels + c] as f64).collect();
            shelf.run(&mut x);
            hp.run(&mut x);
            x
        })
        .collect();

    let block = ((BLOCK_SECS * sr).round() as usize).clamp(1, frames);
    let step = ((STEP_SECS * sr).round() as usize).max(1);
    let mut starts = Vec::new();
    let mut s = 0;
    while s + block <= frames {
        starts.push(s);
        s += step;
    }

    // per-block weighted channel power
    let blocks: Vec<f64> = starts
        .iter()
        .map(|&start| {
            weighted
                .iter()
                .enumerate()
                .map(|(c, x)| {
                    let sum: f64 = x[start..start + block].iter().map(|v| v * v).sum();
                    channel_weight(channels, c) * sum / block as f64
                })
                .sum()
        })
        .collect();

    let mean_power = |gate: f64| -> Option<f64> {
        let passing: Vec<f64> = blocks.iter().copied().filter(|&p| lufs(p) > gate).collect();
        if passing.is_empty() { None } else { Some(passing.iter().sum::<f64>() / passing.len() as f64) }
    };

    let Some(abs_mean) = mean_power(ABSOLUTE_GATE_LUFS) else {
        return f64::NEG_INFINITY;
    };
    let relative_gate = (lufs(abs_mean) + RELATIVE_GATE_LU).max(ABSOLUTE_GATE_LUFS);
    mean_power(relative_gate).map(lufs).unwrap_or(f64::NEG_INFINITY)
}

/// Scale `clip` so its integrated loudness sits at `-headroom_db` LUFS, then
/// optionally soft-limit with tanh and clip to [-1, 1].
///
/// Returns the applied gain in dB, or `None` when the clip was left alone
/// (energy below the floor, or no measurable loudness).
pub fn normalize_loudness(clip: &mut AudioClip, params: &LoudnessParams) -> Option<f64> {
    let energy = clip.rms();
    if energy < params.energy_floor {
        tracing::warn!(energy, floor = params.energy_floor, "clip too quiet for loudness normalisation");
        return None;
    }
    let measured = integrated_loudness(clip);
    if !measured.is_finite() {
        return None;
    }
    let delta_db = -(params.headroom_db as f64) - measured;
    let gain = 10f64.powf(delta_db / 20.0) as f32;
    for s in clip.samples.iter_mut() {
        let mut v = *s * gain;
        if params.compressor {
            v = v.tanh();
        }
        *s = v.clamp(-1.0, 1.0);
    }
    tracing::debug!(measured, delta_db, "loudness normalised");
    Some(delta_db)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, amp: f32, secs: f32, sr: u32) -> AudioClip {
        let n = (secs * sr as f32) as usize;
        let samples = (0..n)
            .map(|i| amp * (2.0 * std::f32::consts::PI * freq * i as f32 / sr as f32).sin())
            .collect();
        AudioClip::mono(sr, samples)
    }

    #[test]
    fn full_scale_997hz_reads_about_minus_three() {
        let l = integrated_loudness(&sine(997.0, 1.0, 3.0, 48_000));
        assert!((l + 3.01).abs() < 0.2, "got {l}");
    }

    #[test]
    fn halving_amplitude_drops_six_db() {
        let a = integrated_loudness(&sine(440.0, 0.8, 2.0, 32_000));
        let b = integrated_loudness(&sine(440.0, 0.4, 2.0, 32_000));
        assert!(((a - b) - 6.02).abs() < 0.05, "got {a} vs {b}");
    }

    #[test]
    fn silence_has_no_loudness() {
        let clip = AudioClip::mono(32_000, vec![0.0; 32_000]);
        assert_eq!(integrated_loudness(&clip), f64::NEG_INFINITY);
    }

    #[test]
    fn short_clip_is_measured_as_one_block() {
        assert!(integrated_loudness(&sine(440.0, 0.5, 0.1, 32_000)).is_finite());
    }

    #[test]
    fn normalises_to_headroom_without_compressor() {
        let mut clip = sine(440.0, 0.05, 2.0, 32_000);
        let params = LoudnessParams { headroom_db: 16.0, compressor: false, energy_floor: 2e-3 };
        assert!(normalize_loudness(&mut clip, &params).is_some());
        let l = integrated_loudness(&clip);
        assert!((l + 16.0).abs() < 0.05, "got {l}");
    }

    #[test]
    fn compressor_keeps_samples_inside_unit_range() {
        let mut clip = sine(220.0, 0.9, 1.0, 32_000);
        let params = LoudnessParams { headroom_db: -20.0, compressor: true, energy_floor: 2e-3 };
        normalize_loudness(&mut clip, &params).unwrap();
        let peak = clip.samples.iter().fold(0f32, |m, s| m.max(s.abs()));
        assert!(peak <= 1.0 && peak > 0.9, "peak {peak}");
    }

    #[test]
    fn quiet_clip_is_left_alone() {
        let mut clip = sine(440.0, 1e-4, 1.0, 32_000);
        let before = clip.clone();
        assert_eq!(normalize_loudness(&mut clip, &LoudnessParams::default()), None);
        assert_eq!(clip, before);
    }
}
