use std::io::Cursor;
use std::path::Path;

use anyhow::{bail, Context, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use tune_core::AudioClip;

/// Decode WAV bytes into interleaved f32 in [-1, 1], keeping every channel.
/// Handles 16/24/32-bit PCM and 32-bit float.
pub fn decode_wav(bytes: &[u8]) -> Result<AudioClip> {
    let mut reader = WavReader::new(Cursor::new(bytes)).context("not a valid WAV")?;
    let spec = reader.spec();
    if spec.channels == 0 {
        bail!("WAV has zero channels");
    }

    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / 32768.0))
            .collect::<Result<_, _>>()?,
        (SampleFormat::Int, bits @ (24 | 32)) => {
            let max = (1i64 << (bits - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max))
                .collect::<Result<_, _>>()?
        }
        (SampleFormat::Float, 32) => reader.samples::<f32>().collect::<Result<_, _>>()?,
        (format, bits) => bail!("unsupported WAV sample format: {format:?} {bits}-bit"),
    };

    Ok(AudioClip { sample_rate: spec.sample_rate, channels: spec.channels, samples })
}

/// Encode to 16-bit PCM in memory; samples outside [-1, 1] are clipped.
pub fn encode_wav_i16(clip: &AudioClip) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels: clip.channels,
        sample_rate: clip.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(clip.samples.len() * 2 + 64));
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for &s in &clip.samples {
            let v = (s * i16::MAX as f32).clamp(i16::MIN as f32, i16::MAX as f32) as i16;
            writer.write_sample(v)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

pub fn write_wav(path: &Path, clip: &AudioClip) -> Result<()> {
    let bytes = encode_wav_i16(clip)?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}
