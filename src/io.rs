use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::Read;
use std::path::Path;

/// Basic audio stream parameters.
#[derive(Debug, Clone, Copy)]
pub struct AudioSpec {
    pub sample_rate: u32,
    pub channels: u16,
}

/// Audio I/O errors.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("hound error: {0}")]
    Hound(#[from] hound::Error),
    #[error("unsupported number of channels")]
    UnsupportedChannels,
}

/// Load a WAV file as a mono `f64` signal.
///
/// Multi-channel input is downmixed by averaging the channels; integer
/// PCM is scaled to `[-1.0, 1.0]`.
///
/// # Arguments
/// * `path` - Path to the WAV file
///
/// # Returns
/// `Result<(Vec<f64>, AudioSpec)>` containing the signal and its spec
///
/// # Errors
/// Returns `crate::Error::Audio` if the file cannot be read or is invalid
pub fn load_wav<P: AsRef<Path>>(path: P) -> crate::Result<(Vec<f64>, AudioSpec)> {
    let reader = WavReader::open(path).map_err(AudioError::Hound)?;
    Ok(decode(reader)?)
}

/// Read a WAV stream (e.g. stdin) as a mono `f64` signal.
///
/// Same decoding rules as [`load_wav`], but over any `Read`.
pub fn read_wav<R: Read>(input: R) -> crate::Result<(Vec<f64>, AudioSpec)> {
    let reader = WavReader::new(input).map_err(AudioError::Hound)?;
    Ok(decode(reader)?)
}

fn decode<R: Read>(mut reader: WavReader<R>) -> Result<(Vec<f64>, AudioSpec), AudioError> {
    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(AudioError::UnsupportedChannels);
    }

    let mut samples: Vec<f64> = Vec::new();
    match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => {
            for s in reader.samples::<f32>() {
                samples.push(s? as f64);
            }
        }
        (SampleFormat::Int, bits) if bits <= 16 => {
            let scale = (1i32 << (bits - 1)) as f64;
            for s in reader.samples::<i16>() {
                samples.push(s? as f64 / scale);
            }
        }
        (SampleFormat::Int, bits) => {
            let scale = (1i64 << (bits - 1)) as f64;
            for s in reader.samples::<i32>() {
                samples.push(s? as f64 / scale);
            }
        }
        _ => {
            for s in reader.samples::<i16>() {
                samples.push(s? as f64 / i16::MAX as f64);
            }
        }
    }

    let frames = samples.len() / channels;
    let signal = if channels == 1 {
        samples
    } else {
        let mut mono = Vec::with_capacity(frames);
        for frame in 0..frames {
            let mut acc = 0.0f64;
            for ch in 0..channels {
                acc += samples[frame * channels + ch];
            }
            mono.push(acc / channels as f64);
        }
        mono
    };

    Ok((
        signal,
        AudioSpec {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
        },
    ))
}

/// Save a mono signal to a 16-bit PCM WAV file.
///
/// Samples are clipped to `[-1.0, 1.0]` before quantization.
///
/// # Errors
/// Returns `crate::Error::Audio` if the file cannot be written
pub fn save_wav<P: AsRef<Path>>(path: P, signal: &[f64], sample_rate: u32) -> crate::Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec).map_err(AudioError::Hound)?;
    for &sample in signal {
        let s = (sample.clamp(-1.0, 1.0) * i16::MAX as f64) as i16;
        writer.write_sample(s).map_err(AudioError::Hound)?;
    }
    writer.finalize().map_err(AudioError::Hound)?;
    Ok(())
}

/// Generate a pure tone.
///
/// # Example
/// ```
/// use sawtooth::io::tone;
///
/// let signal = tone(440.0, 22050, 0.5);
/// assert_eq!(signal.len(), 11025);
/// ```
pub fn tone(frequency: f64, sr: u32, duration: f64) -> Vec<f64> {
    let n_samples = (duration * sr as f64) as usize;
    let angular_freq = 2.0 * std::f64::consts::PI * frequency / sr as f64;
    (0..n_samples)
        .map(|i| (angular_freq * i as f64).sin())
        .collect()
}
