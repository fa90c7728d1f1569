//! Phrase capture from a stream of 16-bit mono PCM frames.
//!
//! The listener waits for the signal energy to rise above a threshold,
//! records until a pause of sufficient length (or the phrase limit), and
//! gives up when no speech starts within the timeout. All durations are
//! measured in audio time, so clips and live streams behave the same.

use std::io::Cursor;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::VoiceError;

/// Samples per frame handed out by the bundled sources.
pub const FRAME_SAMPLES: usize = 1024;

/// A pull-based source of mono 16-bit PCM frames.
pub trait AudioSource: Send {
    fn sample_rate(&self) -> u32;

    /// Next frame, or `None` once the stream is exhausted.
    fn next_frame(&mut self) -> Option<Vec<i16>>;
}

/// In-memory PCM samples served in fixed-size frames.
#[derive(Debug, Clone)]
pub struct PcmSource {
    samples: Vec<i16>,
    sample_rate: u32,
    pos: usize,
}

impl PcmSource {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            pos: 0,
        }
    }
}

impl AudioSource for PcmSource {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn next_frame(&mut self) -> Option<Vec<i16>> {
        if self.pos >= self.samples.len() {
            return None;
        }
        let end = (self.pos + FRAME_SAMPLES).min(self.samples.len());
        let frame = self.samples[self.pos..end].to_vec();
        self.pos = end;
        Some(frame)
    }
}

/// A WAV clip recorded in the browser, decoded and down-mixed to mono.
#[derive(Debug, Clone)]
pub struct WavClipSource {
    inner: PcmSource,
}

impl WavClipSource {
    /// Decodes a complete WAV file.
    ///
    /// # Errors
    /// [`VoiceError::Wav`] for malformed files, [`VoiceError::InvalidAudio`]
    /// for unsupported sample formats or empty clips.
    pub fn from_wav_bytes(bytes: &[u8]) -> Result<Self, VoiceError> {
        let mut reader = hound::WavReader::new(Cursor::new(bytes))?;
        let spec = reader.spec();
        let channels = usize::from(spec.channels.max(1));

        let interleaved: Vec<i32> = match (spec.sample_format, spec.bits_per_sample) {
            (hound::SampleFormat::Int, 8..=16) => {
                let shift = 16 - u32::from(spec.bits_per_sample);
                reader
                    .samples::<i16>()
                    .map(|s| s.map(|v| i32::from(v) << shift))
                    .collect::<Result<_, _>>()?
            }
            (hound::SampleFormat::Int, 17..=32) => {
                let shift = u32::from(spec.bits_per_sample) - 16;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v >> shift))
                    .collect::<Result<_, _>>()?
            }
            (hound::SampleFormat::Float, 32) => reader
                .samples::<f32>()
                .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i32))
                .collect::<Result<_, _>>()?,
            (fmt, bits) => {
                return Err(VoiceError::InvalidAudio(format!(
                    "unsupported sample format {fmt:?}/{bits} bits"
                )));
            }
        };

        let mono: Vec<i16> = interleaved
            .chunks(channels)
            .map(|c| {
                let sum: i64 = c.iter().map(|&v| i64::from(v)).sum();
                (sum / c.len() as i64).clamp(i64::from(i16::MIN), i64::from(i16::MAX)) as i16
            })
            .collect();

        if mono.is_empty() {
            return Err(VoiceError::InvalidAudio("clip contains no samples".into()));
        }

        debug!(
            sample_rate = spec.sample_rate,
            channels,
            samples = mono.len(),
            "wav clip decoded"
        );
        Ok(Self {
            inner: PcmSource::new(mono, spec.sample_rate),
        })
    }
}

impl AudioSource for WavClipSource {
    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }

    fn next_frame(&mut self) -> Option<Vec<i16>> {
        self.inner.next_frame()
    }
}

/// Listening knobs.
#[derive(Debug, Clone, PartialEq)]
pub struct ListenerConfig {
    /// Maximum audio time to wait for speech to start.
    pub timeout_secs: f32,
    /// Silence that ends a phrase.
    pub pause_secs: f32,
    /// RMS level (16-bit scale) that counts as speech.
    pub energy_threshold: f32,
    /// Optional cap on phrase length.
    pub phrase_limit_secs: Option<f32>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5.0,
            pause_secs: 0.8,
            energy_threshold: 300.0,
            phrase_limit_secs: None,
        }
    }
}

impl ListenerConfig {
    /// Reads `VOICE_LISTEN_TIMEOUT_SECS`, `VOICE_PAUSE_SECS`,
    /// `VOICE_ENERGY_THRESHOLD` and `VOICE_PHRASE_LIMIT_SECS`.
    pub fn from_env() -> Result<Self, VoiceError> {
        let d = Self::default();
        Ok(Self {
            timeout_secs: env_f32("VOICE_LISTEN_TIMEOUT_SECS")?.unwrap_or(d.timeout_secs),
            pause_secs: env_f32("VOICE_PAUSE_SECS")?.unwrap_or(d.pause_secs),
            energy_threshold: env_f32("VOICE_ENERGY_THRESHOLD")?.unwrap_or(d.energy_threshold),
            phrase_limit_secs: env_f32("VOICE_PHRASE_LIMIT_SECS")?,
        })
    }
}

fn env_f32(key: &str) -> Result<Option<f32>, VoiceError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<f32>()
            .ok()
            .filter(|x| x.is_finite() && *x >= 0.0)
            .map(Some)
            .ok_or_else(|| VoiceError::Config(format!("{key} must be a non-negative number, got '{v}'"))),
        _ => Ok(None),
    }
}

/// A captured utterance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Phrase {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

impl Phrase {
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate.max(1) as f32
    }
}

/// Why no phrase was captured.
#[derive(Debug, Clone, PartialEq)]
pub enum ListenOutcome {
    /// Speech never started within the timeout.
    Timeout { waited_secs: f32 },
    /// The source had no audio at all.
    NoAudio,
}

/// Root-mean-square level of a frame.
pub fn rms(frame: &[i16]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }
    let sum: f64 = frame.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
    (sum / frame.len() as f64).sqrt() as f32
}

/// Waits for speech on `source` and returns the phrase once a pause ends it.
pub fn listen(source: &mut dyn AudioSource, cfg: &ListenerConfig) -> Result<Phrase, ListenOutcome> {
    let rate = source.sample_rate().max(1);
    let secs = |n: usize| n as f32 / rate as f32;

    // 1) Wait for onset.
    let mut waited = 0usize;
    let first = loop {
        let Some(frame) = source.next_frame() else {
            return Err(if waited == 0 {
                ListenOutcome::NoAudio
            } else {
                ListenOutcome::Timeout {
                    waited_secs: secs(waited),
                }
            });
        };
        if rms(&frame) > cfg.energy_threshold {
            break frame;
        }
        waited += frame.len();
        if secs(waited) >= cfg.timeout_secs {
            info!(waited_secs = secs(waited), "no speech before timeout");
            return Err(ListenOutcome::Timeout {
                waited_secs: secs(waited),
            });
        }
    };

    // 2) Record until pause or limit.
    let mut samples = first;
    let mut silent = 0usize;
    while let Some(frame) = source.next_frame() {
        if rms(&frame) > cfg.energy_threshold {
            silent = 0;
        } else {
            silent += frame.len();
        }
        samples.extend_from_slice(&frame);

        if secs(silent) >= cfg.pause_secs {
            break;
        }
        if cfg
            .phrase_limit_secs
            .is_some_and(|limit| secs(samples.len()) >= limit)
        {
            break;
        }
    }

    let phrase = Phrase {
        samples,
        sample_rate: rate,
    };
    debug!(
        waited_secs = secs(waited),
        phrase_secs = phrase.duration_secs(),
        "phrase captured"
    );
    Ok(phrase)
}

/// Encodes a phrase as a 16-bit mono WAV file.
pub fn encode_wav(phrase: &Phrase) -> Result<Vec<u8>, VoiceError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: phrase.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut buf = Vec::new();
    {
        let mut writer = hound::WavWriter::new(Cursor::new(&mut buf), spec)?;
        for &s in &phrase.samples {
            writer.write_sample(s)?;
        }
        writer.finalize()?;
    }
    Ok(buf)
}
