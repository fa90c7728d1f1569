//! Voice edges of the assistant: spoken questions in, spoken answers out.
//!
//! - [`capture`] finds one phrase in a PCM stream by signal energy
//! - [`stt`] sends that phrase to a [`SpeechRecognizer`]
//! - [`tts`] turns answer text into MP3 through a [`SpeechSynthesizer`]
//!
//! Audio comes from the browser as a WAV clip ([`WavClipSource`]); the
//! listener treats it like a live stream, timing out when nobody speaks.

pub mod capture;
pub mod error;
pub mod stt;
pub mod tts;

pub use capture::{AudioSource, ListenerConfig, PcmSource, Phrase, WavClipSource};
pub use error::{RecognitionError, VoiceError};
pub use stt::{HostedRecognizer, RecognizeFuture, SpeechRecognizer, speech_to_text};
pub use tts::{SpeechSynthesizer, SpokenAudio, SynthesizeFuture, text_to_speech};
