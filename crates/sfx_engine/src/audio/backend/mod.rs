//! Audio backend implementations
//!
//! Platform-independent abstraction over audio playback libraries. A backend
//! owns a set of *sources*: units that play one clip at a time with their own
//! pitch, volume and loop settings.

pub mod headless;
#[cfg(feature = "rodio")]
pub mod rodio_backend;

use crate::audio::{AudioClip, AudioError};
use serde::{Deserialize, Serialize};

slotmap::new_key_type! {
    /// Generational handle to a backend source
    pub struct SourceHandle;
}

/// Settings pushed to a source when it starts playing
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    /// Clip to play
    pub clip: AudioClip,
    /// Playback rate multiplier (1.0 = original pitch)
    pub pitch: f32,
    /// Volume (0.0 = silent, 1.0 = full volume)
    pub volume: f32,
    /// Restart the clip when it ends
    pub looping: bool,
}

/// Audio backend trait for platform abstraction
///
/// Not `Send + Sync`: every call happens on the thread that owns the engine.
pub trait AudioBackend {
    /// Initialize the audio backend
    fn initialize(&mut self, config: &AudioBackendConfig) -> Result<(), AudioError>;

    /// Shutdown the audio backend, releasing every source
    fn shutdown(&mut self);

    /// Check if backend is initialized
    fn is_initialized(&self) -> bool;

    /// Update the backend (reap finished playback, etc.)
    fn update(&mut self);

    /// Allocate a new idle source
    fn create_source(&mut self) -> Result<SourceHandle, AudioError>;

    /// Release a source, stopping anything it plays
    fn destroy_source(&mut self, handle: SourceHandle) -> Result<(), AudioError>;

    /// Configure a source and start playing immediately
    ///
    /// Whatever the source was playing before is cut off.
    fn play(&mut self, handle: SourceHandle, emission: &Emission) -> Result<(), AudioError>;

    /// Stop a source without releasing it
    fn stop(&mut self, handle: SourceHandle) -> Result<(), AudioError>;

    /// Check if a source is currently producing sound
    fn is_playing(&self, handle: SourceHandle) -> bool;

    /// Number of live sources
    fn source_count(&self) -> usize;
}

impl<B: AudioBackend + ?Sized> AudioBackend for Box<B> {
    fn initialize(&mut self, config: &AudioBackendConfig) -> Result<(), AudioError> {
        (**self).initialize(config)
    }

    fn shutdown(&mut self) {
        (**self).shutdown();
    }

    fn is_initialized(&self) -> bool {
        (**self).is_initialized()
    }

    fn update(&mut self) {
        (**self).update();
    }

    fn create_source(&mut self) -> Result<SourceHandle, AudioError> {
        (**self).create_source()
    }

    fn destroy_source(&mut self, handle: SourceHandle) -> Result<(), AudioError> {
        (**self).destroy_source(handle)
    }

    fn play(&mut self, handle: SourceHandle, emission: &Emission) -> Result<(), AudioError> {
        (**self).play(handle, emission)
    }

    fn stop(&mut self, handle: SourceHandle) -> Result<(), AudioError> {
        (**self).stop(handle)
    }

    fn is_playing(&self, handle: SourceHandle) -> bool {
        (**self).is_playing(handle)
    }

    fn source_count(&self) -> usize {
        (**self).source_count()
    }
}

/// Which backend the engine should open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Real output device through rodio
    Rodio,
    /// No output device; tracks source state only
    Headless,
}

impl Default for BackendKind {
    fn default() -> Self {
        if cfg!(feature = "rodio") {
            Self::Rodio
        } else {
            Self::Headless
        }
    }
}

/// Configuration for audio backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioBackendConfig {
    /// Sample rate (e.g., 44100, 48000)
    pub sample_rate: u32,
    /// Number of output channels (1=mono, 2=stereo)
    pub channels: u16,
}

impl Default for AudioBackendConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            channels: 2,
        }
    }
}

/// Create and initialize a backend of the requested kind
///
/// A rodio backend that cannot open an output device falls back to the
/// headless backend so the game keeps running without sound.
pub fn create_backend(
    kind: BackendKind,
    config: &AudioBackendConfig,
) -> Result<Box<dyn AudioBackend>, AudioError> {
    match kind {
        #[cfg(feature = "rodio")]
        BackendKind::Rodio => {
            let mut backend: Box<dyn AudioBackend> = Box::new(rodio_backend::RodioBackend::new());
            match backend.initialize(config) {
                Ok(()) => Ok(backend),
                Err(e) => {
                    log::warn!("{e}; falling back to headless audio");
                    headless_backend(config)
                }
            }
        }
        #[cfg(not(feature = "rodio"))]
        BackendKind::Rodio => {
            log::warn!("Built without the rodio feature; using headless audio");
            headless_backend(config)
        }
        BackendKind::Headless => headless_backend(config),
    }
}

fn headless_backend(config: &AudioBackendConfig) -> Result<Box<dyn AudioBackend>, AudioError> {
    let mut backend: Box<dyn AudioBackend> = Box::new(headless::HeadlessBackend::new());
    backend.initialize(config)?;
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_backend_creation() {
        let backend = create_backend(BackendKind::Headless, &AudioBackendConfig::default()).unwrap();
        assert!(backend.is_initialized());
        assert_eq!(backend.source_count(), 0);
    }

    #[test]
    fn test_rodio_request_always_yields_a_backend() {
        // Falls back to headless when no device is present
        let backend = create_backend(BackendKind::Rodio, &AudioBackendConfig::default()).unwrap();
        assert!(backend.is_initialized());
    }

    #[test]
    fn test_backend_kind_parsing() {
        #[derive(Deserialize)]
        struct Wrapper {
            kind: BackendKind,
        }

        let parsed: Wrapper = toml::from_str("kind = \"headless\"").unwrap();
        assert_eq!(parsed.kind, BackendKind::Headless);
    }

    #[test]
    fn test_backend_config_fields() {
        let config: AudioBackendConfig = toml::from_str("sample_rate = 48000").unwrap();
        assert_eq!(
            config,
            AudioBackendConfig {
                sample_rate: 48000,
                channels: 2,
            }
        );
        assert!(toml::from_str::<AudioBackendConfig>("buffer_size = 4096").is_ok());
    }
}
