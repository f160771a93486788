//! Rodio audio backend implementation
//!
//! Uses the Rodio library for cross-platform audio playback.
//! Rodio is pure Rust and supports WAV, OGG Vorbis, MP3, and FLAC formats.
//!
//! Each source wraps at most one [`Sink`]. Playing on a source that is still
//! busy stops the old sink and starts a fresh one, since a rodio sink cannot
//! be rewound. Pitch maps to sink speed, which shifts pitch and tempo together.
//!
//! # Example
//!
//! ```no_run
//! use sfx_engine::audio::backend::{AudioBackend, AudioBackendConfig, Emission};
//! use sfx_engine::audio::backend::rodio_backend::RodioBackend;
//! use sfx_engine::audio::AudioClip;
//!
//! let mut backend = RodioBackend::new();
//! backend.initialize(&AudioBackendConfig::default()).unwrap();
//!
//! let clip = AudioClip::load("resources/audio/click.wav").unwrap();
//! let source = backend.create_source().unwrap();
//! backend.play(source, &Emission { clip, pitch: 1.2, volume: 0.8, looping: false }).unwrap();
//!
//! backend.update(); // Drops finished sinks
//! backend.shutdown();
//! ```

use super::{AudioBackend, AudioBackendConfig, Emission, SourceHandle};
use crate::audio::AudioError;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use slotmap::SlotMap;
use std::io::Cursor;

/// Rodio-based audio backend
pub struct RodioBackend {
    /// Audio output stream (must be kept alive)
    _output_stream: Option<OutputStream>,
    /// Output stream handle for creating sinks
    stream_handle: Option<OutputStreamHandle>,
    /// Sources and the sink each is currently playing
    sources: SlotMap<SourceHandle, Option<Sink>>,
    /// Initialization state
    initialized: bool,
}

impl RodioBackend {
    /// Create a new Rodio backend
    pub fn new() -> Self {
        Self {
            _output_stream: None,
            stream_handle: None,
            sources: SlotMap::with_key(),
            initialized: false,
        }
    }

    /// Build a sink playing the emission's clip
    fn start_sink(&self, emission: &Emission) -> Result<Sink, AudioError> {
        let stream_handle = self
            .stream_handle
            .as_ref()
            .ok_or(AudioError::BackendNotInitialized)?;

        let sink = Sink::try_new(stream_handle)
            .map_err(|e| AudioError::PlaybackFailed(format!("Failed to create sink: {e}")))?;

        let decoder = Decoder::new(Cursor::new(emission.clip.shared_data())).map_err(|e| {
            AudioError::PlaybackFailed(format!(
                "Failed to decode '{}': {e}",
                emission.clip.name()
            ))
        })?;

        sink.set_speed(emission.pitch);
        sink.set_volume(emission.volume);
        if emission.looping {
            sink.append(decoder.repeat_infinite());
        } else {
            sink.append(decoder);
        }

        Ok(sink)
    }
}

impl AudioBackend for RodioBackend {
    fn initialize(&mut self, config: &AudioBackendConfig) -> Result<(), AudioError> {
        if self.initialized {
            return Ok(());
        }

        // Rodio negotiates the device format itself
        let (stream, stream_handle) = OutputStream::try_default().map_err(|e| {
            AudioError::BackendInitFailed(format!("Failed to create audio output: {e}"))
        })?;

        self._output_stream = Some(stream);
        self.stream_handle = Some(stream_handle);
        self.initialized = true;

        log::info!(
            "Rodio audio backend initialized (requested {} Hz, {} channels)",
            config.sample_rate,
            config.channels
        );
        Ok(())
    }

    fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }

        for (_handle, sink) in self.sources.drain() {
            if let Some(sink) = sink {
                sink.stop();
            }
        }

        // Drop stream handle and output
        self.stream_handle = None;
        self._output_stream = None;
        self.initialized = false;

        log::info!("Rodio audio backend shutdown");
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn update(&mut self) {
        for sink in self.sources.values_mut() {
            if sink.as_ref().is_some_and(Sink::empty) {
                *sink = None;
            }
        }
    }

    fn create_source(&mut self) -> Result<SourceHandle, AudioError> {
        if !self.initialized {
            return Err(AudioError::BackendNotInitialized);
        }
        Ok(self.sources.insert(None))
    }

    fn destroy_source(&mut self, handle: SourceHandle) -> Result<(), AudioError> {
        let sink = self.sources.remove(handle).ok_or(AudioError::InvalidHandle)?;
        if let Some(sink) = sink {
            sink.stop();
        }
        Ok(())
    }

    fn play(&mut self, handle: SourceHandle, emission: &Emission) -> Result<(), AudioError> {
        if !self.sources.contains_key(handle) {
            return Err(AudioError::InvalidHandle);
        }

        let sink = self.start_sink(emission)?;
        if let Some(previous) = self.sources[handle].replace(sink) {
            previous.stop();
        }
        Ok(())
    }

    fn stop(&mut self, handle: SourceHandle) -> Result<(), AudioError> {
        let slot = self.sources.get_mut(handle).ok_or(AudioError::InvalidHandle)?;
        if let Some(sink) = slot.take() {
            sink.stop();
        }
        Ok(())
    }

    fn is_playing(&self, handle: SourceHandle) -> bool {
        self.sources
            .get(handle)
            .and_then(Option::as_ref)
            .is_some_and(|sink| !sink.is_paused() && !sink.empty())
    }

    fn source_count(&self) -> usize {
        self.sources.len()
    }
}

impl Default for RodioBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RodioBackend {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::clip::tests::test_clip;

    #[test]
    fn test_backend_initialization() {
        let mut backend = RodioBackend::new();
        assert!(!backend.is_initialized());

        let config = AudioBackendConfig::default();
        let result = backend.initialize(&config);

        // May fail in CI/test environments without audio device
        if result.is_ok() {
            assert!(backend.is_initialized());
            backend.shutdown();
            assert!(!backend.is_initialized());
        }
    }

    #[test]
    fn test_double_initialization() {
        let mut backend = RodioBackend::new();
        let config = AudioBackendConfig::default();

        if backend.initialize(&config).is_ok() {
            // Second initialization should succeed
            assert!(backend.initialize(&config).is_ok());
            backend.shutdown();
        }
    }

    #[test]
    fn test_source_without_initialization() {
        let mut backend = RodioBackend::new();
        assert!(matches!(backend.create_source(), Err(AudioError::BackendNotInitialized)));
    }

    #[test]
    fn test_invalid_handle_operations() {
        let mut backend = RodioBackend::new();
        let config = AudioBackendConfig::default();

        if backend.initialize(&config).is_ok() {
            let handle = backend.create_source().unwrap();
            backend.destroy_source(handle).unwrap();

            let emission = Emission {
                clip: test_clip("click"),
                pitch: 1.0,
                volume: 1.0,
                looping: false,
            };
            assert!(matches!(backend.play(handle, &emission), Err(AudioError::InvalidHandle)));
            assert!(matches!(backend.stop(handle), Err(AudioError::InvalidHandle)));
            assert!(matches!(backend.destroy_source(handle), Err(AudioError::InvalidHandle)));
            assert!(!backend.is_playing(handle));

            backend.shutdown();
        }
    }

    #[test]
    fn test_play_and_replace_on_same_source() {
        let mut backend = RodioBackend::new();
        let config = AudioBackendConfig::default();

        if backend.initialize(&config).is_ok() {
            let handle = backend.create_source().unwrap();
            let emission = Emission {
                clip: test_clip("click"),
                pitch: 1.5,
                volume: 0.5,
                looping: false,
            };
            backend.play(handle, &emission).unwrap();
            backend.play(handle, &emission).unwrap();
            assert_eq!(backend.source_count(), 1);

            backend.stop(handle).unwrap();
            assert!(!backend.is_playing(handle));
            backend.shutdown();
            assert_eq!(backend.source_count(), 0);
        }
    }
}
