//! Headless audio backend
//!
//! Keeps full source bookkeeping without opening an output device. Used on
//! machines without audio hardware, in CI, and to observe what the SFX player
//! asked the backend to do.

use super::{AudioBackend, AudioBackendConfig, Emission, SourceHandle};
use crate::audio::AudioError;
use slotmap::SlotMap;

#[derive(Debug, Default)]
struct HeadlessSource {
    emission: Option<Emission>,
    playing: bool,
    play_count: u32,
}

/// Backend that plays nothing but remembers everything
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    sources: SlotMap<SourceHandle, HeadlessSource>,
    initialized: bool,
    total_plays: u64,
}

impl HeadlessBackend {
    /// Create a new, uninitialized headless backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Last emission configured on a source
    pub fn emission(&self, handle: SourceHandle) -> Option<&Emission> {
        self.sources.get(handle).and_then(|s| s.emission.as_ref())
    }

    /// How many times a source has been started
    pub fn play_count(&self, handle: SourceHandle) -> u32 {
        self.sources.get(handle).map_or(0, |s| s.play_count)
    }

    /// Total `play` calls accepted since creation
    pub fn total_plays(&self) -> u64 {
        self.total_plays
    }

    /// Check whether a handle still refers to a live source
    pub fn contains(&self, handle: SourceHandle) -> bool {
        self.sources.contains_key(handle)
    }

    fn ensure_initialized(&self) -> Result<(), AudioError> {
        if self.initialized {
            Ok(())
        } else {
            Err(AudioError::BackendNotInitialized)
        }
    }
}

impl AudioBackend for HeadlessBackend {
    fn initialize(&mut self, _config: &AudioBackendConfig) -> Result<(), AudioError> {
        if !self.initialized {
            self.initialized = true;
            log::info!("Headless audio backend initialized");
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        self.sources.clear();
        self.initialized = false;
        log::info!("Headless audio backend shutdown");
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn update(&mut self) {}

    fn create_source(&mut self) -> Result<SourceHandle, AudioError> {
        self.ensure_initialized()?;
        Ok(self.sources.insert(HeadlessSource::default()))
    }

    fn destroy_source(&mut self, handle: SourceHandle) -> Result<(), AudioError> {
        self.sources
            .remove(handle)
            .map(|_| ())
            .ok_or(AudioError::InvalidHandle)
    }

    fn play(&mut self, handle: SourceHandle, emission: &Emission) -> Result<(), AudioError> {
        self.ensure_initialized()?;
        let source = self
            .sources
            .get_mut(handle)
            .ok_or(AudioError::InvalidHandle)?;
        source.emission = Some(emission.clone());
        source.playing = true;
        source.play_count += 1;
        self.total_plays += 1;
        Ok(())
    }

    fn stop(&mut self, handle: SourceHandle) -> Result<(), AudioError> {
        let source = self
            .sources
            .get_mut(handle)
            .ok_or(AudioError::InvalidHandle)?;
        source.playing = false;
        Ok(())
    }

    fn is_playing(&self, handle: SourceHandle) -> bool {
        self.sources.get(handle).is_some_and(|s| s.playing)
    }

    fn source_count(&self) -> usize {
        self.sources.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::clip::tests::test_clip;

    fn initialized() -> HeadlessBackend {
        let mut backend = HeadlessBackend::new();
        backend.initialize(&AudioBackendConfig::default()).unwrap();
        backend
    }

    fn emission(pitch: f32) -> Emission {
        Emission {
            clip: test_clip("click"),
            pitch,
            volume: 0.8,
            looping: false,
        }
    }

    #[test]
    fn test_create_without_initialization() {
        let mut backend = HeadlessBackend::new();
        assert!(matches!(backend.create_source(), Err(AudioError::BackendNotInitialized)));
    }

    #[test]
    fn test_play_records_emission() {
        let mut backend = initialized();
        let handle = backend.create_source().unwrap();
        assert!(!backend.is_playing(handle));

        let settings = emission(1.25);
        backend.play(handle, &settings).unwrap();

        assert!(backend.is_playing(handle));
        assert_eq!(backend.emission(handle), Some(&settings));
        assert_eq!(backend.play_count(handle), 1);
    }

    #[test]
    fn test_replay_overwrites_previous_emission() {
        let mut backend = initialized();
        let handle = backend.create_source().unwrap();
        backend.play(handle, &emission(0.5)).unwrap();
        backend.play(handle, &emission(1.5)).unwrap();

        assert_eq!(backend.emission(handle).unwrap().pitch, 1.5);
        assert_eq!(backend.play_count(handle), 2);
        assert_eq!(backend.total_plays(), 2);
    }

    #[test]
    fn test_stale_handle_after_destroy() {
        let mut backend = initialized();
        let handle = backend.create_source().unwrap();
        backend.destroy_source(handle).unwrap();

        // Slot reuse must not revive the old handle
        let fresh = backend.create_source().unwrap();
        assert_ne!(handle, fresh);
        assert!(matches!(backend.play(handle, &emission(1.0)), Err(AudioError::InvalidHandle)));
        assert!(matches!(backend.destroy_source(handle), Err(AudioError::InvalidHandle)));
        assert_eq!(backend.source_count(), 1);
    }

    #[test]
    fn test_stop_and_shutdown() {
        let mut backend = initialized();
        let handle = backend.create_source().unwrap();
        backend.play(handle, &emission(1.0)).unwrap();
        backend.stop(handle).unwrap();
        assert!(!backend.is_playing(handle));

        backend.shutdown();
        assert!(!backend.is_initialized());
        assert_eq!(backend.source_count(), 0);
    }
}
