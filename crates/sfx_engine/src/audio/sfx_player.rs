//! Randomized sound-effect player
//!
//! [`SfxPlayer`] turns "play one of these clips" into a configured backend
//! source. Two emission strategies share the same selection logic:
//!
//! - [`EmissionStrategy::Pooled`]: a fixed ring of sources allocated up front
//!   and reused round-robin. No allocation after construction; a source that
//!   is still playing when its turn comes again is cut off.
//! - [`EmissionStrategy::OnDemand`]: a fresh source per request, released by
//!   [`SfxPlayer::update`] once the clip has had time to finish.
//!
//! # Example
//!
//! ```
//! use sfx_engine::audio::backend::{headless::HeadlessBackend, AudioBackend, AudioBackendConfig};
//! use sfx_engine::audio::sfx_player::{SfxConfig, SfxPlayer};
//!
//! let mut backend = HeadlessBackend::new();
//! backend.initialize(&AudioBackendConfig::default()).unwrap();
//! let mut player = SfxPlayer::new(SfxConfig::default(), backend).unwrap();
//!
//! // Nothing to choose from: logged and ignored
//! assert!(player.play_sfx(&[], true).is_none());
//! ```

use crate::audio::disposal::DisposalQueue;
use crate::audio::selection;
use crate::audio::voice_pool::VoicePool;
use crate::audio::{AudioBackend, AudioClip, AudioError, Emission, SourceHandle};
use crate::config::Config;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// How the player obtains a source for each sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmissionStrategy {
    /// Reuse a fixed ring of sources
    #[default]
    Pooled,
    /// Create a source per sound and release it afterwards
    OnDemand,
}

/// Tunable SFX settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SfxConfig {
    /// Volume applied to every sound effect
    pub sfx_volume: f32,
    /// Lower bound for randomized pitch
    pub min_pitch: f32,
    /// Upper bound for randomized pitch
    pub max_pitch: f32,
    /// Number of pooled sources (pooled strategy only)
    pub pool_size: usize,
    /// Extra seconds an on-demand source lives after its clip ends
    pub disposal_delay: f32,
    /// Source allocation strategy
    pub strategy: EmissionStrategy,
}

impl Default for SfxConfig {
    fn default() -> Self {
        Self {
            sfx_volume: 1.0,
            min_pitch: 0.5,
            max_pitch: 1.5,
            pool_size: 5,
            disposal_delay: 0.25,
            strategy: EmissionStrategy::Pooled,
        }
    }
}

impl Config for SfxConfig {}

impl SfxConfig {
    /// Check that the settings can drive a player
    ///
    /// The pitch bounds may be given in either order.
    pub fn validate(&self) -> Result<(), AudioError> {
        if !self.sfx_volume.is_finite() || self.sfx_volume < 0.0 {
            return Err(AudioError::InvalidConfig(format!(
                "sfx_volume must be a non-negative number, got {}",
                self.sfx_volume
            )));
        }
        for (name, pitch) in [("min_pitch", self.min_pitch), ("max_pitch", self.max_pitch)] {
            if !pitch.is_finite() || pitch <= 0.0 {
                return Err(AudioError::InvalidConfig(format!(
                    "{name} must be a positive number, got {pitch}"
                )));
            }
        }
        if !self.disposal_delay.is_finite() || self.disposal_delay < 0.0 {
            return Err(AudioError::InvalidConfig(format!(
                "disposal_delay must be a non-negative number, got {}",
                self.disposal_delay
            )));
        }
        if self.strategy == EmissionStrategy::Pooled && self.pool_size == 0 {
            return Err(AudioError::InvalidConfig("pool_size must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// What a successful play request did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playback {
    /// Source the clip is playing on
    pub source: SourceHandle,
    /// Index of the chosen clip in the candidate list
    pub index: usize,
    /// Applied pitch
    pub pitch: f32,
    /// Applied volume
    pub volume: f32,
}

#[derive(Debug)]
enum Emitter {
    Pooled(VoicePool),
    OnDemand(DisposalQueue),
}

/// Plays a random clip from a candidate list
pub struct SfxPlayer<B: AudioBackend = Box<dyn AudioBackend>> {
    config: SfxConfig,
    backend: B,
    rng: StdRng,
    emitter: Emitter,
}

impl<B: AudioBackend> SfxPlayer<B> {
    /// Create a player seeded from system entropy
    ///
    /// # Errors
    /// - `InvalidConfig` if the configuration fails validation
    /// - Backend errors while allocating the source pool
    pub fn new(config: SfxConfig, backend: B) -> Result<Self, AudioError> {
        Self::with_rng(config, backend, StdRng::from_entropy())
    }

    /// Create a player with an explicit random source
    pub fn with_rng(config: SfxConfig, mut backend: B, rng: StdRng) -> Result<Self, AudioError> {
        config.validate()?;

        let emitter = match config.strategy {
            EmissionStrategy::Pooled => {
                Emitter::Pooled(VoicePool::allocate(&mut backend, config.pool_size)?)
            }
            EmissionStrategy::OnDemand => Emitter::OnDemand(DisposalQueue::new()),
        };

        log::info!(
            "SFX player ready ({:?}, volume {}, pitch {}..{})",
            config.strategy,
            config.sfx_volume,
            config.min_pitch,
            config.max_pitch
        );

        Ok(Self {
            config,
            backend,
            rng,
            emitter,
        })
    }

    /// Play a random clip, optionally with a random pitch
    ///
    /// An empty candidate list is logged and ignored. Backend failures are
    /// logged as well; neither is reported to the caller beyond `None`.
    pub fn play_sfx(&mut self, candidates: &[AudioClip], randomize_pitch: bool) -> Option<Playback> {
        self.play_random(candidates, randomize_pitch, "play_sfx")
    }

    /// Play a random clip at its original pitch
    pub fn play_sfx_no_pitch(&mut self, candidates: &[AudioClip]) -> Option<Playback> {
        self.play_random(candidates, false, "play_sfx_no_pitch")
    }

    fn play_random(
        &mut self,
        candidates: &[AudioClip],
        randomize_pitch: bool,
        caller: &str,
    ) -> Option<Playback> {
        let Some(index) = selection::pick_index(&mut self.rng, candidates.len()) else {
            log::warn!("{caller} requires at least one candidate clip");
            return None;
        };

        let clip = &candidates[index];
        let pitch = selection::choose_pitch(
            &mut self.rng,
            randomize_pitch,
            self.config.min_pitch,
            self.config.max_pitch,
        );
        let emission = Emission {
            clip: clip.clone(),
            pitch,
            volume: self.config.sfx_volume,
            looping: false,
        };

        let result = match &mut self.emitter {
            Emitter::Pooled(pool) => {
                // The cursor moves even if the backend rejects the sound
                let source = pool.next_source();
                self.backend.play(source, &emission).map(|()| source)
            }
            Emitter::OnDemand(queue) => {
                play_on_demand(&mut self.backend, queue, &emission, self.config.disposal_delay)
            }
        };

        match result {
            Ok(source) => {
                log::debug!("Playing '{}' at pitch {pitch:.3}", clip.name());
                Some(Playback {
                    source,
                    index,
                    pitch,
                    volume: emission.volume,
                })
            }
            Err(e) => {
                log::warn!("Failed to play '{}': {e}", clip.name());
                None
            }
        }
    }

    /// Advance deferred disposal and let the backend reap finished sounds
    ///
    /// Call once per frame with the frame time in seconds.
    pub fn update(&mut self, delta_time: f32) {
        if let Emitter::OnDemand(queue) = &mut self.emitter {
            let backend = &self.backend;
            let expired = queue.advance(delta_time, |handle| backend.is_playing(handle));
            for handle in expired {
                if let Err(e) = self.backend.destroy_source(handle) {
                    log::debug!("Disposed source was already gone: {e}");
                }
            }
        }
        self.backend.update();
    }

    /// Current settings
    pub fn config(&self) -> &SfxConfig {
        &self.config
    }

    /// Change the volume used for subsequent sounds
    pub fn set_sfx_volume(&mut self, volume: f32) {
        self.config.sfx_volume = volume.max(0.0);
    }

    /// Change the randomized pitch bounds used for subsequent sounds
    ///
    /// # Errors
    /// - `InvalidConfig` if either bound is not a positive number
    pub fn set_pitch_range(&mut self, min_pitch: f32, max_pitch: f32) -> Result<(), AudioError> {
        let candidate = SfxConfig {
            min_pitch,
            max_pitch,
            ..self.config.clone()
        };
        candidate.validate()?;
        self.config = candidate;
        Ok(())
    }

    /// Source allocation strategy in use
    pub fn strategy(&self) -> EmissionStrategy {
        self.config.strategy
    }

    /// Pool cursor (pooled strategy only)
    pub fn cursor(&self) -> Option<usize> {
        match &self.emitter {
            Emitter::Pooled(pool) => Some(pool.cursor()),
            Emitter::OnDemand(_) => None,
        }
    }

    /// Pooled sources in ring order (pooled strategy only)
    pub fn pool_sources(&self) -> Option<&[SourceHandle]> {
        match &self.emitter {
            Emitter::Pooled(pool) => Some(pool.sources()),
            Emitter::OnDemand(_) => None,
        }
    }

    /// Number of on-demand sources waiting for release
    pub fn pending_disposals(&self) -> usize {
        match &self.emitter {
            Emitter::Pooled(_) => 0,
            Emitter::OnDemand(queue) => queue.len(),
        }
    }

    /// The audio backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the audio backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

fn play_on_demand<B: AudioBackend + ?Sized>(
    backend: &mut B,
    queue: &mut DisposalQueue,
    emission: &Emission,
    disposal_delay: f32,
) -> Result<SourceHandle, AudioError> {
    let source = backend.create_source()?;
    if let Err(e) = backend.play(source, emission) {
        let _ = backend.destroy_source(source);
        return Err(e);
    }

    match emission.clip.duration() {
        // Lower pitch plays longer
        Some(length) => {
            queue.schedule(source, length.as_secs_f32() / emission.pitch + disposal_delay);
        }
        None => queue.schedule_when_idle(source, disposal_delay),
    }
    Ok(source)
}

impl<B: AudioBackend> Drop for SfxPlayer<B> {
    fn drop(&mut self) {
        let emitter = std::mem::replace(&mut self.emitter, Emitter::OnDemand(DisposalQueue::new()));
        match emitter {
            Emitter::Pooled(pool) => pool.release(&mut self.backend),
            Emitter::OnDemand(mut queue) => {
                for handle in queue.drain_all() {
                    let _ = self.backend.destroy_source(handle);
                }
            }
        }
    }
}
