//! Audio system
//!
//! Randomized sound-effect playback on top of a pluggable audio backend.
//! The [`SfxPlayer`] picks a clip from a candidate list, optionally randomizes
//! its pitch, and emits it through either a fixed ring of pooled sources or
//! sources created on demand and disposed once the clip has finished.

pub mod backend;
pub mod clip;
pub mod disposal;
pub mod selection;
pub mod service;
pub mod sfx_player;
pub mod voice_pool;

pub use backend::{AudioBackend, AudioBackendConfig, Emission, SourceHandle};
pub use clip::{AudioClip, AudioFormat};
pub use service::{Registration, SfxService};
pub use sfx_player::{Playback, SfxPlayer};

use thiserror::Error;

/// Audio system errors
#[derive(Error, Debug)]
pub enum AudioError {
    /// Backend was used before `initialize` succeeded
    #[error("Audio backend not initialized")]
    BackendNotInitialized,

    /// Backend could not open an output device
    #[error("Audio backend initialization failed: {0}")]
    BackendInitFailed(String),

    /// Handle does not refer to a live source
    #[error("Invalid audio source handle")]
    InvalidHandle,

    /// Source could not start playing
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    /// Clip data could not be read or recognised
    #[error("Failed to load clip: {0}")]
    ClipLoad(String),

    /// SFX configuration is unusable
    #[error("Invalid SFX configuration: {0}")]
    InvalidConfig(String),

    /// IO error while reading clip data
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
