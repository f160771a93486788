//! Single-instance SFX player slot
//!
//! The application root owns one [`SfxService`]. The first player registered
//! stays for the lifetime of the service; later registrations are dropped on
//! the spot, releasing whatever sources they allocated.

use crate::audio::{AudioBackend, SfxPlayer};

/// Outcome of [`SfxService::register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// The player is now the active instance
    Registered,
    /// A player was already active; the new one was dropped
    Discarded,
}

/// Holds at most one live SFX player
pub struct SfxService<B: AudioBackend = Box<dyn AudioBackend>> {
    player: Option<SfxPlayer<B>>,
}

impl<B: AudioBackend> SfxService<B> {
    /// Create an empty service
    pub fn new() -> Self {
        Self { player: None }
    }

    /// Install a player unless one is already active
    pub fn register(&mut self, player: SfxPlayer<B>) -> Registration {
        if self.player.is_some() {
            log::debug!("SFX player already registered; discarding duplicate");
            drop(player);
            return Registration::Discarded;
        }

        self.player = Some(player);
        log::debug!("SFX player registered");
        Registration::Registered
    }

    /// Check whether a player is active
    pub fn is_registered(&self) -> bool {
        self.player.is_some()
    }

    /// The active player
    pub fn get(&self) -> Option<&SfxPlayer<B>> {
        self.player.as_ref()
    }

    /// Mutable access to the active player
    pub fn get_mut(&mut self) -> Option<&mut SfxPlayer<B>> {
        self.player.as_mut()
    }

    /// Advance the active player by one frame
    pub fn update(&mut self, delta_time: f32) {
        if let Some(player) = &mut self.player {
            player.update(delta_time);
        }
    }

    /// Remove and return the active player
    pub fn take(&mut self) -> Option<SfxPlayer<B>> {
        self.player.take()
    }
}

impl<B: AudioBackend> Default for SfxService<B> {
    fn default() -> Self {
        Self::new()
    }
}
