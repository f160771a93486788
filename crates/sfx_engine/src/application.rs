//! Application trait and lifecycle management

use crate::audio::AudioError;
use crate::engine::{Engine, EngineError};
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to drive a game or tool with the engine loop.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once after the engine is initialized. Load clips and build UI
    /// here; the SFX player is already registered.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Update the application
    ///
    /// Called every frame, after pending events have been handled.
    ///
    /// # Arguments
    /// * `engine` - Mutable reference to the engine
    /// * `delta_time` - Time since last frame in seconds
    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError>;

    /// Handle application events
    ///
    /// Called for every queued event at the start of a frame.
    fn handle_event(&mut self, engine: &mut Engine, event: AppEvent) -> Result<(), AppError> {
        // Default implementation forwards to engine
        engine.handle_event(&event);
        Ok(())
    }

    /// Cleanup the application
    ///
    /// Called once when the loop has stopped.
    fn cleanup(&mut self, engine: &mut Engine);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Audio error (clip loading, backend)
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}

/// Application events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A UI button was clicked
    ButtonClicked {
        /// Identifier of the clicked button
        id: u32,
    },

    /// Stop the main loop after this frame
    QuitRequested,
}
