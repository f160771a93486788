//! # SFX Engine
//!
//! Randomized sound-effect playback for games.
//!
//! ## Features
//!
//! - **Random clip choice**: play one clip out of a candidate list
//! - **Pitch variation**: optional random pitch per play within a configured range
//! - **Pooled or on-demand sources**: a fixed round-robin ring, or a source per
//!   sound released after the clip ends
//! - **Single player per application**: owned by the [`Engine`] root
//! - **Rodio output**: with a headless fallback when no device is available
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sfx_engine::prelude::*;
//!
//! struct MyApp {
//!     click: SfxButton,
//! }
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
//!         self.click.sounds.push(AudioClip::load("resources/audio/click.wav")?);
//!         Ok(())
//!     }
//!
//!     fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
//!         if let Some(sfx) = engine.sfx_mut() {
//!             self.click.click(sfx);
//!         }
//!         engine.quit();
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self, _engine: &mut Engine) {}
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut app = MyApp { click: SfxButton::new("Play", Vec::new()) };
//!     Engine::run(EngineConfig::default(), &mut app)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod audio;
pub mod config;
pub mod foundation;
pub mod ui;

mod application;
mod engine;

pub use application::{AppError, AppEvent, Application};
pub use engine::{AudioSettings, Engine, EngineConfig, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        audio::{
            backend::BackendKind,
            sfx_player::{EmissionStrategy, SfxConfig},
            AudioClip, Playback, SfxPlayer,
        },
        config::Config,
        foundation::time::Timer,
        ui::SfxButton,
        AppError, AppEvent, Application, Engine, EngineConfig, EngineError,
    };
}
