//! Core engine implementation

use crate::{
    application::{AppEvent, Application},
    audio::{
        backend::{create_backend, AudioBackendConfig, BackendKind},
        sfx_player::SfxConfig,
        AudioError, Registration, SfxPlayer, SfxService,
    },
    config::{Config, ConfigError},
    foundation::time::Timer,
};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

/// Main engine struct
///
/// The engine is the application root: it owns the SFX player and drives the
/// frame loop. Everything that wants to play a sound gets `&mut Engine`.
pub struct Engine {
    /// Slot holding the single SFX player
    sfx: SfxService,

    /// Frame timing
    timer: Timer,

    /// Engine configuration
    config: EngineConfig,

    /// Events waiting for the next frame
    events: VecDeque<AppEvent>,

    /// Whether the engine should continue running
    running: bool,
}

impl Engine {
    /// Create a new engine instance with its SFX player registered
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        log::info!("Initializing engine...");

        let backend = create_backend(config.audio.backend, &config.audio.backend_config)
            .map_err(|e| EngineError::InitializationFailed(format!("Audio backend: {e}")))?;
        let player = SfxPlayer::new(config.sfx.clone(), backend)?;

        let mut sfx = SfxService::new();
        sfx.register(player);

        Ok(Self {
            sfx,
            timer: Timer::new(),
            config,
            events: VecDeque::new(),
            running: true,
        })
    }

    /// Run the engine main loop with the given application
    pub fn run<T: Application>(config: EngineConfig, app: &mut T) -> Result<(), EngineError> {
        let mut engine = Self::new(config)?;

        // Initialize application
        app.initialize(&mut engine)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {e}")))?;

        log::info!("Starting main loop...");
        engine.timer = Timer::new();

        while engine.running {
            let delta_time = engine.timer.update();

            while let Some(event) = engine.events.pop_front() {
                app.handle_event(&mut engine, event)
                    .map_err(|e| EngineError::ApplicationError(format!("App event: {e}")))?;
            }

            // Update application
            app.update(&mut engine, delta_time)
                .map_err(|e| EngineError::ApplicationError(format!("App update: {e}")))?;

            // Update engine systems
            engine.step(delta_time);

            engine.timer.wait_for_next_frame(engine.config.target_fps);
        }

        // Cleanup
        app.cleanup(&mut engine);

        log::info!(
            "Engine shutdown complete after {} frames",
            engine.timer.frame_count()
        );
        Ok(())
    }

    /// Advance engine systems by one frame
    pub fn step(&mut self, delta_time: f32) {
        self.sfx.update(delta_time);
    }

    /// Handle an application event
    pub fn handle_event(&mut self, event: &AppEvent) {
        match event {
            AppEvent::QuitRequested => self.quit(),
            AppEvent::ButtonClicked { id } => {
                log::trace!("Button {id} click reached the engine unhandled");
            }
        }
    }

    /// Queue an event for the start of the next frame
    pub fn push_event(&mut self, event: AppEvent) {
        self.events.push_back(event);
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the main loop keeps going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The registered SFX player
    pub fn sfx(&self) -> Option<&SfxPlayer> {
        self.sfx.get()
    }

    /// Mutable access to the registered SFX player
    pub fn sfx_mut(&mut self) -> Option<&mut SfxPlayer> {
        self.sfx.get_mut()
    }

    /// Try to register another SFX player
    ///
    /// The engine already holds one, so this only succeeds after the current
    /// player has been taken out of the service.
    pub fn register_sfx_player(&mut self, player: SfxPlayer) -> Registration {
        self.sfx.register(player)
    }

    /// Build an SFX player on a fresh backend configured like the engine's
    pub fn create_sfx_player(&self, config: SfxConfig) -> Result<SfxPlayer, EngineError> {
        let backend = create_backend(self.config.audio.backend, &self.config.audio.backend_config)?;
        Ok(SfxPlayer::new(config, backend)?)
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the current frame delta time
    pub fn delta_time(&self) -> f32 {
        self.timer.delta_time()
    }

    /// Number of frames run so far
    pub fn frame_count(&self) -> u64 {
        self.timer.frame_count()
    }
}

/// Audio output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AudioSettings {
    /// Which backend to open
    pub backend: BackendKind,
    /// Device parameters
    pub backend_config: AudioBackendConfig,
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Audio output settings
    pub audio: AudioSettings,

    /// SFX player settings
    pub sfx: SfxConfig,

    /// Frame rate cap for the main loop (0 = uncapped)
    pub target_fps: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            audio: AudioSettings::default(),
            sfx: SfxConfig::default(),
            target_fps: 60,
        }
    }
}

impl Config for EngineConfig {}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Initialization error
    #[error("Engine initialization failed: {0}")]
    InitializationFailed(String),

    /// Audio system error
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::AppError;
    use crate::audio::AudioClip;

    fn headless_config() -> EngineConfig {
        EngineConfig {
            audio: AudioSettings {
                backend: BackendKind::Headless,
                ..AudioSettings::default()
            },
            target_fps: 0,
            ..EngineConfig::default()
        }
    }

    fn click() -> AudioClip {
        crate::audio::clip::tests::test_clip("click")
    }

    #[test]
    fn test_engine_registers_one_player() {
        let mut engine = Engine::new(headless_config()).unwrap();
        assert!(engine.sfx().is_some());

        let duplicate = engine
            .create_sfx_player(SfxConfig {
                sfx_volume: 0.1,
                ..SfxConfig::default()
            })
            .unwrap();
        assert_eq!(engine.register_sfx_player(duplicate), Registration::Discarded);
        assert_eq!(engine.sfx().unwrap().config().sfx_volume, 1.0);
    }

    #[test]
    fn test_invalid_sfx_config_fails_startup() {
        let config = EngineConfig {
            sfx: SfxConfig {
                pool_size: 0,
                ..SfxConfig::default()
            },
            ..headless_config()
        };
        assert!(matches!(
            Engine::new(config),
            Err(EngineError::Audio(AudioError::InvalidConfig(_)))
        ));
    }

    #[test]
    fn test_quit_event_stops_engine() {
        let mut engine = Engine::new(headless_config()).unwrap();
        engine.handle_event(&AppEvent::ButtonClicked { id: 3 });
        assert!(engine.is_running());
        engine.handle_event(&AppEvent::QuitRequested);
        assert!(!engine.is_running());
    }

    struct ClickingApp {
        clips: Vec<AudioClip>,
        clicks: u32,
        frames: u32,
        cleaned_up: bool,
    }

    impl Application for ClickingApp {
        fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
            engine.push_event(AppEvent::ButtonClicked { id: 1 });
            Ok(())
        }

        fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
            self.frames += 1;
            if self.frames == 3 {
                engine.push_event(AppEvent::QuitRequested);
            }
            Ok(())
        }

        fn handle_event(&mut self, engine: &mut Engine, event: AppEvent) -> Result<(), AppError> {
            if let AppEvent::ButtonClicked { .. } = event {
                let player = engine
                    .sfx_mut()
                    .ok_or_else(|| AppError::Custom("no SFX player".to_string()))?;
                if player.play_sfx(&self.clips, true).is_some() {
                    self.clicks += 1;
                }
                return Ok(());
            }
            engine.handle_event(&event);
            Ok(())
        }

        fn cleanup(&mut self, _engine: &mut Engine) {
            self.cleaned_up = true;
        }
    }

    #[test]
    fn test_run_loop() {
        let mut app = ClickingApp {
            clips: vec![click()],
            clicks: 0,
            frames: 0,
            cleaned_up: false,
        };
        Engine::run(headless_config(), &mut app).unwrap();

        assert_eq!(app.clicks, 1);
        // Quit pushed in frame 3 is handled at the start of frame 4
        assert_eq!(app.frames, 4);
        assert!(app.cleaned_up);
    }

    #[test]
    fn test_engine_config_toml_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            target_fps = 30

            [audio]
            backend = "headless"

            [sfx]
            pool_size = 8
            "#,
        )
        .unwrap();

        assert_eq!(config.target_fps, 30);
        assert_eq!(config.audio.backend, BackendKind::Headless);
        assert_eq!(config.audio.backend_config.sample_rate, 44100);
        assert_eq!(config.sfx.pool_size, 8);
        assert_eq!(config.sfx.sfx_volume, 1.0);
    }
}
