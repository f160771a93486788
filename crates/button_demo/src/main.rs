//! Button click demo
//!
//! Simulates a menu whose buttons are clicked on a timer. Each click plays a
//! random clip through the engine's SFX player.
//!
//! ```text
//! button_demo [config.toml|config.ron] [clip.wav ...]
//! ```
//!
//! Without clip arguments a few short tones are synthesized in memory.

use sfx_engine::foundation::logging;
use sfx_engine::prelude::*;
use std::f32::consts::TAU;
use std::io::Cursor;

/// Seconds between simulated clicks
const CLICK_INTERVAL: f32 = 0.35;
/// Clicks before the demo winds down
const TOTAL_CLICKS: u32 = 10;
/// Seconds to let the last sound ring out
const TAIL: f32 = 1.5;

struct ButtonDemo {
    clips: Vec<AudioClip>,
    buttons: Vec<SfxButton>,
    since_click: f32,
    clicks: u32,
    tail: f32,
}

impl ButtonDemo {
    fn new(clips: Vec<AudioClip>) -> Self {
        Self {
            clips,
            buttons: Vec::new(),
            since_click: 0.0,
            clicks: 0,
            tail: 0.0,
        }
    }
}

impl Application for ButtonDemo {
    fn initialize(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
        if self.clips.is_empty() {
            self.clips = synthesize_clicks()?;
        }

        self.buttons = vec![
            SfxButton::new("Play", self.clips.clone()),
            SfxButton::new("Options", self.clips.clone()),
            SfxButton::new("Back", self.clips[..1].to_vec()).without_pitch_variation(),
        ];
        log::info!(
            "Demo ready with {} clips and {} buttons",
            self.clips.len(),
            self.buttons.len()
        );
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, delta_time: f32) -> Result<(), AppError> {
        if self.clicks >= TOTAL_CLICKS {
            self.tail += delta_time;
            if self.tail >= TAIL {
                engine.push_event(AppEvent::QuitRequested);
            }
            return Ok(());
        }

        self.since_click += delta_time;
        if self.since_click >= CLICK_INTERVAL {
            self.since_click = 0.0;
            let id = self.clicks % self.buttons.len() as u32;
            engine.push_event(AppEvent::ButtonClicked { id });
            self.clicks += 1;
        }
        Ok(())
    }

    fn handle_event(&mut self, engine: &mut Engine, event: AppEvent) -> Result<(), AppError> {
        match event {
            AppEvent::ButtonClicked { id } => {
                let button = self
                    .buttons
                    .get_mut(id as usize)
                    .ok_or_else(|| AppError::Custom(format!("unknown button {id}")))?;
                let sfx = engine
                    .sfx_mut()
                    .ok_or_else(|| AppError::Custom("no SFX player registered".to_string()))?;

                if let Some(playback) = button.click(sfx) {
                    log::info!(
                        "  -> clip #{} at pitch {:.2}, volume {:.2}",
                        playback.index,
                        playback.pitch,
                        playback.volume
                    );
                }
                button.release();
            }
            other => engine.handle_event(&other),
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        log::info!(
            "Played {} clicks over {} frames",
            self.clicks,
            engine.frame_count()
        );
    }
}

/// Short decaying sine blips at a few pitches
fn synthesize_clicks() -> Result<Vec<AudioClip>, AppError> {
    [("blip_low", 440.0), ("blip_mid", 660.0), ("blip_high", 880.0)]
        .into_iter()
        .map(|(name, frequency)| -> Result<AudioClip, AppError> {
            let bytes = sine_blip(frequency, 0.12).map_err(|e| AppError::Custom(e.to_string()))?;
            Ok(AudioClip::from_bytes(name, bytes)?)
        })
        .collect()
}

fn sine_blip(frequency: f32, seconds: f32) -> Result<Vec<u8>, hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut bytes = Vec::new();
    let mut writer = hound::WavWriter::new(Cursor::new(&mut bytes), spec)?;
    let samples = (seconds * spec.sample_rate as f32) as u32;
    for n in 0..samples {
        let t = n as f32 / spec.sample_rate as f32;
        let envelope = (-t * 30.0).exp();
        let value = (TAU * frequency * t).sin() * envelope * 0.6;
        writer.write_sample((value * f32::from(i16::MAX)) as i16)?;
    }
    writer.finalize()?;
    Ok(bytes)
}

fn main() {
    logging::init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);

    let config = match args.next() {
        Some(path) => EngineConfig::load_or_default(path)?,
        None => EngineConfig::default(),
    };
    let clips = args.map(AudioClip::load).collect::<Result<Vec<_>, _>>()?;

    let mut app = ButtonDemo::new(clips);
    Engine::run(config, &mut app)?;
    Ok(())
}
