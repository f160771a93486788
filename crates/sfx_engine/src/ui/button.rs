//! Button widget - clickable buttons with a click sound

use crate::audio::{AudioBackend, AudioClip, Playback, SfxPlayer};

/// Button state for visual feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    /// Normal resting state
    Normal,
    /// Button is being pressed
    Pressed,
}

/// Button that plays one of its sounds when clicked
#[derive(Debug, Clone)]
pub struct SfxButton {
    /// Button label text
    pub label: String,

    /// Candidate click sounds
    pub sounds: Vec<AudioClip>,

    /// Vary the pitch on each click
    pub randomize_pitch: bool,

    /// Current button state
    pub state: ButtonState,

    /// Whether the button reacts to clicks
    pub enabled: bool,
}

impl SfxButton {
    /// Create an enabled button with pitch randomization on
    pub fn new(label: impl Into<String>, sounds: Vec<AudioClip>) -> Self {
        Self {
            label: label.into(),
            sounds,
            randomize_pitch: true,
            state: ButtonState::Normal,
            enabled: true,
        }
    }

    /// Keep every click at the clip's original pitch
    #[must_use]
    pub fn without_pitch_variation(mut self) -> Self {
        self.randomize_pitch = false;
        self
    }

    /// Click the button, playing one of its sounds
    ///
    /// Disabled buttons ignore the click.
    pub fn click<B: AudioBackend>(&mut self, sfx: &mut SfxPlayer<B>) -> Option<Playback> {
        if !self.enabled {
            log::debug!("Button {} is disabled", self.label);
            return None;
        }

        log::info!("Button {} is clicked!", self.label);
        self.state = ButtonState::Pressed;
        sfx.play_sfx(&self.sounds, self.randomize_pitch)
    }

    /// Return to the resting state after a press
    pub fn release(&mut self) {
        if self.state == ButtonState::Pressed {
            self.state = ButtonState::Normal;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::backend::headless::HeadlessBackend;
    use crate::audio::backend::AudioBackendConfig;
    use crate::audio::clip::tests::test_clip;
    use crate::audio::sfx_player::SfxConfig;

    fn player() -> SfxPlayer<HeadlessBackend> {
        let mut backend = HeadlessBackend::new();
        backend.initialize(&AudioBackendConfig::default()).unwrap();
        SfxPlayer::new(SfxConfig::default(), backend).unwrap()
    }

    #[test]
    fn test_click_plays_one_of_its_sounds() {
        let sounds = vec![test_clip("tick"), test_clip("tock")];
        let mut button = SfxButton::new("Start", sounds.clone());
        let mut sfx = player();

        let playback = button.click(&mut sfx).unwrap();
        let played = &sfx.backend().emission(playback.source).unwrap().clip;
        assert!(sounds.contains(played));
        assert_eq!(button.state, ButtonState::Pressed);

        button.release();
        assert_eq!(button.state, ButtonState::Normal);
    }

    #[test]
    fn test_click_without_pitch_variation() {
        let mut button = SfxButton::new("Back", vec![test_clip("tick")]).without_pitch_variation();
        let mut sfx = player();
        for _ in 0..5 {
            assert_eq!(button.click(&mut sfx).unwrap().pitch, 1.0);
        }
    }

    #[test]
    fn test_button_without_sounds_is_silent() {
        let mut button = SfxButton::new("Mute", Vec::new());
        let mut sfx = player();
        assert!(button.click(&mut sfx).is_none());
        assert_eq!(sfx.backend().total_plays(), 0);
    }

    #[test]
    fn test_disabled_button_ignores_click() {
        let mut button = SfxButton::new("Locked", vec![test_clip("tick")]);
        button.enabled = false;
        let mut sfx = player();
        assert!(button.click(&mut sfx).is_none());
        assert_eq!(button.state, ButtonState::Normal);
    }
}
