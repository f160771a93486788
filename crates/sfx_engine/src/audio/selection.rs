//! Random clip and pitch selection

use rand::Rng;

/// Playback rate that leaves a clip's pitch unchanged
pub const NEUTRAL_PITCH: f32 = 1.0;

/// Pick a uniformly random index into a candidate list
///
/// Returns `None` for an empty list.
pub fn pick_index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Option<usize> {
    (len > 0).then(|| rng.gen_range(0..len))
}

/// Sample a pitch uniformly between two bounds, inclusive
///
/// The bounds may come in either order.
pub fn sample_pitch<R: Rng + ?Sized>(rng: &mut R, min_pitch: f32, max_pitch: f32) -> f32 {
    let (low, high) = if min_pitch <= max_pitch {
        (min_pitch, max_pitch)
    } else {
        (max_pitch, min_pitch)
    };
    rng.gen_range(low..=high)
}

/// Pitch for a play request
pub fn choose_pitch<R: Rng + ?Sized>(
    rng: &mut R,
    randomize: bool,
    min_pitch: f32,
    max_pitch: f32,
) -> f32 {
    if randomize {
        sample_pitch(rng, min_pitch, max_pitch)
    } else {
        NEUTRAL_PITCH
    }
}
