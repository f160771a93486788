//! UI hooks that trigger sound effects

pub mod button;

pub use button::{ButtonState, SfxButton};
