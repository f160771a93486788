//! Foundation module - Core utilities shared by the engine
//!
//! - Frame timing
//! - Logging setup

pub mod logging;
pub mod time;
