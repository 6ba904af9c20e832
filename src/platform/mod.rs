//! Platform abstraction layer
//!
//! Adapters between host devices and the core:
//! - Keyboard/touch controls
//! - Microphone level

pub mod input;
pub mod mic;

pub use input::{Control, InputState};
pub use mic::{MicInput, MicStatus};
