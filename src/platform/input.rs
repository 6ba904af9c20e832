//! Leg controls

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Control {
    LeftLeg,
    RightLeg,
}

impl Control {
    /// Key binding (accepts both `KeyboardEvent.key` and `.code` values)
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "a" | "A" | "KeyA" | "ArrowLeft" => Some(Control::LeftLeg),
            "d" | "D" | "KeyD" | "ArrowRight" => Some(Control::RightLeg),
            _ => None,
        }
    }
}

/// Held controls for the current frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub left_leg: bool,
    pub right_leg: bool,
}

impl InputState {
    pub fn set(&mut self, control: Control, held: bool) {
        match control {
            Control::LeftLeg => self.left_leg = held,
            Control::RightLeg => self.right_leg = held,
        }
    }

    /// Returns true if the key is bound
    pub fn key_down(&mut self, key: &str) -> bool {
        Control::from_key(key).map(|c| self.set(c, true)).is_some()
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        Control::from_key(key).map(|c| self.set(c, false)).is_some()
    }

    /// Drop all held controls (focus loss)
    pub fn release_all(&mut self) {
        *self = Self::default();
    }
}
