//! Host-independent resource state: keyboard input and blend shapes.

pub mod input;
pub mod morph;

pub use input::{ButtonState, Input, Key};
pub use morph::{MorphTarget, MorphTargetManager};
