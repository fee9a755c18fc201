//! Windowing integration.

#[cfg(feature = "winit")]
pub mod input_adapter;
