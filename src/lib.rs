//! Emote: keyboard-driven walk/expression control for rigged characters.
//!
//! The crate binds three keys to a small mode machine (idle, walking, happy,
//! surprised) over a character's animation clips and facial morph targets.
//! Loading, rendering and XR are the host's job; the controller only talks
//! to the host through the [`Rig`](controller::Rig) trait.

pub mod animation;
pub mod app;
pub mod config;
pub mod controller;
pub mod errors;
pub mod resources;
pub mod scene;
pub mod stage;

pub use animation::{AnimationAction, AnimationClip, AnimationMixer, ClipKey, LoopMode};
pub use config::{ControllerProfile, KeyBindings, MeshSelector, SessionMode, TargetSelector};
pub use controller::{
    Action, ControllerState, Diagnostic, Expression, ExpressionController, Rig, RigBindings,
};
pub use errors::{EmoteError, Result};
pub use resources::input::{ButtonState, Input, Key};
pub use resources::morph::{MorphTarget, MorphTargetManager};
pub use scene::{Model, NodeKey, Transform};
pub use stage::{NoXr, Prop, Stage, StagePhase, XrRuntime};
