//! Expression/Animation Controller
//!
//! Maps key presses to one of four mutually exclusive modes and applies the
//! matching clip playback and blend-shape influences through a [`Rig`].
//!
//! # Lifecycle
//!
//! The controller is built *unready* from a set of [`KeyBindings`]. Once the
//! host has loaded the model and resolved its resources into
//! [`RigBindings`], [`ExpressionController::initialize`] makes it *ready*.
//! This happens exactly once. Input received before that is ignored.
//!
//! # Transitions
//!
//! Transitions depend only on the action, never on the current mode:
//!
//! | Action    | Effect |
//! |-----------|--------|
//! | walk      | reset expressions, stop idle, loop walk |
//! | happy     | stop walk, loop idle, reset expressions, happy = 1 |
//! | surprised | stop walk, loop idle, reset expressions, surprised = 1 |
//!
//! A missing clip or target never fails: the step is skipped and a
//! [`Diagnostic`] is recorded and logged.

pub mod resolve;

use std::fmt;

use log::{debug, info, warn};

use crate::animation::ClipKey;
use crate::config::KeyBindings;
use crate::errors::{EmoteError, Result};
use crate::resources::input::Key;
use crate::scene::NodeKey;

pub use resolve::resolve;

/// Capability surface the controller needs from the host engine.
pub trait Rig {
    type ClipHandle: Copy;
    type MeshHandle: Copy;

    /// Rewinds and plays a clip, looping or once.
    fn start_clip(&mut self, clip: Self::ClipHandle, looping: bool);

    fn stop_clip(&mut self, clip: Self::ClipHandle);

    /// Number of morph targets on `mesh`, 0 if it has none.
    fn morph_target_count(&self, mesh: Self::MeshHandle) -> usize;

    /// Sets one target's influence. Out of range indices are ignored.
    fn set_influence(&mut self, mesh: Self::MeshHandle, index: usize, influence: f32);
}

/// Handles resolved once after the model has loaded. Any of them may be
/// missing; target indices refer to the manager on `morph_mesh`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RigBindings<C = ClipKey, M = NodeKey> {
    pub walk: Option<C>,
    pub idle: Option<C>,
    pub morph_mesh: Option<M>,
    pub happy: Option<usize>,
    pub surprised: Option<usize>,
}

impl<C, M> Default for RigBindings<C, M> {
    fn default() -> Self {
        Self {
            walk: None,
            idle: None,
            morph_mesh: None,
            happy: None,
            surprised: None,
        }
    }
}

impl<C: Copy, M: Copy> RigBindings<C, M> {
    #[must_use]
    pub fn target(&self, expression: Expression) -> Option<(M, usize)> {
        let index = match expression {
            Expression::Happy => self.happy,
            Expression::Surprised => self.surprised,
        }?;
        Some((self.morph_mesh?, index))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expression {
    Happy,
    Surprised,
}

impl Expression {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Expression::Happy => "happy",
            Expression::Surprised => "surprised",
        }
    }
}

/// What a bound key asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Walk,
    Express(Expression),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ControllerState {
    #[default]
    Idle,
    Walking,
    ExpressingHappy,
    ExpressingSurprised,
}

impl From<Expression> for ControllerState {
    fn from(expression: Expression) -> Self {
        match expression {
            Expression::Happy => ControllerState::ExpressingHappy,
            Expression::Surprised => ControllerState::ExpressingSurprised,
        }
    }
}

/// A skipped step. Recorded instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic {
    IdleClipUnavailable,
    WalkClipUnavailable,
    ExpressionUnavailable(Expression),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::IdleClipUnavailable => {
                f.write_str("idle clip unavailable, no animation plays at rest")
            }
            Diagnostic::WalkClipUnavailable => f.write_str("walk clip unavailable"),
            Diagnostic::ExpressionUnavailable(e) => {
                write!(f, "{} morph target unavailable", e.name())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExpressionController<C = ClipKey, M = NodeKey> {
    keys: KeyBindings,
    bindings: Option<RigBindings<C, M>>,
    state: ControllerState,
    diagnostics: Vec<Diagnostic>,
}

impl<C: Copy, M: Copy> Default for ExpressionController<C, M> {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

impl<C: Copy, M: Copy> ExpressionController<C, M> {
    #[must_use]
    pub fn new(keys: KeyBindings) -> Self {
        Self {
            keys,
            bindings: None,
            state: ControllerState::Idle,
            diagnostics: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.bindings.is_some()
    }

    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.state
    }

    #[must_use]
    pub fn bindings(&self) -> Option<&RigBindings<C, M>> {
        self.bindings.as_ref()
    }

    #[must_use]
    pub fn keys(&self) -> &KeyBindings {
        &self.keys
    }

    /// Drains the diagnostics recorded since the last call.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// One-shot transition to ready. Starts the idle loop if there is one.
    pub fn initialize<R>(&mut self, bindings: RigBindings<C, M>, rig: &mut R) -> Result<()>
    where
        R: Rig<ClipHandle = C, MeshHandle = M>,
    {
        if self.bindings.is_some() {
            return Err(EmoteError::AlreadyInitialized);
        }

        match bindings.idle {
            Some(idle) => rig.start_clip(idle, true),
            None => self.report(Diagnostic::IdleClipUnavailable),
        }

        self.bindings = Some(bindings);
        self.state = ControllerState::Idle;
        info!(
            "Action controls initialized. Use keys {}, {}, {}.",
            self.keys.walk, self.keys.happy, self.keys.surprised
        );
        Ok(())
    }

    /// Handles a key-down event. Unbound keys and keys without a symbol are
    /// ignored, as is anything received before [`initialize`](Self::initialize).
    pub fn on_input<R>(&mut self, key: Key, rig: &mut R)
    where
        R: Rig<ClipHandle = C, MeshHandle = M>,
    {
        if let Some(symbol) = key.symbol() {
            self.on_symbol(symbol, rig);
        }
    }

    /// Same as [`on_input`](Self::on_input) for hosts that deliver the key
    /// as a character.
    pub fn on_symbol<R>(&mut self, symbol: char, rig: &mut R)
    where
        R: Rig<ClipHandle = C, MeshHandle = M>,
    {
        let Some(bindings) = self.bindings else {
            debug!("Key '{symbol}' ignored: controller not initialized");
            return;
        };
        let Some(action) = self.keys.action_for(symbol) else {
            return;
        };

        debug!("Key '{symbol}' pressed: {action:?}");
        match action {
            Action::Walk => self.play_walk(&bindings, rig),
            Action::Express(expression) => self.set_expression(&bindings, expression, rig),
        }
    }

    /// Zeroes every morph target on the bound mesh. Idempotent.
    pub fn reset_expressions<R>(&self, rig: &mut R)
    where
        R: Rig<ClipHandle = C, MeshHandle = M>,
    {
        let Some(mesh) = self.bindings.and_then(|b| b.morph_mesh) else {
            return;
        };
        for index in 0..rig.morph_target_count(mesh) {
            rig.set_influence(mesh, index, 0.0);
        }
    }

    fn play_walk<R>(&mut self, bindings: &RigBindings<C, M>, rig: &mut R)
    where
        R: Rig<ClipHandle = C, MeshHandle = M>,
    {
        self.reset_expressions(rig);

        // Without a walk clip the idle loop keeps running.
        let Some(walk) = bindings.walk else {
            self.report(Diagnostic::WalkClipUnavailable);
            self.state = ControllerState::Idle;
            return;
        };

        if let Some(idle) = bindings.idle {
            rig.stop_clip(idle);
        }
        rig.start_clip(walk, true);
        self.state = ControllerState::Walking;
    }

    fn set_expression<R>(&mut self, bindings: &RigBindings<C, M>, expression: Expression, rig: &mut R)
    where
        R: Rig<ClipHandle = C, MeshHandle = M>,
    {
        if let Some(walk) = bindings.walk {
            rig.stop_clip(walk);
        }
        if let Some(idle) = bindings.idle {
            rig.start_clip(idle, true);
        }
        self.reset_expressions(rig);

        match bindings.target(expression) {
            Some((mesh, index)) => {
                rig.set_influence(mesh, index, 1.0);
                self.state = expression.into();
            }
            None => {
                self.report(Diagnostic::ExpressionUnavailable(expression));
                self.state = ControllerState::Idle;
            }
        }
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }
}
