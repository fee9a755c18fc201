//! Stage lifecycle around the controller.
//!
//! The host loads the model asynchronously. [`Stage`] receives that result
//! once, places the model, optionally negotiates an immersive session, then
//! resolves resources and initializes the controller. A failed load leaves
//! the stage inert with an optional placeholder; a refused session falls
//! back to a plain 3D view on a ground plane.

use flume::{Receiver, TryRecvError};
use log::{debug, error, info, warn};

use crate::config::{ControllerProfile, SessionMode};
use crate::controller::{ExpressionController, resolve};
use crate::errors::{EmoteError, Result};
use crate::resources::input::{Input, Key};
use crate::scene::Model;

/// Host side of XR session negotiation.
pub trait XrRuntime {
    fn request_session(&mut self, mode: SessionMode) -> Result<()>;
}

/// Runtime for hosts without any XR support. Every request is refused.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoXr;

impl XrRuntime for NoXr {
    fn request_session(&mut self, mode: SessionMode) -> Result<()> {
        Err(EmoteError::XrUnavailable(format!(
            "{mode:?} is not supported on this host"
        )))
    }
}

/// Scene additions the host should render next to (or instead of) the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Prop {
    /// Stand-in for a model that failed to load, centred at height `y`.
    Sphere { diameter: f32, y: f32 },
    /// Floor for the non-AR fallback view.
    Ground { width: f32, height: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagePhase {
    Loading,
    Ready,
    Failed,
}

pub struct Stage {
    profile: ControllerProfile,
    controller: ExpressionController,
    model: Option<Model>,
    props: Vec<Prop>,
    session: SessionMode,
    phase: StagePhase,
    loader: Option<Receiver<Result<Model>>>,
}

impl Stage {
    #[must_use]
    pub fn new(profile: ControllerProfile) -> Self {
        let controller = ExpressionController::new(profile.keys);
        Self {
            profile,
            controller,
            model: None,
            props: Vec::new(),
            session: SessionMode::Inline,
            phase: StagePhase::Loading,
            loader: None,
        }
    }

    #[must_use]
    pub fn profile(&self) -> &ControllerProfile {
        &self.profile
    }

    #[must_use]
    pub fn controller(&self) -> &ExpressionController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ExpressionController {
        &mut self.controller
    }

    #[must_use]
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    #[must_use]
    pub fn props(&self) -> &[Prop] {
        &self.props
    }

    /// Session mode actually in effect.
    #[must_use]
    pub fn session(&self) -> SessionMode {
        self.session
    }

    #[must_use]
    pub fn phase(&self) -> StagePhase {
        self.phase
    }

    /// Runs `load` on a worker thread. The result is picked up by
    /// [`poll`](Self::poll).
    pub fn spawn_loader<F>(&mut self, load: F)
    where
        F: FnOnce() -> Result<Model> + Send + 'static,
    {
        let (tx, rx) = flume::bounded(1);
        std::thread::spawn(move || {
            // The stage may have been dropped meanwhile.
            let _ = tx.send(load());
        });
        self.loader = Some(rx);
    }

    /// Checks for a finished load. Returns `true` on the frame the model
    /// (or its failure) is delivered.
    pub fn poll<X: XrRuntime>(&mut self, xr: &mut X) -> bool {
        let Some(rx) = &self.loader else {
            return false;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(EmoteError::LoaderDisconnected),
        };
        self.loader = None;
        self.on_model_loaded(result, xr);
        true
    }

    /// Completion callback of the asynchronous model load. Only the first
    /// call has any effect.
    pub fn on_model_loaded<X: XrRuntime>(&mut self, result: Result<Model>, xr: &mut X) {
        if self.phase != StagePhase::Loading {
            warn!("Model delivered twice, ignoring the second result");
            return;
        }

        let mut model = match result {
            Ok(model) => model,
            Err(e) => {
                error!(
                    "Failed to load model '{}': {e}",
                    self.profile.model.url()
                );
                if let Some(placeholder) = self.profile.placeholder {
                    self.props.push(Prop::Sphere {
                        diameter: placeholder.diameter,
                        y: placeholder.height,
                    });
                }
                self.phase = StagePhase::Failed;
                return;
            }
        };
        info!("Model '{}' loaded successfully", self.profile.model.file_name);

        model.transform.scale_in_place(self.profile.placement.scale);
        model.transform.position = self.profile.placement.position();

        self.start_session(xr);

        let bindings = resolve(&model, &self.profile);
        if let Err(e) = self.controller.initialize(bindings, &mut model) {
            warn!("Controller setup skipped: {e}");
        }

        self.model = Some(model);
        self.phase = StagePhase::Ready;
    }

    fn start_session<X: XrRuntime>(&mut self, xr: &mut X) {
        match self.profile.session {
            SessionMode::Inline => {
                self.session = SessionMode::Inline;
            }
            SessionMode::ImmersiveAr => match xr.request_session(SessionMode::ImmersiveAr) {
                Ok(()) => {
                    info!("Immersive AR session started");
                    self.session = SessionMode::ImmersiveAr;
                }
                Err(e) => {
                    error!("XR initialization failed, running in 3D fallback: {e}");
                    let ground = self.profile.fallback_ground;
                    self.props.push(Prop::Ground {
                        width: ground.width,
                        height: ground.height,
                    });
                    self.session = SessionMode::Inline;
                }
            },
        }
    }

    /// Forwards a key-down event to the controller.
    pub fn handle_key(&mut self, key: Key) {
        match &mut self.model {
            Some(model) => self.controller.on_input(key, model),
            None => debug!("Key {key:?} ignored: no model"),
        }
    }

    /// Forwards every key pressed this frame.
    pub fn handle_input(&mut self, input: &Input) {
        for key in input.keys_down() {
            self.handle_key(key);
        }
    }

    /// Advances clip playback.
    /// Advances the model's clips. Non-finite `dt` is dropped.
    pub fn update(&mut self, dt: f32) {
        if !dt.is_finite() {
            warn!("Ignoring non-finite frame delta {dt}");
            return;
        }
        if let Some(model) = &mut self.model {
            model.mixer.update(dt);
        }
    }
}
