//! Puppet viewer
//!
//! Opens a window and drives the walk/expression controller from the
//! keyboard: `1` walks, `2` smiles, `3` looks surprised. Rendering is left
//! out; every state change is logged instead.
//!
//! ```text
//! puppet_viewer [playground | webxr | path/to/profile.json] [--fail-load]
//! ```
//!
//! The model is produced on a loader thread after a short delay, standing in
//! for the network fetch a real host performs.

use std::sync::Arc;
use std::time::{Duration, Instant};

use emote::app::input_adapter::process_window_event;
use emote::config::{ControllerProfile, MeshSelector, TargetSelector};
use emote::{
    AnimationClip, ControllerState, EmoteError, Input, MorphTargetManager, Model, NoXr, Stage,
};
use log::{info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

const FAKE_FETCH_DELAY: Duration = Duration::from_millis(400);

/// Builds a character exposing exactly the resources `profile` asks for.
fn synthetic_model(profile: &ControllerProfile) -> Model {
    let mut model = Model::new("__root__");
    let root = model.root();

    let mesh = match &profile.morph_mesh {
        MeshSelector::Named(name) => model.add_child(root, name.as_str()),
        MeshSelector::FirstWithMorphTargets => model
            .add_child(root, "Armature")
            .and_then(|armature| model.add_child(armature, "Face")),
    };

    let names = [&profile.targets.happy, &profile.targets.surprised]
        .into_iter()
        .enumerate()
        .map(|(i, selector)| match selector {
            Some(TargetSelector::Name(name)) => name.clone(),
            _ => format!("Key {}", i + 1),
        });
    if let Some(mesh) = mesh {
        model.set_morph_targets(mesh, MorphTargetManager::from_names(names));
    }

    if let Some(walk) = &profile.clips.walk {
        model.add_clip(AnimationClip::new(walk.as_str(), 1.2));
    }
    if let Some(idle) = &profile.clips.idle {
        model.add_clip(AnimationClip::new(idle.as_str(), 2.0));
    }
    model
}

fn load_profile(arg: Option<&str>) -> anyhow::Result<ControllerProfile> {
    let Some(arg) = arg else {
        return Ok(ControllerProfile::playground());
    };
    if let Some(preset) = ControllerProfile::preset(arg) {
        return Ok(preset);
    }
    Ok(ControllerProfile::from_path(arg)?)
}

struct Viewer {
    window: Option<Arc<Window>>,
    stage: Stage,
    input: Input,
    last_frame: Instant,
    last_state: ControllerState,
}

impl Viewer {
    fn new(profile: ControllerProfile, fail_load: bool) -> Self {
        let mut stage = Stage::new(profile.clone());
        let url = profile.model.url();
        stage.spawn_loader(move || {
            info!("Fetching {url}");
            std::thread::sleep(FAKE_FETCH_DELAY);
            if fail_load {
                return Err(EmoteError::ModelLoad(format!("{url}: 404 Not Found")));
            }
            Ok(synthetic_model(&profile))
        });

        Self {
            window: None,
            stage,
            input: Input::new(),
            last_frame: Instant::now(),
            last_state: ControllerState::Idle,
        }
    }

    fn frame(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        if self.stage.poll(&mut NoXr) {
            for prop in self.stage.props() {
                info!("Scene prop: {prop:?}");
            }
        }

        self.stage.handle_input(&self.input);
        self.input.start_frame();
        self.stage.update(dt);

        for diagnostic in self.stage.controller_mut().take_diagnostics() {
            warn!("Skipped: {diagnostic}");
        }

        let state = self.stage.controller().state();
        if state != self.last_state {
            self.last_state = state;
            let influences = self
                .stage
                .model()
                .map(Model::nonzero_influences)
                .unwrap_or_default();
            info!("State: {state:?}, active shape keys: {influences:?}");
            if let Some(window) = &self.window {
                window.set_title(&format!("Puppet Viewer: {state:?}"));
            }
        }
    }
}

impl ApplicationHandler for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attributes = Window::default_attributes().with_title("Puppet Viewer");
        match event_loop.create_window(attributes) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if process_window_event(&mut self.input, &event) {
            return;
        }
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => self.frame(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let fail_load = args.iter().any(|a| a == "--fail-load");
    let profile_arg = args.iter().find(|a| !a.starts_with("--")).map(String::as_str);
    let profile = load_profile(profile_arg)?;
    info!("Using profile '{}'", profile.name);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut viewer = Viewer::new(profile, fail_load);
    event_loop.run_app(&mut viewer)?;
    Ok(())
}
