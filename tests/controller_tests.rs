//! Expression Controller Tests
//!
//! Tests for:
//! - One-shot initialization and the idle loop at rest
//! - Transition table for walk / happy / surprised keys
//! - Mutual exclusion of expressions over arbitrary key sequences
//! - Graceful degradation when clips or targets are missing
//! - Input before initialization

use emote::animation::ClipKey;
use emote::controller::{
    ControllerState, Diagnostic, Expression, ExpressionController, RigBindings,
};
use emote::errors::EmoteError;
use emote::resources::input::Key;
use emote::resources::morph::MorphTargetManager;
use emote::scene::{Model, NodeKey};
use emote::AnimationClip;

struct Character {
    model: Model,
    walk: ClipKey,
    idle: ClipKey,
    face: NodeKey,
}

/// Walk and idle clips, a face mesh with three shape keys.
fn character() -> Character {
    let mut model = Model::new("__root__");
    let root = model.root();
    let face = model.add_child(root, "Face").unwrap();
    model.set_morph_targets(
        face,
        MorphTargetManager::from_names(["Happy_Face", "Surprised_Face", "Blink"]),
    );
    let walk = model.add_clip(AnimationClip::new("WalkAction", 1.2));
    let idle = model.add_clip(AnimationClip::new("Idle", 2.0));
    Character {
        model,
        walk,
        idle,
        face,
    }
}

fn full_bindings(c: &Character) -> RigBindings {
    RigBindings {
        walk: Some(c.walk),
        idle: Some(c.idle),
        morph_mesh: Some(c.face),
        happy: Some(0),
        surprised: Some(1),
    }
}

fn influences(c: &Character) -> Vec<f32> {
    c.model.morph_targets(c.face).unwrap().influences()
}

fn playing(c: &Character, key: ClipKey) -> bool {
    c.model.mixer.action(key).unwrap().is_playing()
}

fn looping(c: &Character, key: ClipKey) -> bool {
    c.model.mixer.action(key).unwrap().is_looping()
}

fn ready(c: &mut Character, bindings: RigBindings) -> ExpressionController {
    let mut controller = ExpressionController::default();
    controller.initialize(bindings, &mut c.model).unwrap();
    controller
}

fn ready_full(c: &mut Character) -> ExpressionController {
    let bindings = full_bindings(c);
    ready(c, bindings)
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn initialize_starts_idle_loop() {
    let mut c = character();
    let controller = ready_full(&mut c);

    assert!(controller.is_ready());
    assert_eq!(controller.state(), ControllerState::Idle);
    assert!(playing(&c, c.idle) && looping(&c, c.idle));
    assert!(!playing(&c, c.walk));
}

#[test]
fn initialize_without_idle_reports() {
    let mut c = character();
    let bindings = RigBindings {
        idle: None,
        ..full_bindings(&c)
    };
    let mut controller = ready(&mut c, bindings);

    assert_eq!(
        controller.take_diagnostics(),
        vec![Diagnostic::IdleClipUnavailable]
    );
    assert!(!playing(&c, c.idle));
    assert!(!playing(&c, c.walk));
}

#[test]
fn initialize_twice_is_rejected() {
    let mut c = character();
    let mut controller = ready_full(&mut c);

    let err = controller
        .initialize(RigBindings::default(), &mut c.model)
        .unwrap_err();
    assert!(matches!(err, EmoteError::AlreadyInitialized));
    // First bindings are kept
    assert_eq!(controller.bindings(), Some(&full_bindings(&c)));
}

#[test]
fn input_before_initialize_is_ignored() {
    let mut c = character();
    let mut controller: ExpressionController = ExpressionController::default();

    for key in [Key::Key1, Key::Key2, Key::Key3] {
        controller.on_input(key, &mut c.model);
    }

    assert!(!controller.is_ready());
    assert_eq!(controller.state(), ControllerState::Idle);
    assert!(controller.take_diagnostics().is_empty());
    assert!(!playing(&c, c.walk) && !playing(&c, c.idle));
    assert_eq!(influences(&c), vec![0.0, 0.0, 0.0]);
}

// ============================================================================
// Transitions
// ============================================================================

#[test]
fn walk_clears_expressions_and_loops_walk() {
    let mut c = character();
    let mut controller = ready_full(&mut c);

    controller.on_input(Key::Key2, &mut c.model);
    controller.on_input(Key::Key1, &mut c.model);

    assert_eq!(controller.state(), ControllerState::Walking);
    assert_eq!(influences(&c), vec![0.0, 0.0, 0.0]);
    assert!(playing(&c, c.walk) && looping(&c, c.walk));
    assert!(!playing(&c, c.idle));
}

#[test]
fn happy_then_surprised_switches_target() {
    let mut c = character();
    let mut controller = ready_full(&mut c);

    controller.on_input(Key::Key2, &mut c.model);
    assert_eq!(controller.state(), ControllerState::ExpressingHappy);
    assert_eq!(influences(&c), vec![1.0, 0.0, 0.0]);

    controller.on_input(Key::Key3, &mut c.model);
    assert_eq!(controller.state(), ControllerState::ExpressingSurprised);
    assert_eq!(influences(&c), vec![0.0, 1.0, 0.0]);
}

#[test]
fn expression_stops_walk_and_restores_idle() {
    let mut c = character();
    let mut controller = ready_full(&mut c);

    controller.on_input(Key::Key1, &mut c.model);
    controller.on_input(Key::Key3, &mut c.model);

    assert!(!playing(&c, c.walk));
    assert!(playing(&c, c.idle) && looping(&c, c.idle));
}

#[test]
fn expression_clears_unrelated_shape_keys() {
    let mut c = character();
    let mut controller = ready_full(&mut c);

    // Something else (a blink track, the user) moved a third key
    c.model
        .morph_targets_mut(c.face)
        .unwrap()
        .get_target_mut(2)
        .unwrap()
        .set_influence(0.7);

    controller.on_input(Key::Key2, &mut c.model);
    assert_eq!(influences(&c), vec![1.0, 0.0, 0.0]);
}

#[test]
fn unbound_keys_do_nothing() {
    let mut c = character();
    let mut controller = ready_full(&mut c);
    controller.on_input(Key::Key2, &mut c.model);

    for key in [Key::Key4, Key::Key0, Key::Space, Key::Escape, Key::W] {
        controller.on_input(key, &mut c.model);
    }

    assert_eq!(controller.state(), ControllerState::ExpressingHappy);
    assert_eq!(influences(&c), vec![1.0, 0.0, 0.0]);
    assert!(controller.take_diagnostics().is_empty());
}

#[test]
fn numpad_digits_drive_the_controller() {
    let mut c = character();
    let mut controller = ready_full(&mut c);

    controller.on_input(Key::Numpad1, &mut c.model);
    assert_eq!(controller.state(), ControllerState::Walking);
}

#[test]
fn custom_bindings_are_honoured() {
    let mut c = character();
    let keys = emote::KeyBindings {
        walk: 'w',
        happy: 'q',
        surprised: 'e',
    };
    let mut controller = ExpressionController::new(keys);
    controller
        .initialize(full_bindings(&c), &mut c.model)
        .unwrap();

    controller.on_input(Key::Key1, &mut c.model);
    assert_eq!(controller.state(), ControllerState::Idle);

    controller.on_input(Key::E, &mut c.model);
    assert_eq!(controller.state(), ControllerState::ExpressingSurprised);

    controller.on_symbol('w', &mut c.model);
    assert_eq!(controller.state(), ControllerState::Walking);
}

// ============================================================================
// Invariants
// ============================================================================

#[test]
fn at_most_one_expression_over_any_sequence() {
    let mut c = character();
    let mut controller = ready_full(&mut c);

    // Deterministic pseudo-random walk over the three keys plus noise
    let keys = [Key::Key1, Key::Key2, Key::Key3, Key::Key7];
    let mut seed: u32 = 0x9E37_79B9;
    for _ in 0..500 {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        let key = keys[(seed % 4) as usize];
        controller.on_input(key, &mut c.model);

        let nonzero = influences(&c).iter().filter(|&&w| w > 0.0).count();
        assert!(nonzero <= 1, "{nonzero} targets active after {key:?}");

        match controller.state() {
            ControllerState::Walking => {
                assert_eq!(nonzero, 0);
                assert!(playing(&c, c.walk) && looping(&c, c.walk));
            }
            ControllerState::ExpressingHappy | ControllerState::ExpressingSurprised => {
                assert_eq!(nonzero, 1);
                assert!(!playing(&c, c.walk));
                assert!(playing(&c, c.idle));
            }
            ControllerState::Idle => assert_eq!(nonzero, 0),
        }
    }
}

#[test]
fn reset_expressions_is_idempotent() {
    let mut c = character();
    let mut controller = ready_full(&mut c);
    controller.on_input(Key::Key3, &mut c.model);

    controller.reset_expressions(&mut c.model);
    let once = influences(&c);
    let state_once = controller.state();
    controller.reset_expressions(&mut c.model);

    assert_eq!(once, vec![0.0, 0.0, 0.0]);
    assert_eq!(influences(&c), once);
    assert_eq!(controller.state(), state_once);
}

// ============================================================================
// Missing Resources
// ============================================================================

#[test]
fn missing_walk_reports_and_keeps_idle() {
    let mut c = character();
    let bindings = RigBindings {
        walk: None,
        ..full_bindings(&c)
    };
    let mut controller = ready(&mut c, bindings);
    controller.on_input(Key::Key2, &mut c.model);
    let idle_before = (playing(&c, c.idle), looping(&c, c.idle));

    controller.on_input(Key::Key1, &mut c.model);

    assert_eq!(
        controller.take_diagnostics(),
        vec![Diagnostic::WalkClipUnavailable]
    );
    assert_eq!((playing(&c, c.idle), looping(&c, c.idle)), idle_before);
    assert_eq!(controller.state(), ControllerState::Idle);
    assert_eq!(influences(&c), vec![0.0, 0.0, 0.0]);
}

#[test]
fn missing_morph_mesh_makes_expressions_no_ops() {
    let mut c = character();
    let bindings = RigBindings {
        morph_mesh: None,
        ..full_bindings(&c)
    };
    let mut controller = ready(&mut c, bindings);

    controller.on_input(Key::Key2, &mut c.model);
    controller.on_input(Key::Key3, &mut c.model);

    assert_eq!(
        controller.take_diagnostics(),
        vec![
            Diagnostic::ExpressionUnavailable(Expression::Happy),
            Diagnostic::ExpressionUnavailable(Expression::Surprised),
        ]
    );
    assert_eq!(influences(&c), vec![0.0, 0.0, 0.0]);
    assert_eq!(controller.state(), ControllerState::Idle);
}

#[test]
fn scenario_surprised_absent() {
    // clips = {walk, idle}, targets = {happy}
    let mut c = character();
    let bindings = RigBindings {
        surprised: None,
        ..full_bindings(&c)
    };
    let mut controller = ready(&mut c, bindings);

    controller.on_input(Key::Key2, &mut c.model);
    assert_eq!(influences(&c)[0], 1.0);
    assert!(playing(&c, c.idle) && looping(&c, c.idle));
    assert_eq!(controller.state(), ControllerState::ExpressingHappy);

    controller.on_input(Key::Key3, &mut c.model);
    assert_eq!(influences(&c)[0], 0.0);
    assert_eq!(
        controller.take_diagnostics(),
        vec![Diagnostic::ExpressionUnavailable(Expression::Surprised)]
    );
    assert!(playing(&c, c.idle) && looping(&c, c.idle));
    assert_eq!(controller.state(), ControllerState::Idle);

    controller.on_input(Key::Key1, &mut c.model);
    assert_eq!(influences(&c), vec![0.0, 0.0, 0.0]);
    assert!(playing(&c, c.walk) && looping(&c, c.walk));
    assert!(!playing(&c, c.idle));
    assert_eq!(controller.state(), ControllerState::Walking);
}
