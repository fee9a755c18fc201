//! Resource Resolution Tests
//!
//! Tests for:
//! - Clip lookup by name, including unexpected (unconfigured) clips
//! - Morph mesh selection: first with targets vs. named child
//! - Target lookup by name and by index, out of range indices
//! - Both shipped profiles against models built the way they expect

use emote::config::{ControllerProfile, MeshSelector, TargetSelector};
use emote::controller::resolve;
use emote::resources::morph::MorphTargetManager;
use emote::scene::Model;
use emote::AnimationClip;

/// Root with a body mesh and a face mesh carrying the two named shape keys.
fn playground_model() -> Model {
    let mut model = Model::new("__root__");
    let root = model.root();
    let armature = model.add_child(root, "Armature").unwrap();
    let _body = model.add_child(armature, "Body").unwrap();
    let face = model.add_child(armature, "Face").unwrap();
    model.set_morph_targets(
        face,
        MorphTargetManager::from_names(["Happy_Face", "Surprised_Face"]),
    );
    model.add_clip(AnimationClip::new("WalkAction", 1.0));
    model.add_clip(AnimationClip::new("Idle", 2.0));
    model
}

/// A `Head` child of the root with unnamed shape keys, one walk clip.
fn webxr_model() -> Model {
    let mut model = Model::new("__root__");
    let root = model.root();
    let head = model.add_child(root, "Head").unwrap();
    model.set_morph_targets(head, MorphTargetManager::from_names(["Key 1", "Key 2"]));
    model.add_clip(AnimationClip::new("Armature.001Action", 1.0));
    model
}

#[test]
fn playground_profile_resolves_everything() {
    let model = playground_model();
    let bindings = resolve(&model, &ControllerProfile::playground());

    assert_eq!(bindings.walk, model.mixer.find("WalkAction"));
    assert_eq!(bindings.idle, model.mixer.find("Idle"));
    assert!(bindings.walk.is_some() && bindings.idle.is_some());

    let face = bindings.morph_mesh.expect("face mesh");
    assert_eq!(model.node(face).unwrap().name, "Face");
    assert_eq!(bindings.happy, Some(0));
    assert_eq!(bindings.surprised, Some(1));
}

#[test]
fn webxr_profile_resolves_head_by_index() {
    let model = webxr_model();
    let bindings = resolve(&model, &ControllerProfile::webxr());

    assert!(bindings.walk.is_some());
    assert_eq!(bindings.idle, None);
    let head = bindings.morph_mesh.expect("head mesh");
    assert_eq!(model.node(head).unwrap().name, "Head");
    assert_eq!(bindings.happy, Some(0));
    assert_eq!(bindings.surprised, Some(1));
}

#[test]
fn profiles_do_not_cross_resolve() {
    // Each variant's names are specific to its own export
    let bindings = resolve(&webxr_model(), &ControllerProfile::playground());
    assert_eq!(bindings.walk, None);
    assert_eq!(bindings.idle, None);
    assert!(bindings.morph_mesh.is_some());
    assert_eq!(bindings.happy, None);
    assert_eq!(bindings.surprised, None);

    // `Face` is a grandchild here, not a direct child named `Head`
    let bindings = resolve(&playground_model(), &ControllerProfile::webxr());
    assert_eq!(bindings.walk, None);
    assert_eq!(bindings.morph_mesh, None);
    assert_eq!(bindings.happy, None);
}

#[test]
fn index_out_of_range_is_missing() {
    let mut model = webxr_model();
    let head = model.find_child(model.root(), "Head").unwrap();
    model.set_morph_targets(head, MorphTargetManager::from_names(["Only"]));

    let bindings = resolve(&model, &ControllerProfile::webxr());
    assert_eq!(bindings.happy, Some(0));
    assert_eq!(bindings.surprised, None);
}

#[test]
fn named_mesh_without_targets_is_missing() {
    let mut model = Model::new("__root__");
    let root = model.root();
    model.add_child(root, "Head").unwrap();

    let bindings = resolve(&model, &ControllerProfile::webxr());
    assert_eq!(bindings.morph_mesh, None);
    assert_eq!(bindings.happy, None);
    assert_eq!(bindings.surprised, None);
}

#[test]
fn no_target_selectors_skips_mesh_lookup() {
    let mut profile = ControllerProfile::playground();
    profile.targets.happy = None;
    profile.targets.surprised = None;

    let bindings = resolve(&playground_model(), &profile);
    assert_eq!(bindings.morph_mesh, None);
    assert!(bindings.walk.is_some());
}

#[test]
fn mixed_selectors() {
    let mut profile = ControllerProfile::playground();
    profile.morph_mesh = MeshSelector::FirstWithMorphTargets;
    profile.targets.happy = Some(TargetSelector::Index(1));
    profile.targets.surprised = Some(TargetSelector::Name("Happy_Face".into()));

    let bindings = resolve(&playground_model(), &profile);
    assert_eq!(bindings.happy, Some(1));
    assert_eq!(bindings.surprised, Some(0));
}
