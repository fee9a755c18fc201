//! One-shot lookup of the controller's resources in a freshly loaded model.

use log::{debug, error, info, warn};

use crate::animation::ClipKey;
use crate::config::{ControllerProfile, MeshSelector, TargetSelector};
use crate::controller::{Expression, RigBindings};
use crate::scene::{Model, NodeKey};

/// Resolves the clips, morph mesh and targets named by `profile`.
///
/// Every resource the profile asks for is logged as found or missing.
/// Missing resources come back as `None`; the controller turns the
/// corresponding action into a no-op.
#[must_use]
pub fn resolve(model: &Model, profile: &ControllerProfile) -> RigBindings {
    let walk = resolve_clip(model, "walk", profile.clips.walk.as_deref());
    let idle = resolve_clip(model, "idle", profile.clips.idle.as_deref());

    let wants_targets = profile.targets.happy.is_some() || profile.targets.surprised.is_some();
    let morph_mesh = if wants_targets {
        resolve_mesh(model, &profile.morph_mesh)
    } else {
        None
    };

    let mut bindings = RigBindings {
        walk,
        idle,
        morph_mesh,
        happy: None,
        surprised: None,
    };

    if let Some(mesh) = morph_mesh {
        bindings.happy = resolve_target(model, mesh, Expression::Happy, profile);
        bindings.surprised = resolve_target(model, mesh, Expression::Surprised, profile);
    }

    bindings
}

fn resolve_clip(model: &Model, role: &str, name: Option<&str>) -> Option<ClipKey> {
    let Some(name) = name else {
        debug!("No {role} clip configured");
        return None;
    };

    let key = model.mixer.find(name);
    if key.is_some() {
        info!("Found '{name}' animation for {role}");
    } else {
        warn!(
            "'{name}' animation not found (available: {:?})",
            model.mixer.list_animations()
        );
    }
    key
}

fn resolve_mesh(model: &Model, selector: &MeshSelector) -> Option<NodeKey> {
    let mesh = match selector {
        MeshSelector::FirstWithMorphTargets => model.first_morph_mesh(),
        MeshSelector::Named(name) => model
            .find_child(model.root(), name)
            .filter(|&k| model.node(k).is_some_and(|n| n.has_morph_targets())),
    };

    match mesh.and_then(|k| model.morph_targets(k)) {
        Some(manager) => info!("Found {} morph targets in the model", manager.num_targets()),
        None => error!(
            "Morph target manager not found ({selector:?}), facial expressions are unavailable"
        ),
    }
    mesh
}

fn resolve_target(
    model: &Model,
    mesh: NodeKey,
    expression: Expression,
    profile: &ControllerProfile,
) -> Option<usize> {
    let selector = profile.targets.get(expression)?;
    let manager = model.morph_targets(mesh)?;

    let index = match selector {
        TargetSelector::Index(i) => (*i < manager.num_targets()).then_some(*i),
        TargetSelector::Name(name) => manager.index_of(name),
    };

    match index.and_then(|i| manager.get_target(i)) {
        Some(target) => info!(
            "Found {selector} morph target '{}' for {}",
            target.name(),
            expression.name()
        ),
        None => warn!("{selector} morph target not found for {}", expression.name()),
    }
    index
}
