//! Blend-shape (morph target) state.
//!
//! A [`MorphTargetManager`] belongs to one mesh and holds its targets in
//! export order. Only the scalar influence is modelled; vertex deltas stay
//! with whatever renders the mesh.

use rustc_hash::FxHashMap;

/// A named deformation of a mesh with a scalar influence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphTarget {
    name: String,
    influence: f32,
}

impl MorphTarget {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            influence: 0.0,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn influence(&self) -> f32 {
        self.influence
    }

    /// Values outside `[0, 1]` are clamped, NaN is stored as 0.
    pub fn set_influence(&mut self, influence: f32) {
        self.influence = if influence.is_nan() {
            0.0
        } else {
            influence.clamp(0.0, 1.0)
        };
    }
}

#[derive(Debug, Clone, Default)]
pub struct MorphTargetManager {
    targets: Vec<MorphTarget>,
    by_name: FxHashMap<String, usize>,
}

impl MorphTargetManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a manager from target names in export order.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut manager = Self::new();
        for name in names {
            manager.add_target(MorphTarget::new(name));
        }
        manager
    }

    /// Appends a target and returns its index. A duplicate name keeps the
    /// first index for name lookup, matching glTF exporters that allow it.
    pub fn add_target(&mut self, target: MorphTarget) -> usize {
        let index = self.targets.len();
        self.by_name.entry(target.name.clone()).or_insert(index);
        self.targets.push(target);
        index
    }

    #[must_use]
    pub fn num_targets(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    #[must_use]
    pub fn get_target(&self, index: usize) -> Option<&MorphTarget> {
        self.targets.get(index)
    }

    pub fn get_target_mut(&mut self, index: usize) -> Option<&mut MorphTarget> {
        self.targets.get_mut(index)
    }

    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MorphTarget> {
        self.targets.iter()
    }

    /// Current influences in target order.
    #[must_use]
    pub fn influences(&self) -> Vec<f32> {
        self.targets.iter().map(MorphTarget::influence).collect()
    }
}
