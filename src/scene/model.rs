//! A loaded character model.
//!
//! [`Model`] is what the host hands over once the asset has finished loading:
//! a small node hierarchy (some nodes carrying a [`MorphTargetManager`]), the
//! animation mixer with every clip found in the file, and the root transform.

use slotmap::{SlotMap, new_key_type};

use crate::animation::{AnimationClip, AnimationMixer, ClipKey};
use crate::controller::Rig;
use crate::resources::morph::MorphTargetManager;
use crate::scene::transform::Transform;

new_key_type! {
    pub struct NodeKey;
}

#[derive(Debug, Clone)]
pub struct MeshNode {
    pub name: String,
    pub parent: Option<NodeKey>,
    pub children: Vec<NodeKey>,
    pub morph_targets: Option<MorphTargetManager>,
}

impl MeshNode {
    fn new(name: String, parent: Option<NodeKey>) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            morph_targets: None,
        }
    }

    /// True when the node carries at least one morph target.
    #[must_use]
    pub fn has_morph_targets(&self) -> bool {
        self.morph_targets.as_ref().is_some_and(|m| !m.is_empty())
    }
}

#[derive(Debug)]
pub struct Model {
    nodes: SlotMap<NodeKey, MeshNode>,
    root: NodeKey,
    pub transform: Transform,
    pub mixer: AnimationMixer,
}

impl Model {
    #[must_use]
    pub fn new(root_name: impl Into<String>) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(MeshNode::new(root_name.into(), None));
        Self {
            nodes,
            root,
            transform: Transform::new(),
            mixer: AnimationMixer::new(),
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Adds a child node. Returns `None` if `parent` does not exist.
    pub fn add_child(&mut self, parent: NodeKey, name: impl Into<String>) -> Option<NodeKey> {
        if !self.nodes.contains_key(parent) {
            return None;
        }
        let key = self.nodes.insert(MeshNode::new(name.into(), Some(parent)));
        self.nodes[parent].children.push(key);
        Some(key)
    }

    pub fn set_morph_targets(&mut self, node: NodeKey, manager: MorphTargetManager) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.morph_targets = Some(manager);
        }
    }

    pub fn add_clip(&mut self, clip: AnimationClip) -> ClipKey {
        self.mixer.add_clip(clip)
    }

    #[must_use]
    pub fn node(&self, key: NodeKey) -> Option<&MeshNode> {
        self.nodes.get(key)
    }

    #[must_use]
    pub fn morph_targets(&self, key: NodeKey) -> Option<&MorphTargetManager> {
        self.nodes.get(key).and_then(|n| n.morph_targets.as_ref())
    }

    pub fn morph_targets_mut(&mut self, key: NodeKey) -> Option<&mut MorphTargetManager> {
        self.nodes.get_mut(key).and_then(|n| n.morph_targets.as_mut())
    }

    /// Direct child of `parent` with the given name.
    #[must_use]
    pub fn find_child(&self, parent: NodeKey, name: &str) -> Option<NodeKey> {
        self.nodes
            .get(parent)?
            .children
            .iter()
            .copied()
            .find(|&c| self.nodes[c].name == name)
    }

    /// All descendants of `node` in depth-first pre-order, `node` excluded.
    #[must_use]
    pub fn descendants(&self, node: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let Some(start) = self.nodes.get(node) else {
            return out;
        };
        let mut stack: Vec<NodeKey> = start.children.iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            out.push(key);
            stack.extend(self.nodes[key].children.iter().rev().copied());
        }
        out
    }

    /// First descendant of the root whose morph target manager is non-empty.
    #[must_use]
    pub fn first_morph_mesh(&self) -> Option<NodeKey> {
        self.descendants(self.root)
            .into_iter()
            .find(|&k| self.nodes[k].has_morph_targets())
    }

    /// Every morph influence in the model, keyed by node name and target name.
    #[must_use]
    pub fn nonzero_influences(&self) -> Vec<(&str, &str, f32)> {
        self.nodes
            .values()
            .filter_map(|n| n.morph_targets.as_ref().map(|m| (n.name.as_str(), m)))
            .flat_map(|(node, m)| {
                m.iter()
                    .filter(|t| t.influence() > 0.0)
                    .map(move |t| (node, t.name(), t.influence()))
            })
            .collect()
    }
}

impl Rig for Model {
    type ClipHandle = ClipKey;
    type MeshHandle = NodeKey;

    fn start_clip(&mut self, clip: ClipKey, looping: bool) {
        self.mixer.play(clip, looping);
    }

    fn stop_clip(&mut self, clip: ClipKey) {
        self.mixer.stop(clip);
    }

    fn morph_target_count(&self, mesh: NodeKey) -> usize {
        self.morph_targets(mesh).map_or(0, MorphTargetManager::num_targets)
    }

    fn set_influence(&mut self, mesh: NodeKey, index: usize, influence: f32) {
        if let Some(target) = self
            .morph_targets_mut(mesh)
            .and_then(|m| m.get_target_mut(index))
        {
            target.set_influence(influence);
        }
    }
}
