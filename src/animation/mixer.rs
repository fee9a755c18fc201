use std::sync::Arc;

use log::debug;
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::animation::action::AnimationAction;
use crate::animation::clip::AnimationClip;

new_key_type! {
    /// Stable handle to one clip's action inside an [`AnimationMixer`].
    pub struct ClipKey;
}

/// Owns every action of a loaded model and advances the playing ones.
#[derive(Debug, Default)]
pub struct AnimationMixer {
    actions: SlotMap<ClipKey, AnimationAction>,
    by_name: FxHashMap<String, ClipKey>,
}

impl AnimationMixer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a clip. If a clip with the same name is already present the
    /// name keeps pointing at the first one.
    pub fn add_clip(&mut self, clip: AnimationClip) -> ClipKey {
        let name = clip.name.clone();
        let key = self.actions.insert(AnimationAction::new(Arc::new(clip)));
        self.by_name.entry(name).or_insert(key);
        key
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<ClipKey> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn action(&self, key: ClipKey) -> Option<&AnimationAction> {
        self.actions.get(key)
    }

    pub fn action_mut(&mut self, key: ClipKey) -> Option<&mut AnimationAction> {
        self.actions.get_mut(key)
    }

    /// Clip names in registration order.
    #[must_use]
    pub fn list_animations(&self) -> Vec<&str> {
        self.actions.values().map(AnimationAction::name).collect()
    }

    pub fn play(&mut self, key: ClipKey, looping: bool) {
        if let Some(action) = self.actions.get_mut(key) {
            debug!("Start clip '{}' (loop: {looping})", action.name());
            action.start(looping);
        }
    }

    pub fn stop(&mut self, key: ClipKey) {
        if let Some(action) = self.actions.get_mut(key) {
            if action.is_playing() {
                debug!("Stop clip '{}'", action.name());
            }
            action.stop();
        }
    }

    pub fn update(&mut self, dt: f32) {
        for action in self.actions.values_mut() {
            action.update(dt);
        }
    }
}
