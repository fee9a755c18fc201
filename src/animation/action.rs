use std::sync::Arc;

use crate::animation::clip::AnimationClip;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    Once,
    Loop,
}

/// Playback state of one clip.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub loop_mode: LoopMode,
    playing: bool,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            loop_mode: LoopMode::Loop,
            playing: false,
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.clip.name
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    #[must_use]
    pub fn is_looping(&self) -> bool {
        self.loop_mode != LoopMode::Once
    }

    /// Rewinds and starts playback. `looping` selects between
    /// [`LoopMode::Loop`] and [`LoopMode::Once`].
    pub fn start(&mut self, looping: bool) {
        self.loop_mode = if looping { LoopMode::Loop } else { LoopMode::Once };
        self.time = 0.0;
        self.playing = true;
    }

    /// Stops playback and rewinds.
    pub fn stop(&mut self) {
        self.playing = false;
        self.time = 0.0;
    }

    /// Core logic: advance time.
    pub fn update(&mut self, dt: f32) {
        if !self.playing {
            return;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            return;
        }

        // 1. Accumulate time
        self.time += dt * self.time_scale;

        // 2. Handle loop mode
        match self.loop_mode {
            LoopMode::Once => {
                // Play once, hold the end pose
                if self.time >= duration {
                    self.time = duration;
                    self.playing = false;
                } else if self.time < 0.0 {
                    self.time = 0.0;
                    self.playing = false;
                }
            }
            LoopMode::Loop => {
                if self.time >= duration {
                    self.time %= duration;
                } else if self.time < 0.0 {
                    // Reverse playback wraps to the end
                    self.time = duration + (self.time % duration);
                }
            }
        }
    }
}
