/// A named, loopable animation sequence.
///
/// Keyframe data lives with the host that evaluates the skeleton; the
/// controller only needs a name to look the clip up and a duration to
/// advance playback time against.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
}

impl AnimationClip {
    /// Negative or NaN durations are stored as zero.
    pub fn new(name: impl Into<String>, duration: f32) -> Self {
        Self {
            name: name.into(),
            duration: if duration.is_nan() { 0.0 } else { duration.max(0.0) },
        }
    }
}
