use glam::Vec3;

/// Transform component
///
/// Position and scale of a model root. Rotation is left to the host; the
/// controller never orients the character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub scale: Vec3,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    /// Multiplies the current scale uniformly.
    pub fn scale_in_place(&mut self, factor: f32) {
        self.scale *= factor;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
