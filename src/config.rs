//! Controller profiles
//!
//! A [`ControllerProfile`] names the resources the controller should bind to
//! after the model has loaded, the keys that drive it and how the stage is
//! set up around it. Two presets cover the two ways the demo has been
//! shipped; custom profiles are plain JSON.
//!
//! ```json
//! {
//!   "name": "head-rig",
//!   "clips": { "walk": "Armature.001Action", "idle": null },
//!   "morph_mesh": { "named": "Head" },
//!   "targets": { "happy": 0, "surprised": 1 },
//!   "session": "immersive_ar"
//! }
//! ```

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::controller::{Action, Expression};
use crate::errors::{EmoteError, Result};
use crate::resources::input::Key;

/// Where the host fetches the model from. The crate never downloads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSource {
    pub base_url: String,
    pub file_name: String,
}

impl ModelSource {
    #[must_use]
    pub fn url(&self) -> String {
        if self.base_url.is_empty() || self.base_url.ends_with('/') {
            format!("{}{}", self.base_url, self.file_name)
        } else {
            format!("{}/{}", self.base_url, self.file_name)
        }
    }
}

/// Clip names to look up in the model's mixer. `None` means the profile does
/// not expect that clip at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipSelectors {
    pub walk: Option<String>,
    pub idle: Option<String>,
}

/// How to find the mesh that carries the facial blend shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshSelector {
    /// First descendant of the root with a non-empty morph target manager.
    FirstWithMorphTargets,
    /// Direct child of the root with this name.
    Named(String),
}

/// A morph target by export index or by shape-key name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetSelector {
    Index(usize),
    Name(String),
}

impl std::fmt::Display for TargetSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetSelector::Index(i) => write!(f, "#{i}"),
            TargetSelector::Name(name) => write!(f, "'{name}'"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetSelectors {
    pub happy: Option<TargetSelector>,
    pub surprised: Option<TargetSelector>,
}

impl TargetSelectors {
    #[must_use]
    pub fn get(&self, expression: Expression) -> Option<&TargetSelector> {
        match expression {
            Expression::Happy => self.happy.as_ref(),
            Expression::Surprised => self.surprised.as_ref(),
        }
    }
}

/// Key symbols (as reported by `KeyboardEvent.key`) bound to each action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub walk: char,
    pub happy: char,
    pub surprised: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            walk: '1',
            happy: '2',
            surprised: '3',
        }
    }
}

impl KeyBindings {
    #[must_use]
    pub fn action_for(&self, symbol: char) -> Option<Action> {
        if symbol == self.walk {
            Some(Action::Walk)
        } else if symbol == self.happy {
            Some(Action::Express(Expression::Happy))
        } else if symbol == self.surprised {
            Some(Action::Express(Expression::Surprised))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Plain 3D view, no XR negotiation.
    #[default]
    Inline,
    /// Request an immersive AR session and fall back to [`SessionMode::Inline`].
    ImmersiveAr,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placement {
    /// Uniform factor applied on top of the model's own scale.
    pub scale: f32,
    pub position: [f32; 3],
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            scale: 1.0,
            position: [0.0; 3],
        }
    }
}

impl Placement {
    #[must_use]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Sphere shown in place of a model that failed to load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placeholder {
    pub diameter: f32,
    pub height: f32,
}

impl Default for Placeholder {
    fn default() -> Self {
        Self {
            diameter: 1.0,
            height: 1.0,
        }
    }
}

/// Ground plane added when an immersive session is refused.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundSize {
    pub width: f32,
    pub height: f32,
}

impl Default for GroundSize {
    fn default() -> Self {
        Self {
            width: 6.0,
            height: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerProfile {
    pub name: String,
    pub model: ModelSource,
    pub clips: ClipSelectors,
    pub morph_mesh: MeshSelector,
    pub targets: TargetSelectors,
    pub keys: KeyBindings,
    pub session: SessionMode,
    pub placement: Placement,
    pub placeholder: Option<Placeholder>,
    pub fallback_ground: GroundSize,
}

impl Default for ControllerProfile {
    fn default() -> Self {
        Self::playground()
    }
}

impl ControllerProfile {
    /// Desktop viewer: clips and shape keys looked up by name, idle loop on
    /// start, placeholder sphere if the model cannot be loaded.
    #[must_use]
    pub fn playground() -> Self {
        Self {
            name: "playground".into(),
            model: ModelSource {
                base_url: "https://github.com/HenryWuJiaL/AR-HW5/raw/refs/heads/main/".into(),
                file_name: "walking1.glb".into(),
            },
            clips: ClipSelectors {
                walk: Some("WalkAction".into()),
                idle: Some("Idle".into()),
            },
            morph_mesh: MeshSelector::FirstWithMorphTargets,
            targets: TargetSelectors {
                happy: Some(TargetSelector::Name("Happy_Face".into())),
                surprised: Some(TargetSelector::Name("Surprised_Face".into())),
            },
            keys: KeyBindings::default(),
            session: SessionMode::Inline,
            placement: Placement::default(),
            placeholder: Some(Placeholder::default()),
            fallback_ground: GroundSize::default(),
        }
    }

    /// Immersive AR build: no idle clip, the first two shape keys of the
    /// `Head` mesh, model scaled down to table size.
    #[must_use]
    pub fn webxr() -> Self {
        Self {
            name: "webxr".into(),
            model: ModelSource {
                base_url: "https://raw.githubusercontent.com/HenryWuJiaL/AR-HW5/main/".into(),
                file_name: "walking1.glb".into(),
            },
            clips: ClipSelectors {
                walk: Some("Armature.001Action".into()),
                idle: None,
            },
            morph_mesh: MeshSelector::Named("Head".into()),
            targets: TargetSelectors {
                happy: Some(TargetSelector::Index(0)),
                surprised: Some(TargetSelector::Index(1)),
            },
            keys: KeyBindings::default(),
            session: SessionMode::ImmersiveAr,
            placement: Placement {
                scale: 0.2,
                position: [0.0; 3],
            },
            placeholder: None,
            fallback_ground: GroundSize::default(),
        }
    }

    /// Looks up a preset by name.
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "playground" => Some(Self::playground()),
            "webxr" => Some(Self::webxr()),
            _ => None,
        }
    }

    /// Parses and validates a profile from JSON. Missing fields take the
    /// playground preset's values.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let profile: Self = serde_json::from_str(s)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        log::info!("Loading profile from: {}", path.as_ref().display());
        Self::from_json_str(&contents)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        let keys = [self.keys.walk, self.keys.happy, self.keys.surprised];
        if keys[0] == keys[1] || keys[0] == keys[2] || keys[1] == keys[2] {
            return Err(invalid("keys", "walk, happy and surprised need distinct keys"));
        }
        let named = [
            ("keys.walk", keys[0]),
            ("keys.happy", keys[1]),
            ("keys.surprised", keys[2]),
        ];
        for (field, symbol) in named {
            if Key::from_symbol(symbol).and_then(Key::symbol) != Some(symbol) {
                return Err(EmoteError::InvalidProfile {
                    field: field.to_string(),
                    message: format!("no key produces {symbol:?}"),
                });
            }
        }

        if !self.placement.scale.is_finite() || self.placement.scale <= 0.0 {
            return Err(invalid("placement.scale", "must be a positive number"));
        }
        if self.placement.position.iter().any(|c| !c.is_finite()) {
            return Err(invalid("placement.position", "must be finite"));
        }

        if let MeshSelector::Named(name) = &self.morph_mesh
            && name.is_empty()
        {
            return Err(invalid("morph_mesh.named", "mesh name must not be empty"));
        }

        if let Some(p) = &self.placeholder {
            if !(p.diameter.is_finite() && p.diameter > 0.0) {
                return Err(invalid("placeholder.diameter", "must be a positive number"));
            }
            if !p.height.is_finite() {
                return Err(invalid("placeholder.height", "must be finite"));
            }
        }

        let ground = &self.fallback_ground;
        if !(ground.width.is_finite() && ground.height.is_finite())
            || ground.width <= 0.0
            || ground.height <= 0.0
        {
            return Err(invalid("fallback_ground", "width and height must be positive"));
        }

        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> EmoteError {
    EmoteError::InvalidProfile {
        field: field.to_string(),
        message: message.to_string(),
    }
}
