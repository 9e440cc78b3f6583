//! Scene definition and identifier types.

use glam::Vec3;

use super::graph::SceneGraph;
use crate::color::Color;

/// Identity of one of the viewer's two scenes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneSlot {
    First,
    Second,
}

impl SceneSlot {
    /// The other slot.
    pub fn other(self) -> Self {
        match self {
            SceneSlot::First => SceneSlot::Second,
            SceneSlot::Second => SceneSlot::First,
        }
    }

    pub fn index(self) -> usize {
        match self {
            SceneSlot::First => 0,
            SceneSlot::Second => 1,
        }
    }
}

impl std::fmt::Display for SceneSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneSlot::First => write!(f, "scene1"),
            SceneSlot::Second => write!(f, "scene2"),
        }
    }
}

/// Ambient plus one directional light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lighting {
    pub ambient: Color,
    pub ambient_intensity: f32,
    pub sun: Color,
    pub sun_intensity: f32,
    /// Position the directional light shines from, toward the origin.
    pub sun_position: Vec3,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: Color::hex(0x404040),
            ambient_intensity: 1.0,
            sun: Color::WHITE,
            sun_intensity: 1.0,
            sun_position: Vec3::new(10.0, 10.0, 10.0),
        }
    }
}

impl Lighting {
    /// Unit vector pointing from the surface toward the light.
    pub fn sun_direction(&self) -> Vec3 {
        self.sun_position.normalize_or(Vec3::Y)
    }
}

/// One renderable state of the viewer: an object graph plus its look.
///
/// Scenes live in the [`SceneRegistry`](super::SceneRegistry) for the whole
/// run; they are never destroyed or replaced.
pub struct Scene {
    pub slot: SceneSlot,
    pub graph: SceneGraph,
    pub background: Color,
    pub lighting: Lighting,
}

impl Scene {
    pub fn new(slot: SceneSlot) -> Self {
        Self {
            slot,
            graph: SceneGraph::new(),
            background: Color::BLACK,
            lighting: Lighting::default(),
        }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_lighting(mut self, lighting: Lighting) -> Self {
        self.lighting = lighting;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_alternate() {
        assert_eq!(SceneSlot::First.other(), SceneSlot::Second);
        assert_eq!(SceneSlot::Second.other().other(), SceneSlot::Second);
        assert_eq!(SceneSlot::Second.index(), 1);
        assert_eq!(SceneSlot::First.to_string(), "scene1");
    }
}
