//! Application configuration.

use std::path::PathBuf;
use std::time::Duration;

use glam::Vec3;

use crate::camera::{Camera, HOME_POSITION};
use crate::color::Color;
use crate::scene::{Lighting, SceneSlot, TransitionSettings};

/// One scene: which model it shows, under what label, and how it looks.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub model: PathBuf,
    /// Label of the root node the model is placed under. Picks resolve to it.
    pub label: String,
    pub offset: Vec3,
    pub background: Color,
    pub lighting: Lighting,
}

impl SceneConfig {
    pub fn new(model: impl Into<PathBuf>, label: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            label: label.into(),
            offset: Vec3::ZERO,
            background: Color::BLACK,
            lighting: Lighting::default(),
        }
    }

    pub fn offset(mut self, offset: impl Into<Vec3>) -> Self {
        self.offset = offset.into();
        self
    }

    pub fn background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn lighting(mut self, lighting: Lighting) -> Self {
        self.lighting = lighting;
        self
    }
}

/// Perspective parameters and the home position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraConfig {
    pub home: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            home: HOME_POSITION,
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl CameraConfig {
    pub fn camera(&self, width: u32, height: u32) -> Camera {
        let mut camera = Camera::new()
            .at(self.home)
            .with_fov(self.fov_degrees)
            .with_clip(self.near, self.far);
        camera.set_aspect(width, height);
        camera
    }
}

/// Everything needed to start the viewer.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub scenes: [SceneConfig; 2],
    pub camera: CameraConfig,
    pub transition: TransitionSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Vantage".to_string(),
            width: 800,
            height: 600,
            scenes: [
                SceneConfig::new("models/BillboardModel.glb", "billboard1"),
                SceneConfig::new("models/BillboardModel_2.glb", "billboard2")
                    .offset(Vec3::new(10.0, 0.0, 0.0))
                    .background(Color::hex(0x333333)),
            ],
            camera: CameraConfig::default(),
            transition: TransitionSettings::default(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn scene(mut self, slot: SceneSlot, scene: SceneConfig) -> Self {
        self.scenes[slot.index()] = scene;
        self
    }

    /// Replace the model file of one scene, keeping its label and look.
    pub fn model(mut self, slot: SceneSlot, path: impl Into<PathBuf>) -> Self {
        self.scenes[slot.index()].model = path.into();
        self
    }

    pub fn camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    pub fn transition(mut self, transition: TransitionSettings) -> Self {
        self.transition = transition;
        self
    }

    pub fn transition_duration(mut self, duration: Duration) -> Self {
        self.transition.duration = duration;
        self
    }

    pub fn scene_config(&self, slot: SceneSlot) -> &SceneConfig {
        &self.scenes[slot.index()]
    }

    /// The home position also becomes the post-transition reset position.
    pub fn transition_settings(&self) -> TransitionSettings {
        self.transition.reset_position(self.camera.home)
    }
}
