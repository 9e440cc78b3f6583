//! The interaction core: scenes, camera, picking and transitions in one
//! context object, driven once per frame.

use std::time::Duration;

use glam::Vec2;
use hecs::Entity;

use crate::camera::Camera;
use crate::config::AppConfig;
use crate::geometry::{Material, ModelData, RawGeometry};
use crate::input::Input;
use crate::mesh::Transform;
use crate::orbit_camera::OrbitControls;
use crate::picking::{PickOutcome, PointerPicker};
use crate::renderer::SceneRenderer;
use crate::scene::{
    MeshId, Scene, SceneRegistry, SceneSlot, TransitionController, TransitionSettings,
    TransitionStatus,
};

/// What a click did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Nothing recognized under the pointer.
    NoHit,
    /// A billboard was hit and a transition toward `target` began.
    Started { label: String, target: SceneSlot },
    /// A billboard was hit but a transition is already running.
    Busy { label: String },
}

/// Owns every piece of interaction state.
///
/// The frame driver calls [`Viewer::click`] for each completed click, then
/// [`Viewer::tick`] once per frame.
pub struct Viewer {
    pub registry: SceneRegistry,
    pub camera: Camera,
    pub controls: OrbitControls,
    pub transitions: TransitionController,
    pub picker: PointerPicker,
}

impl Viewer {
    pub fn new(
        registry: SceneRegistry,
        mut camera: Camera,
        settings: TransitionSettings,
        picker: PointerPicker,
    ) -> Self {
        let mut controls = OrbitControls::new();
        controls.sync(&mut camera);

        Self {
            registry,
            camera,
            controls,
            transitions: TransitionController::new(settings),
            picker,
        }
    }

    /// Build empty scenes with the configured look. Models are placed later
    /// with [`Viewer::place_model`] once they finish loading.
    pub fn from_config(config: &AppConfig) -> Self {
        let scene = |slot: SceneSlot| {
            let cfg = config.scene_config(slot);
            Scene::new(slot)
                .with_background(cfg.background)
                .with_lighting(cfg.lighting)
        };
        let registry = SceneRegistry::new(scene(SceneSlot::First), scene(SceneSlot::Second));
        let picker = PointerPicker::new(
            config.scene_config(SceneSlot::First).label.clone(),
            config.scene_config(SceneSlot::Second).label.clone(),
        );

        Self::new(
            registry,
            config.camera.camera(config.width, config.height),
            config.transition_settings(),
            picker,
        )
    }

    /// Spawn a parsed model into a scene under a root node named `label`.
    pub fn place_model(
        &mut self,
        slot: SceneSlot,
        label: &str,
        transform: Transform,
        model: ModelData,
        upload: impl FnMut(&str, &RawGeometry, &Material) -> Option<MeshId>,
    ) -> Entity {
        let graph = &mut self.registry.scene_mut(slot).graph;
        let root = graph.spawn_model(label, transform, model, upload);
        log::info!("{label} placed in {slot} ({} nodes)", graph.len());
        root
    }

    /// Pick against the active scene and start a transition on a hit.
    pub fn click(&mut self, pointer: Vec2, viewport: (u32, u32)) -> ClickOutcome {
        let outcome = self
            .picker
            .pick(self.registry.active(), &self.camera, pointer, viewport);

        let PickOutcome::Hit(label) = outcome else {
            return ClickOutcome::NoHit;
        };

        if self.transitions.start(&self.registry, &self.camera) {
            ClickOutcome::Started {
                label,
                target: self.registry.inactive_slot(),
            }
        } else {
            ClickOutcome::Busy { label }
        }
    }

    /// One frame: orbit input, transition progress, then render the active
    /// scene.
    pub fn tick<R: SceneRenderer>(
        &mut self,
        input: &Input,
        dt: Duration,
        renderer: &mut R,
    ) -> Result<TransitionStatus, R::Error> {
        if !self.transitions.is_running() {
            self.controls.update(&mut self.camera, input);
        }

        let status = self.transitions.advance(
            dt,
            &mut self.registry,
            &mut self.camera,
            &mut self.controls,
        );

        renderer.render(self.registry.active(), &self.camera)?;
        Ok(status)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
    }

    pub fn active_slot(&self) -> SceneSlot {
        self.registry.active_slot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::HOME_POSITION;
    use crate::color::Color;

    struct Frames(Vec<Color>);

    impl SceneRenderer for Frames {
        type Error = std::convert::Infallible;

        fn render(&mut self, scene: &Scene, _: &Camera) -> Result<(), Self::Error> {
            self.0.push(scene.background);
            Ok(())
        }
    }

    #[test]
    fn from_config_applies_scene_looks() {
        let viewer = Viewer::from_config(&AppConfig::default());
        assert_eq!(viewer.active_slot(), SceneSlot::First);
        assert_eq!(viewer.registry.active().background, Color::BLACK);
        assert_eq!(viewer.registry.inactive().background, Color::hex(0x333333));
        assert_eq!(viewer.camera.position, HOME_POSITION);
        assert!(viewer.picker.is_recognized("billboard2"));
    }

    #[test]
    fn tick_renders_active_scene_every_frame() {
        let mut viewer = Viewer::from_config(&AppConfig::default());
        let mut frames = Frames(Vec::new());
        let input = Input::new();

        for _ in 0..3 {
            let status = viewer
                .tick(&input, Duration::from_millis(16), &mut frames)
                .unwrap();
            assert_eq!(status, TransitionStatus::Idle);
        }
        assert_eq!(frames.0, vec![Color::BLACK; 3]);
    }

    #[test]
    fn click_on_empty_scene_misses() {
        let mut viewer = Viewer::from_config(&AppConfig::default());
        let outcome = viewer.click(Vec2::new(400.0, 300.0), (800, 600));
        assert_eq!(outcome, ClickOutcome::NoHit);
        assert!(!viewer.transitions.is_running());
    }

    #[test]
    fn resize_updates_aspect() {
        let mut viewer = Viewer::from_config(&AppConfig::default());
        viewer.resize(1000, 500);
        assert_eq!(viewer.camera.aspect, 2.0);
    }
}
