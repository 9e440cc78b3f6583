//! The two scenes and the active-scene pointer.

use super::scene::{Scene, SceneSlot};

/// Holds exactly two scenes and tracks which one is active.
///
/// The active scene is what gets rendered and what pointer picks are tested
/// against. Only a completed transition moves the pointer.
pub struct SceneRegistry {
    scenes: [Scene; 2],
    active: SceneSlot,
}

impl SceneRegistry {
    /// Create a registry from two scenes. Their slots are overwritten to match
    /// their position; the first scene starts active.
    pub fn new(mut first: Scene, mut second: Scene) -> Self {
        first.slot = SceneSlot::First;
        second.slot = SceneSlot::Second;
        Self {
            scenes: [first, second],
            active: SceneSlot::First,
        }
    }

    pub fn active_slot(&self) -> SceneSlot {
        self.active
    }

    pub fn inactive_slot(&self) -> SceneSlot {
        self.active.other()
    }

    pub fn active(&self) -> &Scene {
        self.scene(self.active)
    }

    pub fn inactive(&self) -> &Scene {
        self.scene(self.inactive_slot())
    }

    pub fn set_active(&mut self, slot: SceneSlot) {
        if self.active != slot {
            log::info!("active scene: {} -> {}", self.active, slot);
        }
        self.active = slot;
    }

    pub fn scene(&self, slot: SceneSlot) -> &Scene {
        &self.scenes[slot.index()]
    }

    pub fn scene_mut(&mut self, slot: SceneSlot) -> &mut Scene {
        &mut self.scenes[slot.index()]
    }
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self::new(Scene::new(SceneSlot::First), Scene::new(SceneSlot::Second))
    }
}
