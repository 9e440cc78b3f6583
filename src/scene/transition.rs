//! The camera-pan transition between the two scenes.
//!
//! A transition pans the camera by a fixed offset over a fixed duration, then
//! snaps the camera back to its home position and makes the other scene
//! active. Progress is polled: the frame driver calls
//! [`TransitionController::advance`] once per tick and inspects the returned
//! [`TransitionStatus`].

use std::time::Duration;

use glam::Vec3;

use super::registry::SceneRegistry;
use super::scene::SceneSlot;
use crate::camera::{Camera, HOME_POSITION};
use crate::orbit_camera::OrbitControls;

pub const DEFAULT_DURATION: Duration = Duration::from_millis(2000);
pub const DEFAULT_OFFSET: Vec3 = Vec3::new(50.0, 0.0, 0.0);

/// Easing functions for smooth transitions.
///
/// These control the acceleration curve of transition animations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// Constant speed throughout.
    Linear,
    /// Start slow, accelerate.
    EaseIn,
    /// Start fast, decelerate.
    EaseOut,
    /// Quadratic in/out: accelerate through the first half, decelerate
    /// through the second.
    #[default]
    EaseInOut,
}

impl Easing {
    /// Apply the easing function to a linear progress value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Fixed parameters shared by every transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionSettings {
    pub duration: Duration,
    /// Added to the camera position to get the pan target.
    pub offset: Vec3,
    pub easing: Easing,
    /// Where the camera lands once the pan completes.
    pub reset_position: Vec3,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            offset: DEFAULT_OFFSET,
            easing: Easing::EaseInOut,
            reset_position: HOME_POSITION,
        }
    }
}

impl TransitionSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn offset(mut self, offset: impl Into<Vec3>) -> Self {
        self.offset = offset.into();
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn reset_position(mut self, position: impl Into<Vec3>) -> Self {
        self.reset_position = position.into();
        self
    }
}

/// A pan in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPan {
    pub start: Vec3,
    pub target: Vec3,
    pub elapsed: Duration,
    pub duration: Duration,
    pub easing: Easing,
    /// Scene that becomes active when the pan completes.
    pub target_scene: SceneSlot,
}

impl CameraPan {
    /// Linear progress in [0, 1]. A zero duration is always complete.
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            1.0
        } else {
            (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
        }
    }

    pub fn eased_progress(&self) -> f32 {
        self.easing.apply(self.progress())
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Camera position at the current progress.
    pub fn position(&self) -> Vec3 {
        self.start.lerp(self.target, self.eased_progress())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TransitionState {
    #[default]
    Idle,
    Running(CameraPan),
}

/// Result of one [`TransitionController::advance`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransitionStatus {
    /// Nothing was running.
    Idle,
    /// The pan moved; `progress` is the eased progress.
    StillRunning { progress: f32 },
    /// The pan finished this tick and the active scene changed.
    Completed { new_active: SceneSlot },
}

/// Two-state machine driving the camera pan.
///
/// At most one pan runs at a time. Requests to start while running are
/// dropped, never queued, and a running pan cannot be cancelled.
#[derive(Debug, Default)]
pub struct TransitionController {
    settings: TransitionSettings,
    state: TransitionState,
}

impl TransitionController {
    pub fn new(settings: TransitionSettings) -> Self {
        Self {
            settings,
            state: TransitionState::Idle,
        }
    }

    pub fn settings(&self) -> &TransitionSettings {
        &self.settings
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TransitionState::Running(_))
    }

    /// Begin a pan toward the currently inactive scene.
    ///
    /// Returns `false` and changes nothing if a pan is already running.
    pub fn start(&mut self, registry: &SceneRegistry, camera: &Camera) -> bool {
        if let TransitionState::Running(pan) = &self.state {
            log::debug!(
                "transition to {} already running ({:.0}%), ignoring start",
                pan.target_scene,
                pan.progress() * 100.0
            );
            return false;
        }

        let pan = CameraPan {
            start: camera.position,
            target: camera.position + self.settings.offset,
            elapsed: Duration::ZERO,
            duration: self.settings.duration,
            easing: self.settings.easing,
            target_scene: registry.inactive_slot(),
        };

        log::info!(
            "transitioning to {}: camera {} -> {} over {:?}",
            pan.target_scene,
            pan.start,
            pan.target,
            pan.duration
        );

        self.state = TransitionState::Running(pan);
        true
    }

    /// Move the running pan forward by `dt`.
    ///
    /// On completion the camera snaps to the reset position (not the pan
    /// target), the orbit controls re-anchor, and the target scene becomes
    /// active.
    pub fn advance(
        &mut self,
        dt: Duration,
        registry: &mut SceneRegistry,
        camera: &mut Camera,
        controls: &mut OrbitControls,
    ) -> TransitionStatus {
        let TransitionState::Running(pan) = &mut self.state else {
            return TransitionStatus::Idle;
        };

        pan.elapsed = pan.elapsed.saturating_add(dt);
        camera.position = pan.position();
        controls.sync(camera);

        if !pan.is_finished() {
            return TransitionStatus::StillRunning {
                progress: pan.eased_progress(),
            };
        }

        let new_active = pan.target_scene;
        self.state = TransitionState::Idle;

        camera.position = self.settings.reset_position;
        controls.sync(camera);
        registry.set_active(new_active);

        log::debug!("transition complete, camera reset to {}", camera.position);
        TransitionStatus::Completed { new_active }
    }
}
