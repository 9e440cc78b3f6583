use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use winit::event::MouseButton;

use crate::camera::Camera;
use crate::input::Input;

const POLE_MARGIN: f32 = 0.01;

/// A camera controller that orbits around a target point.
///
/// The controller keeps spherical coordinates (distance, azimuth, elevation)
/// relative to `target`. Whenever something else moves the camera, call
/// [`OrbitControls::sync`] so the next drag continues from the new position
/// instead of snapping back.
///
/// # Example
/// ```
/// use vantage::{Camera, OrbitControls, Vec3};
///
/// let mut camera = Camera::new();
/// let mut controls = OrbitControls::new();
/// controls.sync(&mut camera);
/// assert_eq!(controls.target, Vec3::ZERO);
/// assert!((controls.distance - 10.0).abs() < 1e-4);
/// ```
#[derive(Clone, Debug)]
pub struct OrbitControls {
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Distance from target.
    pub distance: f32,
    /// Horizontal angle in radians (yaw), measured from +Z toward +X.
    pub azimuth: f32,
    /// Vertical angle in radians (pitch), clamped to avoid the poles.
    pub elevation: f32,
    /// Radians per pixel of drag.
    pub sensitivity: f32,
    /// Distance change per scroll line.
    pub zoom_sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 10.0,
            azimuth: 0.0,
            elevation: 0.0,
            sensitivity: 0.005,
            zoom_sensitivity: 0.5,
            min_distance: 0.5,
            max_distance: 500.0,
        }
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-derive the orbit state from wherever the camera currently is and
    /// aim the camera at the orbit target.
    ///
    /// Distance limits are not applied here: a programmatic move (such as a
    /// transition pan) may legitimately put the camera outside them.
    pub fn sync(&mut self, camera: &mut Camera) {
        let offset = camera.position - self.target;
        let distance = offset.length();

        if distance > f32::EPSILON {
            self.distance = distance;
            self.azimuth = offset.x.atan2(offset.z);
            self.elevation = (offset.y / distance)
                .clamp(-1.0, 1.0)
                .asin()
                .clamp(-FRAC_PI_2 + POLE_MARGIN, FRAC_PI_2 - POLE_MARGIN);
        }

        camera.target = self.target;
    }

    /// Apply drag rotation and scroll zoom from this frame's input, then
    /// write the resulting position into the camera.
    ///
    /// Returns `true` if the input moved the camera.
    pub fn update(&mut self, camera: &mut Camera, input: &Input) -> bool {
        let mut moved = false;

        if input.mouse_down(MouseButton::Left) {
            let delta = input.mouse_delta();
            if delta != glam::Vec2::ZERO {
                self.azimuth -= delta.x * self.sensitivity;
                self.elevation = (self.elevation + delta.y * self.sensitivity)
                    .clamp(-FRAC_PI_2 + POLE_MARGIN, FRAC_PI_2 - POLE_MARGIN);
                moved = true;
            }
        }

        let scroll = input.scroll_delta();
        if scroll.y.abs() > 0.0 {
            self.distance = (self.distance - scroll.y * self.zoom_sensitivity)
                .clamp(self.min_distance, self.max_distance);
            moved = true;
        }

        if moved {
            camera.position = self.position();
            camera.target = self.target;
        }

        moved
    }

    /// Camera position implied by the current spherical state.
    pub fn position(&self) -> Vec3 {
        let offset = Vec3::new(
            self.distance * self.elevation.cos() * self.azimuth.sin(),
            self.distance * self.elevation.sin(),
            self.distance * self.elevation.cos() * self.azimuth.cos(),
        );

        self.target + offset
    }
}
