//! # Vantage
//!
//! **A two-scene 3D model viewer with click-to-transition billboards.**
//!
//! Two scenes each hold one billboard model. Clicking the billboard in the
//! active scene pans the camera away, then swaps to the other scene and
//! snaps the camera home. The camera orbits with a left drag and zooms with
//! the wheel in between.
//!
//! ## Quick Start
//!
//! ```no_run
//! use vantage::{AppConfig, SceneSlot};
//!
//! fn main() -> Result<(), vantage::AppError> {
//!     vantage::run(
//!         AppConfig::new()
//!             .size(1280, 720)
//!             .model(SceneSlot::First, "models/poster.glb"),
//!     )
//! }
//! ```
//!
//! ## Headless use
//!
//! The interaction core ([`Viewer`]) does not need a window. Anything that
//! implements [`SceneRenderer`] can drive it, which is how the integration
//! tests exercise picking and transitions.

mod app;
mod camera;
mod color;
mod config;
mod geometry;
mod gpu;
mod input;
pub mod loader;
mod mesh;
mod mesh_pass;
mod orbit_camera;
mod picking;
mod renderer;
pub mod scene;
mod texture;
mod viewer;

pub use app::{AppError, run};
pub use camera::{Camera, HOME_POSITION};
pub use color::Color;
pub use config::{AppConfig, CameraConfig, SceneConfig};
pub use geometry::{GeometryError, ImageData, Material, ModelData, ModelNode, RawGeometry};
pub use gpu::{GpuContext, GpuError};
pub use input::{CLICK_DRAG_THRESHOLD, Input};
pub use loader::{AssetLoader, LoadResult};
pub use mesh::{Mesh, Transform, Vertex3d};
pub use mesh_pass::MeshPass;
pub use orbit_camera::OrbitControls;
pub use picking::{PickOutcome, PointerPicker, Ray, RayHit, pointer_to_ndc, raycast, raycast_all};
pub use renderer::{SceneRenderer, SurfaceRenderer};
pub use scene::{
    Easing, Lighting, MeshId, Scene, SceneGraph, SceneRegistry, SceneSlot, TransitionController,
    TransitionSettings, TransitionStatus,
};
pub use texture::Texture;
pub use viewer::{ClickOutcome, Viewer};

// Re-export glam math types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3};

// Re-export commonly used winit and hecs types
pub use hecs::Entity;
pub use winit::event::MouseButton;
