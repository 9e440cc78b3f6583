//! The two scenes, their object graphs, and the transition between them.
//!
//! # Overview
//!
//! The viewer owns exactly two [`Scene`]s inside a [`SceneRegistry`]. One is
//! active: it is rendered every frame and tested by pointer picks. Clicking a
//! billboard starts a camera pan; when the pan completes the other scene
//! becomes active.
//!
//! ```
//! use std::time::Duration;
//! use vantage::{Camera, OrbitControls, SceneRegistry, SceneSlot, TransitionController, TransitionSettings, TransitionStatus};
//!
//! let mut registry = SceneRegistry::default();
//! let mut camera = Camera::new();
//! let mut controls = OrbitControls::new();
//! let mut transitions = TransitionController::new(TransitionSettings::new().duration(Duration::from_millis(100)));
//!
//! assert!(transitions.start(&registry, &camera));
//! let status = transitions.advance(Duration::from_millis(100), &mut registry, &mut camera, &mut controls);
//!
//! assert_eq!(status, TransitionStatus::Completed { new_active: SceneSlot::Second });
//! assert_eq!(registry.active_slot(), SceneSlot::Second);
//! ```

mod graph;
mod registry;
#[allow(clippy::module_inception)]
mod scene;
mod transition;

pub use graph::{
    Ancestors, MAX_ANCESTOR_DEPTH, MeshId, Name, Parent, PickGeometry, SceneGraph, WorldTransform,
};
pub use registry::SceneRegistry;
pub use scene::{Lighting, Scene, SceneSlot};
pub use transition::{
    CameraPan, DEFAULT_DURATION, DEFAULT_OFFSET, Easing, TransitionController, TransitionSettings,
    TransitionState, TransitionStatus,
};
