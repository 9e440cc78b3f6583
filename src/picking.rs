//! Pointer picking: map a pointer position to the billboard under it.
//!
//! - [`pointer_to_ndc`] normalizes viewport pixels to device coordinates
//! - [`Ray`] unprojects a device coordinate through the camera
//! - [`raycast_all`] intersects a ray with every node carrying pick geometry
//! - [`PointerPicker`] resolves the nearest hit to a recognized label
//!
//! # Example
//!
//! ```
//! use vantage::{Camera, PickOutcome, PointerPicker, Scene, SceneSlot, Vec2};
//!
//! let picker = PointerPicker::default();
//! let scene = Scene::new(SceneSlot::First);
//!
//! // An empty scene never produces a hit.
//! let outcome = picker.pick(&scene, &Camera::new(), Vec2::new(400.0, 300.0), (800, 600));
//! assert_eq!(outcome, PickOutcome::NoHit);
//! ```

use glam::{Mat4, Vec2, Vec3, Vec4};
use hecs::Entity;

use crate::camera::Camera;
use crate::scene::{PickGeometry, Scene, SceneGraph, WorldTransform};

/// Convert a pointer position in viewport pixels to normalized device
/// coordinates, x right and y up, clamped to [-1, 1].
///
/// A zero-sized viewport yields the center.
pub fn pointer_to_ndc(pointer: Vec2, viewport: (u32, u32)) -> Vec2 {
    let (width, height) = viewport;
    if width == 0 || height == 0 {
        return Vec2::ZERO;
    }

    let x = pointer.x / width as f32 * 2.0 - 1.0;
    let y = -(pointer.y / height as f32) * 2.0 + 1.0;
    let ndc = Vec2::new(x, y);

    if ndc.is_finite() {
        ndc.clamp(Vec2::NEG_ONE, Vec2::ONE)
    } else {
        Vec2::ZERO
    }
}

/// A ray in 3D space, used for raycasting and picking.
///
/// # Example
///
/// ```
/// use vantage::{Ray, Vec3};
///
/// let ray = Ray::new(Vec3::new(0.0, 1.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
/// assert_eq!(ray.point_at(5.0), Vec3::new(0.0, 1.0, 0.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray. The direction is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Unproject a device coordinate through the inverse view-projection,
    /// from the near plane toward the far plane.
    pub fn from_ndc(ndc: Vec2, view_projection: Mat4) -> Self {
        let inverse = view_projection.inverse();

        let near = inverse * Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
        let far = inverse * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);

        let near_point = near.truncate() / near.w;
        let far_point = far.truncate() / far.w;

        Self::new(near_point, far_point - near_point)
    }

    /// Ray from the camera through a device coordinate.
    pub fn from_camera(camera: &Camera, ndc: Vec2) -> Self {
        Self::from_ndc(ndc, camera.view_projection())
    }

    #[inline]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Slab test against an axis-aligned box.
    ///
    /// Returns the distance to the nearest intersection in front of the
    /// origin, or the exit distance when the origin is inside the box.
    pub fn intersect_aabb(&self, min: Vec3, max: Vec3) -> Option<f32> {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for i in 0..3 {
            let origin = self.origin[i];
            let dir = self.direction[i];

            if dir.abs() < f32::EPSILON {
                if origin < min[i] || origin > max[i] {
                    return None;
                }
            } else {
                let inv_dir = 1.0 / dir;
                let mut t1 = (min[i] - origin) * inv_dir;
                let mut t2 = (max[i] - origin) * inv_dir;
                if t1 > t2 {
                    std::mem::swap(&mut t1, &mut t2);
                }

                t_min = t_min.max(t1);
                t_max = t_max.min(t2);
                if t_min > t_max {
                    return None;
                }
            }
        }

        if t_min >= 0.0 {
            Some(t_min)
        } else if t_max >= 0.0 {
            Some(t_max)
        } else {
            None
        }
    }

    /// Möller–Trumbore intersection.
    ///
    /// The front face is the one whose vertices wind counter-clockwise as
    /// seen from the ray origin. Unless `double_sided` is set, back faces
    /// are ignored.
    pub fn intersect_triangle(&self, [a, b, c]: [Vec3; 3], double_sided: bool) -> Option<f32> {
        const EPSILON: f32 = 1e-7;

        let edge1 = b - a;
        let edge2 = c - a;
        let p = self.direction.cross(edge2);
        let det = edge1.dot(p);
        if det.abs() < EPSILON || (!double_sided && det < 0.0) {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(q) * inv_det;
        (t > EPSILON).then_some(t)
    }
}

/// A ray-geometry intersection.
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    /// The node whose triangles were hit.
    pub entity: Entity,
    /// World-space distance from the ray origin.
    pub distance: f32,
    pub point: Vec3,
}

/// World-space bounds of a local box under `matrix`.
fn world_bounds(matrix: Mat4, min: Vec3, max: Vec3) -> (Vec3, Vec3) {
    let mut world_min = Vec3::splat(f32::INFINITY);
    let mut world_max = Vec3::splat(f32::NEG_INFINITY);
    for i in 0..8 {
        let corner = Vec3::new(
            if i & 1 == 0 { min.x } else { max.x },
            if i & 2 == 0 { min.y } else { max.y },
            if i & 4 == 0 { min.z } else { max.z },
        );
        let p = matrix.transform_point3(corner);
        world_min = world_min.min(p);
        world_max = world_max.max(p);
    }
    (world_min, world_max)
}

/// Cast a ray against every node with pick geometry.
///
/// Returns all hits sorted nearest first. Each node contributes at most one
/// hit, its nearest triangle. Single-sided geometry is only hit from the
/// front, the same faces the renderer draws.
pub fn raycast_all(graph: &SceneGraph, ray: &Ray) -> Vec<RayHit> {
    let mut hits = Vec::new();

    for (entity, (world, pick)) in graph
        .world()
        .query::<(&WorldTransform, &PickGeometry)>()
        .iter()
    {
        let (min, max) = world_bounds(world.0, pick.min, pick.max);
        if ray.intersect_aabb(min, max).is_none() {
            continue;
        }

        // A mirroring transform reverses the winding.
        let mirrored = world.0.determinant() < 0.0;
        let nearest = pick
            .geometry
            .triangles()
            .map(|tri| {
                let [a, b, c] = tri.map(|p| world.0.transform_point3(p));
                if mirrored { [a, c, b] } else { [a, b, c] }
            })
            .filter_map(|tri| ray.intersect_triangle(tri, pick.double_sided))
            .min_by(f32::total_cmp);

        if let Some(distance) = nearest {
            hits.push(RayHit {
                entity,
                distance,
                point: ray.point_at(distance),
            });
        }
    }

    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// Nearest hit, if any.
pub fn raycast(graph: &SceneGraph, ray: &Ray) -> Option<RayHit> {
    raycast_all(graph, ray).into_iter().next()
}

/// Result of a pick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PickOutcome {
    NoHit,
    /// The recognized label found on the hit node or one of its ancestors.
    Hit(String),
}

/// Resolves pointer positions to billboard labels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PointerPicker {
    labels: [String; 2],
}

impl Default for PointerPicker {
    fn default() -> Self {
        Self::new("billboard1", "billboard2")
    }
}

impl PointerPicker {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            labels: [first.into(), second.into()],
        }
    }

    pub fn is_recognized(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Pick against the scene's graph using a pointer in viewport pixels.
    pub fn pick(
        &self,
        scene: &Scene,
        camera: &Camera,
        pointer: Vec2,
        viewport: (u32, u32),
    ) -> PickOutcome {
        let ndc = pointer_to_ndc(pointer, viewport);
        let ray = Ray::from_camera(camera, ndc);

        let Some(hit) = raycast(&scene.graph, &ray) else {
            log::debug!("pick at {pointer} ({ndc}) in {}: no intersection", scene.slot);
            return PickOutcome::NoHit;
        };

        let outcome = self.resolve(&scene.graph, hit.entity);
        log::debug!(
            "pick at {pointer} in {}: hit {:?} at {:.2} -> {:?}",
            scene.slot,
            scene.graph.name(hit.entity),
            hit.distance,
            outcome
        );
        outcome
    }

    /// Walk from `entity` toward the root and return the first recognized
    /// label.
    pub fn resolve(&self, graph: &SceneGraph, entity: Entity) -> PickOutcome {
        graph
            .ancestors(entity)
            .filter_map(|node| graph.name(node))
            .find(|name| self.is_recognized(name))
            .map_or(PickOutcome::NoHit, PickOutcome::Hit)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::geometry::RawGeometry;
    use crate::mesh::{Transform, Vertex3d};
    use crate::scene::SceneSlot;

    /// Single-sided 2x2 quad facing +Z.
    fn quad() -> PickGeometry {
        let n = [0.0, 0.0, 1.0];
        PickGeometry::new(Arc::new(RawGeometry::new(
            vec![
                Vertex3d::new([-1.0, -1.0, 0.0], n, [0.0, 0.0]),
                Vertex3d::new([1.0, -1.0, 0.0], n, [1.0, 0.0]),
                Vertex3d::new([1.0, 1.0, 0.0], n, [1.0, 1.0]),
                Vertex3d::new([-1.0, 1.0, 0.0], n, [0.0, 1.0]),
            ],
            vec![0, 1, 2, 2, 3, 0],
        )))
    }

    /// billboard1 -> frame -> panel (quad) at the origin.
    fn billboard_scene() -> Scene {
        let mut scene = Scene::new(SceneSlot::First);
        let graph = &mut scene.graph;
        let root = graph.spawn_node("billboard1", Transform::new(), None);
        let frame = graph.spawn_node("frame", Transform::new(), Some(root));
        let panel = graph.spawn_node("panel", Transform::new(), Some(frame));
        graph.attach_geometry(panel, quad());
        scene
    }

    #[test]
    fn ndc_corners() {
        let viewport = (800, 600);
        assert_eq!(pointer_to_ndc(Vec2::new(0.0, 0.0), viewport), Vec2::new(-1.0, 1.0));
        assert_eq!(pointer_to_ndc(Vec2::new(800.0, 600.0), viewport), Vec2::new(1.0, -1.0));
        assert_eq!(pointer_to_ndc(Vec2::new(400.0, 300.0), viewport), Vec2::ZERO);
    }

    #[test]
    fn ndc_clamps_out_of_range_pointers() {
        let viewport = (800, 600);
        assert_eq!(
            pointer_to_ndc(Vec2::new(-100.0, 5000.0), viewport),
            Vec2::new(-1.0, -1.0)
        );
        assert_eq!(pointer_to_ndc(Vec2::new(f32::NAN, 1.0), viewport), Vec2::ZERO);
        assert_eq!(pointer_to_ndc(Vec2::new(10.0, 10.0), (0, 600)), Vec2::ZERO);
    }

    #[test]
    fn center_ray_follows_camera_forward() {
        let camera = Camera::new();
        let ray = Ray::from_camera(&camera, Vec2::ZERO);
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
        assert!((ray.origin.z - (10.0 - camera.near)).abs() < 1e-3);
    }

    #[test]
    fn aabb_hit_and_miss() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let t = ray.intersect_aabb(Vec3::splat(-1.0), Vec3::splat(1.0)).unwrap();
        assert!((t - 4.0).abs() < 1e-5);

        let behind = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(behind.intersect_aabb(Vec3::splat(-1.0), Vec3::splat(1.0)).is_none());

        let beside = Ray::new(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(beside.intersect_aabb(Vec3::splat(-1.0), Vec3::splat(1.0)).is_none());
    }

    const TRIANGLE: [Vec3; 3] = [
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(0.0, 1.0, 0.0),
    ];

    #[test]
    fn double_sided_triangle_hits_from_both_sides() {
        let front = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z);
        let back = Ray::new(Vec3::new(0.0, 0.0, -2.0), Vec3::Z);
        assert!((front.intersect_triangle(TRIANGLE, true).unwrap() - 3.0).abs() < 1e-5);
        assert!((back.intersect_triangle(TRIANGLE, true).unwrap() - 2.0).abs() < 1e-5);

        let outside = Ray::new(Vec3::new(0.9, 0.9, 3.0), Vec3::NEG_Z);
        assert!(outside.intersect_triangle(TRIANGLE, true).is_none());

        let parallel = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::X);
        assert!(parallel.intersect_triangle(TRIANGLE, true).is_none());
    }

    #[test]
    fn single_sided_triangle_ignores_back_face() {
        let front = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z);
        let back = Ray::new(Vec3::new(0.0, 0.0, -2.0), Vec3::Z);
        assert!((front.intersect_triangle(TRIANGLE, false).unwrap() - 3.0).abs() < 1e-5);
        assert!(back.intersect_triangle(TRIANGLE, false).is_none());
    }

    #[test]
    fn raycast_from_behind_needs_double_sided_geometry() {
        let mut graph = SceneGraph::new();
        let single = graph.spawn_node("single", Transform::new(), None);
        let double = graph.spawn_node(
            "double",
            Transform::from_position(Vec3::new(0.0, 0.0, 2.0)),
            None,
        );
        graph.attach_geometry(single, quad());
        graph.attach_geometry(double, quad().double_sided(true));

        let from_behind = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::Z);
        let hits = raycast_all(&graph, &from_behind);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entity, double);
        assert!((hits[0].distance - 12.0).abs() < 1e-4);
    }

    #[test]
    fn mirrored_panel_keeps_its_front_face() {
        let mut graph = SceneGraph::new();
        let panel = graph.spawn_node(
            "panel",
            Transform::new().scale(Vec3::new(-1.0, 1.0, 1.0)),
            None,
        );
        graph.attach_geometry(panel, quad());

        let from_front = Ray::new(Vec3::new(0.5, 0.5, 10.0), Vec3::NEG_Z);
        assert_eq!(raycast(&graph, &from_front).map(|hit| hit.entity), Some(panel));

        let from_behind = Ray::new(Vec3::new(0.5, 0.5, -10.0), Vec3::Z);
        assert!(raycast(&graph, &from_behind).is_none());
    }

    #[test]
    fn back_of_single_sided_billboard_is_not_clickable() {
        let mut scene = Scene::new(SceneSlot::First);
        let turned = Transform::new().rotation(glam::Quat::from_rotation_y(std::f32::consts::PI));
        let root = scene.graph.spawn_node("billboard1", turned, None);
        let panel = scene.graph.spawn_node("panel", Transform::new(), Some(root));
        scene.graph.attach_geometry(panel, quad());

        let picker = PointerPicker::default();
        let outcome = picker.pick(&scene, &Camera::new(), Vec2::new(400.0, 300.0), (800, 600));
        assert_eq!(outcome, PickOutcome::NoHit);
    }

    #[test]
    fn raycast_sorts_nearest_first() {
        let mut graph = SceneGraph::new();
        let far = graph.spawn_node("far", Transform::from_position(Vec3::new(0.0, 0.0, -5.0)), None);
        let near = graph.spawn_node("near", Transform::from_position(Vec3::new(0.0, 0.0, 2.0)), None);
        graph.attach_geometry(far, quad());
        graph.attach_geometry(near, quad());

        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        let hits = raycast_all(&graph, &ray);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].entity, near);
        assert!((hits[0].distance - 8.0).abs() < 1e-4);
        assert_eq!(hits[1].entity, far);
    }

    #[test]
    fn raycast_respects_world_transforms() {
        let mut graph = SceneGraph::new();
        let root = graph.spawn_node(
            "root",
            Transform::from_position(Vec3::new(10.0, 0.0, 0.0)),
            None,
        );
        let panel = graph.spawn_node("panel", Transform::new().uniform_scale(2.0), Some(root));
        graph.attach_geometry(panel, quad());

        let through_origin = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z);
        assert!(raycast(&graph, &through_origin).is_none());

        let through_offset = Ray::new(Vec3::new(11.5, 1.5, 10.0), Vec3::NEG_Z);
        let hit = raycast(&graph, &through_offset).unwrap();
        assert_eq!(hit.entity, panel);
        assert!((hit.point - Vec3::new(11.5, 1.5, 0.0)).length() < 1e-4);
    }

    #[test]
    fn center_click_resolves_through_ancestors() {
        let scene = billboard_scene();
        let picker = PointerPicker::default();
        let outcome = picker.pick(&scene, &Camera::new(), Vec2::new(400.0, 300.0), (800, 600));
        assert_eq!(outcome, PickOutcome::Hit("billboard1".into()));
    }

    #[test]
    fn corner_click_misses() {
        let scene = billboard_scene();
        let picker = PointerPicker::default();
        let outcome = picker.pick(&scene, &Camera::new(), Vec2::new(5.0, 5.0), (800, 600));
        assert_eq!(outcome, PickOutcome::NoHit);
    }

    #[test]
    fn unrecognized_chain_is_no_hit() {
        let mut scene = Scene::new(SceneSlot::First);
        let root = scene.graph.spawn_node("poster", Transform::new(), None);
        scene.graph.attach_geometry(root, quad());

        let picker = PointerPicker::default();
        let outcome = picker.pick(&scene, &Camera::new(), Vec2::new(400.0, 300.0), (800, 600));
        assert_eq!(outcome, PickOutcome::NoHit);
    }

    #[test]
    fn nearest_recognized_ancestor_wins() {
        let mut graph = SceneGraph::new();
        let outer = graph.spawn_node("billboard2", Transform::new(), None);
        let inner = graph.spawn_node("billboard1", Transform::new(), Some(outer));
        let leaf = graph.spawn_node("leaf", Transform::new(), Some(inner));

        let picker = PointerPicker::default();
        assert_eq!(picker.resolve(&graph, leaf), PickOutcome::Hit("billboard1".into()));
    }

    #[test]
    fn cyclic_chain_terminates() {
        let mut graph = SceneGraph::new();
        let a = graph.spawn_node("a", Transform::new(), None);
        let b = graph.spawn_node("b", Transform::new(), Some(a));
        graph.set_parent(a, Some(b));

        let picker = PointerPicker::default();
        assert_eq!(picker.resolve(&graph, b), PickOutcome::NoHit);
    }
}
