//! Per-scene node graph stored in a `hecs` world.
//!
//! Every node is an entity carrying a [`Name`], a local [`Transform`], and a
//! cached [`WorldTransform`]. Child nodes carry a [`Parent`] reference.
//! Nodes with triangles attached get a [`PickGeometry`] (CPU copy used for
//! raycasts) and, once uploaded, a [`MeshId`] pointing into the renderer's
//! mesh library.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use hecs::{Entity, World};

use crate::geometry::{Material, ModelData, RawGeometry};
use crate::mesh::Transform;

/// Upper bound on parent hops when walking toward a root. Real model
/// hierarchies are far shallower; the bound only matters for malformed
/// (cyclic) graphs.
pub const MAX_ANCESTOR_DEPTH: usize = 64;

/// Node label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Name(pub String);

/// Reference from a child node to its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Parent(pub Entity);

/// Cached model-to-world matrix, refreshed by [`SceneGraph::refresh_world_transforms`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldTransform(pub Mat4);

/// Handle to a GPU mesh in the renderer's mesh library.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(pub(crate) usize);

impl MeshId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// Triangles in node-local space plus their bounding box, for raycasting.
#[derive(Clone, Debug)]
pub struct PickGeometry {
    pub geometry: Arc<RawGeometry>,
    pub min: Vec3,
    pub max: Vec3,
    /// Whether rays hitting the back of a triangle count.
    pub double_sided: bool,
}

impl PickGeometry {
    /// Single-sided pick geometry.
    pub fn new(geometry: Arc<RawGeometry>) -> Self {
        let (min, max) = geometry.bounds();
        Self {
            geometry,
            min,
            max,
            double_sided: false,
        }
    }

    pub fn double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = double_sided;
        self
    }
}

/// The object graph of one scene.
#[derive(Default)]
pub struct SceneGraph {
    world: World,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the underlying ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.is_empty()
    }

    /// Spawn a node. The world transform is computed immediately.
    pub fn spawn_node(
        &mut self,
        name: impl Into<String>,
        transform: Transform,
        parent: Option<Entity>,
    ) -> Entity {
        let world_matrix = match parent {
            Some(parent) => self.world_matrix(parent) * transform.matrix(),
            None => transform.matrix(),
        };

        let entity = self.world.spawn((
            Name(name.into()),
            transform,
            WorldTransform(world_matrix),
        ));

        if let Some(parent) = parent {
            // The entity was just spawned, so this cannot fail.
            let _ = self.world.insert_one(entity, Parent(parent));
        }

        entity
    }

    /// Attach pickable triangles to a node.
    pub fn attach_geometry(&mut self, entity: Entity, pick: PickGeometry) -> bool {
        self.world.insert_one(entity, pick).is_ok()
    }

    /// Attach an uploaded GPU mesh to a node.
    pub fn attach_mesh(&mut self, entity: Entity, mesh: MeshId) -> bool {
        self.world.insert_one(entity, mesh).is_ok()
    }

    /// Re-point a node at a new parent. Used by tooling and tests; a cycle
    /// created here is tolerated by every walk in this module.
    pub fn set_parent(&mut self, entity: Entity, parent: Option<Entity>) {
        match parent {
            Some(parent) => {
                let _ = self.world.insert_one(entity, Parent(parent));
            }
            None => {
                let _ = self.world.remove_one::<Parent>(entity);
            }
        }
        self.refresh_world_transforms();
    }

    /// Spawn a parsed model under a new root node named `label`.
    ///
    /// `upload` is called for every node with geometry and may return a GPU
    /// mesh handle; headless callers pass a closure returning `None`.
    pub fn spawn_model(
        &mut self,
        label: &str,
        root_transform: Transform,
        model: ModelData,
        mut upload: impl FnMut(&str, &RawGeometry, &Material) -> Option<MeshId>,
    ) -> Entity {
        let root = self.spawn_node(label, root_transform, None);
        let mut spawned: Vec<Entity> = Vec::with_capacity(model.nodes.len());

        for node in model.nodes {
            let parent = node
                .parent
                .and_then(|index| spawned.get(index).copied())
                .unwrap_or(root);
            let entity = self.spawn_node(node.name.clone(), node.transform, Some(parent));

            if let Some(geometry) = node.geometry.filter(|g| !g.is_empty()) {
                if let Some(mesh) = upload(&node.name, &geometry, &node.material) {
                    self.attach_mesh(entity, mesh);
                }
                let pick = PickGeometry::new(Arc::new(geometry))
                    .double_sided(node.material.double_sided);
                self.attach_geometry(entity, pick);
            }

            spawned.push(entity);
        }

        root
    }

    pub fn name(&self, entity: Entity) -> Option<String> {
        self.world.get::<&Name>(entity).ok().map(|n| n.0.clone())
    }

    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.world.get::<&Parent>(entity).ok().map(|p| p.0)
    }

    /// Find the first node with the given name.
    pub fn find(&self, name: &str) -> Option<Entity> {
        self.world
            .query::<&Name>()
            .iter()
            .find(|(_, n)| n.0 == name)
            .map(|(entity, _)| entity)
    }

    /// Walk from `entity` toward the root: self, parent, grandparent, ...
    ///
    /// The walk ends at a node without a parent, at a dangling parent
    /// reference, or after [`MAX_ANCESTOR_DEPTH`] nodes.
    pub fn ancestors(&self, entity: Entity) -> Ancestors<'_> {
        Ancestors {
            graph: self,
            next: self.world.contains(entity).then_some(entity),
            remaining: MAX_ANCESTOR_DEPTH,
        }
    }

    /// Compose local transforms from the root down to `entity`.
    pub fn world_matrix(&self, entity: Entity) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        for node in self.ancestors(entity) {
            if let Ok(transform) = self.world.get::<&Transform>(node) {
                matrix = transform.matrix() * matrix;
            }
        }
        matrix
    }

    /// Recompute every cached [`WorldTransform`].
    pub fn refresh_world_transforms(&mut self) {
        let updates: Vec<(Entity, Mat4)> = self
            .world
            .query::<&Transform>()
            .iter()
            .map(|(entity, _)| (entity, self.world_matrix(entity)))
            .collect();

        for (entity, matrix) in updates {
            let _ = self.world.insert_one(entity, WorldTransform(matrix));
        }
    }
}

/// Iterator returned by [`SceneGraph::ancestors`].
pub struct Ancestors<'a> {
    graph: &'a SceneGraph,
    next: Option<Entity>,
    remaining: usize,
}

impl Iterator for Ancestors<'_> {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next?;
        self.remaining -= 1;
        self.next = self
            .graph
            .parent(current)
            .filter(|parent| self.graph.world.contains(*parent));
        Some(current)
    }
}
