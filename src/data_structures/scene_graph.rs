//! Scene graph and bounding-volume math.
//!
//! The graph is a flat arena of nodes addressed by [`NodeId`]. Children point
//! at their parent and vice versa, so world transforms are propagated with an
//! explicit walk over the owned node collection instead of chasing trait
//! objects. The loaded model always hangs under a single root node, which is
//! where centering and scale normalization are applied.

use cgmath::InnerSpace;

use crate::data_structures::transform::Transform;

pub type NodeId = usize;

/// A spatial node: a local transform, an optional mesh, and child links.
#[derive(Debug)]
pub struct Node {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub local: Transform,
    pub world: Transform,
    pub mesh: Option<usize>,
}

#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node and link it to its parent (or register it as a root).
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        local: Transform,
        mesh: Option<usize>,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            name: name.into(),
            parent,
            children: Vec::new(),
            world: local.clone(),
            local,
            mesh,
        });
        match parent {
            Some(parent_id) => self.nodes[parent_id].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes that carry a mesh, as (node, mesh index) pairs.
    pub fn mesh_nodes(&self) -> impl Iterator<Item = (NodeId, usize)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(id, node)| node.mesh.map(|mesh| (id, mesh)))
    }

    /// Recompute every node's world transform from the roots down.
    pub fn update_world_transforms(&mut self) {
        let mut stack: Vec<(NodeId, Transform)> = self
            .roots
            .iter()
            .map(|&id| (id, Transform::default()))
            .collect();
        while let Some((id, parent_world)) = stack.pop() {
            let world = &parent_world * &self.nodes[id].local;
            self.nodes[id].world = world.clone();
            for &child in &self.nodes[id].children {
                stack.push((child, world.clone()));
            }
        }
    }

    /// World-space bounding box of all mesh nodes, given per-mesh local
    /// bounds. `None` when the graph carries no mesh.
    pub fn bounds(&self, mesh_bounds: &[Aabb]) -> Option<Aabb> {
        self.mesh_nodes()
            .filter_map(|(id, mesh)| {
                mesh_bounds
                    .get(mesh)
                    .map(|b| b.transformed(&self.nodes[id].world))
            })
            .reduce(|acc, b| acc.union(&b))
    }

    /// Re-center the graph at the origin and scale it uniformly so the
    /// bounding-box diagonal equals `target_size`. Mutates the root
    /// transforms and refreshes world transforms. Returns the applied scale.
    pub fn normalize(&mut self, mesh_bounds: &[Aabb], target_size: f32) -> Option<f32> {
        self.update_world_transforms();
        let bounds = self.bounds(mesh_bounds)?;
        let diagonal = bounds.diagonal();
        let scale = if diagonal > f32::EPSILON {
            target_size / diagonal
        } else {
            1.0
        };
        let offset = -bounds.center() * scale;
        for &root in &self.roots.clone() {
            let node = &mut self.nodes[root];
            node.local.scale = node.local.scale * scale;
            node.local.position = node.local.position * scale + offset;
        }
        self.update_world_transforms();
        Some(scale)
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: cgmath::Vector3<f32>,
    pub max: cgmath::Vector3<f32>,
}

impl Aabb {
    /// Smallest box containing all points. `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = [f32; 3]>) -> Option<Self> {
        let mut points = points.into_iter();
        let first: cgmath::Vector3<f32> = points.next()?.into();
        let mut aabb = Aabb {
            min: first,
            max: first,
        };
        for p in points {
            let p: cgmath::Vector3<f32> = p.into();
            aabb.min = cgmath::Vector3::new(
                aabb.min.x.min(p.x),
                aabb.min.y.min(p.y),
                aabb.min.z.min(p.z),
            );
            aabb.max = cgmath::Vector3::new(
                aabb.max.x.max(p.x),
                aabb.max.y.max(p.y),
                aabb.max.z.max(p.z),
            );
        }
        Some(aabb)
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: cgmath::Vector3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: cgmath::Vector3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    pub fn center(&self) -> cgmath::Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> cgmath::Vector3<f32> {
        self.max - self.min
    }

    pub fn diagonal(&self) -> f32 {
        self.size().magnitude()
    }

    /// Box containing all eight transformed corners of this box.
    pub fn transformed(&self, transform: &Transform) -> Aabb {
        let corners = [
            [self.min.x, self.min.y, self.min.z],
            [self.min.x, self.min.y, self.max.z],
            [self.min.x, self.max.y, self.min.z],
            [self.min.x, self.max.y, self.max.z],
            [self.max.x, self.min.y, self.min.z],
            [self.max.x, self.min.y, self.max.z],
            [self.max.x, self.max.y, self.min.z],
            [self.max.x, self.max.y, self.max.z],
        ];
        let transformed = corners
            .into_iter()
            .map(|c| transform.transform_point(c.into()).into());
        // eight corners, never empty
        Aabb::from_points(transformed).unwrap_or(*self)
    }
}
