use crate::material::Material;
use crate::mesh::Mesh;
use aviator_common::Transform;
use glam::Mat4;
use serde::{Deserialize, Serialize};

/// Stable index of a node in the scene arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Stable index of a mesh in the scene arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshId(pub u32);

/// Stable index of a material in the scene arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(pub u32);

/// Renderable payload: a mesh drawn with a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Renderable {
    pub mesh: MeshId,
    pub material: MaterialId,
}

/// Errors from scene graph operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("node {0:?} not found")]
    NodeNotFound(NodeId),
    #[error("mesh {0:?} not found")]
    MeshNotFound(MeshId),
    #[error("material {0:?} not found")]
    MaterialNotFound(MaterialId),
    #[error("node {child:?} already has parent {parent:?}")]
    AlreadyParented { child: NodeId, parent: NodeId },
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
}

/// A node of the transform tree.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub renderable: Option<Renderable>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena-backed scene graph.
///
/// Nodes, meshes and materials live in flat vectors and reference each other
/// by index, so there are no back-pointers to keep alive. Each node has at
/// most one parent; nodes without a parent are roots of the scene and are
/// drawn in insertion order.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    roots: Vec<NodeId>,
    meshes: Vec<Mesh>,
    materials: Vec<Material>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Number of nodes carrying a renderable payload.
    pub fn renderable_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.renderable.is_some()).count()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Register a mesh; meshes can be shared by many nodes.
    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        let id = MeshId(self.meshes.len() as u32);
        self.meshes.push(mesh);
        id
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0 as usize)
    }

    pub fn mesh_mut(&mut self, id: MeshId) -> Option<&mut Mesh> {
        self.meshes.get_mut(id.0 as usize)
    }

    /// All meshes in registration order, paired with their ids.
    pub fn meshes(&self) -> impl Iterator<Item = (MeshId, &Mesh)> {
        self.meshes
            .iter()
            .enumerate()
            .map(|(i, m)| (MeshId(i as u32), m))
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(material);
        id
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    /// Create a new root node.
    pub fn spawn(
        &mut self,
        name: impl Into<String>,
        transform: Transform,
        renderable: Option<Renderable>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SceneNode {
            name: name.into(),
            transform,
            renderable,
            parent: None,
            children: Vec::new(),
        });
        self.roots.push(id);
        id
    }

    /// Create a node directly under `parent`.
    pub fn spawn_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        transform: Transform,
        renderable: Option<Renderable>,
    ) -> Result<NodeId, SceneError> {
        if let Some(r) = renderable {
            self.check_renderable(r)?;
        }
        self.node(parent).ok_or(SceneError::NodeNotFound(parent))?;
        let id = self.spawn(name, transform, renderable);
        self.attach(parent, id)?;
        Ok(id)
    }

    /// Move the root `child` under `parent`, appending it to the child list.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.node(parent).ok_or(SceneError::NodeNotFound(parent))?;
        let node = self.node(child).ok_or(SceneError::NodeNotFound(child))?;
        if let Some(existing) = node.parent {
            return Err(SceneError::AlreadyParented {
                child,
                parent: existing,
            });
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }

        self.roots.retain(|r| *r != child);
        self.nodes[child.0 as usize].parent = Some(parent);
        self.nodes[parent.0 as usize].children.push(child);
        Ok(())
    }

    /// Detach `child` from its parent, making it a root again.
    pub fn detach(&mut self, child: NodeId) -> Result<(), SceneError> {
        let node = self.node(child).ok_or(SceneError::NodeNotFound(child))?;
        if let Some(parent) = node.parent {
            self.nodes[parent.0 as usize].children.retain(|c| *c != child);
            self.nodes[child.0 as usize].parent = None;
            self.roots.push(child);
        }
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0 as usize)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0 as usize)
    }

    pub fn transform(&self, id: NodeId) -> Result<&Transform, SceneError> {
        self.node(id)
            .map(|n| &n.transform)
            .ok_or(SceneError::NodeNotFound(id))
    }

    pub fn transform_mut(&mut self, id: NodeId) -> Result<&mut Transform, SceneError> {
        self.node_mut(id)
            .map(|n| &mut n.transform)
            .ok_or(SceneError::NodeNotFound(id))
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], SceneError> {
        self.node(id)
            .map(|n| n.children.as_slice())
            .ok_or(SceneError::NodeNotFound(id))
    }

    /// Number of nodes in the subtree rooted at `id`, including `id`.
    pub fn subtree_size(&self, id: NodeId) -> usize {
        let mut count = 0;
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if let Some(node) = self.node(n) {
                count += 1;
                stack.extend(node.children.iter().copied());
            }
        }
        count
    }

    /// Local-to-scene matrix of a node (product of its ancestors' transforms).
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut node = self.node(id)?;
        let mut m = node.transform.matrix();
        while let Some(parent) = node.parent {
            node = self.node(parent)?;
            m = node.transform.matrix() * m;
        }
        Some(m)
    }

    /// Depth-first pre-order walk over every attached node, in child order.
    ///
    /// The callback receives the node id, the node, its scene matrix and its
    /// depth (roots are depth 0).
    pub fn visit<F>(&self, mut f: F)
    where
        F: FnMut(NodeId, &SceneNode, Mat4, usize),
    {
        let mut stack: Vec<(NodeId, Mat4, usize)> = self
            .roots
            .iter()
            .rev()
            .map(|r| (*r, Mat4::IDENTITY, 0))
            .collect();

        while let Some((id, parent_matrix, depth)) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            let world = parent_matrix * node.transform.matrix();
            f(id, node, world, depth);
            for child in node.children.iter().rev() {
                stack.push((*child, world, depth + 1));
            }
        }
    }

    /// Deterministic hash of every node transform and mesh vertex, in arena
    /// order. Two scenes built from the same seed and driven by the same
    /// inputs hash identically.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        for node in &self.nodes {
            let t = &node.transform;
            for v in [t.position, t.rotation, t.scale] {
                for c in v.to_array() {
                    mix(&mut h, &c.to_le_bytes());
                }
            }
        }
        for mesh in &self.meshes {
            for p in mesh.positions() {
                for c in p.to_array() {
                    mix(&mut h, &c.to_le_bytes());
                }
            }
        }
        h
    }

    fn check_renderable(&self, r: Renderable) -> Result<(), SceneError> {
        self.mesh(r.mesh).ok_or(SceneError::MeshNotFound(r.mesh))?;
        self.material(r.material)
            .ok_or(SceneError::MaterialNotFound(r.material))?;
        Ok(())
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, mut of: NodeId) -> bool {
        loop {
            if candidate == of {
                return true;
            }
            match self.node(of).and_then(|n| n.parent) {
                Some(p) => of = p,
                None => return false,
            }
        }
    }
}
