//! Scene kernel: arena scene graph, procedural meshes and materials.
//!
//! # Invariants
//! - The node tree is acyclic and every node has at most one parent.
//! - Nodes, meshes and materials are addressed by stable indices.
//! - Any mutation of mesh vertices advances the mesh revision.

pub mod material;
pub mod mesh;
pub mod scene;

pub use material::Material;
pub use mesh::Mesh;
pub use scene::{MaterialId, MeshId, NodeId, Renderable, SceneError, SceneGraph, SceneNode};
