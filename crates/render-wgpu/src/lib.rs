//! wgpu render backend for the aviator scene.
//!
//! Draws every renderable node of a [`aviator_kernel::SceneGraph`] with
//! hemisphere and directional lighting, a directional shadow map and linear
//! fog, at 4x MSAA. Shadow casters are first drawn depth-only from the light;
//! opaque batches follow, then transparent ones with depth writes off.
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - A mesh is re-uploaded only when its revision moves.

mod gpu;
mod shaders;
mod vertex;

pub use gpu::{GpuError, GpuFrame, WgpuRenderer};
