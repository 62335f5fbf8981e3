//! The sea: a merged cylinder whose vertices each bob on their own circle.

use crate::drivers::{Accumulate, Axis, advance_phase, spin};
use aviator_common::{Span, Transform, WaveConfig, palette};
use aviator_kernel::{Material, Mesh, MeshId, NodeId, Renderable, SceneError, SceneGraph};
use glam::{Mat4, Vec3};
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, TAU};

pub const SEA_RADIUS: f32 = 600.0;
pub const SEA_LENGTH: f32 = 800.0;
pub const RADIAL_SEGMENTS: u32 = 40;
pub const HEIGHT_SEGMENTS: u32 = 10;
pub const SEA_OPACITY: f32 = 0.6;
/// Precision, in decimal places, at which coincident vertices are merged.
pub const MERGE_DECIMALS: i32 = 4;

/// Oscillation of one sea vertex around its rest position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveVertex {
    pub base: Vec3,
    /// Current angle on the wave circle, in `[0, 2π)`.
    pub phase: f32,
    pub amplitude: f32,
    /// Radians per frame.
    pub speed: f32,
}

impl WaveVertex {
    /// Position of the vertex at its current phase.
    pub fn position(&self) -> Vec3 {
        self.base
            + Vec3::new(
                self.phase.cos() * self.amplitude,
                self.phase.sin() * self.amplitude,
                0.0,
            )
    }
}

#[derive(Debug, Clone)]
pub struct Sea {
    root: NodeId,
    mesh: MeshId,
    waves: Vec<WaveVertex>,
}

impl Sea {
    /// Build the sea as a new root node of `scene`.
    ///
    /// The cylinder is laid on its side so its axis runs along z, then
    /// coincident vertices are merged so neighbouring faces stay stitched
    /// while the waves move.
    pub fn build<R: Rng + ?Sized>(
        scene: &mut SceneGraph,
        config: &WaveConfig,
        rng: &mut R,
    ) -> Result<Self, SceneError> {
        let mut mesh = Mesh::cylinder(
            SEA_RADIUS,
            SEA_RADIUS,
            SEA_LENGTH,
            RADIAL_SEGMENTS,
            HEIGHT_SEGMENTS,
        );
        mesh.apply_matrix(Mat4::from_rotation_x(-FRAC_PI_2));
        let removed = mesh.merge_vertices(MERGE_DECIMALS);

        let phase = Span::new(0.0, TAU);
        let waves: Vec<WaveVertex> = mesh
            .positions()
            .iter()
            .map(|&base| WaveVertex {
                base,
                phase: phase.sample(rng),
                amplitude: config.amplitude.sample(rng),
                speed: config.speed.sample(rng),
            })
            .collect();

        let renderable = Renderable {
            mesh: scene.add_mesh(mesh),
            material: scene.add_material(
                Material::flat("sea", palette::BLUE)
                    .with_opacity(SEA_OPACITY)
                    .with_shadows(false, true),
            ),
        };
        let root = scene.spawn("sea", Transform::default(), Some(renderable));

        tracing::debug!(vertices = waves.len(), merged = removed, "built sea");
        Ok(Self {
            root,
            mesh: renderable.mesh,
            waves,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn mesh(&self) -> MeshId {
        self.mesh
    }

    pub fn waves(&self) -> &[WaveVertex] {
        &self.waves
    }

    /// Step every vertex one frame along its wave circle and write the new
    /// positions into the sea mesh. Does not rotate the sea.
    ///
    /// The phase advances before the position is computed, so after the
    /// first call no vertex sits at its initial phase.
    pub fn advance(&mut self, scene: &mut SceneGraph) -> Result<(), SceneError> {
        let mesh = scene
            .mesh_mut(self.mesh)
            .ok_or(SceneError::MeshNotFound(self.mesh))?;
        for (wave, p) in self.waves.iter_mut().zip(mesh.positions_mut()) {
            wave.phase = advance_phase(wave.phase, wave.speed);
            *p = wave.position();
        }
        Ok(())
    }

    /// Turn the sea about its axis. The angle is not wrapped.
    pub fn spin(&self, scene: &mut SceneGraph, delta: f32) -> Result<f32, SceneError> {
        spin(scene, self.root, Axis::Z, delta, Accumulate::Unbounded)
    }
}
