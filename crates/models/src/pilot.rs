use crate::drivers::{advance_phase, hair_scale};
use aviator_common::{Transform, palette};
use aviator_kernel::{Material, MaterialId, Mesh, NodeId, Renderable, SceneError, SceneGraph};
use glam::Vec3;

/// Number of animated strands on top of the pilot's head.
pub const TOP_HAIR_STRANDS: usize = 12;

/// The pilot: a blocky head with animated hair, lenses and ears.
#[derive(Debug, Clone)]
pub struct Pilot {
    root: NodeId,
    strands: Vec<NodeId>,
    hair_phase: f32,
}

impl Pilot {
    /// Build the pilot as a new root node of `scene`.
    pub fn build(scene: &mut SceneGraph) -> Result<Self, SceneError> {
        let brown = scene.add_material(Material::flat("pilot_brown", palette::BROWN));
        let pink = scene.add_material(Material::phong("pilot_pink", palette::PINK));
        let hair_material = scene.add_material(Material::phong("pilot_hair", palette::BROWN));
        let lens_material = scene.add_material(Material::phong("pilot_lens", palette::BROWN));

        let root = scene.spawn("pilot", Transform::default(), None);

        let body = mesh(scene, Mesh::cuboid(15.0, 15.0, 15.0), brown);
        scene.spawn_child(root, "body", Transform::at(Vec3::new(2.0, -12.0, 0.0)), Some(body))?;

        let face = mesh(scene, Mesh::cuboid(10.0, 10.0, 10.0), pink);
        scene.spawn_child(root, "face", Transform::default(), Some(face))?;

        // Strands grow upward from their base so scaling keeps them on the scalp.
        let mut strand_mesh = Mesh::cuboid(4.0, 4.0, 4.0);
        strand_mesh.translate(Vec3::new(0.0, 2.0, 0.0));
        let strand = mesh(scene, strand_mesh, hair_material);

        let hairs = scene.spawn_child(
            root,
            "hairs",
            Transform::at(Vec3::new(-5.0, 5.0, 0.0)),
            None,
        )?;
        let hairs_top = scene.spawn_child(hairs, "hairs_top", Transform::default(), None)?;

        let mut strands = Vec::with_capacity(TOP_HAIR_STRANDS);
        for i in 0..TOP_HAIR_STRANDS {
            let col = (i % 3) as f32;
            let row = (i / 3) as f32;
            let position = Vec3::new(-4.0 + row * 4.0, 0.0, -4.0 + col * 4.0);
            strands.push(scene.spawn_child(
                hairs_top,
                format!("hair_{i}"),
                Transform::at(position),
                Some(strand),
            )?);
        }

        let mut side_mesh = Mesh::cuboid(12.0, 4.0, 2.0);
        side_mesh.translate(Vec3::new(-6.0, 0.0, 0.0));
        let side = mesh(scene, side_mesh, hair_material);
        scene.spawn_child(hairs, "hair_side_r", Transform::at(Vec3::new(8.0, -2.0, 6.0)), Some(side))?;
        scene.spawn_child(hairs, "hair_side_l", Transform::at(Vec3::new(8.0, -2.0, -6.0)), Some(side))?;

        let back = mesh(scene, Mesh::cuboid(2.0, 8.0, 10.0), hair_material);
        scene.spawn_child(hairs, "hair_back", Transform::at(Vec3::new(-1.0, -4.0, 0.0)), Some(back))?;

        let lens = mesh(scene, Mesh::cuboid(5.0, 5.0, 5.0), lens_material);
        scene.spawn_child(root, "lens_r", Transform::at(Vec3::new(6.0, 0.0, 3.0)), Some(lens))?;
        scene.spawn_child(root, "lens_l", Transform::at(Vec3::new(6.0, 0.0, -3.0)), Some(lens))?;

        let bridge = mesh(scene, Mesh::cuboid(11.0, 1.0, 11.0), lens_material);
        scene.spawn_child(root, "lens_bridge", Transform::default(), Some(bridge))?;

        let ear = mesh(scene, Mesh::cuboid(2.0, 3.0, 2.0), pink);
        scene.spawn_child(root, "ear_l", Transform::at(Vec3::new(0.0, 0.0, -6.0)), Some(ear))?;
        scene.spawn_child(root, "ear_r", Transform::at(Vec3::new(0.0, 0.0, 6.0)), Some(ear))?;

        tracing::debug!(nodes = scene.subtree_size(root), "built pilot");

        Ok(Self {
            root,
            strands,
            hair_phase: 0.0,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The animated top-of-head strands, in grid order.
    pub fn strands(&self) -> &[NodeId] {
        &self.strands
    }

    pub fn hair_phase(&self) -> f32 {
        self.hair_phase
    }

    /// Advance the hair phase by `step` and rescale every strand for the new
    /// phase. The starting phase of 0 is never shown once a frame has run.
    pub fn update_hairs(&mut self, scene: &mut SceneGraph, step: f32) -> Result<(), SceneError> {
        self.hair_phase = advance_phase(self.hair_phase, step);
        for (k, strand) in self.strands.iter().enumerate() {
            scene.transform_mut(*strand)?.scale.y = hair_scale(self.hair_phase, k);
        }
        Ok(())
    }
}

pub(crate) fn mesh(scene: &mut SceneGraph, mesh: Mesh, material: MaterialId) -> Renderable {
    Renderable {
        mesh: scene.add_mesh(mesh),
        material,
    }
}
