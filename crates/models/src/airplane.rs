use crate::drivers::{Accumulate, Axis, spin};
use crate::pilot::{Pilot, mesh};
use aviator_common::{Transform, palette};
use aviator_kernel::{Material, Mesh, NodeId, SceneError, SceneGraph};
use glam::Vec3;

/// Offsets applied to the rear corners of the cockpit box, narrowing it into
/// a wedge. Indices follow [`Mesh::cuboid`] corner order.
pub const COCKPIT_TAPER: [(usize, Vec3); 4] = [
    (4, Vec3::new(0.0, -10.0, 20.0)),
    (5, Vec3::new(0.0, -10.0, -20.0)),
    (6, Vec3::new(0.0, 30.0, 20.0)),
    (7, Vec3::new(0.0, 30.0, -20.0)),
];

/// The airplane: fuselage, engine, tail, wing, a spinning propeller and its
/// pilot.
#[derive(Debug, Clone)]
pub struct AirPlane {
    root: NodeId,
    propeller: NodeId,
    pilot: Pilot,
}

impl AirPlane {
    /// Build the airplane as a new root node of `scene`.
    pub fn build(scene: &mut SceneGraph) -> Result<Self, SceneError> {
        let part = |name: &str, color| Material::flat(name, color).with_shadows(true, true);
        let red = scene.add_material(part("plane_red", palette::RED));
        let white = scene.add_material(part("plane_white", palette::WHITE));
        let brown = scene.add_material(part("plane_brown", palette::BROWN));
        let brown_dark = scene.add_material(part("plane_brown_dark", palette::BROWN_DARK));

        let root = scene.spawn("airplane", Transform::default(), None);

        let mut cockpit_mesh = Mesh::cuboid(60.0, 50.0, 50.0);
        for (corner, offset) in COCKPIT_TAPER {
            cockpit_mesh.displace_vertex(corner, offset);
        }
        let cockpit = mesh(scene, cockpit_mesh, red);
        scene.spawn_child(root, "cockpit", Transform::default(), Some(cockpit))?;

        let engine = mesh(scene, Mesh::cuboid(20.0, 50.0, 50.0), white);
        scene.spawn_child(root, "engine", Transform::at(Vec3::new(40.0, 0.0, 0.0)), Some(engine))?;

        let tail = mesh(scene, Mesh::cuboid(15.0, 20.0, 5.0), red);
        scene.spawn_child(root, "tail", Transform::at(Vec3::new(-35.0, 25.0, 0.0)), Some(tail))?;

        let wing = mesh(scene, Mesh::cuboid(40.0, 8.0, 150.0), red);
        scene.spawn_child(root, "wing", Transform::default(), Some(wing))?;

        let hub = mesh(scene, Mesh::cuboid(20.0, 10.0, 10.0), brown);
        let propeller = scene.spawn_child(
            root,
            "propeller",
            Transform::at(Vec3::new(50.0, 0.0, 0.0)),
            Some(hub),
        )?;
        let blade = mesh(scene, Mesh::cuboid(1.0, 100.0, 20.0), brown_dark);
        scene.spawn_child(propeller, "blade", Transform::at(Vec3::new(8.0, 0.0, 0.0)), Some(blade))?;

        let pilot = Pilot::build(scene)?;
        scene.transform_mut(pilot.root())?.position = Vec3::new(-10.0, 27.0, 0.0);
        scene.attach(root, pilot.root())?;

        tracing::debug!(nodes = scene.subtree_size(root), "built airplane");

        Ok(Self {
            root,
            propeller,
            pilot,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn propeller(&self) -> NodeId {
        self.propeller
    }

    pub fn pilot(&self) -> &Pilot {
        &self.pilot
    }

    pub fn pilot_mut(&mut self) -> &mut Pilot {
        &mut self.pilot
    }

    /// Turn the propeller about its x axis; the angle stays in `[0, 2π)`.
    pub fn spin_propeller(&self, scene: &mut SceneGraph, delta: f32) -> Result<f32, SceneError> {
        spin(scene, self.propeller, Axis::X, delta, Accumulate::Wrapped)
    }

    /// Place the airplane root in the x/y plane, leaving z untouched.
    pub fn set_position_xy(&self, scene: &mut SceneGraph, x: f32, y: f32) -> Result<(), SceneError> {
        let position = &mut scene.transform_mut(self.root)?.position;
        position.x = x;
        position.y = y;
        Ok(())
    }
}
