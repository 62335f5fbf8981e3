use crate::cloud::Cloud;
use crate::drivers::{Accumulate, Axis, spin};
use aviator_common::{SkyConfig, Transform};
use aviator_kernel::{NodeId, SceneError, SceneGraph};
use glam::Vec3;
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, TAU};

/// A ring of clouds around the sky root's z axis.
#[derive(Debug, Clone)]
pub struct Sky {
    root: NodeId,
    clouds: Vec<Cloud>,
}

impl Sky {
    /// Build the cloud ring as a new root node of `scene`.
    ///
    /// Cloud `i` sits at angle `i * 2π / n` around the ring, tilted so it
    /// faces along the ring.
    pub fn build<R: Rng + ?Sized>(
        scene: &mut SceneGraph,
        config: &SkyConfig,
        rng: &mut R,
    ) -> Result<Self, SceneError> {
        let root = scene.spawn("sky", Transform::default(), None);
        let block = Cloud::block_renderable(scene);
        let step = TAU / config.cloud_count as f32;

        let mut clouds = Vec::with_capacity(config.cloud_count as usize);
        for i in 0..config.cloud_count {
            let cloud = Cloud::build(scene, block, config.cloud_blocks, rng)?;
            let angle = step * i as f32;
            let radius = config.radius.sample(rng);
            let position = Vec3::new(
                angle.cos() * radius,
                angle.sin() * radius,
                config.depth.sample(rng),
            );
            let scale = config.scale.sample(rng);
            *scene.transform_mut(cloud.root())? = Transform::at(position)
                .with_rotation(Vec3::new(0.0, 0.0, angle + FRAC_PI_2))
                .with_uniform_scale(scale);
            scene.attach(root, cloud.root())?;
            clouds.push(cloud);
        }

        tracing::debug!(
            clouds = clouds.len(),
            nodes = scene.subtree_size(root),
            "built sky"
        );
        Ok(Self { root, clouds })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    /// Turn the whole ring about z. The angle is not wrapped.
    pub fn spin(&self, scene: &mut SceneGraph, delta: f32) -> Result<f32, SceneError> {
        spin(scene, self.root, Axis::Z, delta, Accumulate::Unbounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn build(seed: u64) -> (SceneGraph, Sky) {
        let mut scene = SceneGraph::new();
        let mut rng = StdRng::seed_from_u64(seed);
        let sky = Sky::build(&mut scene, &SkyConfig::default(), &mut rng).unwrap();
        (scene, sky)
    }

    #[test]
    fn twenty_clouds_on_a_ring() {
        let (scene, sky) = build(5);
        assert_eq!(sky.clouds().len(), 20);
        assert_eq!(scene.children(sky.root()).unwrap().len(), 20);
        for (i, cloud) in sky.clouds().iter().enumerate() {
            let t = scene.transform(cloud.root()).unwrap();
            let angle = TAU / 20.0 * i as f32;
            let radius = t.position.truncate().length();
            assert!((750.0 - 1e-2..950.0 + 1e-2).contains(&radius), "cloud {i}: {radius}");
            let bearing = t.position.y.atan2(t.position.x).rem_euclid(TAU);
            let expected = angle.rem_euclid(TAU);
            let diff = (bearing - expected).abs();
            assert!(diff < 1e-3 || (TAU - diff) < 1e-3, "cloud {i} at {bearing}");
            assert!((-800.0..-400.0).contains(&t.position.z));
            assert!((t.rotation.z - (angle + FRAC_PI_2)).abs() < 1e-6);
            assert!((1.0..3.0).contains(&t.scale.x));
        }
    }

    #[test]
    fn same_seed_same_sky() {
        let (a, _) = build(11);
        let (b, _) = build(11);
        let (c, _) = build(12);
        assert_eq!(a.state_hash(), b.state_hash());
        assert_ne!(a.state_hash(), c.state_hash());
    }

    #[test]
    fn spin_accumulates_without_wrapping() {
        let (mut scene, sky) = build(1);
        for _ in 0..1000 {
            sky.spin(&mut scene, 0.01).unwrap();
        }
        let z = scene.transform(sky.root()).unwrap().rotation.z;
        assert!(z > TAU);
        assert!((z - 10.0).abs() < 1e-2);
    }
}
