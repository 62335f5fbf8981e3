use aviator_common::SceneConfig;
use aviator_input::{PointerPosition, SharedPointer, flight_target};
use aviator_kernel::{SceneError, SceneGraph};
use aviator_models::{AirPlane, Sea, Sky};
use aviator_render::RenderView;
use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Uniform scale of the airplane in the scene.
pub const AIRPLANE_SCALE: f32 = 0.25;
/// Starting height of the airplane.
pub const AIRPLANE_ALTITUDE: f32 = 100.0;
/// Height of the sea and sky axes, below the flight envelope.
pub const HORIZON_DEPTH: f32 = -600.0;

/// Everything one running scene owns.
///
/// Built once from a [`SceneConfig`]; all randomness comes from an RNG seeded
/// with `config.seed`, so two states built from the same config are
/// identical and stay identical under the same pointer and tick sequence.
#[derive(Debug)]
pub struct AppState {
    config: SceneConfig,
    scene: SceneGraph,
    airplane: AirPlane,
    sea: Sea,
    sky: Sky,
    pointer: SharedPointer,
    view: RenderView,
    frame: u64,
}

impl AppState {
    pub fn new(config: SceneConfig) -> Result<Self, SceneError> {
        let _span = tracing::info_span!("build_scene", seed = config.seed).entered();
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut scene = SceneGraph::new();

        let sea = Sea::build(&mut scene, &config.waves, &mut rng)?;
        scene.transform_mut(sea.root())?.position.y = HORIZON_DEPTH;

        let sky = Sky::build(&mut scene, &config.sky, &mut rng)?;
        scene.transform_mut(sky.root())?.position.y = HORIZON_DEPTH;

        let airplane = AirPlane::build(&mut scene)?;
        let t = scene.transform_mut(airplane.root())?;
        t.scale = Vec3::splat(AIRPLANE_SCALE);
        t.position.y = AIRPLANE_ALTITUDE;

        tracing::info!(
            nodes = scene.node_count(),
            meshes = scene.mesh_count(),
            renderables = scene.renderable_count(),
            "scene ready"
        );

        Ok(Self {
            config,
            scene,
            airplane,
            sea,
            sky,
            pointer: SharedPointer::default(),
            view: RenderView::default(),
            frame: 0,
        })
    }

    /// Advance the scene by one frame.
    ///
    /// Order: waves, sea spin, sky spin, airplane position from the latest
    /// pointer, propeller, hair.
    pub fn tick(&mut self) -> Result<(), SceneError> {
        let rates = self.config.drivers;
        self.sea.advance(&mut self.scene)?;
        self.sea.spin(&mut self.scene, rates.sea_spin)?;
        self.sky.spin(&mut self.scene, rates.sky_spin)?;

        let target = flight_target(self.pointer.load(), &self.config.flight);
        self.airplane
            .set_position_xy(&mut self.scene, target.x, target.y)?;
        self.airplane
            .spin_propeller(&mut self.scene, rates.propeller_spin)?;
        self.airplane
            .pilot_mut()
            .update_hairs(&mut self.scene, rates.hair_phase_step)?;

        self.frame += 1;
        tracing::trace!(frame = self.frame, ?target, "tick");
        Ok(())
    }

    /// Record a new pointer position. Callable from any thread through
    /// [`AppState::pointer`].
    pub fn set_pointer(&self, position: PointerPosition) {
        self.pointer.store(position);
    }

    /// Handle for writing the pointer from another thread.
    pub fn pointer(&self) -> SharedPointer {
        self.pointer.clone()
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn airplane(&self) -> &AirPlane {
        &self.airplane
    }

    pub fn sea(&self) -> &Sea {
        &self.sea
    }

    pub fn sky(&self) -> &Sky {
        &self.sky
    }

    pub fn view(&self) -> &RenderView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut RenderView {
        &mut self.view
    }

    /// Frames ticked so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn state_hash(&self) -> u64 {
        self.scene.state_hash()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    fn state(seed: u64) -> AppState {
        AppState::new(SceneConfig {
            seed,
            ..SceneConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn placement() {
        let s = state(1);
        let plane = s.scene().transform(s.airplane().root()).unwrap();
        assert_eq!(plane.scale, Vec3::splat(0.25));
        assert_eq!(plane.position.y, 100.0);
        assert_eq!(s.scene().transform(s.sea().root()).unwrap().position.y, -600.0);
        assert_eq!(s.scene().transform(s.sky().root()).unwrap().position.y, -600.0);
        assert_eq!(s.scene().roots().len(), 3);
    }

    #[test]
    fn one_tick_spins_sea_once() {
        let mut s = state(1);
        s.tick().unwrap();
        let z = s.scene().transform(s.sea().root()).unwrap().rotation.z;
        assert_eq!(z, 0.005);
        s.tick().unwrap();
        let z = s.scene().transform(s.sea().root()).unwrap().rotation.z;
        assert_eq!(z, 0.005 + 0.005);
        let sky = s.scene().transform(s.sky().root()).unwrap().rotation.z;
        assert_eq!(sky, 0.01 + 0.01);
    }

    #[test]
    fn spins_grow_monotonically() {
        let mut s = state(2);
        let mut last_sea = 0.0;
        for _ in 0..2000 {
            s.tick().unwrap();
            let z = s.scene().transform(s.sea().root()).unwrap().rotation.z;
            assert!(z > last_sea);
            last_sea = z;
        }
        assert!(last_sea > TAU);
        let prop = s.scene().transform(s.airplane().propeller()).unwrap().rotation.x;
        assert!((0.0..TAU).contains(&prop));
    }

    #[test]
    fn airplane_follows_pointer() {
        let mut s = state(3);
        s.tick().unwrap();
        let p = s.scene().transform(s.airplane().root()).unwrap().position;
        assert_eq!((p.x, p.y), (0.0, 100.0));

        s.set_pointer(PointerPosition::new(1.0, -1.0));
        s.tick().unwrap();
        let p = s.scene().transform(s.airplane().root()).unwrap().position;
        assert_eq!((p.x, p.y), (100.0, 25.0));

        let writer = s.pointer();
        std::thread::spawn(move || writer.store(PointerPosition::new(-1.0, 1.0)))
            .join()
            .unwrap();
        s.tick().unwrap();
        let p = s.scene().transform(s.airplane().root()).unwrap().position;
        assert_eq!((p.x, p.y), (-100.0, 175.0));
    }

    #[test]
    fn sea_vertex_count_is_stable() {
        let mut s = state(4);
        let mesh = s.sea().mesh();
        let before = s.scene().mesh(mesh).unwrap().vertex_count();
        for _ in 0..50 {
            s.tick().unwrap();
        }
        assert_eq!(s.scene().mesh(mesh).unwrap().vertex_count(), before);
        assert_eq!(before, s.sea().waves().len());
        assert_eq!(s.frame(), 50);
    }

    #[test]
    fn same_seed_same_run() {
        let mut a = state(42);
        let mut b = state(42);
        assert_eq!(a.state_hash(), b.state_hash());
        for i in 0..30 {
            let p = PointerPosition::new((i as f32 * 0.1).sin(), (i as f32 * 0.07).cos());
            a.set_pointer(p);
            b.set_pointer(p);
            a.tick().unwrap();
            b.tick().unwrap();
        }
        assert_eq!(a.state_hash(), b.state_hash());
        assert_ne!(a.state_hash(), state(43).state_hash());
    }
}
