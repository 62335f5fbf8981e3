use aviator_kernel::{NodeId, SceneGraph};
use aviator_runtime::AppState;
use serde::Serialize;
use std::fmt::Write;

/// Scene inspector for developer tooling.
///
/// Read-only queries against a running scene for the CLI and the desktop
/// overlay.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene state.
    pub fn summary(app: &AppState) -> SceneSummary {
        let scene = app.scene();
        let airplane = scene
            .transform(app.airplane().root())
            .map(|t| t.position.to_array())
            .unwrap_or_default();
        let rotation = |id| scene.transform(id).map(|t| t.rotation.z).unwrap_or_default();

        SceneSummary {
            frame: app.frame(),
            seed: app.config().seed,
            node_count: scene.node_count(),
            renderable_count: scene.renderable_count(),
            mesh_count: scene.mesh_count(),
            material_count: scene.material_count(),
            vertex_count: scene.meshes().map(|(_, m)| m.vertex_count()).sum(),
            sea_vertices: app.sea().waves().len(),
            airplane_position: airplane,
            sea_rotation: rotation(app.sea().root()),
            sky_rotation: rotation(app.sky().root()),
            hair_phase: app.airplane().pilot().hair_phase(),
            state_hash: app.state_hash(),
        }
    }

    /// Details of one node, resolved against its ancestors.
    pub fn inspect_node(scene: &SceneGraph, id: NodeId) -> Option<NodeInfo> {
        let node = scene.node(id)?;
        let t = &node.transform;
        let world = scene.world_matrix(id)?.transform_point3(glam::Vec3::ZERO);
        Some(NodeInfo {
            id,
            name: node.name.clone(),
            position: t.position.to_array(),
            rotation: t.rotation.to_array(),
            scale: t.scale.to_array(),
            world_position: world.to_array(),
            children: node.children().len(),
            mesh_vertices: node
                .renderable
                .and_then(|r| scene.mesh(r.mesh))
                .map(|m| m.vertex_count()),
        })
    }

    /// Indented outline of the scene, one node per line.
    pub fn tree(scene: &SceneGraph) -> String {
        let mut out = String::new();
        scene.visit(|id, node, _, depth| {
            let p = node.transform.position;
            let _ = write!(
                out,
                "{:indent$}{} #{} ({:.1}, {:.1}, {:.1})",
                "",
                node.name,
                id.0,
                p.x,
                p.y,
                p.z,
                indent = depth * 2
            );
            if let Some(mesh) = node.renderable.and_then(|r| scene.mesh(r.mesh)) {
                let _ = write!(out, " [{} verts]", mesh.vertex_count());
            }
            out.push('\n');
        });
        out
    }
}

/// Summary of scene state for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct SceneSummary {
    pub frame: u64,
    pub seed: u64,
    pub node_count: usize,
    pub renderable_count: usize,
    pub mesh_count: usize,
    pub material_count: usize,
    pub vertex_count: usize,
    pub sea_vertices: usize,
    pub airplane_position: [f32; 3],
    pub sea_rotation: f32,
    pub sky_rotation: f32,
    pub hair_phase: f32,
    pub state_hash: u64,
}

impl SceneSummary {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [x, y, z] = self.airplane_position;
        writeln!(
            f,
            "Scene: frame={} seed={} nodes={} renderables={} meshes={} materials={} vertices={}",
            self.frame,
            self.seed,
            self.node_count,
            self.renderable_count,
            self.mesh_count,
            self.material_count,
            self.vertex_count
        )?;
        writeln!(
            f,
            "  airplane=({x:.2}, {y:.2}, {z:.2}) sea_rot={:.3} sky_rot={:.3} hair_phase={:.3}",
            self.sea_rotation, self.sky_rotation, self.hair_phase
        )?;
        write!(
            f,
            "  sea_vertices={} hash={:016x}",
            self.sea_vertices, self.state_hash
        )
    }
}

/// Detailed info about a single node.
#[derive(Debug, Clone, Serialize)]
pub struct NodeInfo {
    pub id: NodeId,
    pub name: String,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
    pub world_position: [f32; 3],
    pub children: usize,
    pub mesh_vertices: Option<usize>,
}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Node #{} {} pos=({:.2}, {:.2}, {:.2}) world=({:.2}, {:.2}, {:.2}) children={}",
            self.id.0,
            self.name,
            self.position[0],
            self.position[1],
            self.position[2],
            self.world_position[0],
            self.world_position[1],
            self.world_position[2],
            self.children,
        )
    }
}
