use crate::draw::draw_list;
use crate::view::RenderView;
use aviator_kernel::SceneGraph;
use std::convert::Infallible;
use std::fmt::Write;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene graph and a view, and produces output. It never
/// mutates the scene; the frame loop owns it.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;
    /// Backend failure surfaced to the frame loop.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Render one frame from the given scene and view.
    fn render(&mut self, scene: &SceneGraph, view: &RenderView)
    -> Result<Self::Output, Self::Error>;
}

/// Text renderer for headless runs and tests.
///
/// Produces a human-readable summary of the scene roots and draw list.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    frames: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;
    type Error = Infallible;

    fn render(&mut self, scene: &SceneGraph, view: &RenderView) -> Result<String, Infallible> {
        self.frames += 1;
        let items = draw_list(scene);
        let transparent = items.iter().filter(|i| i.transparent).count();
        let casters = items.iter().filter(|i| i.cast_shadow).count();
        let receivers = items.iter().filter(|i| i.receive_shadow).count();

        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Scene (frame={}, nodes={}) ===",
            self.frames,
            scene.node_count()
        );
        let _ = writeln!(
            out,
            "Draws: {} ({} opaque, {} transparent)",
            items.len(),
            items.len() - transparent,
            transparent
        );
        if view.lighting.directional.shadow.is_some() {
            let _ = writeln!(out, "Shadows: {casters} casters, {receivers} receivers");
        }
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0} aspect={:.2}",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees,
            view.aspect
        );

        for root in scene.roots() {
            let Some(node) = scene.node(*root) else {
                continue;
            };
            let t = &node.transform;
            let _ = writeln!(
                out,
                "  {} pos=({:.2}, {:.2}, {:.2}) rot=({:.3}, {:.3}, {:.3}) nodes={}",
                node.name,
                t.position.x,
                t.position.y,
                t.position.z,
                t.rotation.x,
                t.rotation.y,
                t.rotation.z,
                scene.subtree_size(*root)
            );
        }

        tracing::trace!(frame = self.frames, draws = items.len(), "debug frame");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aviator_common::{Transform, palette};
    use aviator_kernel::{Material, Mesh, Renderable};
    use glam::Vec3;

    #[test]
    fn debug_renderer_empty_scene() {
        let scene = SceneGraph::new();
        let mut renderer = DebugTextRenderer::new();
        let output = renderer.render(&scene, &RenderView::default()).unwrap();

        assert!(output.contains("frame=1"));
        assert!(output.contains("nodes=0"));
        assert!(output.contains("Draws: 0"));
    }

    #[test]
    fn debug_renderer_lists_roots() {
        let mut scene = SceneGraph::new();
        let r = Renderable {
            mesh: scene.add_mesh(Mesh::cuboid(1.0, 1.0, 1.0)),
            material: scene.add_material(Material::flat("m", palette::RED)),
        };
        let root = scene.spawn("airplane", Transform::at(Vec3::new(1.0, 2.0, 3.0)), Some(r));
        scene.spawn_child(root, "wing", Transform::default(), Some(r)).unwrap();

        let mut renderer = DebugTextRenderer::new();
        renderer.render(&scene, &RenderView::default()).unwrap();
        let output = renderer.render(&scene, &RenderView::default()).unwrap();

        assert_eq!(renderer.frames(), 2);
        assert!(output.contains("frame=2"));
        assert!(output.contains("Draws: 2 (2 opaque, 0 transparent)"));
        assert!(output.contains("airplane pos=(1.00, 2.00, 3.00)"));
        assert!(!output.contains("wing"));
        assert!(output.contains("Shadows: 0 casters, 0 receivers"));
    }

    #[test]
    fn debug_renderer_counts_shadow_participants() {
        let mut scene = SceneGraph::new();
        let r = Renderable {
            mesh: scene.add_mesh(Mesh::cuboid(1.0, 1.0, 1.0)),
            material: scene.add_material(
                Material::flat("engine", palette::WHITE).with_shadows(true, true),
            ),
        };
        scene.spawn("engine", Transform::default(), Some(r));

        let mut renderer = DebugTextRenderer::new();
        let mut view = RenderView::default();
        let output = renderer.render(&scene, &view).unwrap();
        assert!(output.contains("Shadows: 1 casters, 1 receivers"));

        view.lighting.directional.shadow = None;
        let output = renderer.render(&scene, &view).unwrap();
        assert!(!output.contains("Shadows:"));
    }
}
