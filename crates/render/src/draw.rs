use aviator_kernel::{MaterialId, MeshId, NodeId, SceneGraph};
use glam::Mat4;

/// One renderable node, resolved to scene space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub node: NodeId,
    pub mesh: MeshId,
    pub material: MaterialId,
    pub model: Mat4,
    pub transparent: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

/// Flatten the scene into draw items: opaque items first, then transparent
/// ones, each group in traversal order.
pub fn draw_list(scene: &SceneGraph) -> Vec<DrawItem> {
    let mut opaque = Vec::new();
    let mut transparent = Vec::new();
    scene.visit(|id, node, model, _| {
        let Some(r) = node.renderable else {
            return;
        };
        let material = scene.material(r.material);
        let item = DrawItem {
            node: id,
            mesh: r.mesh,
            material: r.material,
            model,
            transparent: material.is_some_and(|m| m.is_transparent()),
            cast_shadow: material.is_some_and(|m| m.cast_shadow),
            receive_shadow: material.is_some_and(|m| m.receive_shadow),
        };
        if item.transparent {
            transparent.push(item);
        } else {
            opaque.push(item);
        }
    });
    opaque.extend(transparent);
    opaque
}

#[cfg(test)]
mod tests {
    use super::*;
    use aviator_common::{Transform, palette};
    use aviator_kernel::{Material, Mesh, Renderable};
    use glam::Vec3;

    #[test]
    fn transparent_items_draw_last() {
        let mut scene = SceneGraph::new();
        let mesh = scene.add_mesh(Mesh::cuboid(1.0, 1.0, 1.0));
        let glass = scene.add_material(
            Material::flat("sea", palette::BLUE)
                .with_opacity(0.6)
                .with_shadows(false, true),
        );
        let solid =
            scene.add_material(Material::flat("cockpit", palette::RED).with_shadows(true, true));

        let sea = scene.spawn(
            "sea",
            Transform::default(),
            Some(Renderable {
                mesh,
                material: glass,
            }),
        );
        let plane = scene.spawn("plane", Transform::at(Vec3::X), None);
        let cockpit = scene
            .spawn_child(
                plane,
                "cockpit",
                Transform::at(Vec3::Y),
                Some(Renderable {
                    mesh,
                    material: solid,
                }),
            )
            .unwrap();

        let items = draw_list(&scene);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].node, cockpit);
        assert!(!items[0].transparent);
        assert_eq!(items[0].model.transform_point3(Vec3::ZERO), Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(items[1].node, sea);
        assert!(items[1].transparent);
    }

    #[test]
    fn items_carry_material_shadow_flags() {
        let mut scene = SceneGraph::new();
        let mesh = scene.add_mesh(Mesh::cuboid(1.0, 1.0, 1.0));
        let sea = scene.add_material(Material::flat("sea", palette::BLUE).with_shadows(false, true));
        let cloud =
            scene.add_material(Material::phong("cloud", palette::WHITE).with_shadows(true, true));
        let hair = scene.add_material(Material::phong("hair", palette::BROWN));
        for material in [sea, cloud, hair] {
            scene.spawn("n", Transform::default(), Some(Renderable { mesh, material }));
        }

        let flags: Vec<_> = draw_list(&scene)
            .iter()
            .map(|i| (i.cast_shadow, i.receive_shadow))
            .collect();
        assert_eq!(flags, [(false, true), (true, true), (false, false)]);
    }
}
