use aviator_kernel::Mesh;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Unindexed vertex stream for `mesh`, three vertices per triangle.
///
/// Flat meshes carry each triangle's face normal on all three corners;
/// smooth meshes carry per-vertex normals averaged over the adjacent faces.
pub(crate) fn expand(mesh: &Mesh, flat: bool) -> Vec<Vertex> {
    let positions = mesh.positions();
    let smooth = if flat { Vec::new() } else { vertex_normals(mesh) };

    let mut out = Vec::with_capacity(mesh.triangle_count() * 3);
    for (t, tri) in mesh.triangles().iter().enumerate() {
        let face = mesh.face_normal(t).unwrap_or(Vec3::ZERO);
        for &i in tri {
            let normal = if flat { face } else { smooth[i as usize] };
            out.push(Vertex {
                position: positions[i as usize].to_array(),
                normal: normal.to_array(),
            });
        }
    }
    out
}

fn vertex_normals(mesh: &Mesh) -> Vec<Vec3> {
    let positions = mesh.positions();
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for &[a, b, c] in mesh.triangles() {
        let (pa, pb, pc) = (
            positions[a as usize],
            positions[b as usize],
            positions[c as usize],
        );
        // Area-weighted: the unnormalized cross product.
        let n = (pb - pa).cross(pc - pa);
        for i in [a, b, c] {
            normals[i as usize] += n;
        }
    }
    normals.iter().map(|n| n.normalize_or_zero()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_expansion_repeats_face_normals() {
        let mesh = Mesh::cuboid(2.0, 2.0, 2.0);
        let verts = expand(&mesh, true);
        assert_eq!(verts.len(), 36);
        for tri in verts.chunks(3) {
            assert_eq!(tri[0].normal, tri[1].normal);
            assert_eq!(tri[1].normal, tri[2].normal);
            let n = Vec3::from_array(tri[0].normal);
            assert!((n.length() - 1.0).abs() < 1e-5);
            // axis-aligned faces
            assert_eq!(n.abs().max_element(), 1.0);
        }
    }

    #[test]
    fn smooth_corner_normals_point_outward() {
        let mesh = Mesh::cuboid(2.0, 2.0, 2.0);
        for v in expand(&mesh, false) {
            let p = Vec3::from_array(v.position);
            let n = Vec3::from_array(v.normal);
            assert!(n.dot(p) > 0.0);
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn expansion_follows_vertex_edits() {
        let mut mesh = Mesh::cuboid(1.0, 1.0, 1.0);
        let before = expand(&mesh, true);
        mesh.translate(Vec3::Y);
        let after = expand(&mesh, true);
        for (a, b) in before.iter().zip(&after) {
            assert_eq!(a.position[1] + 1.0, b.position[1]);
            assert_eq!(a.normal, b.normal);
        }
    }
}
