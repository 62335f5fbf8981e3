use glam::{Mat4, Vec3};
use std::collections::HashMap;

/// Indexed triangle mesh.
///
/// Vertices are shared between triangles; flat shading is produced by the
/// render backend, which expands triangles and computes face normals.
/// Every mutable access bumps [`Mesh::revision`] so backends that cache vertex
/// buffers know to re-upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    positions: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    revision: u64,
}

impl Mesh {
    pub fn new(positions: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            positions,
            triangles,
            revision: 0,
        }
    }

    /// Axis-aligned box centered on the origin with eight shared corners.
    ///
    /// Corner order: indices 0..4 lie on the +x face and 4..8 on the -x face.
    ///
    /// | index | corner     |
    /// |-------|------------|
    /// | 0     | (+x,+y,+z) |
    /// | 1     | (+x,+y,-z) |
    /// | 2     | (+x,-y,+z) |
    /// | 3     | (+x,-y,-z) |
    /// | 4     | (-x,+y,-z) |
    /// | 5     | (-x,+y,+z) |
    /// | 6     | (-x,-y,-z) |
    /// | 7     | (-x,-y,+z) |
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let (x, y, z) = (width / 2.0, height / 2.0, depth / 2.0);
        let positions = vec![
            Vec3::new(x, y, z),
            Vec3::new(x, y, -z),
            Vec3::new(x, -y, z),
            Vec3::new(x, -y, -z),
            Vec3::new(-x, y, -z),
            Vec3::new(-x, y, z),
            Vec3::new(-x, -y, -z),
            Vec3::new(-x, -y, z),
        ];
        #[rustfmt::skip]
        let triangles = vec![
            [2, 3, 1], [2, 1, 0], // +x
            [6, 7, 5], [6, 5, 4], // -x
            [5, 0, 1], [5, 1, 4], // +y
            [6, 3, 2], [6, 2, 7], // -y
            [7, 2, 0], [7, 0, 5], // +z
            [3, 6, 4], [3, 4, 1], // -z
        ];
        Self::new(positions, triangles)
    }

    /// Closed cylinder along the y axis, centered on the origin.
    ///
    /// Side vertices are laid out row by row from the top ring down, each row
    /// holding `radial_segments + 1` vertices (the first and last coincide on
    /// the seam), followed by the top and bottom cap centers.
    pub fn cylinder(
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
        height_segments: u32,
    ) -> Self {
        let radial = radial_segments.max(3);
        let rows = height_segments.max(1);
        let half = height as f64 / 2.0;
        let row_len = radial + 1;

        let mut positions = Vec::with_capacity((row_len * (rows + 1) + 2) as usize);
        for y in 0..=rows {
            let v = y as f64 / rows as f64;
            let radius = v * (radius_bottom as f64 - radius_top as f64) + radius_top as f64;
            for x in 0..=radial {
                // f64 keeps the seam column bit-identical to the first column
                // after rounding, so merge_vertices can fold it.
                let theta = x as f64 / radial as f64 * std::f64::consts::TAU;
                positions.push(Vec3::new(
                    (radius * theta.sin()) as f32,
                    (-v * height as f64 + half) as f32,
                    (radius * theta.cos()) as f32,
                ));
            }
        }

        let index = |x: u32, y: u32| y * row_len + x;
        let mut triangles = Vec::with_capacity((radial * rows * 2 + radial * 2) as usize);
        for x in 0..radial {
            for y in 0..rows {
                let v1 = index(x, y);
                let v2 = index(x, y + 1);
                let v3 = index(x + 1, y + 1);
                let v4 = index(x + 1, y);
                triangles.push([v1, v2, v4]);
                triangles.push([v2, v3, v4]);
            }
        }

        let top = positions.len() as u32;
        positions.push(Vec3::new(0.0, half as f32, 0.0));
        for x in 0..radial {
            triangles.push([top, index(x, 0), index(x + 1, 0)]);
        }

        let bottom = positions.len() as u32;
        positions.push(Vec3::new(0.0, -half as f32, 0.0));
        for x in 0..radial {
            triangles.push([bottom, index(x + 1, rows), index(x, rows)]);
        }

        Self::new(positions, triangles)
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Mutable vertex positions. Marks the mesh as modified.
    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        self.revision += 1;
        &mut self.positions
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Monotonic modification counter.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Move one vertex by `offset`.
    pub fn displace_vertex(&mut self, index: usize, offset: Vec3) {
        if let Some(p) = self.positions_mut().get_mut(index) {
            *p += offset;
        }
    }

    /// Bake a translation into the vertex data.
    pub fn translate(&mut self, offset: Vec3) {
        for p in self.positions_mut() {
            *p += offset;
        }
    }

    /// Bake an affine transform into the vertex data.
    pub fn apply_matrix(&mut self, m: Mat4) {
        for p in self.positions_mut() {
            *p = m.transform_point3(*p);
        }
    }

    /// Fold vertices that coincide once rounded to `decimals` places, remap
    /// the triangles onto the survivors and drop triangles that collapsed.
    /// Survivors keep their first-seen order. Returns how many vertices were
    /// removed.
    pub fn merge_vertices(&mut self, decimals: i32) -> usize {
        let scale = 10f64.powi(decimals);
        let key = |p: Vec3| {
            (
                (p.x as f64 * scale).round() as i64,
                (p.y as f64 * scale).round() as i64,
                (p.z as f64 * scale).round() as i64,
            )
        };

        let mut seen: HashMap<(i64, i64, i64), u32> = HashMap::new();
        let mut unique = Vec::with_capacity(self.positions.len());
        let mut remap = Vec::with_capacity(self.positions.len());
        for &p in &self.positions {
            let next = unique.len() as u32;
            let id = *seen.entry(key(p)).or_insert_with(|| {
                unique.push(p);
                next
            });
            remap.push(id);
        }

        let removed = self.positions.len() - unique.len();
        self.triangles = self
            .triangles
            .iter()
            .map(|&t| t.map(|i| remap[i as usize]))
            .filter(|[a, b, c]| a != b && b != c && a != c)
            .collect();
        self.positions = unique;
        self.revision += 1;
        tracing::trace!(removed, remaining = self.positions.len(), "merged vertices");
        removed
    }

    /// Unit normal of triangle `index` (zero for degenerate triangles).
    ///
    /// `None` when `index` is past the last triangle.
    pub fn face_normal(&self, index: usize) -> Option<Vec3> {
        let [a, b, c] = *self.triangles.get(index)?;
        let a = *self.positions.get(a as usize)?;
        let b = *self.positions.get(b as usize)?;
        let c = *self.positions.get(c as usize)?;
        Some((b - a).cross(c - a).normalize_or_zero())
    }

    /// Axis-aligned bounds as `(min, max)`.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.positions.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        )
    }
}
