use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Local transform of a scene node: position, Euler rotation, scale.
///
/// Rotation is stored as Euler angles in radians and applied in XYZ order,
/// so drivers can accumulate a spin on a single axis without drift from
/// quaternion renormalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Identity transform moved to `position`.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Same transform with a uniform scale.
    pub fn with_uniform_scale(mut self, s: f32) -> Self {
        self.scale = Vec3::splat(s);
        self
    }

    /// Same transform with the given Euler rotation.
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    /// Local-to-parent matrix (translation * rotation * scale).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }
}

/// An sRGB color stored as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub fn to_rgb(self) -> [f32; 3] {
        let r = ((self.0 >> 16) & 0xff) as f32 / 255.0;
        let g = ((self.0 >> 8) & 0xff) as f32 / 255.0;
        let b = (self.0 & 0xff) as f32 / 255.0;
        [r, g, b]
    }

    /// Linear-space components, for writing into an sRGB render target.
    pub fn to_linear_rgb(self) -> [f32; 3] {
        self.to_rgb().map(srgb_to_linear)
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Fixed colors shared by every mesh builder.
pub mod palette {
    use super::Color;

    pub const RED: Color = Color(0xf25346);
    pub const WHITE: Color = Color(0xd8d0d1);
    pub const BROWN: Color = Color(0x59332e);
    pub const PINK: Color = Color(0xf5986e);
    pub const BROWN_DARK: Color = Color(0x23190f);
    pub const BLUE: Color = Color(0x68c3c0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Vec3::ZERO);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn matrix_applies_scale_then_rotation_then_translation() {
        let t = Transform::at(Vec3::new(10.0, 0.0, 0.0))
            .with_rotation(Vec3::new(0.0, 0.0, FRAC_PI_2))
            .with_uniform_scale(2.0);
        let p = t.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::new(10.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn color_components() {
        let [r, g, b] = Color(0xff8000).to_rgb();
        assert_eq!(r, 1.0);
        assert!((g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(b, 0.0);
        assert_eq!(Color(0xffffff).to_linear_rgb(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn palette_is_distinct() {
        let all = [
            palette::RED,
            palette::WHITE,
            palette::BROWN,
            palette::PINK,
            palette::BROWN_DARK,
            palette::BLUE,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
