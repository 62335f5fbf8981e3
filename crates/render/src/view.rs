use aviator_common::Color;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Sky/ground gradient light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HemisphereLight {
    pub sky: Color,
    pub ground: Color,
    pub intensity: f32,
}

/// Orthographic volume a directional light renders its shadow map from,
/// in light view space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadowCamera {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub near: f32,
    pub far: f32,
    /// Side of the square shadow map in texels.
    pub map_size: u32,
    /// Depth offset applied before the comparison, in `[0, 1]` depth units.
    pub bias: f32,
}

impl Default for ShadowCamera {
    fn default() -> Self {
        Self {
            left: -400.0,
            right: 400.0,
            top: 400.0,
            bottom: -400.0,
            near: 1.0,
            far: 1000.0,
            map_size: 2048,
            bias: 0.001,
        }
    }
}

impl ShadowCamera {
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::orthographic_rh(
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.near,
            self.far,
        )
    }
}

/// Parallel light shining from `position` toward the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
    /// `None` disables shadow casting for this light.
    pub shadow: Option<ShadowCamera>,
}

impl DirectionalLight {
    /// Unit vector pointing from the scene toward the light.
    pub fn direction(&self) -> Vec3 {
        self.position.normalize_or_zero()
    }

    /// Scene space to shadow clip space, looking from `position` at the
    /// origin. `None` without a shadow camera or with the light at the origin.
    pub fn shadow_view_projection(&self) -> Option<Mat4> {
        let shadow = self.shadow?;
        let dir = self.direction();
        if dir == Vec3::ZERO {
            return None;
        }
        let up = if dir.cross(Vec3::Y).length_squared() < 1e-6 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        let view = Mat4::look_at_rh(self.position, Vec3::ZERO, up);
        Some(shadow.projection_matrix() * view)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lighting {
    pub hemisphere: HemisphereLight,
    pub directional: DirectionalLight,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            hemisphere: HemisphereLight {
                sky: Color(0xaaaaaa),
                ground: Color(0x000000),
                intensity: 0.9,
            },
            directional: DirectionalLight {
                color: Color(0xffffff),
                intensity: 0.9,
                position: Vec3::new(150.0, 350.0, 350.0),
                shadow: Some(ShadowCamera::default()),
            },
        }
    }
}

/// Linear distance fog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fog {
    pub color: Color,
    pub near: f32,
    pub far: f32,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            color: Color(0xf7d9aa),
            near: 100.0,
            far: 950.0,
        }
    }
}

impl Fog {
    /// Fog blend at `distance` from the eye: 0 is clear, 1 is fully fogged.
    pub fn factor(&self, distance: f32) -> f32 {
        if self.far <= self.near {
            return if distance >= self.far { 1.0 } else { 0.0 };
        }
        ((distance - self.near) / (self.far - self.near)).clamp(0.0, 1.0)
    }
}

/// Camera and environment for one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderView {
    /// Camera position in scene space.
    pub eye: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Width over height of the viewport.
    pub aspect: f32,
    pub lighting: Lighting,
    pub fog: Fog,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 100.0, 200.0),
            target: Vec3::new(0.0, 100.0, 0.0),
            fov_degrees: 60.0,
            near: 1.0,
            far: 10_000.0,
            aspect: 1.0,
            lighting: Lighting::default(),
            fog: Fog::default(),
        }
    }
}

impl RenderView {
    /// Update the aspect ratio for a viewport in pixels. Zero sizes count as 1.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    /// Perspective projection with a `[0, 1]` depth range.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4Swizzles;

    #[test]
    fn default_camera_looks_down_negative_z() {
        let view = RenderView::default();
        assert_eq!(view.eye, Vec3::new(0.0, 100.0, 200.0));
        assert_eq!((view.target - view.eye).normalize(), Vec3::NEG_Z);
        assert_eq!(view.fov_degrees, 60.0);
        assert_eq!((view.near, view.far), (1.0, 10_000.0));
    }

    #[test]
    fn zero_viewport_keeps_aspect_finite() {
        let mut view = RenderView::default();
        view.set_viewport(0, 0);
        assert_eq!(view.aspect, 1.0);
        view.set_viewport(1600, 0);
        assert_eq!(view.aspect, 1600.0);
        view.set_viewport(1600, 900);
        assert!((view.aspect - 16.0 / 9.0).abs() < 1e-6);
        assert!(view.view_projection().is_finite());
    }

    #[test]
    fn target_projects_to_screen_center() {
        let mut view = RenderView::default();
        view.set_viewport(800, 600);
        let clip = view.view_projection() * view.target.extend(1.0);
        let ndc = clip.xyz() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn fog_ramps_between_near_and_far() {
        let fog = Fog::default();
        assert_eq!(fog.factor(50.0), 0.0);
        assert_eq!(fog.factor(100.0), 0.0);
        assert!((fog.factor(525.0) - 0.5).abs() < 1e-6);
        assert_eq!(fog.factor(2000.0), 1.0);
    }

    #[test]
    fn shadow_volume_is_centered_on_origin() {
        let light = Lighting::default().directional;
        let shadow = light.shadow.unwrap();
        assert_eq!((shadow.left, shadow.right), (-400.0, 400.0));
        assert_eq!((shadow.near, shadow.far), (1.0, 1000.0));
        assert_eq!(shadow.map_size, 2048);

        let m = light.shadow_view_projection().unwrap();
        let origin = m.project_point3(Vec3::ZERO);
        assert!(origin.x.abs() < 1e-5 && origin.y.abs() < 1e-5);
        let expected = (light.position.length() - 1.0) / 999.0;
        assert!((origin.z - expected).abs() < 1e-4);

        // 500 units off the light axis is outside the +-400 volume.
        let side = light.direction().cross(Vec3::Y).normalize() * 500.0;
        assert!(m.project_point3(side).x.abs() > 1.0);
    }

    #[test]
    fn shadowless_light_has_no_shadow_matrix() {
        let mut light = Lighting::default().directional;
        light.shadow = None;
        assert!(light.shadow_view_projection().is_none());

        let overhead = DirectionalLight {
            position: Vec3::new(0.0, 500.0, 0.0),
            shadow: Some(ShadowCamera::default()),
            ..light
        };
        assert!(overhead.shadow_view_projection().unwrap().is_finite());

        let degenerate = DirectionalLight {
            position: Vec3::ZERO,
            ..overhead
        };
        assert!(degenerate.shadow_view_projection().is_none());
    }

    #[test]
    fn light_defaults() {
        let lighting = Lighting::default();
        assert_eq!(lighting.hemisphere.intensity, 0.9);
        assert_eq!(lighting.directional.position, Vec3::new(150.0, 350.0, 350.0));
        assert!((lighting.directional.direction().length() - 1.0).abs() < 1e-6);
    }
}
