use aviator_common::Color;
use serde::{Deserialize, Serialize};

/// Surface description consumed by render backends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub color: Color,
    /// 1.0 is opaque; anything lower is blended.
    pub opacity: f32,
    /// Use one normal per triangle instead of interpolated normals.
    pub flat_shading: bool,
    /// Drawn into the directional light's shadow map.
    #[serde(default)]
    pub cast_shadow: bool,
    /// Darkened where a caster blocks the directional light.
    #[serde(default)]
    pub receive_shadow: bool,
}

impl Material {
    /// Smooth-shaded opaque material.
    pub fn phong(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
            opacity: 1.0,
            flat_shading: false,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    /// Flat-shaded opaque material.
    pub fn flat(name: impl Into<String>, color: Color) -> Self {
        Self {
            flat_shading: true,
            ..Self::phong(name, color)
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_shadows(mut self, cast: bool, receive: bool) -> Self {
        self.cast_shadow = cast;
        self.receive_shadow = receive;
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aviator_common::palette;

    #[test]
    fn flat_material_is_opaque() {
        let m = Material::flat("cockpit", palette::RED);
        assert!(m.flat_shading);
        assert!(!m.is_transparent());
    }

    #[test]
    fn shadows_are_opt_in() {
        let m = Material::phong("lens", palette::BROWN);
        assert!(!m.cast_shadow && !m.receive_shadow);
        let m = Material::flat("sea", palette::BLUE).with_shadows(false, true);
        assert!(!m.cast_shadow);
        assert!(m.receive_shadow);
        assert!(m.flat_shading);
    }

    #[test]
    fn opacity_is_clamped() {
        let m = Material::phong("sea", palette::BLUE).with_opacity(1.5);
        assert_eq!(m.opacity, 1.0);
        let m = Material::phong("sea", palette::BLUE).with_opacity(0.6);
        assert!(m.is_transparent());
    }
}
