//! How each catalog body looks: texture file, lighting model, flat colour.

use std::path::Path;

use orrery_orbit::catalog;

use crate::material::{Material, MaterialKind};

/// Visual description of one body, independent of where textures live.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Appearance {
    pub texture: Option<&'static str>,
    pub kind: MaterialKind,
    /// Used as-is when there is no texture, or when it fails to load.
    pub color: [f32; 3],
    pub transparent: bool,
}

impl Appearance {
    const fn phong(texture: &'static str, color: [f32; 3]) -> Self {
        Self {
            texture: Some(texture),
            kind: MaterialKind::Phong,
            color,
            transparent: false,
        }
    }

    /// Resolves the texture against `texture_dir`.
    pub fn material(&self, texture_dir: &Path) -> Material {
        Material {
            kind: self.kind,
            texture: self.texture.map(|file| texture_dir.join(file)),
            color: self.color,
            transparent: self.transparent,
        }
    }
}

const UNKNOWN: Appearance = Appearance {
    texture: None,
    kind: MaterialKind::Phong,
    color: [0.6, 0.6, 0.6],
    transparent: false,
};

/// Appearance for a body by name. Bodies outside the catalog get a plain grey
/// lit surface.
pub fn appearance_for(name: &str) -> Appearance {
    match name {
        catalog::SUN => Appearance {
            texture: Some("sun.jpg"),
            kind: MaterialKind::Basic,
            color: [1.0, 0.85, 0.4],
            transparent: false,
        },
        catalog::MERCURY => Appearance::phong("mercury.jpg", [0.55, 0.53, 0.5]),
        catalog::VENUS => Appearance::phong("venus_atmosphere.jpg", [0.9, 0.8, 0.55]),
        catalog::EARTH => Appearance::phong("earth.jpg", [0.2, 0.4, 0.8]),
        catalog::MOON => Appearance::phong("moon.jpg", [0.7, 0.7, 0.7]),
        catalog::MARS => Appearance::phong("mars.jpg", [0.75, 0.35, 0.2]),
        catalog::JUPITER => Appearance::phong("jupiter.jpg", [0.8, 0.65, 0.5]),
        catalog::SATURN => Appearance::phong("saturn.jpg", [0.85, 0.75, 0.55]),
        catalog::SATURN_RING => Appearance {
            texture: Some("saturn_ring_alpha.png"),
            kind: MaterialKind::Phong,
            color: [0.8, 0.72, 0.6],
            transparent: true,
        },
        catalog::URANUS => Appearance::phong("uranus.jpg", [0.55, 0.8, 0.85]),
        catalog::NEPTUNE => Appearance::phong("neptune.jpg", [0.3, 0.45, 0.9]),
        _ => UNKNOWN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_every_catalog_body_has_a_texture() {
        for spec in catalog::CATALOG {
            assert!(
                appearance_for(spec.name).texture.is_some(),
                "{} has no texture",
                spec.name
            );
        }
    }

    #[test]
    fn test_sun_is_unlit() {
        assert_eq!(appearance_for(catalog::SUN).kind, MaterialKind::Basic);
        assert_eq!(appearance_for(catalog::EARTH).kind, MaterialKind::Phong);
    }

    #[test]
    fn test_only_ring_is_transparent() {
        for spec in catalog::CATALOG {
            let transparent = appearance_for(spec.name).transparent;
            assert_eq!(transparent, spec.name == catalog::SATURN_RING);
        }
    }

    #[test]
    fn test_material_resolves_texture_dir() {
        let material = appearance_for(catalog::EARTH).material(Path::new("assets/texture"));
        assert_eq!(material.texture, Some(PathBuf::from("assets/texture/earth.jpg")));
    }

    #[test]
    fn test_unknown_body() {
        let a = appearance_for("Pluto");
        assert!(a.texture.is_none());
        assert!(a.material(Path::new("x")).texture.is_none());
    }
}
