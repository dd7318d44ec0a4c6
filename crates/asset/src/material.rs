//! Material record accumulated by the format dispatchers.

use std::str::FromStr;

use corelib::{Color, FormatError};

/// Texture addressing mode understood by the renderer's texture loader.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WrapMode {
    #[default]
    Repeat,
    ClampToEdge,
    ClampToBorder,
    MirroredRepeat,
    MirrorClampToEdge,
}

impl WrapMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WrapMode::Repeat => "repeat",
            WrapMode::ClampToEdge => "clamp_to_edge",
            WrapMode::ClampToBorder => "clamp_to_border",
            WrapMode::MirroredRepeat => "mirrored_repeat",
            WrapMode::MirrorClampToEdge => "mirror_clamp_to_edge",
        }
    }
}

impl FromStr for WrapMode {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "repeat" => Ok(WrapMode::Repeat),
            "clamp" | "clamp_to_edge" => Ok(WrapMode::ClampToEdge),
            "clamp_to_border" => Ok(WrapMode::ClampToBorder),
            "mirror" | "mirrored_repeat" => Ok(WrapMode::MirroredRepeat),
            "mirror_clamp_to_edge" => Ok(WrapMode::MirrorClampToEdge),
            other => Err(FormatError::InvalidWrapMode(other.to_owned())),
        }
    }
}

/// Which material channel a texture feeds. Declaration order is emission order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TextureKind {
    Albedo,
    Metalness,
    Roughness,
    Occlusion,
    Emissive,
    Normal,
}

impl TextureKind {
    pub const ALL: [TextureKind; 6] = [
        TextureKind::Albedo,
        TextureKind::Metalness,
        TextureKind::Roughness,
        TextureKind::Occlusion,
        TextureKind::Emissive,
        TextureKind::Normal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TextureKind::Albedo => "albedo",
            TextureKind::Metalness => "metalness",
            TextureKind::Roughness => "roughness",
            TextureKind::Occlusion => "occlusion",
            TextureKind::Emissive => "emissive",
            TextureKind::Normal => "normal",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A texture file reference. Filtering is always bilinear.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureRef {
    pub file: String,
    pub wrap: [WrapMode; 2],
}

impl TextureRef {
    pub const FILTER: &'static str = "bilinear";

    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            wrap: [WrapMode::Repeat; 2],
        }
    }

    pub fn with_wrap(mut self, s: WrapMode, t: WrapMode) -> Self {
        self.wrap = [s, t];
        self
    }
}

/// Initial field values for a material. A field equal to its default is
/// left out of the emitted JSON5.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialDefaults {
    pub albedo: Color,
    pub emission: Color,
    pub metalness: f64,
    pub roughness: f64,
    pub occlusion: f64,
    pub alpha: f64,
}

impl MaterialDefaults {
    /// `.kmat` / IQM path.
    pub const LEGACY: Self = Self {
        albedo: Color::WHITE,
        emission: Color::WHITE,
        metalness: 0.0,
        roughness: 1.0,
        occlusion: 0.0,
        alpha: 1.0,
    };

    /// Wavefront `.mtl` path. Note the roughness default differs from
    /// [`MaterialDefaults::LEGACY`].
    pub const WAVEFRONT: Self = Self {
        albedo: Color::WHITE,
        emission: Color::WHITE,
        metalness: 0.0,
        roughness: 0.0,
        occlusion: 0.0,
        alpha: 1.0,
    };
}

/// Source format a material came from. Selects defaults and output layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    /// `.kmat` text materials and IQM material names.
    Legacy,
    /// Wavefront `.mtl`.
    Wavefront,
}

impl SourceFormat {
    pub fn defaults(&self) -> &'static MaterialDefaults {
        match self {
            SourceFormat::Legacy => &MaterialDefaults::LEGACY,
            SourceFormat::Wavefront => &MaterialDefaults::WAVEFRONT,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    name: String,
    pub alpha_test: bool,
    pub albedo: Color,
    pub emission: Color,
    pub metalness: f64,
    pub roughness: f64,
    pub occlusion: f64,
    pub alpha: f64,
    maps: [Option<TextureRef>; 6],
}

impl Material {
    pub fn new(name: impl Into<String>, defaults: &MaterialDefaults) -> Self {
        Self {
            name: name.into(),
            alpha_test: false,
            albedo: defaults.albedo,
            emission: defaults.emission,
            metalness: defaults.metalness,
            roughness: defaults.roughness,
            occlusion: defaults.occlusion,
            alpha: defaults.alpha,
            maps: Default::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn map(&self, kind: TextureKind) -> Option<&TextureRef> {
        self.maps[kind.index()].as_ref()
    }

    pub fn set_map(&mut self, kind: TextureKind, texture: TextureRef) {
        self.maps[kind.index()] = Some(texture);
    }

    pub fn has_map(&self, kind: TextureKind) -> bool {
        self.maps[kind.index()].is_some()
    }

    /// Present maps in [`TextureKind`] order.
    pub fn maps(&self) -> impl Iterator<Item = (TextureKind, &TextureRef)> {
        TextureKind::ALL
            .into_iter()
            .filter_map(|kind| self.map(kind).map(|texture| (kind, texture)))
    }
}

/// Named list of materials written as one JSON5 file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialDocument {
    pub name: String,
    pub file: String,
    pub materials: Vec<Material>,
}

impl MaterialDocument {
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            materials: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_mode_accepts_legacy_aliases() {
        assert_eq!("clamp".parse::<WrapMode>(), Ok(WrapMode::ClampToEdge));
        assert_eq!("mirror".parse::<WrapMode>(), Ok(WrapMode::MirroredRepeat));
        assert_eq!("repeat".parse::<WrapMode>(), Ok(WrapMode::Repeat));
        assert!("wobble".parse::<WrapMode>().is_err());
    }

    #[test]
    fn maps_iterate_in_kind_order() {
        let mut material = Material::new("m", &MaterialDefaults::WAVEFRONT);
        material.set_map(TextureKind::Normal, TextureRef::new("n.png"));
        material.set_map(TextureKind::Albedo, TextureRef::new("a.png"));
        let kinds: Vec<_> = material.maps().map(|(kind, _)| kind).collect();
        assert_eq!(kinds, vec![TextureKind::Albedo, TextureKind::Normal]);
    }

    #[test]
    fn new_material_takes_format_defaults() {
        let legacy = Material::new("a", &MaterialDefaults::LEGACY);
        let wavefront = Material::new("b", &MaterialDefaults::WAVEFRONT);
        assert_eq!(legacy.roughness, 1.0);
        assert_eq!(wavefront.roughness, 0.0);
        assert_eq!(legacy.albedo, Color::WHITE);
        assert!(legacy.maps().next().is_none());
    }
}
