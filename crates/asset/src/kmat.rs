//! Legacy `.kmat` text material reader.
//!
//! One material per file, named after the file stem. Texture paths are
//! rebased onto the material file's directory.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use anyhow::{Context, Result};
use corelib::FormatResult;

use crate::material::{Material, SourceFormat, TextureKind, TextureRef, WrapMode};
use crate::tokenize::{Args, Line, tokenize};

/// Raw intensity channel range of the `specular` directive.
const SPECULAR_INTENSITY_RANGE: f64 = 255.0;
/// Raw power range of the `specular` directive.
const SPECULAR_POWER_RANGE: f64 = 1000.0;
/// Normalized intensity below which a material is pushed towards rough
/// and non-metallic.
const LOW_SPECULAR_THRESHOLD: f64 = 0.1;

/// Metalness and roughness derived from a `specular <intensity> <power>` pair.
pub fn specularity(intensity: f64, power: f64) -> (f64, f64) {
    let intensity = intensity / SPECULAR_INTENSITY_RANGE;
    let power = power / SPECULAR_POWER_RANGE;

    let mut metalness = 1.0 - intensity;
    let mut roughness = (1.0 - power).clamp(0.0, 1.0);
    if intensity < LOW_SPECULAR_THRESHOLD {
        roughness *= 1.0 - intensity;
        metalness *= 0.1;
    }
    (metalness, roughness)
}

/// Load a `.kmat` file.
pub fn load_kmat_from_path(path: impl AsRef<Path>) -> Result<Material> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open kmat file: {}", path.display()))?;
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = base_dir(path);
    let material = load_kmat_from_reader(BufReader::new(file), name, &base)
        .with_context(|| format!("Failed to convert {}", path.display()))?;
    log::info!("Converted kmat {}", path.display());
    Ok(material)
}

/// Parse `.kmat` directives from `reader`. `base` is the directory texture
/// paths are rebased onto.
pub fn load_kmat_from_reader<R: BufRead>(
    reader: R,
    name: impl Into<String>,
    base: &str,
) -> Result<Material> {
    let mut material = Material::new(name, SourceFormat::Legacy.defaults());
    for line in tokenize(reader)? {
        apply_directive(&mut material, &line, base)
            .with_context(|| format!("Invalid kmat directive on line {}", line.number))?;
    }
    log::debug!(
        "kmat material '{}': {} texture(s)",
        material.name(),
        material.maps().count()
    );
    Ok(material)
}

/// Convenience helper to parse a `.kmat` string literal.
pub fn load_kmat_from_str(contents: &str, name: &str, base: &str) -> Result<Material> {
    load_kmat_from_reader(io::Cursor::new(contents), name, base)
}

fn apply_directive(material: &mut Material, line: &Line, base: &str) -> FormatResult<()> {
    let args = line.args();
    match line.directive() {
        "transparent" => material.alpha_test = args.flag(0)?,
        "diffuse" => material.set_map(TextureKind::Albedo, texture(&args, base)?),
        "color" => material.albedo = args.color(0)?,
        "normal" => material.set_map(TextureKind::Normal, texture(&args, base)?),
        "specular" => {
            let intensity = args.scalar(0, "intensity")?;
            let power = args.scalar(1, "power")?;
            (material.metalness, material.roughness) = specularity(intensity, power);
        }
        _ => {}
    }
    Ok(())
}

fn texture(args: &Args<'_>, base: &str) -> FormatResult<TextureRef> {
    let file = args.token(0, "texture path")?;
    let wrap_s = wrap_mode(args.get(1))?;
    let wrap_t = wrap_mode(args.get(2))?;
    Ok(TextureRef::new(rebase(base, file)).with_wrap(wrap_s, wrap_t))
}

fn wrap_mode(token: Option<&str>) -> FormatResult<WrapMode> {
    token.map_or(Ok(WrapMode::Repeat), str::parse)
}

/// `./<base>/<file>`, with a leading `./` on `file` dropped.
fn rebase(base: &str, file: &str) -> String {
    let file = file.strip_prefix("./").unwrap_or(file);
    format!("./{base}/{file}")
}

/// Parent directory with forward slashes; `.` when the path has none.
fn base_dir(path: &Path) -> String {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            parent.to_string_lossy().replace('\\', "/")
        }
        _ => ".".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use corelib::Color;

    #[test]
    fn non_specular_input_is_attenuated() {
        let (metalness, roughness) = specularity(0.0, 500.0);
        assert_abs_diff_eq!(metalness, 0.1);
        assert_abs_diff_eq!(roughness, 0.5);
    }

    #[test]
    fn full_intensity_is_not_attenuated() {
        let (metalness, roughness) = specularity(255.0, 0.0);
        assert_abs_diff_eq!(metalness, 0.0);
        assert_abs_diff_eq!(roughness, 1.0);
    }

    #[test]
    fn power_above_range_clamps_roughness() {
        let (_, roughness) = specularity(128.0, 5000.0);
        assert_eq!(roughness, 0.0);
    }

    #[test]
    fn parse_full_kmat() {
        let src = r#"
            transparent true
            diffuse ./wood.png clamp repeat
            normal ./wood_n.png
            color 0.5 0.25 1
            specular 255 0
            shininess 12
        "#;
        let material = load_kmat_from_str(src, "wood", "models/chess").expect("parse kmat");
        assert_eq!(material.name(), "wood");
        assert!(material.alpha_test);
        assert_eq!(material.albedo, Color::new(0.5, 0.25, 1.0));

        let albedo = material.map(TextureKind::Albedo).expect("albedo map");
        assert_eq!(albedo.file, "./models/chess/wood.png");
        assert_eq!(albedo.wrap, [WrapMode::ClampToEdge, WrapMode::Repeat]);

        let normal = material.map(TextureKind::Normal).expect("normal map");
        assert_eq!(normal.file, "./models/chess/wood_n.png");
        assert_eq!(normal.wrap, [WrapMode::Repeat, WrapMode::Repeat]);

        assert_eq!(material.metalness, 0.0);
        assert_eq!(material.roughness, 1.0);
    }

    #[test]
    fn malformed_number_fails_whole_file() {
        let err = load_kmat_from_str("specular bright 10", "m", ".").unwrap_err();
        assert!(format!("{err:#}").contains("line 1"));
        assert!(format!("{err:#}").contains("bright"));
    }

    #[test]
    fn unknown_wrap_mode_fails() {
        assert!(load_kmat_from_str("diffuse ./a.png wobble", "m", ".").is_err());
    }

    #[test]
    fn base_dir_defaults_to_current() {
        assert_eq!(base_dir(Path::new("wood.kmat")), ".");
        assert_eq!(base_dir(Path::new("chess/wood.kmat")), "chess");
    }
}
