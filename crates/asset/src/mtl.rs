//! Wavefront `.mtl` reader.
//!
//! Directive mapping onto the PBR material:
//! - `map_Kd` / `Kd`: albedo map / color
//! - `map_Ks` / `Ks`: metalness map / value
//! - `map_Ns` / `Ns`: roughness map / value
//! - `map_Ka` / `Ka`: occlusion map / gray of the ambient color
//! - `map_Ke` / `Ke`: emissive map / color
//! - `map_Bump`: tangent-space normal map
//! - `d`: alpha, `Tr`: `1 - alpha`

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use anyhow::{Context, Result};
use corelib::FormatResult;

use crate::material::{Material, MaterialDocument, SourceFormat, TextureKind, TextureRef};
use crate::tokenize::{Line, tokenize};

/// Load every material of an `.mtl` file.
pub fn load_mtl_from_path(path: impl AsRef<Path>) -> Result<Vec<Material>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open MTL file: {}", path.display()))?;
    let materials = load_mtl_from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to convert {}", path.display()))?;
    log::info!(
        "Converted {} material(s) from {}",
        materials.len(),
        path.display()
    );
    Ok(materials)
}

/// Load an `.mtl` file into a document labelled `name` / `file`.
pub fn load_mtl_document(
    path: impl AsRef<Path>,
    name: impl Into<String>,
    file: impl Into<String>,
) -> Result<MaterialDocument> {
    let mut document = MaterialDocument::new(name, file);
    document.materials = load_mtl_from_path(path)?;
    Ok(document)
}

pub fn load_mtl_from_reader<R: BufRead>(reader: R) -> Result<Vec<Material>> {
    let mut materials = Vec::new();
    let mut current: Option<Material> = None;

    for line in tokenize(reader)? {
        if line.directive() == "newmtl" {
            let name = line
                .args()
                .token(0, "material name")
                .with_context(|| format!("Invalid newmtl on line {}", line.number))?;
            let next = Material::new(name, SourceFormat::Wavefront.defaults());
            if let Some(done) = current.replace(next) {
                materials.push(done);
            }
            continue;
        }

        match current.as_mut() {
            Some(material) => apply_directive(material, &line)
                .with_context(|| format!("Invalid MTL directive on line {}", line.number))?,
            None => log::debug!(
                "Ignoring '{}' on line {} before any newmtl",
                line.directive(),
                line.number
            ),
        }
    }

    materials.extend(current);
    Ok(materials)
}

/// Convenience helper to parse an `.mtl` string literal.
pub fn load_mtl_from_str(contents: &str) -> Result<Vec<Material>> {
    load_mtl_from_reader(io::Cursor::new(contents))
}

fn map_kind(directive: &str) -> Option<TextureKind> {
    match directive {
        "map_Kd" => Some(TextureKind::Albedo),
        "map_Ks" => Some(TextureKind::Metalness),
        "map_Ns" => Some(TextureKind::Roughness),
        "map_Ka" => Some(TextureKind::Occlusion),
        "map_Ke" => Some(TextureKind::Emissive),
        "map_Bump" => Some(TextureKind::Normal),
        _ => None,
    }
}

fn apply_directive(material: &mut Material, line: &Line) -> FormatResult<()> {
    let args = line.args();
    if let Some(kind) = map_kind(line.directive()) {
        let file = args.token(0, "texture path")?;
        material.set_map(kind, TextureRef::new(normalize_path(file)));
        return Ok(());
    }

    match line.directive() {
        "Kd" => material.albedo = args.color(0)?,
        "Ks" => material.metalness = args.scalar(0, "metalness")?,
        "Ns" => material.roughness = args.scalar(0, "roughness")?,
        "Ka" => material.occlusion = args.color(0)?.gray(),
        "Ke" => material.emission = args.color(0)?,
        "d" => material.alpha = args.scalar(0, "alpha")?,
        "Tr" => material.alpha = 1.0 - args.scalar(0, "transparency")?,
        _ => {}
    }
    Ok(())
}

fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}
