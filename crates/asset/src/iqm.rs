//! IQM model metadata: material names only.
//!
//! Reads the header's text and mesh table locations, then resolves each
//! mesh's material-name offset against the text blob. Geometry and
//! animation data are never touched.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use corelib::{FormatError, FormatResult};

use crate::kmat;
use crate::material::{Material, MaterialDocument, SourceFormat};

pub const MAGIC: &[u8; 16] = b"INTERQUAKEMODEL\0";
pub const VERSION: u32 = 2;

const VERSION_OFFSET: usize = 16;
/// `num_text`, `ofs_text`, `num_meshes`, `ofs_meshes`, in that order.
const TEXT_AND_MESHES_OFFSET: usize = 28;
/// Six little-endian u32 per mesh.
pub const MESH_STRIDE: usize = 24;
/// Index of the material-name field within a mesh record.
const MESH_MATERIAL_FIELD: usize = 1;

/// The header fields this reader needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IqmHeader {
    pub version: u32,
    pub num_text: u32,
    pub ofs_text: u32,
    pub num_meshes: u32,
    pub ofs_meshes: u32,
}

impl IqmHeader {
    pub fn parse(bytes: &[u8]) -> FormatResult<Self> {
        if slice(bytes, 0, MAGIC.len())? != MAGIC {
            return Err(FormatError::BadMagic);
        }
        let version = read_u32(bytes, VERSION_OFFSET)?;
        if version != VERSION {
            return Err(FormatError::UnsupportedVersion(version));
        }
        let at = |field: usize| read_u32(bytes, TEXT_AND_MESHES_OFFSET + field * 4);
        Ok(Self {
            version,
            num_text: at(0)?,
            ofs_text: at(1)?,
            num_meshes: at(2)?,
            ofs_meshes: at(3)?,
        })
    }
}

fn slice(bytes: &[u8], offset: usize, len: usize) -> FormatResult<&[u8]> {
    offset
        .checked_add(len)
        .and_then(|end| bytes.get(offset..end))
        .ok_or(FormatError::Truncated {
            offset,
            len,
            available: bytes.len(),
        })
}

fn read_u32(bytes: &[u8], offset: usize) -> FormatResult<u32> {
    let raw = slice(bytes, offset, 4)?;
    Ok(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

/// Material names referenced by the meshes, first occurrence first.
/// Meshes sharing a material contribute one name.
pub fn read_material_names(bytes: &[u8]) -> FormatResult<Vec<String>> {
    let header = IqmHeader::parse(bytes)?;

    let text = slice(bytes, header.ofs_text as usize, header.num_text as usize)?;
    let text = std::str::from_utf8(text).map_err(|_| FormatError::InvalidUtf8)?;

    let mut names: Vec<String> = Vec::new();
    for mesh in 0..header.num_meshes as usize {
        let record = header.ofs_meshes as usize + mesh * MESH_STRIDE;
        let offset = read_u32(bytes, record + MESH_MATERIAL_FIELD * 4)? as usize;
        let name = string_at(text, offset)?;
        if !names.iter().any(|n| n == name) {
            names.push(name.to_owned());
        }
    }
    Ok(names)
}

/// NUL-terminated string starting at byte `offset` of `text`.
fn string_at(text: &str, offset: usize) -> FormatResult<&str> {
    let tail = text
        .get(offset..)
        .ok_or(FormatError::UnterminatedString(offset))?;
    let end = tail
        .find('\0')
        .ok_or(FormatError::UnterminatedString(offset))?;
    Ok(&tail[..end])
}

pub fn load_iqm_material_names(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read IQM file: {}", path.display()))?;
    read_material_names(&bytes).with_context(|| format!("Malformed IQM file: {}", path.display()))
}

#[derive(Clone, Copy, Debug, Default)]
pub struct IqmOptions {
    /// Convert `<dir>/<material>.kmat` next to the model when it exists.
    pub resolve_kmat: bool,
}

/// Build the material document for one model. The document is named after
/// the file stem and tagged with the model path.
///
/// Materials are listed once per distinct name, so a model whose meshes
/// share materials yields fewer entries than its header's `num_meshes`.
pub fn load_iqm_document(
    path: impl AsRef<Path>,
    options: IqmOptions,
) -> Result<MaterialDocument> {
    let path = path.as_ref();
    let names = load_iqm_material_names(path)?;
    log::info!("{}: {} material(s)", path.display(), names.len());

    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut document = MaterialDocument::new(stem, file_label(path));

    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    for name in names {
        let material = if options.resolve_kmat {
            resolve_kmat(dir, &name)?
        } else {
            Material::new(name, SourceFormat::Legacy.defaults())
        };
        document.materials.push(material);
    }
    Ok(document)
}

fn resolve_kmat(dir: &Path, name: &str) -> Result<Material> {
    let kmat_path = dir.join(format!("{name}.kmat"));
    if kmat_path.is_file() {
        kmat::load_kmat_from_path(&kmat_path)
    } else {
        log::warn!(
            "No {} for material '{}', using white fallback",
            kmat_path.display(),
            name
        );
        Ok(Material::new(name, SourceFormat::Legacy.defaults()))
    }
}

/// Relative paths are written as `./<path>`.
fn file_label(path: &Path) -> String {
    let text = path.to_string_lossy().replace('\\', "/");
    if path.is_absolute() || text.starts_with("./") {
        text
    } else {
        format!("./{text}")
    }
}

/// `*.iqm` files directly inside `dir`, sorted by path.
pub fn find_iqm_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to list {}", dir.display()))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "iqm") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
