//! Material and document emission.
//!
//! Each format has a field table; a field is written only when it differs
//! from the format's default. A bound texture map never hides a value that
//! was set explicitly.

use std::path::{Path, PathBuf};

use crate::json5::{self, Object, Style, Value};
use crate::material::{
    Material, MaterialDefaults, MaterialDocument, SourceFormat, TextureKind, TextureRef,
};

struct FieldRule {
    key: &'static str,
    value: fn(&Material) -> Value,
    is_default: fn(&Material, &MaterialDefaults) -> bool,
}

impl FieldRule {
    fn emit(&self, material: &Material, defaults: &MaterialDefaults, out: &mut Object) {
        if (self.is_default)(material, defaults) {
            return;
        }
        out.push(self.key, (self.value)(material));
    }
}

const LEGACY_FIELDS: &[FieldRule] = &[
    FieldRule {
        key: "alpha_test",
        value: |m| Value::Bool(m.alpha_test),
        is_default: |m, _| !m.alpha_test,
    },
    FieldRule {
        key: "roughness",
        value: |m| Value::Number(m.roughness),
        is_default: |m, d| m.roughness == d.roughness,
    },
    FieldRule {
        key: "metalness",
        value: |m| Value::Number(m.metalness),
        is_default: |m, d| m.metalness == d.metalness,
    },
];

const WAVEFRONT_FIELDS: &[FieldRule] = &[
    FieldRule {
        key: "albedo",
        value: |m| m.albedo.to_array().into(),
        is_default: |m, d| m.albedo == d.albedo,
    },
    FieldRule {
        key: "metalness",
        value: |m| Value::Number(m.metalness),
        is_default: |m, d| m.metalness == d.metalness,
    },
    FieldRule {
        key: "roughness",
        value: |m| Value::Number(m.roughness),
        is_default: |m, d| m.roughness == d.roughness,
    },
    FieldRule {
        key: "occlusion",
        value: |m| Value::Number(m.occlusion),
        is_default: |m, d| m.occlusion == d.occlusion,
    },
    FieldRule {
        key: "emission",
        value: |m| m.emission.to_array().into(),
        is_default: |m, d| m.emission == d.emission,
    },
    FieldRule {
        key: "alpha",
        value: |m| Value::Number(m.alpha),
        is_default: |m, d| m.alpha == d.alpha,
    },
];

fn wrap_value(texture: &TextureRef) -> Value {
    Value::Array(texture.wrap.iter().map(|w| Value::from(w.as_str())).collect())
}

/// Block-layout material: name, flags and scalars, textures, then the
/// albedo fallback whenever no albedo map is bound.
pub fn legacy_material(material: &Material) -> Object {
    let defaults = SourceFormat::Legacy.defaults();
    let mut out = Object::new().field("name", material.name());
    for rule in LEGACY_FIELDS {
        rule.emit(material, defaults, &mut out);
    }

    let textures: Vec<Value> = [TextureKind::Albedo, TextureKind::Normal]
        .into_iter()
        .filter_map(|kind| material.map(kind).map(|texture| (kind, texture)))
        .map(|(kind, texture)| {
            Value::Object(
                Object::new()
                    .field("file", texture.file.as_str())
                    .field("type", kind.as_str())
                    .field("filter", TextureRef::FILTER)
                    .field("wrap", wrap_value(texture)),
            )
        })
        .collect();
    if !textures.is_empty() {
        out.push("textures", Value::Array(textures));
    }

    if !material.has_map(TextureKind::Albedo) {
        out.push("albedo", material.albedo.to_array());
    }
    out
}

/// Single-line material: name, non-default scalars and colors, then every
/// bound map. A color or scalar set alongside its map is still written.
pub fn wavefront_material(material: &Material) -> Object {
    let defaults = SourceFormat::Wavefront.defaults();
    let mut out = Object::new().field("name", material.name());
    for rule in WAVEFRONT_FIELDS {
        rule.emit(material, defaults, &mut out);
    }

    let textures: Vec<Value> = material
        .maps()
        .map(|(kind, texture)| {
            Value::Object(
                Object::new()
                    .field("type", kind.as_str())
                    .field("wrap", wrap_value(texture))
                    .field("filter", TextureRef::FILTER)
                    .field("file", texture.file.as_str()),
            )
        })
        .collect();
    if !textures.is_empty() {
        out.push("textures", Value::Array(textures));
    }
    out
}

pub fn material_value(material: &Material, format: SourceFormat) -> Value {
    match format {
        SourceFormat::Legacy => legacy_material(material).into(),
        SourceFormat::Wavefront => Value::inline(wavefront_material(material).into()),
    }
}

pub fn document_value(document: &MaterialDocument, format: SourceFormat) -> Value {
    let materials = document
        .materials
        .iter()
        .map(|material| material_value(material, format))
        .collect();
    Object::new()
        .field("name", document.name.as_str())
        .field("file", document.file.as_str())
        .field("materials", Value::Array(materials))
        .into()
}

/// Render a document as JSON5 text with a trailing newline.
pub fn render_document(document: &MaterialDocument, format: SourceFormat) -> String {
    let mut text = json5::render(&document_value(document, format), Style::Block);
    text.push('\n');
    text
}

/// Render a single material as a standalone JSON5 object.
pub fn render_material(material: &Material, format: SourceFormat) -> String {
    let mut text = json5::render(&material_value(material, format), Style::Block);
    text.push('\n');
    text
}

/// `<dir>/<stem>.json5` next to a source file.
pub fn json5_path_for(source: impl AsRef<Path>) -> PathBuf {
    source.as_ref().with_extension("json5")
}
