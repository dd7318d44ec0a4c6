//! Material source parsers and the JSON5 material writer.
//! - `.kmat` legacy text materials
//! - IQM model material names
//! - Wavefront `.mtl`

pub mod emit;
pub mod iqm;
pub mod json5;
pub mod kmat;
pub mod material;
pub mod mtl;
pub mod tokenize;

pub use material::{Material, MaterialDocument, SourceFormat, TextureKind, TextureRef, WrapMode};
