//! Typed parse failures raised while decoding material sources.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FormatError {
    #[error("missing {what} for '{directive}'")]
    MissingToken {
        directive: String,
        what: &'static str,
    },

    #[error("invalid number '{token}' for '{directive}'")]
    InvalidNumber { directive: String, token: String },

    #[error("invalid wrap mode '{0}'")]
    InvalidWrapMode(String),

    #[error("unexpected end of data: wanted {len} bytes at offset {offset}, have {available}")]
    Truncated {
        offset: usize,
        len: usize,
        available: usize,
    },

    #[error("bad magic, not an IQM file")]
    BadMagic,

    #[error("unsupported IQM version {0}")]
    UnsupportedVersion(u32),

    #[error("string table is not valid UTF-8")]
    InvalidUtf8,

    #[error("string at offset {0} is out of range or has no terminator")]
    UnterminatedString(usize),
}

pub type FormatResult<T> = Result<T, FormatError>;
