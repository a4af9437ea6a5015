use std::result;

use read_fonts::types::Tag;

/// Error types for font-watermark.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("version string does not start with 'Version <major>.<minor>': {0:?}")]
    VersionFormat(String),

    #[error("font has no version string (name ID 5)")]
    MissingVersion,

    #[error("no glyph mapped to U+{code_point:04X}")]
    MissingGlyph { code_point: u32 },

    #[error("feature '{0}' not found in GSUB")]
    FeatureNotFound(Tag),

    #[error(transparent)]
    Model(#[from] font_model::Error),
}

pub type Result<T> = result::Result<T, Error>;
