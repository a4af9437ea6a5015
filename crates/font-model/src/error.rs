//! Error types for the font model and its container adapter.

use std::{io, path::PathBuf, result};

use read_fonts::{ReadError, types::Tag};

use crate::{glyph_order::GlyphName, metrics::Direction};

/// Errors that can occur while loading, editing, or saving a font.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to parse font: {0}")]
    Read(#[from] ReadError),

    #[error("failed to compile '{tag}' table: {message}")]
    Compile { tag: Tag, message: String },

    #[error("failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no '{0}' table in font")]
    MissingTable(Tag),

    #[error("malformed '{0}' table")]
    MalformedTable(Tag),

    #[error("glyph '{0}' already exists")]
    DuplicateGlyph(GlyphName),

    #[error("glyph '{0}' is not in the glyph order")]
    UnknownGlyph(GlyphName),

    #[error("glyph '{0}' has no {1} metrics")]
    MissingMetrics(GlyphName, Direction),

    #[error("glyph order is full ({0} glyphs)")]
    TooManyGlyphs(usize),

    #[error("lookup list is full ({0} lookups)")]
    TooManyLookups(usize),

    #[error("cannot add glyphs to a font with a '{0}' table")]
    UnsupportedTable(Tag),

    #[error("failed to build cmap: {0}")]
    CmapConflict(String),

    #[error("expected a single font, found a collection of {0} fonts")]
    ExpectedSingleFont(usize),
}

pub type Result<T> = result::Result<T, Error>;
