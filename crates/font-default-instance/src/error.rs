use std::result;

use read_fonts::types::Tag;

/// Error types for font-default-instance.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("axis not found: {0}")]
    UnknownAxis(Tag),

    #[error("expected TAG=VALUE with a 1-4 character tag: {0}")]
    InvalidOverride(String),

    #[error("font {index} in collection: {source}")]
    Member {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    #[error(transparent)]
    Model(#[from] font_model::Error),
}

pub type Result<T> = result::Result<T, Error>;
