use std::path::PathBuf;

use crate::smiles::SmilesError;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("SMILES parse error: {0}")]
    Smiles(#[from] SmilesError),

    #[error("shift database root not found: {}", .0.display())]
    MissingRoot(PathBuf),

    #[error("chunk {index} unavailable: {source}")]
    ChunkIo {
        index: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("chunk {index} is corrupt: {source}")]
    ChunkDecode {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
