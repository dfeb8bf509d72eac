//! The sharded shift store.
//!
//! The database is 256 immutable JSON chunks on disk, one per slice of the
//! HOSE key space; [`chunk_index`] decides which chunk may hold a key.
//! Chunks load lazily on first touch and stay resident; concurrent first
//! touches of the same index coalesce on a per-slot mutex while other
//! indices proceed independently.

mod chunk;
mod hash;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{Error, Result};

pub use chunk::{Chunk, ShiftEntry, SolventStats};
pub use hash::{chunk_index, chunk_name, CHUNK_COUNT};

/// Read-side handle to the chunked shift database.
#[derive(Debug)]
pub struct ShiftStore {
    root: PathBuf,
    slots: Vec<Mutex<Option<Arc<Chunk>>>>,
}

impl ShiftStore {
    /// Opens a store rooted at a directory of `chunk_NNN` artifacts.
    ///
    /// Only the root's existence is checked here; individual chunks load on
    /// demand and surface their own errors.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::MissingRoot(root));
        }
        let slots = (0..CHUNK_COUNT).map(|_| Mutex::new(None)).collect();
        Ok(Self { root, slots })
    }

    /// The chunk at `index`, loading it on first access.
    ///
    /// Callers racing for the same index block on the slot until the first
    /// one has installed the map; the installed `Arc` is shared by all.
    pub fn chunk(&self, index: usize) -> Result<Arc<Chunk>> {
        let mut slot = self.slots[index].lock();
        if let Some(chunk) = slot.as_ref() {
            return Ok(Arc::clone(chunk));
        }

        let started = Instant::now();
        let path = self.root.join(chunk_name(index));
        let bytes = fs::read(&path).map_err(|source| Error::ChunkIo { index, source })?;
        let parsed: Chunk = serde_json::from_slice(&bytes)
            .map_err(|source| Error::ChunkDecode { index, source })?;

        if parsed.is_empty() {
            warn!(index, "chunk is empty");
        }
        debug!(
            index,
            entries = parsed.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "chunk loaded"
        );

        let chunk = Arc::new(parsed);
        *slot = Some(Arc::clone(&chunk));
        Ok(chunk)
    }

    /// Loads the chunks for a key set in parallel, deduplicating indices.
    /// Returns once every requested chunk is resident.
    pub fn preload<'a, I>(&self, keys: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut indices: Vec<usize> = keys.into_iter().map(chunk_index).collect();
        indices.sort_unstable();
        indices.dedup();
        indices
            .par_iter()
            .try_for_each(|&index| self.chunk(index).map(|_| ()))
    }

    /// Probes the one chunk that may hold `key`.
    pub fn query_exact(&self, key: &str) -> Result<Option<ShiftEntry>> {
        let chunk = self.chunk(chunk_index(key))?;
        Ok(chunk.get(key).cloned())
    }

    /// Streams every `(chunk index, key, entry)` triple to the callback,
    /// loading chunks one at a time in index order.
    pub fn scan<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(usize, &str, &ShiftEntry),
    {
        for index in 0..CHUNK_COUNT {
            let chunk = self.chunk(index)?;
            for (key, entry) in chunk.iter() {
                f(index, key, entry);
            }
        }
        Ok(())
    }

    /// Drops every resident chunk. Correctness is unaffected: the next
    /// access reloads from disk.
    pub fn clear(&self) {
        for slot in &self.slots {
            *slot.lock() = None;
        }
    }

    /// Number of chunks currently resident.
    pub fn resident_chunks(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.lock().is_some())
            .count()
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}
