/// Number of chunks the key space is partitioned into.
pub const CHUNK_COUNT: usize = 256;

/// Chunk index for a HOSE key.
///
/// The hash runs over UTF-16 code units with `h = (h << 5) − h + c` in
/// wrapping 32-bit two's-complement arithmetic; the sharder that wrote the
/// chunks used JavaScript's `charCodeAt`, and the loader must agree with it
/// bit for bit. HOSE keys are ASCII in practice, but re-encoding keeps the
/// interface stable for any input.
pub fn chunk_index(key: &str) -> usize {
    let mut h: i32 = 0;
    for c in key.encode_utf16() {
        h = h
            .wrapping_shl(5)
            .wrapping_sub(h)
            .wrapping_add(c as i32);
    }
    (h.unsigned_abs() as usize) % CHUNK_COUNT
}

/// Artifact file name for a chunk index: `chunk_NNN`, zero-padded.
pub fn chunk_name(index: usize) -> String {
    format!("chunk_{:03}", index)
}
