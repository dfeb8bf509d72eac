//! Forward lookup: SMILES in, per-atom shifts out.
//!
//! Each target-nucleus atom gets a HOSE code; the needed chunks are
//! preloaded in one parallel batch, then every atom resolves against the
//! resident cache, falling back to progressively truncated keys when the
//! exact environment is not in the database.

use tracing::trace;

use crate::adapter::MolView;
use crate::error::Result;
use crate::hose;
use crate::nucleus::nucleus_element;
use crate::smiles::from_smiles;
use crate::store::{ShiftEntry, ShiftStore};

/// Forward-lookup options.
#[derive(Debug, Clone)]
pub struct LookupOptions {
    /// Nucleus string, e.g. `13C` or `1H`.
    pub nucleus: String,
    /// HOSE sphere depth; the reference database is keyed at 4.
    pub max_spheres: usize,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            nucleus: "13C".to_string(),
            max_spheres: hose::DEFAULT_MAX_SPHERES,
        }
    }
}

/// One predicted shift.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictedShift {
    /// Index of the atom in the parsed molecule.
    pub atom_index: usize,
    /// Element symbol of the atom.
    pub atom: String,
    /// Count-weighted average shift of the matched entry, in ppm.
    pub shift: f64,
    /// The HOSE key that actually matched (possibly truncated).
    pub hose: String,
    /// Reference SMILES stored with the matched entry.
    pub smiles: String,
}

/// Predicts shifts for every target-nucleus atom of `smiles`.
///
/// Atoms whose environment misses the database entirely are skipped, not
/// errors; a malformed SMILES or an unreadable chunk artifact is.
pub fn predict(
    store: &ShiftStore,
    smiles: &str,
    options: &LookupOptions,
) -> Result<Vec<PredictedShift>> {
    let mol = from_smiles(smiles)?;
    let view = MolView::new(&mol);
    view.ensure_derived_tables();

    let element = nucleus_element(&options.nucleus);
    let codes: Vec<(usize, String)> = (0..view.atom_count())
        .filter(|&i| view.element(i).symbol() == element)
        .map(|i| {
            (
                i,
                hose::hose_code_with_spheres(&view, i, options.max_spheres),
            )
        })
        .collect();

    store.preload(codes.iter().map(|(_, code)| code.as_str()))?;

    let mut results = Vec::new();
    for (atom_index, code) in codes {
        if let Some((matched_key, entry)) = resolve(store, &code)? {
            results.push(PredictedShift {
                atom_index,
                atom: element.clone(),
                shift: entry.weighted_avg(),
                hose: matched_key,
                smiles: entry.smiles,
            });
        }
    }
    Ok(results)
}

/// The fallback cascade: exact key, then up to eight delimiter truncations
/// (keeping, then dropping, the delimiter), then one leading-H strip.
fn resolve(store: &ShiftStore, code: &str) -> Result<Option<(String, ShiftEntry)>> {
    if let Some(entry) = store.query_exact(code)? {
        return Ok(Some((code.to_string(), entry)));
    }

    let mut key = code.to_string();
    for round in 0..8 {
        // Commas are deliberately not truncation points: removing one would
        // change the neighbor count the key claims.
        let pos = match key.rfind(['/', '(', ')']) {
            Some(pos) if pos > 0 => pos,
            _ => break,
        };

        let with_delim = &key[..=pos];
        trace!(round, key = with_delim, "truncation probe");
        if let Some(entry) = store.query_exact(with_delim)? {
            return Ok(Some((with_delim.to_string(), entry)));
        }

        let without_delim = &key[..pos];
        if let Some(entry) = store.query_exact(without_delim)? {
            return Ok(Some((without_delim.to_string(), entry)));
        }

        key.truncate(pos);
    }

    let stripped = key.trim_start_matches('H');
    if stripped.len() < key.len() && !stripped.is_empty() {
        trace!(key = stripped, "leading-H strip probe");
        if let Some(entry) = store.query_exact(stripped)? {
            return Ok(Some((stripped.to_string(), entry)));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{chunk_index, chunk_name, Chunk, SolventStats, CHUNK_COUNT};
    use std::collections::BTreeMap;
    use std::fs;

    // A store where every chunk artifact exists, so fallback probes on
    // truncated keys never hit a missing file.
    fn full_store(dir: &std::path::Path, entries: &[(&str, &str, f64)]) -> ShiftStore {
        let mut chunks: Vec<Chunk> = (0..CHUNK_COUNT).map(|_| Chunk::new()).collect();
        for &(key, smiles, avg) in entries {
            let mut solvents = BTreeMap::new();
            solvents.insert(
                "Unreported".to_string(),
                SolventStats {
                    min: avg,
                    max: avg,
                    avg,
                    cnt: 1,
                },
            );
            chunks[chunk_index(key)].insert(
                key.to_string(),
                ShiftEntry {
                    nucleus: "C".to_string(),
                    smiles: smiles.to_string(),
                    solvents,
                },
            );
        }
        for (index, chunk) in chunks.iter().enumerate() {
            fs::write(
                dir.join(chunk_name(index)),
                serde_json::to_string(chunk).unwrap(),
            )
            .unwrap();
        }
        ShiftStore::open(dir).unwrap()
    }

    #[test]
    fn exact_match_preferred() {
        let dir = tempfile::tempdir().unwrap();
        let store = full_store(
            dir.path(),
            &[
                ("HHHC(HHC/HHH/)", "CCC", 15.6),
                ("HHHC(HHC/", "CCCC", 99.0),
            ],
        );
        let results = predict(&store, "CCC", &LookupOptions::default()).unwrap();
        let end = results.iter().find(|r| r.atom_index == 0).unwrap();
        assert_eq!(end.hose, "HHHC(HHC/HHH/)");
        assert_eq!(end.shift, 15.6);
        assert_eq!(end.smiles, "CCC");
    }

    #[test]
    fn truncation_fallback_finds_prefix() {
        let dir = tempfile::tempdir().unwrap();
        // Only a truncated environment is stored.
        let store = full_store(dir.path(), &[("HHHC(HHC/", "CCC", 16.0)]);
        let results = predict(&store, "CCC", &LookupOptions::default()).unwrap();
        let end = results.iter().find(|r| r.atom_index == 0).unwrap();
        assert_eq!(end.hose, "HHHC(HHC/");
        assert!("HHHC(HHC/HHH/)".starts_with(&end.hose));
    }

    #[test]
    fn unmatched_atoms_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = full_store(dir.path(), &[("HHHC(HHC/HHH/)", "CCC", 15.6)]);
        let results = predict(&store, "CCC", &LookupOptions::default()).unwrap();
        // Ends match, the middle carbon has no entry at any truncation.
        let indices: Vec<usize> = results.iter().map(|r| r.atom_index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn nucleus_filters_elements() {
        let dir = tempfile::tempdir().unwrap();
        let store = full_store(dir.path(), &[]);
        let options = LookupOptions {
            nucleus: "15N".to_string(),
            ..Default::default()
        };
        // Propane has no nitrogen: no codes, no results, no error.
        let results = predict(&store, "CCC", &options).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn malformed_smiles_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let store = full_store(dir.path(), &[]);
        assert!(predict(&store, "C1CC", &LookupOptions::default()).is_err());
    }
}
