//! Reverse estimation: observed peaks in, ranked candidate structures out.
//!
//! Every stored entry of the target nucleus is scored against the peak list;
//! hits accumulate per reference SMILES. The scan is chunk-parallel, and the
//! partial accumulators merge in chunk order so results are identical from
//! run to run.

use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::error::Result;
use crate::nucleus::nucleus_element;
use crate::store::{ShiftStore, CHUNK_COUNT};

/// Reverse-estimation options.
#[derive(Debug, Clone)]
pub struct EstimateOptions {
    /// Nucleus string, e.g. `13C`.
    pub nucleus: String,
    /// Per-peak tolerance in ppm.
    pub tolerance: f64,
    /// Minimum number of distinct peaks a candidate must match.
    pub min_matches: usize,
    /// Result cap.
    pub max_results: usize,
}

impl Default for EstimateOptions {
    fn default() -> Self {
        Self {
            nucleus: "13C".to_string(),
            tolerance: 2.0,
            min_matches: 1,
            max_results: 50,
        }
    }
}

/// One candidate structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Reference SMILES shared by the matching entries.
    pub smiles: String,
    /// Representative HOSE key (first matching one in scan order).
    pub hose: String,
    /// Number of distinct peaks matched.
    pub matched_peaks: usize,
    /// `round1000((matched/|P|) · (1 − (E/matched)/τ))`.
    pub score: f64,
}

// Per-SMILES accumulator: peak index → error of its first match, plus a
// representative HOSE key.
#[derive(Debug, Clone)]
struct Accumulator {
    hose: String,
    peak_errors: BTreeMap<usize, f64>,
}

/// Scores every stored entry against `peaks` and returns candidates sorted
/// by descending score, ties broken by more matched peaks.
pub fn estimate(
    store: &ShiftStore,
    peaks: &[f64],
    options: &EstimateOptions,
) -> Result<Vec<Candidate>> {
    let element = nucleus_element(&options.nucleus);

    let per_chunk: Vec<Result<BTreeMap<String, Accumulator>>> = (0..CHUNK_COUNT)
        .into_par_iter()
        .map(|index| scan_chunk(store, index, &element, peaks, options.tolerance))
        .collect();

    // Merge in chunk order; a peak's error is taken from its first match.
    let mut merged: BTreeMap<String, Accumulator> = BTreeMap::new();
    for result in per_chunk {
        for (smiles, acc) in result? {
            match merged.get_mut(&smiles) {
                None => {
                    merged.insert(smiles, acc);
                }
                Some(existing) => {
                    for (peak, err) in acc.peak_errors {
                        existing.peak_errors.entry(peak).or_insert(err);
                    }
                }
            }
        }
    }

    let mut candidates: Vec<Candidate> = merged
        .into_iter()
        .filter(|(_, acc)| acc.peak_errors.len() >= options.min_matches)
        .map(|(smiles, acc)| {
            let matched = acc.peak_errors.len();
            let error_sum: f64 = acc.peak_errors.values().sum();
            let coverage = matched as f64 / peaks.len() as f64;
            let closeness = 1.0 - (error_sum / matched as f64) / options.tolerance;
            Candidate {
                smiles,
                hose: acc.hose,
                matched_peaks: matched,
                score: round1000(coverage * closeness),
            }
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.matched_peaks.cmp(&a.matched_peaks))
    });
    candidates.truncate(options.max_results);
    Ok(candidates)
}

fn scan_chunk(
    store: &ShiftStore,
    index: usize,
    element: &str,
    peaks: &[f64],
    tolerance: f64,
) -> Result<BTreeMap<String, Accumulator>> {
    let chunk = store.chunk(index)?;
    let mut accs: BTreeMap<String, Accumulator> = BTreeMap::new();

    for (key, entry) in chunk.iter() {
        if entry.nucleus != element {
            continue;
        }
        let shift = entry.weighted_avg();
        for (peak_index, &peak) in peaks.iter().enumerate() {
            let err = (shift - peak).abs();
            if err > tolerance {
                continue;
            }
            let acc = accs
                .entry(entry.smiles.clone())
                .or_insert_with(|| Accumulator {
                    hose: key.clone(),
                    peak_errors: BTreeMap::new(),
                });
            acc.peak_errors.entry(peak_index).or_insert(err);
        }
    }
    Ok(accs)
}

fn round1000(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{chunk_index, chunk_name, Chunk, ShiftEntry, SolventStats};
    use std::collections::BTreeMap as Map;
    use std::fs;

    fn full_store(dir: &std::path::Path, entries: &[(&str, &str, &str, f64)]) -> ShiftStore {
        let mut chunks: Vec<Chunk> = (0..CHUNK_COUNT).map(|_| Chunk::new()).collect();
        for &(key, nucleus, smiles, avg) in entries {
            let mut solvents = Map::new();
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
                    nucleus: nucleus.to_string(),
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
    fn perfect_two_peak_match_scores_one() {
        let dir = tempfile::tempdir().unwrap();
        let store = full_store(
            dir.path(),
            &[
                ("HHHC(HHC/HHH/)", "C", "CC", 14.0),
                ("HHCC(HHH,HHH//)", "C", "CC", 23.0),
            ],
        );
        let options = EstimateOptions {
            min_matches: 2,
            ..Default::default()
        };
        let candidates = estimate(&store, &[14.0, 23.0], &options).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].smiles, "CC");
        assert_eq!(candidates[0].matched_peaks, 2);
        assert_eq!(candidates[0].score, 1.0);
    }

    #[test]
    fn min_matches_filters() {
        let dir = tempfile::tempdir().unwrap();
        let store = full_store(
            dir.path(),
            &[
                ("HHHC(HHC/HHH/)", "C", "CC", 14.0),
                ("HHHC(=OC/,HHH/)", "C", "CC(=O)C", 30.2),
            ],
        );
        let options = EstimateOptions {
            min_matches: 2,
            ..Default::default()
        };
        // Each structure matches only one of the two peaks.
        let candidates = estimate(&store, &[14.0, 30.2], &options).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn sorted_by_score_then_matches() {
        let dir = tempfile::tempdir().unwrap();
        let store = full_store(
            dir.path(),
            &[
                ("HHHC(HHC/HHH/)", "C", "CC", 14.0),
                ("HHCC(HHH,HHH//)", "C", "CC", 23.0),
                ("HHHC(HHCl/,,/)", "C", "CCl", 14.5),
            ],
        );
        let candidates = estimate(&store, &[14.0, 23.0], &EstimateOptions::default()).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].smiles, "CC");
        assert!(candidates[0].score >= candidates[1].score);
        for w in candidates.windows(2) {
            assert!(
                w[0].score > w[1].score
                    || (w[0].score == w[1].score && w[0].matched_peaks >= w[1].matched_peaks)
            );
        }
    }

    #[test]
    fn duplicate_peak_hits_count_once() {
        let dir = tempfile::tempdir().unwrap();
        // Two environments of the same structure, both on the same peak.
        let store = full_store(
            dir.path(),
            &[
                ("HHHC(HHC/HHH/)", "C", "CC", 14.0),
                ("HHCC(HHH,HHH//)", "C", "CC", 14.0),
            ],
        );
        let candidates = estimate(&store, &[14.0], &EstimateOptions::default()).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].matched_peaks, 1);
        assert_eq!(candidates[0].score, 1.0);
    }

    #[test]
    fn nucleus_filter_excludes_other_elements() {
        let dir = tempfile::tempdir().unwrap();
        let store = full_store(dir.path(), &[("C(C/", "H", "CC", 0.9)]);
        let candidates = estimate(&store, &[0.9], &EstimateOptions::default()).unwrap();
        assert!(candidates.is_empty());

        let options = EstimateOptions {
            nucleus: "1H".to_string(),
            ..Default::default()
        };
        let candidates = estimate(&store, &[0.9], &options).unwrap();
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn result_cap_respected() {
        let dir = tempfile::tempdir().unwrap();
        let entries: Vec<(String, String)> = (0..10)
            .map(|i| (format!("HHHC(HHC/HHH/){}", i), format!("C{}", "C".repeat(i + 1))))
            .collect();
        let rows: Vec<(&str, &str, &str, f64)> = entries
            .iter()
            .map(|(k, s)| (k.as_str(), "C", s.as_str(), 20.0))
            .collect();
        let store = full_store(dir.path(), &rows);
        let options = EstimateOptions {
            max_results: 3,
            ..Default::default()
        };
        let candidates = estimate(&store, &[20.0], &options).unwrap();
        assert_eq!(candidates.len(), 3);
    }

    #[test]
    fn deterministic_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let store = full_store(
            dir.path(),
            &[
                ("HHHC(HHC/HHH/)", "C", "CC", 14.0),
                ("HHCC(HHH,HHH//)", "C", "CCC", 14.0),
                ("HHHC(=OC/,HHH/)", "C", "CC(=O)C", 14.0),
            ],
        );
        let first = estimate(&store, &[14.0], &EstimateOptions::default()).unwrap();
        for _ in 0..3 {
            let again = estimate(&store, &[14.0], &EstimateOptions::default()).unwrap();
            assert_eq!(again, first);
        }
    }
}
