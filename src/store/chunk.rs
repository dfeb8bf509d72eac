use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-solvent shift statistics, all in ppm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolventStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub cnt: u32,
}

/// One shift-store record: everything known about a single HOSE key.
///
/// The on-disk form keeps the metadata under the short keys `n` and `s`; any
/// other key in the JSON object is a solvent name. A `BTreeMap` keeps
/// iteration deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftEntry {
    /// Nucleus element letter(s), e.g. `C` or `H`.
    #[serde(rename = "n")]
    pub nucleus: String,
    /// Reference SMILES this environment was derived from.
    #[serde(rename = "s")]
    pub smiles: String,
    /// Solvent name → statistics.
    #[serde(flatten)]
    pub solvents: BTreeMap<String, SolventStats>,
}

impl ShiftEntry {
    /// Count-weighted average over all solvents, rounded to one decimal.
    /// Zero total count yields 0.0 rather than a division error.
    pub fn weighted_avg(&self) -> f64 {
        let total: u64 = self.solvents.values().map(|s| s.cnt as u64).sum();
        if total == 0 {
            return 0.0;
        }
        let sum: f64 = self
            .solvents
            .values()
            .map(|s| s.avg * s.cnt as f64)
            .sum();
        round10(sum / total as f64)
    }

    /// The per-solvent breakdown, excluding the nucleus/SMILES metadata.
    pub fn solvents(&self) -> &BTreeMap<String, SolventStats> {
        &self.solvents
    }
}

/// One loaded chunk: HOSE key → entry.
pub type Chunk = BTreeMap<String, ShiftEntry>;

fn round10(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(solvents: &[(&str, f64, u32)]) -> ShiftEntry {
        ShiftEntry {
            nucleus: "C".to_string(),
            smiles: "CC".to_string(),
            solvents: solvents
                .iter()
                .map(|&(name, avg, cnt)| {
                    (
                        name.to_string(),
                        SolventStats {
                            min: avg,
                            max: avg,
                            avg,
                            cnt,
                        },
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn weighted_avg_reference() {
        // (10·3 + 20·7) / 10 = 17.0
        let e = entry(&[("A", 10.0, 3), ("B", 20.0, 7)]);
        assert_eq!(e.weighted_avg(), 17.0);
    }

    #[test]
    fn weighted_avg_rounds_to_tenth() {
        // (10·1 + 20·2) / 3 = 16.666… → 16.7
        let e = entry(&[("A", 10.0, 1), ("B", 20.0, 2)]);
        assert_eq!(e.weighted_avg(), 16.7);
    }

    #[test]
    fn weighted_avg_zero_counts() {
        let e = entry(&[("A", 10.0, 0)]);
        assert_eq!(e.weighted_avg(), 0.0);
    }

    #[test]
    fn json_round_trip_with_flattened_solvents() {
        let json = r#"{"n":"C","s":"CC","CDCl3":{"min":5.0,"max":7.0,"avg":6.2,"cnt":4}}"#;
        let e: ShiftEntry = serde_json::from_str(json).unwrap();
        assert_eq!(e.nucleus, "C");
        assert_eq!(e.smiles, "CC");
        assert_eq!(e.solvents.len(), 1);
        assert_eq!(e.solvents["CDCl3"].cnt, 4);

        let back = serde_json::to_string(&e).unwrap();
        let e2: ShiftEntry = serde_json::from_str(&back).unwrap();
        assert_eq!(e, e2);
    }

    #[test]
    fn chunk_parses_as_key_map() {
        let json = r#"{
            "HHHC(HHC/HHH/)": {"n":"C","s":"CCC","Unreported":{"min":15.0,"max":16.0,"avg":15.6,"cnt":2}},
            "HHCC(HHH,HHH//)": {"n":"C","s":"CCC","Unreported":{"min":15.9,"max":16.3,"avg":16.1,"cnt":3}}
        }"#;
        let chunk: Chunk = serde_json::from_str(json).unwrap();
        assert_eq!(chunk.len(), 2);
        assert!(chunk.contains_key("HHHC(HHC/HHH/)"));
    }
}
