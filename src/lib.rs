//! NMR chemical-shift prediction over HOSE codes.
//!
//! The crate turns a SMILES string into per-atom HOSE codes (canonical
//! spherical-environment fingerprints) and resolves them against a sharded,
//! nmrshiftdb2-derived shift database. The inverse direction is also
//! supported: a list of observed peaks yields a ranked list of candidate
//! structures.
//!
//! ```no_run
//! use nmrshift::{predict, LookupOptions, ShiftStore};
//!
//! let store = ShiftStore::open("db/")?;
//! for shift in predict(&store, "CC(=O)C", &LookupOptions::default())? {
//!     println!("{} {}: {} ppm", shift.atom, shift.atom_index, shift.shift);
//! }
//! # Ok::<(), nmrshift::Error>(())
//! ```

pub mod adapter;
pub mod aromaticity;
pub mod atom;
pub mod bond;
pub mod element;
pub mod error;
pub mod estimate;
pub mod hose;
pub mod lookup;
pub mod mol;
pub mod nucleus;
pub mod rings;
pub mod smiles;
pub mod store;
pub mod symmetry;

pub use adapter::MolView;
pub use atom::Atom;
pub use bond::{Bond, BondOrder};
pub use element::Element;
pub use error::{Error, Result};
pub use estimate::{estimate, Candidate, EstimateOptions};
pub use hose::{hose_code, hose_code_with_spheres, DEFAULT_MAX_SPHERES};
pub use lookup::{predict, LookupOptions, PredictedShift};
pub use mol::Mol;
pub use nucleus::nucleus_element;
pub use smiles::{from_smiles, parse_smiles, SmilesError};
pub use store::{chunk_index, ShiftEntry, ShiftStore, SolventStats};
