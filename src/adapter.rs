use std::cell::OnceCell;

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::bond::BondOrder;
use crate::element::Element;
use crate::mol::Mol;
use crate::symmetry::{perceive_symmetry, SymmetryTables};

/// Capability surface over a molecule for the canonical labeler and the
/// HOSE generator.
///
/// Borrows the molecule read-only and never mutates graph state; the derived
/// symmetry tables are computed lazily, once, on first use.
pub struct MolView<'a> {
    mol: &'a Mol,
    tables: OnceCell<SymmetryTables>,
}

impl<'a> MolView<'a> {
    pub fn new(mol: &'a Mol) -> Self {
        Self {
            mol,
            tables: OnceCell::new(),
        }
    }

    pub fn mol(&self) -> &Mol {
        self.mol
    }

    pub fn atom_count(&self) -> usize {
        self.mol.atom_count()
    }

    pub fn neighbors(&self, i: usize) -> impl Iterator<Item = (usize, EdgeIndex)> + '_ {
        self.mol
            .neighbors_with_bonds(NodeIndex::new(i))
            .map(|(n, e)| (n.index(), e))
    }

    pub fn bond_order(&self, b: EdgeIndex) -> BondOrder {
        self.mol.bond(b).order
    }

    pub fn is_aromatic_bond(&self, b: EdgeIndex) -> bool {
        self.mol.bond(b).is_aromatic
    }

    pub fn element(&self, i: usize) -> Element {
        self.mol.atom(NodeIndex::new(i)).element
    }

    pub fn charge(&self, i: usize) -> i8 {
        self.mol.atom(NodeIndex::new(i)).formal_charge
    }

    pub fn implicit_h(&self, i: usize) -> u8 {
        self.mol.atom(NodeIndex::new(i)).hydrogen_count
    }

    pub fn heavy_degree(&self, i: usize) -> usize {
        self.mol.degree(NodeIndex::new(i))
    }

    /// Idempotent: triggers symmetry perception on first call.
    pub fn ensure_derived_tables(&self) {
        self.tables.get_or_init(|| perceive_symmetry(self.mol));
    }

    /// Topological equivalence class (lower = higher priority). Equal values
    /// mean the two atoms are interchangeable under a graph automorphism.
    pub fn symmetry_rank(&self, i: usize) -> u64 {
        self.ensure_derived_tables();
        self.tables
            .get()
            .map(|t| t.classes[i])
            .unwrap_or_default()
    }

    /// Fully tie-broken canonical label, used to order sphere expansion.
    pub fn canonical_label(&self, i: usize) -> u64 {
        self.ensure_derived_tables();
        self.tables
            .get()
            .map(|t| t.labels[i])
            .unwrap_or_default()
    }
}
