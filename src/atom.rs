use crate::element::Element;

/// Atom payload for a molecular graph node.
///
/// `Atom` stores intrinsic atomic properties plus the two perception results
/// the HOSE generator reads: the implicit hydrogen count and the aromatic
/// flag. Stereochemistry is deliberately absent; HOSE codes describe
/// constitution only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    /// The element.
    pub element: Element,
    /// Formal charge in elementary charge units.
    pub formal_charge: i8,
    /// Mass number. `0` means natural isotopic abundance (the common case).
    pub isotope: u16,
    /// Number of suppressed hydrogens on this atom.
    ///
    /// These are not graph nodes; they are implied by the atom's valence.
    /// After SMILES parsing this count is the single source of truth for how
    /// many Hs the atom carries.
    pub hydrogen_count: u8,
    /// Whether this atom is in an aromatic ring, set by the parser for
    /// lowercase SMILES atoms and by aromaticity perception otherwise.
    pub is_aromatic: bool,
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            formal_charge: 0,
            isotope: 0,
            hydrogen_count: 0,
            is_aromatic: false,
        }
    }
}
