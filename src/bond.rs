/// Nominal bond order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondOrder {
    /// A single bond (bond order 1).
    #[default]
    Single,
    /// A double bond (bond order 2).
    Double,
    /// A triple bond (bond order 3).
    Triple,
}

impl BondOrder {
    pub fn as_u8(self) -> u8 {
        match self {
            BondOrder::Single => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        }
    }
}

/// Bond payload for a molecular graph edge.
///
/// The aromatic flag supersedes the nominal order everywhere downstream: an
/// aromatic bond scores and prints as aromatic no matter which Kekulé order
/// the input happened to spell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bond {
    /// The nominal order (single, double, or triple).
    pub order: BondOrder,
    /// Whether this bond is part of an aromatic ring, set by the parser for
    /// bonds between lowercase SMILES atoms and by aromaticity perception
    /// otherwise.
    pub is_aromatic: bool,
}

impl Default for Bond {
    fn default() -> Self {
        Self {
            order: BondOrder::Single,
            is_aromatic: false,
        }
    }
}

impl Bond {
    pub fn single() -> Self {
        Self::default()
    }

    pub fn aromatic() -> Self {
        Self {
            order: BondOrder::Single,
            is_aromatic: true,
        }
    }
}
