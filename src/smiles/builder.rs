use std::collections::HashMap;

use petgraph::graph::NodeIndex;

use crate::atom::Atom;
use crate::bond::{Bond, BondOrder};
use crate::mol::Mol;
use crate::smiles::error::SmilesError;
use crate::smiles::tokenizer::{AtomToken, BondToken, Token};

// An unmatched ring digit: the node it opened on and the explicit bond
// written at the opening, if any.
struct RingOpen {
    node: NodeIndex,
    bond: Option<BondToken>,
}

/// Single-pass graph assembly over the token stream.
///
/// Branches are a stack of return points; ring closures are a digit-keyed
/// map of half-open bonds whose two bond spellings must agree. Every bond is
/// resolved to its concrete form the moment both endpoints exist (an
/// unspecified bond between two aromatic atoms is aromatic), and implicit
/// hydrogens are filled in afterwards from the completed graph.
pub fn build_mol(tokens: &[Token]) -> Result<Mol, SmilesError> {
    let mut mol = Mol::new();
    let mut bracket: Vec<bool> = Vec::new();
    let mut branch_stack: Vec<NodeIndex> = Vec::new();
    let mut current: Option<NodeIndex> = None;
    let mut pending_bond: Option<BondToken> = None;
    let mut open_rings: HashMap<u16, RingOpen> = HashMap::new();

    for token in tokens {
        match token {
            Token::Atom(tok) => {
                let node = mol.add_atom(atom_from_token(tok));
                bracket.push(tok.is_bracket);
                match current {
                    Some(prev) => {
                        let bond = resolve_bond(pending_bond.take(), &mol, prev, node);
                        mol.add_bond(prev, node, bond);
                    }
                    None => pending_bond = None,
                }
                current = Some(node);
            }
            Token::Bond(b) => {
                pending_bond = Some(*b);
            }
            Token::RingClosure { digit, pos } => {
                let node = current.ok_or(SmilesError::InvalidRingBond {
                    digit: *digit,
                    pos: *pos,
                })?;
                let here = pending_bond.take();
                match open_rings.remove(digit) {
                    Some(open) => {
                        let spelled = match (here, open.bond) {
                            (None, None) => None,
                            (Some(b), None) | (None, Some(b)) => Some(b),
                            (Some(a), Some(b)) if a == b => Some(a),
                            _ => {
                                return Err(SmilesError::RingBondConflict { digit: *digit })
                            }
                        };
                        // Degenerate closures (self-bond, re-spelled edge)
                        // add nothing to the graph.
                        if open.node != node && mol.bond_between(open.node, node).is_none() {
                            let bond = resolve_bond(spelled, &mol, open.node, node);
                            mol.add_bond(open.node, node, bond);
                        }
                    }
                    None => {
                        open_rings.insert(*digit, RingOpen { node, bond: here });
                    }
                }
            }
            Token::OpenParen(pos) => {
                let node = current.ok_or(SmilesError::UnmatchedParen { pos: *pos })?;
                branch_stack.push(node);
            }
            Token::CloseParen(pos) => {
                current =
                    Some(branch_stack.pop().ok_or(SmilesError::UnmatchedParen { pos: *pos })?);
                pending_bond = None;
            }
            Token::Dot(_) => {
                current = None;
                pending_bond = None;
            }
        }
    }

    if !branch_stack.is_empty() {
        return Err(SmilesError::UnmatchedParen { pos: 0 });
    }
    if let Some(&digit) = open_rings.keys().min() {
        return Err(SmilesError::UnclosedRing { digit });
    }

    assign_hydrogen_counts(&mut mol, &bracket);
    Ok(mol)
}

fn atom_from_token(tok: &AtomToken) -> Atom {
    Atom {
        element: tok.element,
        formal_charge: tok.charge,
        isotope: tok.isotope,
        hydrogen_count: tok.hcount.unwrap_or(0),
        is_aromatic: tok.is_aromatic,
    }
}

fn resolve_bond(tok: Option<BondToken>, mol: &Mol, a: NodeIndex, b: NodeIndex) -> Bond {
    match tok {
        Some(BondToken::Single) => Bond::single(),
        Some(BondToken::Double) => Bond {
            order: BondOrder::Double,
            is_aromatic: false,
        },
        Some(BondToken::Triple) => Bond {
            order: BondOrder::Triple,
            is_aromatic: false,
        },
        Some(BondToken::Aromatic) => Bond::aromatic(),
        None => {
            if mol.atom(a).is_aromatic && mol.atom(b).is_aromatic {
                Bond::aromatic()
            } else {
                Bond::single()
            }
        }
    }
}

// Bracket atoms keep their explicit count; everything else is filled to the
// element's lowest fitting valence.
fn assign_hydrogen_counts(mol: &mut Mol, bracket: &[bool]) {
    let nodes: Vec<NodeIndex> = mol.atoms().collect();
    for node in nodes {
        if bracket[node.index()] {
            continue;
        }
        let h = implicit_h(mol, node);
        mol.atom_mut(node).hydrogen_count = h;
    }
}

fn implicit_h(mol: &Mol, node: NodeIndex) -> u8 {
    let atom = mol.atom(node);
    let valences = atom.element.default_valences();
    if valences.is_empty() {
        return 0;
    }

    let mut used: u8 = 0;
    for edge in mol.bonds_of(node) {
        let bond = mol.bond(edge);
        let order = if bond.is_aromatic {
            1
        } else {
            bond.order.as_u8()
        };
        used = used.saturating_add(order);
    }

    let target = valences.iter().find(|&&v| v >= used).copied().unwrap_or(0);
    if target < used {
        return 0;
    }

    let mut h = target - used;

    // An aromatic atom donates one valence to the ring π system.
    if atom.is_aromatic && h > 0 {
        h -= 1;
    }

    h
}
