use std::collections::HashSet;

use petgraph::graph::NodeIndex;

use crate::bond::BondOrder;
use crate::mol::Mol;
use crate::rings::RingInfo;

const SP2_CAPABLE: [u8; 9] = [
    5,  // B
    6,  // C
    7,  // N
    8,  // O
    15, // P
    16, // S
    33, // As
    34, // Se
    52, // Te
];

/// Hückel aromaticity perception over the SSSR.
///
/// Marks aromatic atoms and ring-perimeter bonds, so a Kekulé spelling
/// (`C1=CC=CC=C1`) and an aromatic spelling (`c1ccccc1`) of the same ring end
/// up with identical flags. Rings that arrive fully aromatic-flagged from the
/// parser are trusted as written; Kekulé rings are counted. Bond flags are
/// re-derived from the perceived rings, which strips the spurious aromatic
/// flag the parser puts on an implicit bond joining two separate aromatic
/// rings (biphenyl written without `-`).
pub fn perceive_aromaticity(mol: &mut Mol) {
    let ring_info = RingInfo::sssr(mol);
    let rings = ring_info.rings().to_vec();
    let n = mol.atom_count();

    let input_bond_aromatic: Vec<bool> = mol
        .bonds()
        .map(|e| mol.bond(e).is_aromatic)
        .collect();

    let mut aromatic: Vec<bool> = (0..n)
        .map(|i| mol.atom(NodeIndex::new(i)).is_aromatic)
        .collect();
    let mut aromatic_rings: Vec<usize> = Vec::new();

    for (ri, ring) in rings.iter().enumerate() {
        if ring_trusted_aromatic(mol, ring, &input_bond_aromatic) || is_aromatic_ring(mol, ring)
        {
            aromatic_rings.push(ri);
            for &atom_idx in ring {
                aromatic[atom_idx.index()] = true;
            }
        }
    }

    for system in fused_ring_systems(&rings) {
        if system.len() < 2 {
            continue;
        }
        mark_fused_system_aromatic(mol, &system, &rings, &mut aromatic, &mut aromatic_rings);
    }

    for idx in 0..n {
        if aromatic[idx] {
            mol.atom_mut(NodeIndex::new(idx)).is_aromatic = true;
        }
    }

    let edges: Vec<_> = mol.bonds().collect();
    for e in edges {
        mol.bond_mut(e).is_aromatic = false;
    }
    for &ri in &aromatic_rings {
        let ring = &rings[ri];
        let len = ring.len();
        for i in 0..len {
            if let Some(edge) = mol.bond_between(ring[i], ring[(i + 1) % len]) {
                mol.bond_mut(edge).is_aromatic = true;
            }
        }
    }
}

// A ring whose every perimeter bond already carried the aromatic flag came
// from lowercase SMILES; the writer has asserted aromaticity.
fn ring_trusted_aromatic(mol: &Mol, ring: &[NodeIndex], input_bond_aromatic: &[bool]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let len = ring.len();
    (0..len).all(|i| {
        mol.bond_between(ring[i], ring[(i + 1) % len])
            .map(|e| input_bond_aromatic[e.index()])
            .unwrap_or(false)
    })
}

fn fused_ring_systems(rings: &[Vec<NodeIndex>]) -> Vec<Vec<usize>> {
    let n = rings.len();
    let mut adj = vec![vec![false; n]; n];
    for i in 0..n {
        let set_i: HashSet<NodeIndex> = rings[i].iter().copied().collect();
        for j in (i + 1)..n {
            let shared = rings[j].iter().filter(|a| set_i.contains(a)).count();
            if shared >= 2 {
                adj[i][j] = true;
                adj[j][i] = true;
            }
        }
    }

    let mut visited = vec![false; n];
    let mut components = Vec::new();
    for i in 0..n {
        if visited[i] {
            continue;
        }
        let mut component = Vec::new();
        let mut stack = vec![i];
        while let Some(cur) = stack.pop() {
            if visited[cur] {
                continue;
            }
            visited[cur] = true;
            component.push(cur);
            for j in 0..n {
                if adj[cur][j] && !visited[j] {
                    stack.push(j);
                }
            }
        }
        components.push(component);
    }
    components
}

fn mark_fused_system_aromatic(
    mol: &Mol,
    system: &[usize],
    rings: &[Vec<NodeIndex>],
    aromatic: &mut [bool],
    aromatic_rings: &mut Vec<usize>,
) {
    loop {
        let mut changed = false;
        for &ring_idx in system {
            let ring = &rings[ring_idx];
            if aromatic_rings.contains(&ring_idx) {
                continue;
            }
            if is_aromatic_ring_in_fused_system(mol, ring, aromatic) {
                aromatic_rings.push(ring_idx);
                changed = true;
                for &atom_idx in ring {
                    aromatic[atom_idx.index()] = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
}

fn is_aromatic_ring_in_fused_system(
    mol: &Mol,
    ring: &[NodeIndex],
    aromatic: &[bool],
) -> bool {
    if ring.len() < 3 {
        return false;
    }

    for &atom_idx in ring {
        if !SP2_CAPABLE.contains(&mol.atom(atom_idx).element.atomic_num()) {
            return false;
        }
    }

    if ring_has_triple_bond(mol, ring) {
        return false;
    }

    ring.iter()
        .all(|&atom_idx| is_sp2_in_fused_system(mol, atom_idx, aromatic))
}

fn is_sp2_in_fused_system(mol: &Mol, atom_idx: NodeIndex, aromatic: &[bool]) -> bool {
    if aromatic[atom_idx.index()] {
        return true;
    }

    let atom = mol.atom(atom_idx);
    let anum = atom.element.atomic_num();
    let charge = atom.formal_charge;
    let has_double = has_any_double_bond(mol, atom_idx);
    let total_degree = mol.degree(atom_idx) as u8 + atom.hydrogen_count;

    match anum {
        6 => match charge {
            0 => has_double,
            1 => true,
            -1 => true,
            _ => false,
        },
        7 => match charge {
            0 => has_double || total_degree <= 3,
            1 => has_double,
            _ => false,
        },
        8 | 16 | 34 | 52 => true,
        5 => has_double,
        15 | 33 => has_double || total_degree <= 3,
        _ => false,
    }
}

fn is_aromatic_ring(mol: &Mol, ring: &[NodeIndex]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    for &atom_idx in ring {
        if !SP2_CAPABLE.contains(&mol.atom(atom_idx).element.atomic_num()) {
            return false;
        }
    }

    if ring_has_triple_bond(mol, ring) {
        return false;
    }

    let mut pi_total: u8 = 0;
    for (i, &atom_idx) in ring.iter().enumerate() {
        match pi_electrons(mol, atom_idx, ring, i) {
            Some(e) => pi_total = pi_total.saturating_add(e),
            None => return false,
        }
    }

    is_huckel(pi_total)
}

fn ring_has_triple_bond(mol: &Mol, ring: &[NodeIndex]) -> bool {
    let len = ring.len();
    (0..len).any(|i| {
        mol.bond_between(ring[i], ring[(i + 1) % len])
            .map(|e| !mol.bond(e).is_aromatic && mol.bond(e).order == BondOrder::Triple)
            .unwrap_or(false)
    })
}

fn pi_electrons(
    mol: &Mol,
    atom_idx: NodeIndex,
    ring: &[NodeIndex],
    pos_in_ring: usize,
) -> Option<u8> {
    let atom = mol.atom(atom_idx);
    let anum = atom.element.atomic_num();
    let charge = atom.formal_charge;

    let has_double = has_any_double_bond(mol, atom_idx);
    let has_double_in_ring = has_double_to_ring_neighbor(mol, atom_idx, ring, pos_in_ring);

    let total_degree = mol.degree(atom_idx) as u8 + atom.hydrogen_count;
    let ring_degree = ring_neighbor_count(ring);

    match anum {
        6 => match charge {
            0 => {
                if has_double_in_ring {
                    Some(1)
                } else {
                    None
                }
            }
            -1 => Some(2),
            1 => {
                if has_double {
                    Some(1)
                } else {
                    Some(0)
                }
            }
            _ => None,
        },
        7 => match charge {
            0 => {
                if has_double {
                    Some(1)
                } else if ring_degree == 2 && total_degree <= 3 {
                    Some(2)
                } else {
                    None
                }
            }
            1 => {
                if has_double_in_ring {
                    Some(1)
                } else {
                    None
                }
            }
            _ => None,
        },
        8 | 16 | 34 | 52 => {
            if has_double_in_ring {
                Some(1)
            } else if ring_degree == 2 {
                Some(2)
            } else {
                None
            }
        }
        5 => {
            if has_double {
                Some(1)
            } else {
                None
            }
        }
        15 | 33 => {
            if has_double {
                Some(1)
            } else if ring_degree == 2 && total_degree <= 3 {
                Some(2)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn has_any_double_bond(mol: &Mol, atom_idx: NodeIndex) -> bool {
    mol.bonds_of(atom_idx)
        .any(|e| !mol.bond(e).is_aromatic && mol.bond(e).order == BondOrder::Double)
}

fn has_double_to_ring_neighbor(
    mol: &Mol,
    atom_idx: NodeIndex,
    ring: &[NodeIndex],
    pos_in_ring: usize,
) -> bool {
    let len = ring.len();
    let prev = ring[(pos_in_ring + len - 1) % len];
    let next = ring[(pos_in_ring + 1) % len];

    for neighbor in [prev, next] {
        if let Some(edge) = mol.bond_between(atom_idx, neighbor) {
            if !mol.bond(edge).is_aromatic && mol.bond(edge).order == BondOrder::Double {
                return true;
            }
        }
    }
    false
}

fn ring_neighbor_count(ring: &[NodeIndex]) -> u8 {
    if ring.len() > 1 {
        2
    } else {
        0
    }
}

fn is_huckel(pi_electrons: u8) -> bool {
    if pi_electrons < 2 {
        return false;
    }
    (pi_electrons - 2) % 4 == 0
}
