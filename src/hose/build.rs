use petgraph::graph::EdgeIndex;

use crate::adapter::MolView;
use crate::bond::BondOrder;
use crate::element::Element;

use super::node::{Arena, BondKind, Node, NodeKind};

/// The concentric-sphere tree for one center atom: a node arena plus one
/// ordered id list per sphere.
pub(crate) struct SphereTree {
    pub arena: Arena,
    pub spheres: Vec<Vec<usize>>,
}

/// Pass 1: breadth-first construction of `max_spheres` ordered sphere lists.
///
/// No visited tracking happens here: an atom reachable along two branches
/// appears as two nodes, and ring closures are resolved during emission.
/// Each finished sphere is sorted ascending by canonical label; hydrogen
/// pseudo-nodes and comma sentinels sort past every real atom, keeping
/// generation order among themselves.
pub(crate) fn build_spheres(view: &MolView, center: usize, max_spheres: usize) -> SphereTree {
    let mut arena = Arena::default();
    let mut spheres: Vec<Vec<usize>> = vec![Vec::new(); max_spheres];
    if max_spheres == 0 {
        return SphereTree { arena, spheres };
    }

    let mut first = Vec::new();
    for (j, e) in view.neighbors(center) {
        let mut node = Node::new(
            NodeKind::Atom { idx: j },
            bond_kind(view, e),
            None,
            center,
        );
        node.degree = total_bond_count(view, j);
        first.push(arena.push(node));
    }
    for _ in 0..view.implicit_h(center) {
        let mut node = Node::new(NodeKind::Hydrogen, BondKind::Single, None, center);
        node.degree = 1;
        first.push(arena.push(node));
    }
    sort_by_label(view, &arena, &mut first);
    spheres[0] = first;

    for s in 1..max_spheres {
        let mut next = Vec::new();
        let prev = spheres[s - 1].clone();
        for &pid in &prev {
            let idx = match arena.get(pid).atom_idx() {
                Some(idx) => idx,
                None => continue,
            };
            if view.element(idx) == Element::H {
                continue;
            }

            let impl_h = view.implicit_h(idx);
            let heavy: Vec<(usize, EdgeIndex)> = view.neighbors(idx).collect();

            // A true leaf: the parent is its only heavy neighbor and it has
            // no hydrogens. The sentinel keeps the branch position.
            if heavy.len() == 1 && impl_h == 0 {
                next.push(arena.push(Node::new(
                    NodeKind::Comma,
                    BondKind::ToComma,
                    Some(pid),
                    idx,
                )));
                continue;
            }

            let parent_atom = arena.get(pid).parent_atom;
            for (j, e) in heavy {
                if j == parent_atom {
                    continue;
                }
                let mut node = Node::new(
                    NodeKind::Atom { idx: j },
                    bond_kind(view, e),
                    Some(pid),
                    idx,
                );
                node.degree = total_bond_count(view, j);
                next.push(arena.push(node));
            }
            for _ in 0..impl_h {
                let mut node = Node::new(NodeKind::Hydrogen, BondKind::Single, Some(pid), idx);
                node.degree = 1;
                next.push(arena.push(node));
            }
        }
        sort_by_label(view, &arena, &mut next);
        spheres[s] = next;
    }

    SphereTree { arena, spheres }
}

// Aromaticity supersedes the nominal order.
fn bond_kind(view: &MolView, e: EdgeIndex) -> BondKind {
    if view.is_aromatic_bond(e) {
        BondKind::Aromatic
    } else {
        match view.bond_order(e) {
            BondOrder::Single => BondKind::Single,
            BondOrder::Double => BondKind::Double,
            BondOrder::Triple => BondKind::Triple,
        }
    }
}

fn total_bond_count(view: &MolView, idx: usize) -> i64 {
    view.heavy_degree(idx) as i64 + view.implicit_h(idx) as i64
}

fn sort_by_label(view: &MolView, arena: &Arena, sphere: &mut [usize]) {
    sphere.sort_by_key(|&id| match arena.get(id).kind {
        NodeKind::Atom { idx } => view.canonical_label(idx),
        _ => u64::MAX,
    });
}
