use crate::adapter::MolView;

use super::build::SphereTree;
use super::node::{bremser_symbol, charge_suffix, delimiter, NodeKind};

/// Pass 2, step 7: walk the sorted spheres and print the code.
///
/// Ring closures are resolved here against an emission-time visited set: the
/// second appearance of an atom prints `&` and becomes a stopper, and the
/// whole subtree under a stopper is silenced while still holding its sphere
/// positions for comma placement.
pub(crate) fn emit(view: &MolView, center: usize, tree: &mut SphereTree, max_spheres: usize) -> String {
    let mut out = String::new();
    let mut visited = vec![false; view.atom_count()];
    visited[center] = true;

    if !tree.spheres.is_empty() {
        emit_sphere(view, tree, 0, &mut out, &mut visited);
    }
    for s in 1..max_spheres {
        out.push(delimiter(s - 1));
        if s < tree.spheres.len() {
            emit_sphere(view, tree, s, &mut out, &mut visited);
        }
    }
    if max_spheres > 0 {
        out.push(delimiter(max_spheres - 1));
    }
    out
}

fn emit_sphere(
    view: &MolView,
    tree: &mut SphereTree,
    sphere: usize,
    out: &mut String,
    visited: &mut [bool],
) {
    let ids = tree.spheres[sphere].clone();
    let mut current_branch = match ids.first() {
        Some(&id) => tree.arena.get(id).parent_atom,
        None => return,
    };

    for (pos, &id) in ids.iter().enumerate() {
        let (kind, bond, parent, parent_atom) = {
            let node = tree.arena.get(id);
            (node.kind, node.bond, node.parent, node.parent_atom)
        };
        let parent_is_stopper = parent
            .map(|p| tree.arena.get(p).stopper)
            .unwrap_or(false);

        if !parent_is_stopper && pos > 0 && parent_atom != current_branch {
            out.push(',');
            current_branch = parent_atom;
        }

        if parent_is_stopper {
            tree.arena.get_mut(id).stopper = true;
        } else {
            match kind {
                NodeKind::Atom { idx } => {
                    out.push_str(bond.symbol());
                    if visited[idx] {
                        out.push('&');
                        out.push_str(&charge_suffix(view.charge(idx)));
                        tree.arena.get_mut(id).stopper = true;
                    } else {
                        out.push_str(bremser_symbol(view.element(idx)));
                        out.push_str(&charge_suffix(view.charge(idx)));
                    }
                }
                NodeKind::Hydrogen => {
                    out.push_str(bond.symbol());
                    out.push('H');
                }
                NodeKind::Comma => {}
            }
        }

        if let NodeKind::Atom { idx } = kind {
            visited[idx] = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hose::build::build_spheres;
    use crate::hose::score::score_spheres;
    use crate::smiles::from_smiles;

    fn code(smiles: &str, center: usize) -> String {
        let mol = from_smiles(smiles).unwrap();
        let view = MolView::new(&mol);
        let mut tree = build_spheres(&view, center, 4);
        score_spheres(&view, center, &mut tree);
        emit(&view, center, &mut tree, 4)
    }

    #[test]
    fn methane_is_all_hydrogens() {
        assert_eq!(code("C", 0), "HHHH(//)");
    }

    #[test]
    fn lone_atom_is_delimiters_only() {
        assert_eq!(code("[C]", 0), "(//)");
    }

    #[test]
    fn chloroform_uses_bremser_letters() {
        assert_eq!(code("C(Cl)(Cl)Cl", 0), "HXXX(,,//)");
    }

    #[test]
    fn charge_suffix_emitted() {
        // Acetate CH3 center: the carboxylate oxygens carry the minus.
        let c = code("CC(=O)[O-]", 0);
        assert!(c.contains("O-"), "expected charged oxygen token in {c}");
    }
}
