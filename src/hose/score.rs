use crate::adapter::MolView;

use super::build::SphereTree;
use super::node::{
    element_rank, zeropad6, NodeKind, COMMA_RANK, HYDROGEN_RANK, RING_CLOSURE_RANK,
};

/// Pass 2, steps 1–6: the scoring and ordering cascade.
///
/// Every sort below is a stable descending sort on `stringscore`, compared
/// lexically. Scores never reach 10^6, so the six-digit zero-padding keeps
/// lexical and numeric order identical at each depth; reordering any step
/// breaks byte-compatibility with the reference output.
pub(crate) fn score_spheres(view: &MolView, center: usize, tree: &mut SphereTree) {
    accumulate_degrees(tree);
    score_and_sort(view, center, tree);
    merge_ranking(tree);
    rebuild_stringscores(tree);
    propagate_stringscores_backward(tree);
    rebuild_stringscores(tree);
}

// Step 1: bottom-up, add each node's degree into its parent's ranking.
fn accumulate_degrees(tree: &mut SphereTree) {
    for s in (1..tree.spheres.len()).rev() {
        for i in 0..tree.spheres[s].len() {
            let id = tree.spheres[s][i];
            let (parent, degree) = {
                let node = tree.arena.get(id);
                (node.parent, node.degree)
            };
            if let Some(p) = parent {
                tree.arena.get_mut(p).ranking += degree;
            }
        }
    }
}

// Step 2: element/ring-closure rank plus bond rank, sphere by sphere, with
// the visited set growing batch-wise so same-sphere siblings never see each
// other.
fn score_and_sort(view: &MolView, center: usize, tree: &mut SphereTree) {
    let mut visited = vec![false; view.atom_count()];
    visited[center] = true;

    for s in 0..tree.spheres.len() {
        for i in 0..tree.spheres[s].len() {
            let id = tree.spheres[s][i];
            let node = tree.arena.get(id);
            let base = match node.kind {
                NodeKind::Atom { idx } => {
                    if visited[idx] {
                        RING_CLOSURE_RANK
                    } else {
                        element_rank(view.element(idx))
                    }
                }
                NodeKind::Hydrogen => HYDROGEN_RANK,
                NodeKind::Comma => COMMA_RANK,
            };
            let bond = node.bond.rank();
            let node = tree.arena.get_mut(id);
            node.score += base + bond;
            node.stringscore = zeropad6(node.score);
        }
        for &id in &tree.spheres[s] {
            if let Some(idx) = tree.arena.get(id).atom_idx() {
                visited[idx] = true;
            }
        }
        sort_desc(tree, s);
    }
}

// Step 3: fold the accumulated ranking into the score.
fn merge_ranking(tree: &mut SphereTree) {
    for s in 0..tree.spheres.len() {
        for i in 0..tree.spheres[s].len() {
            let id = tree.spheres[s][i];
            let node = tree.arena.get_mut(id);
            node.score += node.ranking;
            node.stringscore = zeropad6(node.score);
        }
        sort_desc(tree, s);
    }
}

// Steps 4 and 6: forward stringscore build, parent prefix plus own padded
// score, re-sorting each sphere as it is rebuilt.
fn rebuild_stringscores(tree: &mut SphereTree) {
    for s in 0..tree.spheres.len() {
        for i in 0..tree.spheres[s].len() {
            let id = tree.spheres[s][i];
            let (parent, score) = {
                let node = tree.arena.get(id);
                (node.parent, node.score)
            };
            let prefix = parent
                .map(|p| tree.arena.get(p).stringscore.clone())
                .unwrap_or_default();
            let node = tree.arena.get_mut(id);
            node.stringscore = prefix + &zeropad6(score);
        }
        sort_desc(tree, s);
    }
}

// Step 5: outermost-in, every node overwrites its parent's stringscore
// (later siblings win), then the parent sphere is re-sorted.
fn propagate_stringscores_backward(tree: &mut SphereTree) {
    for s in (1..tree.spheres.len()).rev() {
        for i in 0..tree.spheres[s].len() {
            let id = tree.spheres[s][i];
            let (parent, ss) = {
                let node = tree.arena.get(id);
                (node.parent, node.stringscore.clone())
            };
            if let Some(p) = parent {
                tree.arena.get_mut(p).stringscore = ss;
            }
        }
        sort_desc(tree, s - 1);
    }
}

fn sort_desc(tree: &mut SphereTree, sphere: usize) {
    let SphereTree { arena, spheres } = tree;
    spheres[sphere].sort_by(|&a, &b| {
        arena
            .get(b)
            .stringscore
            .cmp(&arena.get(a).stringscore)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hose::build::build_spheres;
    use crate::smiles::from_smiles;

    fn scored(smiles: &str, center: usize) -> (SphereTree, crate::mol::Mol) {
        let mol = from_smiles(smiles).unwrap();
        let tree = {
            let view = MolView::new(&mol);
            let mut tree = build_spheres(&view, center, 4);
            score_spheres(&view, center, &mut tree);
            tree
        };
        (tree, mol)
    }

    #[test]
    fn hydrogens_outrank_carbons() {
        // Propane center: HH before CC after the cascade.
        let (tree, _mol) = scored("CCC", 1);
        let kinds: Vec<_> = tree.spheres[0]
            .iter()
            .map(|&id| tree.arena.get(id).kind)
            .collect();
        assert!(matches!(kinds[0], NodeKind::Hydrogen));
        assert!(matches!(kinds[1], NodeKind::Hydrogen));
        assert!(matches!(kinds[2], NodeKind::Atom { .. }));
        assert!(matches!(kinds[3], NodeKind::Atom { .. }));
    }

    #[test]
    fn double_bonded_oxygen_outranks_single_carbon() {
        // Acetone methyl center, sphere 1 holds =O and C.
        let (tree, _mol) = scored("CC(=O)C", 0);
        let first = tree.arena.get(tree.spheres[1][0]);
        let second = tree.arena.get(tree.spheres[1][1]);
        assert!(first.score > second.score);
        assert_eq!(first.bond.rank(), 200_000);
    }

    #[test]
    fn ring_closure_scored_low() {
        // Cyclohexane sphere 3 re-reaches an already-visited atom.
        let (tree, _mol) = scored("C1CCCCC1", 0);
        let closure = tree.spheres[3]
            .iter()
            .map(|&id| tree.arena.get(id))
            .find(|n| n.atom_idx().is_some() && n.score < 100_000)
            .expect("ring closure node");
        assert_eq!(closure.score % 100_000 / 1_000, 1, "1100 base rank");
    }

    #[test]
    fn stringscores_nest_by_parent() {
        let (tree, _mol) = scored("CCO", 0);
        for &id in &tree.spheres[1] {
            let node = tree.arena.get(id);
            if let Some(p) = node.parent {
                let parent_ss = &tree.arena.get(p).stringscore;
                assert!(node.stringscore.len() > parent_ss.len());
            }
        }
    }

    #[test]
    fn spheres_sorted_descending() {
        let (tree, _mol) = scored("CC(=O)CCl", 1);
        for sphere in &tree.spheres {
            for w in sphere.windows(2) {
                let a = &tree.arena.get(w[0]).stringscore;
                let b = &tree.arena.get(w[1]).stringscore;
                assert!(a >= b, "sphere must be descending: {} < {}", a, b);
            }
        }
    }
}
