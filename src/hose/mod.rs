//! HOSE code generation.
//!
//! A HOSE (Hierarchically Ordered Spherical Environment) code is a canonical
//! string describing an atom's surroundings out to a fixed sphere depth; it
//! is the lookup key of the shift store. Generation is a two-pass ordered
//! breadth-first traversal: pass 1 builds the sphere lists, pass 2 runs the
//! scoring cascade and prints the code. The emitted bytes match the
//! nmrshiftdb2 reference generator for the default depth of four spheres.

mod build;
mod emit;
mod node;
mod score;

use crate::adapter::MolView;

/// Reference sphere depth. The shift database is keyed at this depth.
pub const DEFAULT_MAX_SPHERES: usize = 4;

/// The HOSE code for one atom at the reference depth of four spheres.
///
/// Pure: the result depends only on the molecule and the chosen atom, and
/// symmetry-equivalent atoms produce identical codes.
pub fn hose_code(view: &MolView, atom: usize) -> String {
    hose_code_with_spheres(view, atom, DEFAULT_MAX_SPHERES)
}

/// The HOSE code for one atom at an explicit sphere depth.
pub fn hose_code_with_spheres(view: &MolView, atom: usize, max_spheres: usize) -> String {
    view.ensure_derived_tables();
    let mut tree = build::build_spheres(view, atom, max_spheres);
    score::score_spheres(view, atom, &mut tree);
    emit::emit(view, atom, &mut tree, max_spheres)
}
