//! SMILES parsing: a tokenizer feeding a single-pass graph builder.
//!
//! [`parse_smiles`] yields the raw graph as written; [`from_smiles`] is what
//! the rest of the crate uses; it additionally runs aromaticity perception
//! so that Kekulé and aromatic spellings of the same ring converge on one
//! representation.

mod builder;
pub mod error;
mod tokenizer;

use crate::aromaticity;
use crate::mol::Mol;
pub use error::SmilesError;

pub fn parse_smiles(s: &str) -> Result<Mol, SmilesError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    let tokens = tokenizer::tokenize(trimmed)?;
    if tokens.is_empty() {
        return Err(SmilesError::EmptyInput);
    }
    builder::build_mol(&tokens)
}

pub fn from_smiles(s: &str) -> Result<Mol, SmilesError> {
    let mut mol = parse_smiles(s)?;
    aromaticity::perceive_aromaticity(&mut mol);
    Ok(mol)
}
