pub mod engine;
pub mod loader;
pub mod physics;
pub mod types;

pub use self::engine::evaluate;
pub use self::types::{CostRecord, Digraph, DigraphTable, LetterTable, ProbabilityTable};
use crate::config::CostParams;
use crate::error::{FfResult, FittsForgeError};
use crate::layouts::Layout;
use rayon::prelude::*;
use std::path::Path;
use tracing::debug;

/// Probability tables plus cost constants, ready for repeated evaluation.
///
/// Tables are normalized once at construction when `normalize_inputs` is set,
/// which yields the same costs as normalizing on every call.
#[derive(Debug, Clone)]
pub struct Scorer {
    pub params: CostParams,
    digraphs: DigraphTable,
    letters: LetterTable,
}

impl Scorer {
    pub fn new(digraphs: DigraphTable, letters: LetterTable, params: CostParams) -> FfResult<Self> {
        params.validate()?;

        let (digraphs, letters) = if params.normalize_inputs {
            (digraphs.normalize()?, letters.normalize()?)
        } else {
            (digraphs, letters)
        };

        debug!(
            "Scorer ready: {} digraphs, {} letters",
            digraphs.len(),
            letters.len()
        );

        Ok(Self {
            params,
            digraphs,
            letters,
        })
    }

    pub fn from_files<P: AsRef<Path>>(
        digraph_path: P,
        letter_path: P,
        params: CostParams,
    ) -> FfResult<Self> {
        let digraphs = loader::load_digraph_table(digraph_path)?;
        let letters = loader::load_letter_table(letter_path)?;
        Self::new(digraphs, letters, params)
    }

    pub fn digraphs(&self) -> &DigraphTable {
        &self.digraphs
    }

    pub fn letters(&self) -> &LetterTable {
        &self.letters
    }

    pub fn evaluate(&self, layout: &Layout) -> FfResult<CostRecord> {
        engine::evaluate_prepared(layout, &self.digraphs, &self.letters, &self.params)
    }

    pub fn total(&self, layout: &Layout) -> FfResult<f64> {
        self.evaluate(layout).map(|r| r.total_cost)
    }

    /// Scores independent layouts in parallel, preserving input order.
    pub fn evaluate_many(&self, layouts: &[Layout]) -> Vec<FfResult<CostRecord>> {
        layouts.par_iter().map(|l| self.evaluate(l)).collect()
    }

    /// Fails with the first table symbol that the layout cannot place.
    pub fn check_coverage(&self, layout: &Layout) -> FfResult<()> {
        for d in self.digraphs.keys() {
            for symbol in [d.first, d.second] {
                if layout.index_of(symbol).is_none() {
                    return Err(FittsForgeError::UnknownSymbol(symbol));
                }
            }
        }
        for symbol in self.letters.keys() {
            if layout.index_of(symbol).is_none() {
                return Err(FittsForgeError::UnknownSymbol(symbol));
            }
        }
        Ok(())
    }
}
