use super::physics::MovementMatrix;
use super::types::{CostRecord, DigraphTable, LetterTable};
use crate::config::CostParams;
use crate::error::{FfResult, FittsForgeError};
use crate::layouts::Layout;
use std::borrow::Cow;

/// Full evaluation of one layout.
///
/// `digraph_cost = Σ P(d) * fitts(first(d) -> second(d))`,
/// `letter_cost = Σ P(s) * dist(pos(s), home)`,
/// `total = digraph_weight * digraph_cost + letter_weight * letter_cost`.
///
/// Fails with `InvalidParameter` for a non-positive key width or non-finite
/// constants. When `params.normalize_inputs` is set both tables are
/// normalized first.
pub fn evaluate(
    layout: &Layout,
    digraphs: &DigraphTable,
    letters: &LetterTable,
    params: &CostParams,
) -> FfResult<CostRecord> {
    params.validate()?;

    let (digraphs, letters) = if params.normalize_inputs {
        (
            Cow::Owned(digraphs.normalize()?),
            Cow::Owned(letters.normalize()?),
        )
    } else {
        (Cow::Borrowed(digraphs), Cow::Borrowed(letters))
    };

    evaluate_prepared(layout, &digraphs, &letters, params)
}

/// Same as [`evaluate`] but uses the tables exactly as given.
pub(crate) fn evaluate_prepared(
    layout: &Layout,
    digraphs: &DigraphTable,
    letters: &LetterTable,
    params: &CostParams,
) -> FfResult<CostRecord> {
    let digraph_cost = digraph_cost(layout, digraphs, params)?;
    let letter_cost = letter_cost(layout, letters)?;

    Ok(CostRecord {
        digraph_cost,
        letter_cost,
        total_cost: params.digraph_weight * digraph_cost + params.letter_weight * letter_cost,
    })
}

pub fn digraph_cost(
    layout: &Layout,
    digraphs: &DigraphTable,
    params: &CostParams,
) -> FfResult<f64> {
    let matrix = MovementMatrix::build(
        layout,
        params.key_width,
        params.intercept_a,
        params.slope_b,
    );

    let mut cost = 0.0;
    for (digraph, prob) in digraphs.iter() {
        cost += prob * matrix.time(digraph.first, digraph.second)?;
    }
    Ok(cost)
}

pub fn letter_cost(layout: &Layout, letters: &LetterTable) -> FfResult<f64> {
    let home = layout.home_point();

    let mut cost = 0.0;
    for (symbol, prob) in letters.iter() {
        let pos = layout
            .position(symbol)
            .ok_or(FittsForgeError::UnknownSymbol(symbol))?;
        cost += prob * pos.distance(&home);
    }
    Ok(cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position;
    use crate::scorer::types::Digraph;

    fn abc_layout() -> Layout {
        Layout::from_parts(
            &['a', 'b', 'c'],
            &[
                Position::new(0.0, 0.0),
                Position::new(1.0, 0.0),
                Position::new(2.0, 0.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_unknown_digraph_symbol() {
        let digraphs = DigraphTable::from_entries([(Digraph::new('a', 'x'), 1.0)]).unwrap();
        let letters = LetterTable::from_entries([('a', 1.0)]).unwrap();
        let res = evaluate(&abc_layout(), &digraphs, &letters, &CostParams::default());
        assert!(matches!(res, Err(FittsForgeError::UnknownSymbol('x'))));
    }

    #[test]
    fn test_unknown_letter_symbol() {
        let digraphs = DigraphTable::from_entries([(Digraph::new('a', 'b'), 1.0)]).unwrap();
        let letters = LetterTable::from_entries([('q', 1.0)]).unwrap();
        let res = evaluate(&abc_layout(), &digraphs, &letters, &CostParams::default());
        assert!(matches!(res, Err(FittsForgeError::UnknownSymbol('q'))));
    }

    #[test]
    fn test_normalization_makes_counts_equivalent() {
        let layout = abc_layout();
        let params = CostParams::default();
        let probs = DigraphTable::from_entries([
            (Digraph::new('a', 'b'), 0.25),
            (Digraph::new('a', 'c'), 0.75),
        ])
        .unwrap();
        let counts = DigraphTable::from_entries([
            (Digraph::new('a', 'b'), 100.0),
            (Digraph::new('a', 'c'), 300.0),
        ])
        .unwrap();
        let letters = LetterTable::from_entries([('c', 2.0)]).unwrap();

        let r1 = evaluate(&layout, &probs, &letters, &params).unwrap();
        let r2 = evaluate(&layout, &counts, &letters, &params).unwrap();
        assert!((r1.total_cost - r2.total_cost).abs() < 1e-12);
    }

    #[test]
    fn test_without_normalization_uses_raw_weights() {
        let layout = abc_layout();
        let params = CostParams {
            normalize_inputs: false,
            ..Default::default()
        };
        let digraphs = DigraphTable::from_entries([(Digraph::new('a', 'b'), 2.0)]).unwrap();
        let letters = LetterTable::from_entries([('a', 3.0)]).unwrap();
        let r = evaluate(&layout, &digraphs, &letters, &params).unwrap();
        assert!((r.digraph_cost - 2.0).abs() < 1e-12);
        assert!((r.letter_cost - 3.0).abs() < 1e-12);
    }
}
