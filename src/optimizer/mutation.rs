use crate::error::{FfResult, FittsForgeError};
use crate::geometry::Position;
use crate::layouts::Layout;
use fastrand::Rng;

/// Uniformly random bijection between `alphabet` and `positions`.
pub fn random_layout(rng: &mut Rng, alphabet: &[char], positions: &[Position]) -> FfResult<Layout> {
    if alphabet.len() != positions.len() {
        return Err(FittsForgeError::SizeMismatch {
            symbols: alphabet.len(),
            positions: positions.len(),
        });
    }
    let mut symbols = alphabet.to_vec();
    rng.shuffle(&mut symbols);
    Layout::from_parts(&symbols, positions)
}

/// Two distinct slot indices in `0..n`, uniform over unordered pairs.
pub fn pick_pair(rng: &mut Rng, n: usize) -> (usize, usize) {
    let a = rng.usize(0..n);
    let mut b = rng.usize(0..n - 1);
    if b >= a {
        b += 1;
    }
    (a, b)
}

/// Neighbor proposal: a copy of `layout` with two symbols' positions exchanged.
pub fn swap_two(rng: &mut Rng, layout: &Layout) -> FfResult<Layout> {
    if layout.len() < 2 {
        return Err(FittsForgeError::InvalidInput(format!(
            "a swap needs at least two symbols, layout has {}",
            layout.len()
        )));
    }
    let (a, b) = pick_pair(rng, layout.len());
    Ok(layout.swapped(a, b))
}
