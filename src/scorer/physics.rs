use crate::error::{FfResult, FittsForgeError};
use crate::layouts::Layout;

/// Fitts's law movement time: `a + b * log2(distance / width + 1)`.
#[inline(always)]
pub fn fitts_time(distance: f64, key_width: f64, intercept_a: f64, slope_b: f64) -> f64 {
    intercept_a + slope_b * (distance / key_width + 1.0).log2()
}

/// Movement time between every ordered pair of symbols of one layout.
///
/// Row `i` is the "from" symbol, column `j` the "to" symbol, both indexed by
/// the layout's symbol order.
pub struct MovementMatrix<'a> {
    layout: &'a Layout,
    n: usize,
    times: Vec<f64>,
}

impl<'a> MovementMatrix<'a> {
    pub fn build(layout: &'a Layout, key_width: f64, intercept_a: f64, slope_b: f64) -> Self {
        let positions = layout.positions();
        let n = positions.len();
        let mut times = vec![0.0; n * n];

        for (from, p_from) in positions.iter().enumerate() {
            let row = &mut times[from * n..(from + 1) * n];
            for (to, p_to) in positions.iter().enumerate() {
                row[to] = fitts_time(p_from.distance(p_to), key_width, intercept_a, slope_b);
            }
        }

        Self { layout, n, times }
    }

    pub fn size(&self) -> usize {
        self.n
    }

    #[inline(always)]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.times[from * self.n + to]
    }

    pub fn time(&self, from: char, to: char) -> FfResult<f64> {
        let i = self
            .layout
            .index_of(from)
            .ok_or(FittsForgeError::UnknownSymbol(from))?;
        let j = self
            .layout
            .index_of(to)
            .ok_or(FittsForgeError::UnknownSymbol(to))?;
        Ok(self.get(i, j))
    }
}
