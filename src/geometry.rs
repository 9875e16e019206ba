use crate::error::{FfResult, FittsForgeError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Physical coordinate of a key slot (units ~1u key width).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Bit-exact identity, used for uniqueness checks on the slot set.
    pub(crate) fn bits(&self) -> (u64, u64) {
        (self.x.to_bits(), self.y.to_bits())
    }
}

impl From<[f64; 2]> for Position {
    fn from(v: [f64; 2]) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

impl From<Position> for [f64; 2] {
    fn from(p: Position) -> Self {
        [p.x, p.y]
    }
}

impl From<(f64, f64)> for Position {
    fn from(v: (f64, f64)) -> Self {
        Self { x: v.0, y: v.1 }
    }
}

/// The fixed slot set of a physical keyboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyboardGeometry {
    pub positions: Vec<Position>,
}

impl KeyboardGeometry {
    pub fn new(positions: Vec<Position>) -> FfResult<Self> {
        let geom = Self { positions };
        geom.validate()?;
        Ok(geom)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> FfResult<Self> {
        let content = fs::read_to_string(path)?;
        let geom: KeyboardGeometry = serde_json::from_str(&content)?;
        geom.validate()?;
        Ok(geom)
    }

    /// 27-key row-staggered block (10 top, 10 home, 7 bottom).
    pub fn standard() -> Self {
        let mut positions = Vec::with_capacity(27);
        for i in 0..10 {
            positions.push(Position::new(1.5 + i as f64, 0.0));
        }
        for i in 0..10 {
            positions.push(Position::new(1.75 + i as f64, 1.0));
        }
        for i in 0..7 {
            positions.push(Position::new(2.25 + i as f64, 2.0));
        }
        Self { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Centroid of the slot set. Independent of symbol assignment.
    pub fn home_point(&self) -> Position {
        home_point(self.positions.iter())
    }

    fn validate(&self) -> FfResult<()> {
        let mut seen = HashSet::with_capacity(self.positions.len());
        for p in &self.positions {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(FittsForgeError::InvalidInput(format!(
                    "non-finite key position ({}, {})",
                    p.x, p.y
                )));
            }
            if !seen.insert(p.bits()) {
                return Err(FittsForgeError::DuplicatePosition { x: p.x, y: p.y });
            }
        }
        Ok(())
    }
}

/// Arithmetic mean of the given positions; the origin for an empty set.
///
/// Positions are summed in sorted order, so any ordering of the same set
/// yields a bit-identical result.
pub fn home_point<'a, I>(positions: I) -> Position
where
    I: IntoIterator<Item = &'a Position>,
{
    let mut sorted: Vec<Position> = positions.into_iter().copied().collect();
    if sorted.is_empty() {
        return Position::new(0.0, 0.0);
    }
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));

    let (sum_x, sum_y) = sorted
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    let count = sorted.len() as f64;
    Position::new(sum_x / count, sum_y / count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_has_27_unique_slots() {
        let geom = KeyboardGeometry::standard();
        assert_eq!(geom.len(), 27);
        assert!(KeyboardGeometry::new(geom.positions.clone()).is_ok());
    }

    #[test]
    fn test_duplicate_position_rejected() {
        let res = KeyboardGeometry::new(vec![Position::new(0.0, 0.0), Position::new(0.0, 0.0)]);
        assert!(matches!(
            res,
            Err(FittsForgeError::DuplicatePosition { .. })
        ));
    }

    #[test]
    fn test_position_serializes_as_pair() {
        let json = serde_json::to_string(&Position::new(1.5, 2.0)).unwrap();
        assert_eq!(json, "[1.5,2.0]");
        let back: Position = serde_json::from_str("[3.0, 4.0]").unwrap();
        assert_eq!(back, Position::new(3.0, 4.0));
    }

    #[test]
    fn test_home_point_of_line() {
        let pts = [
            Position::new(0.0, 0.0),
            Position::new(1.0, 0.0),
            Position::new(2.0, 0.0),
        ];
        assert_eq!(home_point(pts.iter()), Position::new(1.0, 0.0));
    }
}
