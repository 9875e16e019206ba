use crate::error::{FfResult, FittsForgeError};
use crate::geometry::{self, KeyboardGeometry, Position};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use strum_macros::{Display, EnumIter, EnumString};

pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzñ";

/// Bijective assignment of symbols to key positions.
///
/// Symbol order is fixed at construction; moves only exchange positions,
/// so the slot set of every layout derived from this one stays identical.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<char, Position>",
    into = "BTreeMap<char, Position>"
)]
pub struct Layout {
    symbols: Vec<char>,
    positions: Vec<Position>,
    index: HashMap<char, usize>,
    home: Position,
}

impl Layout {
    pub fn new<I>(pairs: I) -> FfResult<Self>
    where
        I: IntoIterator<Item = (char, Position)>,
    {
        let mut symbols = Vec::new();
        let mut positions = Vec::new();
        let mut index = HashMap::new();
        let mut taken = HashSet::new();

        for (symbol, pos) in pairs {
            if index.insert(symbol, symbols.len()).is_some() {
                return Err(FittsForgeError::DuplicateSymbol(symbol));
            }
            if !taken.insert(pos.bits()) {
                return Err(FittsForgeError::DuplicatePosition { x: pos.x, y: pos.y });
            }
            symbols.push(symbol);
            positions.push(pos);
        }

        let home = geometry::home_point(positions.iter());
        Ok(Self {
            symbols,
            positions,
            index,
            home,
        })
    }

    /// Pairs `alphabet[i]` with `positions[i]`.
    pub fn from_parts(alphabet: &[char], positions: &[Position]) -> FfResult<Self> {
        if alphabet.len() != positions.len() {
            return Err(FittsForgeError::SizeMismatch {
                symbols: alphabet.len(),
                positions: positions.len(),
            });
        }
        Self::new(alphabet.iter().copied().zip(positions.iter().copied()))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn index_of(&self, symbol: char) -> Option<usize> {
        self.index.get(&symbol).copied()
    }

    pub fn position(&self, symbol: char) -> Option<Position> {
        self.index_of(symbol).map(|i| self.positions[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, Position)> + '_ {
        self.symbols.iter().copied().zip(self.positions.iter().copied())
    }

    /// Centroid of the slot set; unchanged by swaps.
    pub fn home_point(&self) -> Position {
        self.home
    }

    /// Returns a copy with the positions of slots `a` and `b` exchanged.
    pub fn swapped(&self, a: usize, b: usize) -> Layout {
        let mut next = self.clone();
        next.positions.swap(a, b);
        next
    }

    /// Symbols sorted by position, top-left first; used for grid rendering.
    pub fn reading_order(&self) -> Vec<(char, Position)> {
        let mut pairs: Vec<(char, Position)> = self.iter().collect();
        pairs.sort_by(|l, r| l.1.y.total_cmp(&r.1.y).then(l.1.x.total_cmp(&r.1.x)));
        pairs
    }
}

impl PartialEq for Layout {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(symbol, pos)| other.position(symbol) == Some(pos))
    }
}

impl TryFrom<BTreeMap<char, Position>> for Layout {
    type Error = FittsForgeError;

    fn try_from(map: BTreeMap<char, Position>) -> Result<Self, Self::Error> {
        Layout::new(map)
    }
}

impl From<Layout> for BTreeMap<char, Position> {
    fn from(layout: Layout) -> Self {
        layout.iter().collect()
    }
}

#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum KnownLayout {
    Qwerty,
    Alphabetical,
}

impl KnownLayout {
    // Maps onto the standard 27-key block, row by row.
    pub fn get_str(&self) -> &'static str {
        match self {
            Self::Qwerty => "qwertyuiopasdfghjklñzxcvbnm",
            Self::Alphabetical => DEFAULT_ALPHABET,
        }
    }

    pub fn to_layout(&self, geom: &KeyboardGeometry) -> FfResult<Layout> {
        let symbols: Vec<char> = self.get_str().chars().collect();
        Layout::from_parts(&symbols, &geom.positions)
    }
}
