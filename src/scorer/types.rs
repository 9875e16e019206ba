use crate::error::{FfResult, FittsForgeError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Output of one layout evaluation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    pub digraph_cost: f64,
    pub letter_cost: f64,
    pub total_cost: f64,
}

/// Ordered pair of consecutive symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digraph {
    pub first: char,
    pub second: char,
}

impl Digraph {
    pub const fn new(first: char, second: char) -> Self {
        Self { first, second }
    }
}

impl fmt::Display for Digraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.first, self.second)
    }
}

impl FromStr for Digraph {
    type Err = FittsForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(first), Some(second), None) => Ok(Self { first, second }),
            _ => Err(FittsForgeError::InvalidInput(format!(
                "digraph key '{}' must be exactly two symbols",
                s
            ))),
        }
    }
}

/// Non-negative weights keyed by symbol or digraph.
///
/// Backed by a `BTreeMap` so summation order (and therefore every cost)
/// is deterministic across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityTable<K: Ord> {
    entries: BTreeMap<K, f64>,
}

pub type LetterTable = ProbabilityTable<char>;
pub type DigraphTable = ProbabilityTable<Digraph>;

impl<K: Ord> Default for ProbabilityTable<K> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy + fmt::Display> ProbabilityTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I>(entries: I) -> FfResult<Self>
    where
        I: IntoIterator<Item = (K, f64)>,
    {
        let mut table = Self::new();
        for (key, weight) in entries {
            table.insert(key, weight)?;
        }
        Ok(table)
    }

    /// Adds `weight` to the entry for `key`.
    pub fn insert(&mut self, key: K, weight: f64) -> FfResult<()> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(FittsForgeError::InvalidInput(format!(
                "weight for '{}' must be a finite non-negative number, got {}",
                key, weight
            )));
        }
        *self.entries.entry(key).or_insert(0.0) += weight;
        Ok(())
    }

    pub fn get(&self, key: &K) -> Option<f64> {
        self.entries.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, f64)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.entries.keys().copied()
    }

    pub fn total(&self) -> f64 {
        self.entries.values().sum()
    }

    /// Divides every weight by the total mass.
    pub fn normalize(&self) -> FfResult<Self> {
        let total = self.total();
        if total <= 0.0 {
            return Err(FittsForgeError::InvalidInput(
                "total probability mass is zero; cannot normalize".to_string(),
            ));
        }
        Ok(Self {
            entries: self.entries.iter().map(|(k, v)| (*k, v / total)).collect(),
        })
    }
}
