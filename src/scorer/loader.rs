use super::types::{Digraph, DigraphTable, LetterTable};
use crate::error::{FfResult, FittsForgeError};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Reads a `key -> weight` table.
///
/// Accepted forms:
/// * a JSON object, `{"a": 0.1, "b": 0.2}`
/// * a single-quoted dictionary literal, `{'a': 0.1, 'b': 0.2}`
/// * tab-separated `key<TAB>weight` rows
///
/// Keys are lowercased.
pub fn load_raw_table<P: AsRef<Path>>(path: P) -> FfResult<Vec<(String, f64)>> {
    let path = path.as_ref();
    debug!("Loading probability table from: {}", path.display());
    let content = fs::read_to_string(path)?;
    parse_raw_table(&content)
}

pub fn parse_raw_table(content: &str) -> FfResult<Vec<(String, f64)>> {
    let entries = if content.trim_start().starts_with('{') {
        parse_mapping(content)?
    } else {
        parse_tsv(content)?
    };

    Ok(entries
        .into_iter()
        .map(|(k, v)| (k.to_lowercase(), v))
        .collect())
}

fn parse_mapping(content: &str) -> FfResult<Vec<(String, f64)>> {
    match serde_json::from_str::<BTreeMap<String, f64>>(content) {
        Ok(map) => Ok(map.into_iter().collect()),
        Err(e) => {
            // Single-quoted literal; only safe to rewrite when no double quotes exist.
            if content.contains('\'') && !content.contains('"') {
                let converted = content.replace('\'', "\"");
                let map: BTreeMap<String, f64> = serde_json::from_str(&converted)?;
                Ok(map.into_iter().collect())
            } else {
                Err(e.into())
            }
        }
    }
}

fn parse_tsv(content: &str) -> FfResult<Vec<(String, f64)>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut entries = Vec::new();
    let mut skipped = 0usize;

    for result in rdr.records() {
        let rec = result?;
        if rec.len() < 2 {
            skipped += 1;
            continue;
        }
        let key = &rec[0];
        if key.is_empty() {
            skipped += 1;
            continue;
        }
        match rec[1].trim().parse::<f64>() {
            Ok(weight) => entries.push((key.to_string(), weight)),
            Err(_) => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("   Skipped {} unparseable table rows.", skipped);
    }
    Ok(entries)
}

pub fn letter_table_from_raw(raw: Vec<(String, f64)>) -> FfResult<LetterTable> {
    let mut table = LetterTable::new();
    for (key, weight) in raw {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => table.insert(c, weight)?,
            _ => {
                return Err(FittsForgeError::InvalidInput(format!(
                    "letter key '{}' must be exactly one symbol",
                    key
                )))
            }
        }
    }
    Ok(table)
}

pub fn digraph_table_from_raw(raw: Vec<(String, f64)>) -> FfResult<DigraphTable> {
    let mut table = DigraphTable::new();
    for (key, weight) in raw {
        let digraph: Digraph = key.parse()?;
        table.insert(digraph, weight)?;
    }
    Ok(table)
}

pub fn load_letter_table<P: AsRef<Path>>(path: P) -> FfResult<LetterTable> {
    let table = letter_table_from_raw(load_raw_table(path)?)?;
    debug!("   -> Loaded {} letters.", table.len());
    Ok(table)
}

pub fn load_digraph_table<P: AsRef<Path>>(path: P) -> FfResult<DigraphTable> {
    let table = digraph_table_from_raw(load_raw_table(path)?)?;
    debug!("   -> Loaded {} digraphs.", table.len());
    Ok(table)
}
