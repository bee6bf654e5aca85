//! Raw composition table, as published by zici.info (`rads.json`).
//!
//! Each entry maps a character to `[strokes, composition, left, right]`, where
//! the right component (and in practice anything after the stroke count) may
//! be missing or `null`. Entries are kept untyped until the graph builder
//! validates them, so a single bad entry is reported against its character.
use std::fmt;
use std::io::Read;
use std::path::Path;

use hashbrown::HashMap;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use smol_str::SmolStr;

use crate::graph::error::BuildError;
use crate::types::{CompositionType, StrokeCount};

/// Errors that can occur when reading a raw composition table.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RawTableError {
    /// The table file could not be opened or read
    #[error("Failed to read raw composition table '{0}'")]
    Io(String, #[source] std::io::Error),

    /// The table is not a JSON object of entries
    #[error("Invalid raw composition table")]
    Json(#[from] serde_json::Error),
}

/// Character to composition entry mapping, in file order.
#[derive(Clone, Debug, Default)]
pub struct RawTable {
    entries: Vec<(SmolStr, Value)>,
    positions: HashMap<SmolStr, usize>,
}

impl RawTable {
    pub fn new() -> RawTable {
        RawTable::default()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<RawTable, RawTableError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| RawTableError::Io(path.to_string_lossy().to_string(), e))?;

        RawTable::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<RawTable, RawTableError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Adds or replaces the entry for `character`. A replaced entry keeps its
    /// original position.
    pub fn insert<S: Into<SmolStr>>(&mut self, character: S, fields: Value) {
        let character = character.into();

        match self.positions.get(&character) {
            Some(&i) => self.entries[i].1 = fields,
            None => {
                self.positions.insert(character.clone(), self.entries.len());
                self.entries.push((character, fields));
            }
        }
    }

    pub fn get(&self, character: &str) -> Option<&Value> {
        self.positions.get(character).map(|&i| &self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::str::FromStr for RawTable {
    type Err = RawTableError;

    fn from_str(string: &str) -> Result<RawTable, RawTableError> {
        Ok(serde_json::from_str(string)?)
    }
}

impl<'de> Deserialize<'de> for RawTable {
    fn deserialize<D>(deserializer: D) -> Result<RawTable, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RawTableVisitor;

        impl<'de> Visitor<'de> for RawTableVisitor {
            type Value = RawTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of characters to composition entries")
            }

            fn visit_map<A>(self, mut map: A) -> Result<RawTable, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut table = RawTable::new();

                while let Some((character, fields)) = map.next_entry::<SmolStr, Value>()? {
                    table.insert(character, fields);
                }

                Ok(table)
            }
        }

        deserializer.deserialize_map(RawTableVisitor)
    }
}

/// Validated view of one raw entry.
#[derive(Clone, Debug, PartialEq)]
pub struct RawEntry<'a> {
    /// Stroke count, zero when the entry does not carry a usable one
    pub stroke_count: StrokeCount,
    /// Composition type tag, if any
    pub composition: Option<CompositionType>,
    /// Left component, if any
    pub left: Option<&'a str>,
    /// Right component, if any
    pub right: Option<&'a str>,
}

impl<'a> RawEntry<'a> {
    /// Checks the shape of `fields`. Only a non-array or an array shorter than
    /// `[strokes, composition, left]` is rejected; everything else is
    /// normalized.
    pub fn parse(character: &str, fields: &'a Value) -> Result<RawEntry<'a>, BuildError> {
        let fields = fields
            .as_array()
            .ok_or_else(|| BuildError::NotAnArray(character.into()))?;

        if fields.len() < 3 {
            return Err(BuildError::TooFewFields {
                character: character.into(),
                found: fields.len(),
            });
        }

        let stroke_count = match stroke_count(&fields[0]) {
            Some(v) => v,
            None => {
                log::warn!(
                    "{}: unusable stroke count {}, treating as unknown",
                    character,
                    fields[0]
                );
                0
            }
        };

        Ok(RawEntry {
            stroke_count,
            composition: fields[1].as_str().map(CompositionType::from),
            left: component(&fields[2]),
            right: fields.get(3).and_then(component),
        })
    }
}

fn stroke_count(value: &Value) -> Option<StrokeCount> {
    if let Some(v) = value.as_u64() {
        return StrokeCount::try_from(v).ok();
    }

    value
        .as_f64()
        .filter(|v| *v >= 0.0 && v.fract() == 0.0 && *v <= StrokeCount::MAX as f64)
        .map(|v| v as StrokeCount)
}

#[inline(always)]
fn component(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}
