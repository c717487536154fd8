//! Plain name-to-value view of a gridded field
//!
//! [`FieldMapping`] lists the grids of a field under their names followed by the
//! data under the reserved key [`DATA_KEY`]. It borrows from the field instead of
//! copying, so it is cheap to build and cannot outlive the field it describes.

use crate::errors::{GriddedFieldError, GriddedFieldResult};
use crate::grid::{FloatValue, Grid};
use ndarray::ArrayD;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Key under which the data array is stored
pub const DATA_KEY: &str = "data";

/// Name given to an unnamed grid at `axis` (`grid1`, `grid2`, ...)
pub fn default_grid_name(axis: usize) -> String {
    format!("grid{}", axis + 1)
}

/// Value stored under a mapping key
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MappingValue<'a> {
    Grid(&'a Grid),
    Data(&'a ArrayD<FloatValue>),
}

/// Ordered mapping from names to the grids and data of a field
///
/// The grids come first in axis order, the data last under [`DATA_KEY`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping<'a> {
    names: Vec<String>,
    grids: Vec<&'a Grid>,
    data: &'a ArrayD<FloatValue>,
}

impl<'a> FieldMapping<'a> {
    /// Build the mapping from grids, their names and the data
    ///
    /// Names that are missing or empty are replaced by [`default_grid_name`].
    /// Fails with [`GriddedFieldError::DuplicateKey`] if two entries would share a key.
    pub fn build(
        grids: &'a [Grid],
        gridnames: &[String],
        data: &'a ArrayD<FloatValue>,
    ) -> GriddedFieldResult<Self> {
        let mut names: Vec<String> = Vec::with_capacity(grids.len());
        for axis in 0..grids.len() {
            let name = match gridnames.get(axis) {
                Some(name) if !name.is_empty() => name.clone(),
                _ => default_grid_name(axis),
            };
            if name == DATA_KEY || names.contains(&name) {
                return Err(GriddedFieldError::DuplicateKey(name));
            }
            names.push(name);
        }
        Ok(Self {
            names,
            grids: grids.iter().collect(),
            data,
        })
    }

    /// Number of entries, one per grid plus the data
    pub fn len(&self) -> usize {
        self.grids.len() + 1
    }

    pub fn get(&self, key: &str) -> Option<MappingValue<'a>> {
        if key == DATA_KEY {
            return Some(MappingValue::Data(self.data));
        }
        self.grid(key).map(MappingValue::Grid)
    }

    /// Grid stored under `key`
    pub fn grid(&self, key: &str) -> Option<&'a Grid> {
        let axis = self.names.iter().position(|name| name == key)?;
        Some(self.grids[axis])
    }

    /// The data array
    pub fn data(&self) -> &'a ArrayD<FloatValue> {
        self.data
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.names
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(DATA_KEY))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, MappingValue<'a>)> + '_ {
        self.names
            .iter()
            .zip(&self.grids)
            .map(|(name, grid)| (name.as_str(), MappingValue::Grid(*grid)))
            .chain(std::iter::once((DATA_KEY, MappingValue::Data(self.data))))
    }
}

impl Serialize for FieldMapping<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}
