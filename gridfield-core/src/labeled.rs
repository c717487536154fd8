//! Labeled arrays
//!
//! A [`LabeledArray`] is an N-dimensional array whose axes carry unique labels,
//! optionally a coordinate [`Grid`] per labeled axis, and a map of free-form string
//! attributes. It mirrors the shape of an xarray `DataArray` so gridded fields can be
//! exchanged with tools built around that model.
//!
//! ```rust
//! use gridfield_core::grid::Grid;
//! use gridfield_core::labeled::LabeledArray;
//! use ndarray::array;
//!
//! let mut da = LabeledArray::new(array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]].into_dyn());
//! assert_eq!(da.dims(), ["dim_0".to_string(), "dim_1".to_string()]);
//!
//! da.assign_coord("dim_0", Grid::from(vec![0.0, 1.0, 2.0])).unwrap();
//! // Dimensions without coordinates fall back to their positional index
//! assert_eq!(da.coord_values("dim_1").unwrap(), Grid::index(2));
//! ```

use crate::errors::{GriddedFieldError, GriddedFieldResult};
use crate::grid::{FloatValue, Grid};
use ndarray::{ArrayD, Axis};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Array with labeled axes, coordinates and attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledArray {
    values: ArrayD<FloatValue>,
    dims: Vec<String>,
    coords: BTreeMap<String, Grid>,
    attrs: BTreeMap<String, String>,
}

/// Label given to an axis that has not been named
pub fn default_dim_name(axis: usize) -> String {
    format!("dim_{}", axis)
}

impl LabeledArray {
    /// Wrap an array, labelling its axes `dim_0`, `dim_1`, ...
    pub fn new(values: ArrayD<FloatValue>) -> Self {
        let dims = (0..values.ndim()).map(default_dim_name).collect();
        Self {
            values,
            dims,
            coords: BTreeMap::new(),
            attrs: BTreeMap::new(),
        }
    }

    /// Wrap an array with explicit axis labels
    ///
    /// Fails if the number of labels differs from the array rank or a label repeats.
    pub fn with_dims<S: Into<String>>(
        values: ArrayD<FloatValue>,
        dims: impl IntoIterator<Item = S>,
    ) -> GriddedFieldResult<Self> {
        let dims: Vec<String> = dims.into_iter().map(Into::into).collect();
        if dims.len() != values.ndim() {
            return Err(GriddedFieldError::DimensionMismatch {
                expected: values.ndim(),
                got: dims.len(),
            });
        }
        let mut seen = HashSet::new();
        for dim in &dims {
            if !seen.insert(dim.as_str()) {
                return Err(GriddedFieldError::DuplicateDimension(dim.clone()));
            }
        }
        Ok(Self {
            values,
            dims,
            coords: BTreeMap::new(),
            attrs: BTreeMap::new(),
        })
    }

    pub fn values(&self) -> &ArrayD<FloatValue> {
        &self.values
    }

    pub fn into_values(self) -> ArrayD<FloatValue> {
        self.values
    }

    /// Axis labels in axis order
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn ndim(&self) -> usize {
        self.values.ndim()
    }

    /// Axis index of a label
    pub fn axis_of(&self, dim: &str) -> GriddedFieldResult<usize> {
        self.dims
            .iter()
            .position(|d| d == dim)
            .ok_or_else(|| GriddedFieldError::UnknownDimension(dim.to_string()))
    }

    /// Extent of the array along a labeled axis
    pub fn size_of(&self, dim: &str) -> GriddedFieldResult<usize> {
        Ok(self.values.len_of(Axis(self.axis_of(dim)?)))
    }

    /// Rename a single axis
    pub fn rename_dim(&mut self, old: &str, new: impl Into<String>) -> GriddedFieldResult<()> {
        let new = new.into();
        let axis = self.axis_of(old)?;
        if old == new {
            return Ok(());
        }
        if self.dims.contains(&new) {
            return Err(GriddedFieldError::DuplicateDimension(new));
        }
        if let Some(coord) = self.coords.remove(old) {
            self.coords.insert(new.clone(), coord);
        }
        self.dims[axis] = new;
        Ok(())
    }

    /// Attach a coordinate grid to a labeled axis, replacing any existing one
    ///
    /// The grid length must equal the extent of the axis.
    pub fn assign_coord(&mut self, dim: &str, grid: impl Into<Grid>) -> GriddedFieldResult<()> {
        let grid = grid.into();
        let expected = self.size_of(dim)?;
        if grid.len() != expected {
            return Err(GriddedFieldError::CoordinateSizeMismatch {
                dim: dim.to_string(),
                expected,
                got: grid.len(),
            });
        }
        self.coords.insert(dim.to_string(), grid);
        Ok(())
    }

    /// Assigned coordinate of an axis, if any
    pub fn coord(&self, dim: &str) -> Option<&Grid> {
        self.coords.get(dim)
    }

    /// Coordinate values of an axis
    ///
    /// Axes without an assigned coordinate yield their positional index `0..n`.
    pub fn coord_values(&self, dim: &str) -> GriddedFieldResult<Grid> {
        match self.coords.get(dim) {
            Some(grid) => Ok(grid.clone()),
            None => Ok(Grid::index(self.size_of(dim)?)),
        }
    }

    pub fn attrs(&self) -> &BTreeMap<String, String> {
        &self.attrs
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(key.into(), value.into());
    }
}
