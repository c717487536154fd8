//! The gridded field container
//!
//! A gridded field bundles an N-dimensional data array with one coordinate [`Grid`]
//! per axis, an optional name per grid and an optional name for the field itself.
//!
//! The operations in [`crate::extras`] are written against the [`GriddedFieldAccess`]
//! contract rather than the concrete [`GriddedField`] type, so other containers exposing
//! the same accessors get them too.
//!
//! ```rust
//! use gridfield_core::field::{GriddedField2, GriddedFieldAccess};
//! use gridfield_core::grid::Grid;
//! use ndarray::array;
//!
//! let mut field = GriddedField2::new();
//! field.set_grid(0, vec![0.0, 1.0, 2.0]).unwrap();
//! field.set_grid(1, vec![10.0, 20.0]).unwrap();
//! field.set_data(array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]].into_dyn()).unwrap();
//! assert!(field.checksize_strict().is_ok());
//!
//! field.set_grid(1, Grid::from_labels(["a", "b", "c"])).unwrap();
//! assert!(field.checksize_strict().is_err());
//! ```

use crate::errors::{GriddedFieldError, GriddedFieldResult};
use crate::grid::{FloatValue, Grid};
use ndarray::{ArrayD, IxDyn};
use serde::{Deserialize, Serialize};

/// Accessor contract of a gridded field
///
/// Implementors hold exactly [`dim`](Self::dim) grids and grid names. Shape consistency
/// between grids and data is not enforced by the setters; it is checked on demand by
/// [`checksize_strict`](Self::checksize_strict).
pub trait GriddedFieldAccess: Clone + Default + std::fmt::Debug {
    /// Dimensionality of the field
    fn dim(&self) -> usize;

    /// Grid of an axis
    fn grid(&self, axis: usize) -> GriddedFieldResult<&Grid>;

    /// Replace the grid of an axis
    fn set_grid(&mut self, axis: usize, grid: impl Into<Grid>) -> GriddedFieldResult<()>;

    /// Name of an axis grid, empty when unnamed
    fn grid_name(&self, axis: usize) -> GriddedFieldResult<&str>;

    fn set_grid_name(&mut self, axis: usize, name: impl Into<String>) -> GriddedFieldResult<()>;

    /// All grids in axis order
    fn grids(&self) -> &[Grid];

    /// All grid names in axis order
    fn gridnames(&self) -> &[String];

    fn data(&self) -> &ArrayD<FloatValue>;

    /// Replace the data
    ///
    /// Fails with [`GriddedFieldError::DimensionMismatch`] if the array does not have
    /// [`dim`](Self::dim) axes.
    fn set_data(&mut self, data: ArrayD<FloatValue>) -> GriddedFieldResult<()>;

    fn name(&self) -> Option<&str>;

    fn set_name(&mut self, name: Option<String>);

    /// Check that the data has one axis per grid and that every grid length
    /// matches the data extent along its axis
    fn checksize_strict(&self) -> GriddedFieldResult<()> {
        let data = self.data();
        if data.ndim() != self.dim() {
            return Err(GriddedFieldError::DimensionMismatch {
                expected: self.dim(),
                got: data.ndim(),
            });
        }
        if self.grids().len() != self.dim() {
            return Err(GriddedFieldError::DimensionMismatch {
                expected: self.dim(),
                got: self.grids().len(),
            });
        }
        for (axis, (grid, &data_len)) in self.grids().iter().zip(data.shape()).enumerate() {
            if grid.len() != data_len {
                return Err(GriddedFieldError::SizeMismatch {
                    axis,
                    grid_len: grid.len(),
                    data_len,
                });
            }
        }
        Ok(())
    }
}

/// Gridded field with `N` axes
///
/// Use the aliases [`GriddedField1`] to [`GriddedField6`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGriddedField")]
pub struct GriddedField<const N: usize> {
    name: Option<String>,
    grids: Vec<Grid>,
    gridnames: Vec<String>,
    data: ArrayD<FloatValue>,
}

/// Serialized form of a [`GriddedField`], checked on the way in
#[derive(Deserialize)]
struct RawGriddedField {
    name: Option<String>,
    grids: Vec<Grid>,
    gridnames: Vec<String>,
    data: ArrayD<FloatValue>,
}

impl<const N: usize> TryFrom<RawGriddedField> for GriddedField<N> {
    type Error = GriddedFieldError;

    /// Grid lengths may still disagree with the data, as they may for a field being
    /// assembled through the setters. Only the number of axes is enforced.
    fn try_from(raw: RawGriddedField) -> Result<Self, Self::Error> {
        for got in [raw.grids.len(), raw.gridnames.len(), raw.data.ndim()] {
            if got != N {
                return Err(GriddedFieldError::DimensionMismatch { expected: N, got });
            }
        }
        Ok(Self {
            name: raw.name,
            grids: raw.grids,
            gridnames: raw.gridnames,
            data: raw.data,
        })
    }
}

pub type GriddedField1 = GriddedField<1>;
pub type GriddedField2 = GriddedField<2>;
pub type GriddedField3 = GriddedField<3>;
pub type GriddedField4 = GriddedField<4>;
pub type GriddedField5 = GriddedField<5>;
pub type GriddedField6 = GriddedField<6>;

impl<const N: usize> Default for GriddedField<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> GriddedField<N> {
    /// Create an empty field: empty grids, unnamed axes and data of shape `[0; N]`
    pub fn new() -> Self {
        Self {
            name: None,
            grids: vec![Grid::default(); N],
            gridnames: vec![String::new(); N],
            data: ArrayD::zeros(IxDyn(&[0; N])),
        }
    }

    /// Create a field from its parts and validate it
    ///
    /// # Arguments
    ///
    /// * `name` - Optional name of the data
    /// * `grids` - One grid per axis
    /// * `gridnames` - One name per axis (empty strings for unnamed axes)
    /// * `data` - Array with `N` axes whose shape matches the grid lengths
    pub fn from_parts(
        name: Option<String>,
        grids: Vec<Grid>,
        gridnames: Vec<String>,
        data: ArrayD<FloatValue>,
    ) -> GriddedFieldResult<Self> {
        if gridnames.len() != N {
            return Err(GriddedFieldError::DimensionMismatch {
                expected: N,
                got: gridnames.len(),
            });
        }
        let field = Self {
            name,
            grids,
            gridnames,
            data,
        };
        field.checksize_strict()?;
        Ok(field)
    }

    /// Builder method setting the field name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn check_axis(&self, axis: usize) -> GriddedFieldResult<()> {
        if axis < N {
            Ok(())
        } else {
            Err(GriddedFieldError::AxisOutOfBounds { axis, dim: N })
        }
    }
}

impl<const N: usize> GriddedFieldAccess for GriddedField<N> {
    fn dim(&self) -> usize {
        N
    }

    fn grid(&self, axis: usize) -> GriddedFieldResult<&Grid> {
        self.check_axis(axis)?;
        Ok(&self.grids[axis])
    }

    fn set_grid(&mut self, axis: usize, grid: impl Into<Grid>) -> GriddedFieldResult<()> {
        self.check_axis(axis)?;
        self.grids[axis] = grid.into();
        Ok(())
    }

    fn grid_name(&self, axis: usize) -> GriddedFieldResult<&str> {
        self.check_axis(axis)?;
        Ok(&self.gridnames[axis])
    }

    fn set_grid_name(&mut self, axis: usize, name: impl Into<String>) -> GriddedFieldResult<()> {
        self.check_axis(axis)?;
        self.gridnames[axis] = name.into();
        Ok(())
    }

    fn grids(&self) -> &[Grid] {
        &self.grids
    }

    fn gridnames(&self) -> &[String] {
        &self.gridnames
    }

    fn data(&self) -> &ArrayD<FloatValue> {
        &self.data
    }

    fn set_data(&mut self, data: ArrayD<FloatValue>) -> GriddedFieldResult<()> {
        if data.ndim() != N {
            return Err(GriddedFieldError::DimensionMismatch {
                expected: N,
                got: data.ndim(),
            });
        }
        self.data = data;
        Ok(())
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn example() -> GriddedField2 {
        GriddedField2::from_parts(
            Some("Temperature".to_string()),
            vec![Grid::from(vec![0.0, 1.0, 2.0]), Grid::from(vec![10.0, 20.0])],
            vec!["x".to_string(), "y".to_string()],
            array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]].into_dyn(),
        )
        .unwrap()
    }

    #[test]
    fn new_field_is_empty_and_valid() {
        let field = GriddedField3::new();
        assert_eq!(field.dim(), 3);
        assert_eq!(field.data().shape(), &[0, 0, 0]);
        assert!(field.grids().iter().all(Grid::is_empty));
        assert!(field.gridnames().iter().all(String::is_empty));
        assert_eq!(field.name(), None);
        assert!(field.checksize_strict().is_ok());
    }

    #[test]
    fn accessors() {
        let mut field = example();
        assert_eq!(field.grid_name(0).unwrap(), "x");
        assert_eq!(field.grid(1).unwrap(), &Grid::from(vec![10.0, 20.0]));
        assert_eq!(field.name(), Some("Temperature"));

        field.set_grid_name(1, "y2").unwrap();
        assert_eq!(field.gridnames(), ["x".to_string(), "y2".to_string()]);

        field.set_name(None);
        assert_eq!(field.name(), None);
    }

    #[test]
    fn axis_out_of_bounds() {
        let mut field = example();
        assert_eq!(
            field.grid(2),
            Err(GriddedFieldError::AxisOutOfBounds { axis: 2, dim: 2 })
        );
        assert!(field.set_grid_name(5, "z").is_err());
        assert!(field.set_grid(2, vec![1.0]).is_err());
    }

    #[test]
    fn set_data_checks_rank() {
        let mut field = example();
        let result = field.set_data(array![1.0, 2.0, 3.0].into_dyn());
        assert_eq!(
            result,
            Err(GriddedFieldError::DimensionMismatch {
                expected: 2,
                got: 1
            })
        );
    }

    #[test]
    fn checksize_strict_reports_first_bad_axis() {
        let mut field = example();
        field.set_grid(1, vec![10.0, 20.0, 30.0]).unwrap();
        assert_eq!(
            field.checksize_strict(),
            Err(GriddedFieldError::SizeMismatch {
                axis: 1,
                grid_len: 3,
                data_len: 2
            })
        );
    }

    #[test]
    fn from_parts_validates() {
        let result = GriddedField1::from_parts(
            None,
            vec![Grid::from(vec![0.0, 1.0])],
            vec![String::new()],
            array![1.0, 2.0, 3.0].into_dyn(),
        );
        assert!(matches!(
            result,
            Err(GriddedFieldError::SizeMismatch { axis: 0, .. })
        ));

        let result = GriddedField1::from_parts(
            None,
            vec![Grid::from(vec![0.0])],
            vec![],
            array![1.0].into_dyn(),
        );
        assert!(matches!(
            result,
            Err(GriddedFieldError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn serde_roundtrip() {
        let field = example();
        let json = serde_json::to_string(&field).unwrap();
        let restored: GriddedField2 = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, field);
    }

    #[test]
    fn deserialize_rejects_missing_axes() {
        let mut json = serde_json::to_value(example()).unwrap();
        json["grids"].as_array_mut().unwrap().pop();
        let result = serde_json::from_value::<GriddedField2>(json);
        assert!(result.is_err());

        let mut json = serde_json::to_value(example()).unwrap();
        json["gridnames"] = serde_json::json!(["x"]);
        assert!(serde_json::from_value::<GriddedField2>(json).is_err());

        let json = serde_json::to_value(example()).unwrap();
        assert!(serde_json::from_value::<GriddedField3>(json).is_err());
    }

    #[test]
    fn deserialize_keeps_inconsistent_lengths() {
        let mut field = example();
        field.set_grid(0, vec![0.0]).unwrap();
        let json = serde_json::to_string(&field).unwrap();
        let restored: GriddedField2 = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, field);
        assert!(restored.checksize_strict().is_err());
    }
}
