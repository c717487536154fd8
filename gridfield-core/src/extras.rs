//! Convenience operations on gridded fields
//!
//! [`GriddedFieldExt`] adds slicing, regridding and conversions to every type
//! implementing [`GriddedFieldAccess`]. The conversion back from a labeled array is the
//! free function [`from_labeled_array`], generic over the field type to build.
//!
//! ```rust
//! use gridfield_core::extras::GriddedFieldExt;
//! use gridfield_core::field::{GriddedField2, GriddedFieldAccess};
//! use gridfield_core::grid::Grid;
//! use gridfield_core::interpolate::InterpolationOptions;
//! use gridfield_core::rescale::Rescaling;
//! use gridfield_core::slice::AxisSlice;
//! use ndarray::array;
//!
//! let field = GriddedField2::from_parts(
//!     None,
//!     vec![Grid::from(vec![0.0, 1.0, 2.0]), Grid::from(vec![10.0, 20.0])],
//!     vec!["x".to_string(), "y".to_string()],
//!     array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]].into_dyn(),
//! )
//! .unwrap();
//!
//! let sliced = field.extract_slice(&AxisSlice::range(0, 2), 0).unwrap();
//! assert_eq!(sliced.data(), &array![[1.0, 2.0], [3.0, 4.0]].into_dyn());
//!
//! let refined = field
//!     .refine_grid(
//!         vec![0.0, 0.5, 1.0, 1.5, 2.0],
//!         0,
//!         &Rescaling::Linear,
//!         &InterpolationOptions::default(),
//!     )
//!     .unwrap();
//! assert_eq!(refined.data().shape(), &[5, 2]);
//! ```

use crate::errors::{GriddedFieldError, GriddedFieldResult};
use crate::field::GriddedFieldAccess;
use crate::grid::{FloatValue, Grid};
use crate::interpolate::{interp1d_along_axis, InterpolationOptions};
use crate::labeled::{default_dim_name, LabeledArray};
use crate::mapping::FieldMapping;
use crate::rescale::Rescaling;
use crate::slice::AxisSlice;
use log::{debug, warn};
use ndarray::{Array1, ArrayD, Axis};

/// Attribute under which the field name is stored on a labeled array
pub const DATA_NAME_ATTR: &str = "data_name";

/// Field name used when a labeled array carries no [`DATA_NAME_ATTR`]
pub const DEFAULT_DATA_NAME: &str = "Data";

/// Take the given positions of `data` along `axis`
fn select_along(data: &ArrayD<FloatValue>, axis: usize, indices: &[usize]) -> ArrayD<FloatValue> {
    if indices.is_empty() {
        let mut shape = data.shape().to_vec();
        shape[axis] = 0;
        return ArrayD::zeros(shape);
    }
    data.select(Axis(axis), indices)
}

/// Operations available on every gridded field
pub trait GriddedFieldExt: GriddedFieldAccess {
    /// Return a new field holding a slice of this one along `axis`
    ///
    /// The field must pass [`checksize_strict`](GriddedFieldAccess::checksize_strict).
    /// The axis grid is sliced with the same variant it had and the data is sliced along
    /// the same axis, all other axes unchanged. Out-of-range bounds are clamped.
    fn extract_slice(&self, slice: &AxisSlice, axis: usize) -> GriddedFieldResult<Self> {
        self.checksize_strict()?;

        let mut field = self.clone();
        let grid = field.grid(axis)?;
        let indices = slice.indices(grid.len())?;
        let sliced_grid = grid.select(&indices);
        field.set_grid(axis, sliced_grid)?;
        let data = select_along(field.data(), axis, &indices);
        field.set_data(data)?;

        debug!(
            "extract_slice: axis {} kept {} points, data shape {:?}",
            axis,
            indices.len(),
            field.data().shape()
        );
        Ok(field)
    }

    /// Interpolate the field along `axis` onto `new_grid`
    ///
    /// Both the current axis coordinates and `new_grid` are transformed with `rescaling`
    /// before interpolating. An axis holding a single point is broadcast to the length
    /// of `new_grid` instead, since there is nothing to interpolate between.
    ///
    /// # Errors
    ///
    /// * [`GriddedFieldError::AxisOutOfBounds`] - `axis` is not an axis of the field
    /// * [`GriddedFieldError::NonNumericGrid`] - the axis holds labels
    /// * [`GriddedFieldError::InsufficientPoints`] - the axis grid is empty
    /// * [`GriddedFieldError::ShapeMismatch`] - a one-point grid over data of another length
    /// * any interpolation error, see [`interp1d_along_axis`]
    /// * any [`checksize_strict`](GriddedFieldAccess::checksize_strict) error on the result
    fn refine_grid(
        &self,
        new_grid: impl Into<Array1<FloatValue>>,
        axis: usize,
        rescaling: &Rescaling,
        options: &InterpolationOptions,
    ) -> GriddedFieldResult<Self> {
        let new_grid = new_grid.into();
        let mut field = self.clone();
        let old_grid = field
            .grid(axis)?
            .as_vector()
            .ok_or(GriddedFieldError::NonNumericGrid { axis })?
            .clone();

        match old_grid.len() {
            0 => {
                return Err(GriddedFieldError::InsufficientPoints {
                    required: 1,
                    got: 0,
                })
            }
            1 => {
                let data_len = field.data().len_of(Axis(axis));
                if data_len != 1 {
                    return Err(GriddedFieldError::ShapeMismatch {
                        coords: 1,
                        data: data_len,
                    });
                }
                warn!(
                    "refine_grid: axis {} has a single point, broadcasting data to {} points",
                    axis,
                    new_grid.len()
                );
                let data = select_along(field.data(), axis, &vec![0; new_grid.len()]);
                field.set_data(data)?;
            }
            _ => {
                let data = interp1d_along_axis(
                    &rescaling.apply_all(&old_grid),
                    field.data(),
                    axis,
                    &rescaling.apply_all(&new_grid),
                    options,
                )?;
                field.set_data(data)?;
            }
        }
        field.set_grid(axis, Grid::Vector(new_grid))?;

        field.checksize_strict()?;
        debug!(
            "refine_grid: axis {} regridded with {:?}, data shape {:?}",
            axis,
            rescaling,
            field.data().shape()
        );
        Ok(field)
    }

    /// Convert the field into a [`LabeledArray`]
    ///
    /// Named axes are labeled with their grid name, unnamed axes keep `dim_i`. Grids with
    /// at least one point become coordinates, and a non-empty field name is stored under
    /// [`DATA_NAME_ATTR`].
    fn to_labeled_array(&self) -> GriddedFieldResult<LabeledArray> {
        let dims = (0..self.dim())
            .map(|axis| -> GriddedFieldResult<String> {
                let name = self.grid_name(axis)?;
                Ok(if name.is_empty() {
                    default_dim_name(axis)
                } else {
                    name.to_string()
                })
            })
            .collect::<GriddedFieldResult<Vec<_>>>()?;

        let mut da = LabeledArray::with_dims(self.data().clone(), dims.clone())?;
        for (axis, dim) in dims.iter().enumerate() {
            let grid = self.grid(axis)?;
            if !grid.is_empty() {
                da.assign_coord(dim, grid.clone())?;
            }
        }
        if let Some(name) = self.name().filter(|n| !n.is_empty()) {
            da.set_attr(DATA_NAME_ATTR, name);
        }
        Ok(da)
    }

    /// Borrow the field as a name-to-value mapping
    ///
    /// See [`FieldMapping::build`] for the naming rules.
    fn to_mapping(&self) -> GriddedFieldResult<FieldMapping<'_>> {
        FieldMapping::build(self.grids(), self.gridnames(), self.data())
    }
}

impl<T: GriddedFieldAccess> GriddedFieldExt for T {}

/// Build a gridded field of type `F` from a [`LabeledArray`]
///
/// Axis `i` gets the coordinate values and label of the array's `i`-th dimension
/// (the positional index when it has no coordinate). The field name is taken from
/// [`DATA_NAME_ATTR`] and defaults to [`DEFAULT_DATA_NAME`].
///
/// Fails with [`GriddedFieldError::DimensionMismatch`] if the array rank is not the
/// dimensionality of `F`, and with any
/// [`checksize_strict`](GriddedFieldAccess::checksize_strict) error of the result.
pub fn from_labeled_array<F: GriddedFieldAccess>(da: &LabeledArray) -> GriddedFieldResult<F> {
    let mut field = F::default();
    if da.ndim() != field.dim() {
        return Err(GriddedFieldError::DimensionMismatch {
            expected: field.dim(),
            got: da.ndim(),
        });
    }
    for (axis, dim) in da.dims().iter().enumerate() {
        field.set_grid(axis, da.coord_values(dim)?)?;
        field.set_grid_name(axis, dim.as_str())?;
    }
    field.set_data(da.values().clone())?;
    field.set_name(Some(
        da.attr(DATA_NAME_ATTR)
            .unwrap_or(DEFAULT_DATA_NAME)
            .to_string(),
    ));
    field.checksize_strict()?;

    debug!(
        "from_labeled_array: built {}-D field with dims {:?}",
        field.dim(),
        da.dims()
    );
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{GriddedField1, GriddedField2, GriddedField3};
    use crate::interpolate::OutOfBounds;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn first_value<F: GriddedFieldAccess>(field: &F) -> f64 {
        field.data().iter().copied().next().unwrap()
    }

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
    fn extract_slice_first_axis() {
        let sliced = example().extract_slice(&AxisSlice::range(0, 2), 0).unwrap();
        assert_eq!(sliced.grid(0).unwrap(), &Grid::from(vec![0.0, 1.0]));
        assert_eq!(sliced.grid(1).unwrap(), &Grid::from(vec![10.0, 20.0]));
        assert_eq!(sliced.data(), &array![[1.0, 2.0], [3.0, 4.0]].into_dyn());
        assert_eq!(sliced.name(), Some("Temperature"));
        assert_eq!(sliced.gridnames(), example().gridnames());
    }

    #[test]
    fn extract_slice_second_axis_reversed() {
        let sliced = example()
            .extract_slice(&AxisSlice::full().with_step(-1), 1)
            .unwrap();
        assert_eq!(sliced.grid(1).unwrap(), &Grid::from(vec![20.0, 10.0]));
        assert_eq!(
            sliced.data(),
            &array![[2.0, 1.0], [4.0, 3.0], [6.0, 5.0]].into_dyn()
        );
    }

    #[test]
    fn extract_full_slice_is_identity() {
        let field = example();
        for axis in 0..field.dim() {
            assert_eq!(field.extract_slice(&AxisSlice::full(), axis).unwrap(), field);
        }
    }

    #[test]
    fn extract_slice_label_grid() {
        let field = GriddedField1::from_parts(
            None,
            vec![Grid::from_labels(["H2O", "O3", "CO2"])],
            vec!["species".to_string()],
            array![1.0, 2.0, 3.0].into_dyn(),
        )
        .unwrap();
        let sliced = field.extract_slice(&AxisSlice::from(1..), 0).unwrap();
        assert_eq!(sliced.grid(0).unwrap(), &Grid::from_labels(["O3", "CO2"]));
        assert_eq!(sliced.data(), &array![2.0, 3.0].into_dyn());
    }

    #[test]
    fn extract_slice_out_of_range_is_empty() {
        let sliced = example().extract_slice(&AxisSlice::range(5, 9), 0).unwrap();
        assert!(sliced.grid(0).unwrap().is_empty());
        assert_eq!(sliced.data().shape(), &[0, 2]);
    }

    #[test]
    fn extract_slice_requires_valid_field() {
        let mut field = example();
        field.set_grid(0, vec![0.0]).unwrap();
        assert!(matches!(
            field.extract_slice(&AxisSlice::full(), 0),
            Err(GriddedFieldError::SizeMismatch { axis: 0, .. })
        ));
        assert!(matches!(
            example().extract_slice(&AxisSlice::full(), 2),
            Err(GriddedFieldError::AxisOutOfBounds { axis: 2, dim: 2 })
        ));
    }

    #[test]
    fn refine_grid_linear_rows() {
        let refined = example()
            .refine_grid(
                vec![0.0, 0.5, 1.0, 1.5, 2.0],
                0,
                &Rescaling::Linear,
                &InterpolationOptions::default(),
            )
            .unwrap();
        assert_eq!(
            refined.grid(0).unwrap(),
            &Grid::from(vec![0.0, 0.5, 1.0, 1.5, 2.0])
        );
        assert_eq!(
            refined.data(),
            &array![[1.0, 2.0], [2.0, 3.0], [3.0, 4.0], [4.0, 5.0], [5.0, 6.0]].into_dyn()
        );
        assert_eq!(refined.gridnames(), example().gridnames());
    }

    #[test]
    fn refine_grid_second_axis() {
        let refined = example()
            .refine_grid(
                vec![15.0],
                1,
                &Rescaling::Linear,
                &InterpolationOptions::default(),
            )
            .unwrap();
        assert_eq!(refined.data(), &array![[1.5], [3.5], [5.5]].into_dyn());
    }

    #[test]
    fn refine_grid_round_trip() {
        let field = example();
        let options = InterpolationOptions::default();
        let there = field
            .refine_grid(vec![0.0, 0.25, 0.7, 1.0, 1.9, 2.0], 0, &Rescaling::Linear, &options)
            .unwrap();
        let back = there
            .refine_grid(vec![0.0, 1.0, 2.0], 0, &Rescaling::Linear, &options)
            .unwrap();
        assert_eq!(back.grid(0).unwrap(), field.grid(0).unwrap());
        for (a, b) in back.data().iter().zip(field.data().iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn refine_grid_log_rescaling() {
        let field = GriddedField1::from_parts(
            None,
            vec![Grid::from(vec![1.0, 100.0])],
            vec!["pressure".to_string()],
            array![0.0, 2.0].into_dyn(),
        )
        .unwrap();
        let options = InterpolationOptions::default();

        let refined = field
            .refine_grid(vec![10.0], 0, &Rescaling::Log10, &options)
            .unwrap();
        assert_abs_diff_eq!(first_value(&refined), 1.0, epsilon = 1e-12);

        let refined = field
            .refine_grid(vec![10.0], 0, &Rescaling::Log, &options)
            .unwrap();
        assert_abs_diff_eq!(first_value(&refined), 1.0, epsilon = 1e-12);

        let refined = field
            .refine_grid(vec![50.5], 0, &Rescaling::Linear, &options)
            .unwrap();
        assert_abs_diff_eq!(first_value(&refined), 1.0, epsilon = 1e-12);

        let refined = field
            .refine_grid(vec![10.0], 0, &Rescaling::custom(|p: f64| p.sqrt()), &options)
            .unwrap();
        // sqrt: 1 -> 1, 100 -> 10, 10 -> 3.1623
        assert_abs_diff_eq!(
            first_value(&refined),
            2.0 * (10f64.sqrt() - 1.0) / 9.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn refine_grid_log_of_zero_errors() {
        let field = GriddedField1::from_parts(
            None,
            vec![Grid::from(vec![0.0, 1.0])],
            vec![String::new()],
            array![0.0, 1.0].into_dyn(),
        )
        .unwrap();
        let result = field.refine_grid(
            vec![0.5],
            0,
            &Rescaling::Log,
            &InterpolationOptions::default(),
        );
        assert!(matches!(
            result,
            Err(GriddedFieldError::NonFiniteCoordinate { index: 0, .. })
        ));
    }

    #[test]
    fn refine_grid_out_of_range() {
        let field = example();
        let result = field.refine_grid(
            vec![3.0],
            0,
            &Rescaling::Linear,
            &InterpolationOptions::default(),
        );
        assert!(matches!(
            result,
            Err(GriddedFieldError::ExtrapolationNotAllowed { .. })
        ));

        let options = InterpolationOptions::default().with_out_of_bounds(OutOfBounds::fill(0.0));
        let refined = field
            .refine_grid(vec![3.0], 0, &Rescaling::Linear, &options)
            .unwrap();
        assert_eq!(refined.data(), &array![[0.0, 0.0]].into_dyn());
    }

    #[test]
    fn refine_grid_single_point_broadcasts() {
        let field = GriddedField2::from_parts(
            None,
            vec![Grid::from(vec![5.0]), Grid::from(vec![1.0, 2.0])],
            vec!["z".to_string(), "w".to_string()],
            array![[7.0, 8.0]].into_dyn(),
        )
        .unwrap();
        let refined = field
            .refine_grid(
                vec![0.0, 1.0, 2.0],
                0,
                &Rescaling::Linear,
                &InterpolationOptions::default(),
            )
            .unwrap();
        assert_eq!(refined.grid(0).unwrap(), &Grid::from(vec![0.0, 1.0, 2.0]));
        assert_eq!(
            refined.data(),
            &array![[7.0, 8.0], [7.0, 8.0], [7.0, 8.0]].into_dyn()
        );
    }

    #[test]
    fn refine_grid_single_point_grid_over_empty_data() {
        let mut field = GriddedField1::new();
        field.set_grid(0, vec![5.0]).unwrap();
        assert_eq!(
            field.refine_grid(
                vec![0.0, 1.0],
                0,
                &Rescaling::Linear,
                &InterpolationOptions::default()
            ),
            Err(GriddedFieldError::ShapeMismatch { coords: 1, data: 0 })
        );
    }

    #[test]
    fn refine_grid_rejects_empty_and_label_axes() {
        let empty = GriddedField1::new();
        assert_eq!(
            empty.refine_grid(
                vec![1.0],
                0,
                &Rescaling::Linear,
                &InterpolationOptions::default()
            ),
            Err(GriddedFieldError::InsufficientPoints {
                required: 1,
                got: 0
            })
        );

        let labels = GriddedField1::from_parts(
            None,
            vec![Grid::from_labels(["a", "b"])],
            vec![String::new()],
            array![1.0, 2.0].into_dyn(),
        )
        .unwrap();
        assert_eq!(
            labels.refine_grid(
                vec![1.0],
                0,
                &Rescaling::Linear,
                &InterpolationOptions::default()
            ),
            Err(GriddedFieldError::NonNumericGrid { axis: 0 })
        );
    }

    #[test]
    fn to_labeled_array_named_field() {
        let da = example().to_labeled_array().unwrap();
        assert_eq!(da.dims(), ["x".to_string(), "y".to_string()]);
        assert_eq!(da.coord("x"), Some(&Grid::from(vec![0.0, 1.0, 2.0])));
        assert_eq!(da.coord("y"), Some(&Grid::from(vec![10.0, 20.0])));
        assert_eq!(da.attr(DATA_NAME_ATTR), Some("Temperature"));
        assert_eq!(da.values(), example().data());
    }

    #[test]
    fn to_labeled_array_unnamed_and_empty_axes() {
        let field = GriddedField2::from_parts(
            Some(String::new()),
            vec![Grid::from(vec![1.0, 2.0]), Grid::default()],
            vec![String::new(), "empty".to_string()],
            ArrayD::zeros(vec![2, 0]),
        )
        .unwrap();
        let da = field.to_labeled_array().unwrap();
        assert_eq!(da.dims(), ["dim_0".to_string(), "empty".to_string()]);
        assert_eq!(da.coord("dim_0"), Some(&Grid::from(vec![1.0, 2.0])));
        assert!(da.coord("empty").is_none());
        assert!(da.attrs().is_empty());
    }

    #[test]
    fn to_labeled_array_duplicate_names() {
        let mut field = example();
        field.set_grid_name(1, "x").unwrap();
        assert_eq!(
            field.to_labeled_array(),
            Err(GriddedFieldError::DuplicateDimension("x".to_string()))
        );
    }

    #[test]
    fn labeled_array_round_trip() {
        let field = example();
        let restored: GriddedField2 = from_labeled_array(&field.to_labeled_array().unwrap()).unwrap();
        assert_eq!(restored, field);
    }

    #[test]
    fn from_labeled_array_defaults() {
        let da = LabeledArray::new(array![[1.0, 2.0, 3.0]].into_dyn());
        let field: GriddedField2 = from_labeled_array(&da).unwrap();
        assert_eq!(field.name(), Some(DEFAULT_DATA_NAME));
        assert_eq!(field.grid_name(0).unwrap(), "dim_0");
        assert_eq!(field.grid(1).unwrap(), &Grid::index(3));
        assert!(field.checksize_strict().is_ok());
    }

    #[test]
    fn from_labeled_array_dimension_mismatch() {
        let da = example().to_labeled_array().unwrap();
        let result: GriddedFieldResult<GriddedField3> = from_labeled_array(&da);
        assert_eq!(
            result,
            Err(GriddedFieldError::DimensionMismatch {
                expected: 3,
                got: 2
            })
        );
    }

    #[test]
    fn to_mapping_counts_and_names() {
        let mut field = example();
        field.set_grid_name(0, "").unwrap();
        let mapping = field.to_mapping().unwrap();
        assert_eq!(mapping.len(), field.dim() + 1);
        assert_eq!(mapping.keys().collect::<Vec<_>>(), vec!["grid1", "y", "data"]);
        assert!(std::ptr::eq(mapping.data(), field.data()));
    }
}
