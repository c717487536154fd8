use crate::extras::{from_labeled_array, GriddedFieldExt, DATA_NAME_ATTR};
use crate::field::{GriddedField, GriddedFieldAccess};
use crate::grid::FloatValue;
use crate::interpolate::InterpolationOptions;
use crate::labeled::LabeledArray;
use crate::mapping::MappingValue;
use crate::python::{field_repr, grid_from_py, grid_to_py, CallbackError};
use crate::rescale::Rescaling;
use crate::slice::AxisSlice;
use numpy::{PyArrayDyn, PyReadonlyArrayDyn, ToPyArray};
use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{IntoPyDict, PyDict, PyList};

/// Interpret the `type` argument of `refine_grid`: a mode name or a callable
///
/// Exceptions raised by a callable are recorded in the returned [`CallbackError`] and
/// must be re-raised by the caller once the rescaled grid has been used.
fn rescaling_from_py(
    value: Option<&Bound<'_, PyAny>>,
) -> PyResult<(Rescaling, CallbackError<PyErr>)> {
    let failure = CallbackError::default();
    let Some(value) = value else {
        return Ok((Rescaling::Linear, failure));
    };
    if let Ok(name) = value.extract::<String>() {
        return Ok((name.parse::<Rescaling>()?, failure));
    }
    if value.is_callable() {
        let callable = value.clone().unbind();
        let recorder = failure.clone();
        let rescaling = Rescaling::custom(move |x: FloatValue| {
            Python::with_gil(|py| {
                match callable
                    .call1(py, (x,))
                    .and_then(|result| result.extract::<FloatValue>(py))
                {
                    Ok(value) => value,
                    Err(err) => {
                        recorder.record(err);
                        FloatValue::NAN
                    }
                }
            })
        });
        return Ok((rescaling, failure));
    }
    Err(PyTypeError::new_err(
        "type must be 'linear', 'log10', 'log' or a callable",
    ))
}

fn options_from_py(value: Option<&Bound<'_, PyAny>>) -> PyResult<InterpolationOptions> {
    match value {
        Some(value) if !value.is_none() => pythonize::depythonize::<InterpolationOptions>(value)
            .map_err(|e| PyValueError::new_err(format!("Invalid hidden_kwargs: {}", e))),
        _ => Ok(InterpolationOptions::default()),
    }
}

fn slice_from_py(value: Option<&Bound<'_, PyAny>>) -> PyResult<AxisSlice> {
    match value {
        Some(value) if !value.is_none() => Ok(AxisSlice::new(
            value.getattr("start")?.extract()?,
            value.getattr("stop")?.extract()?,
            value.getattr("step")?.extract()?,
        )),
        _ => Ok(AxisSlice::full()),
    }
}

/// Build the `xarray.DataArray` matching a labeled array
fn labeled_to_xarray<'py>(py: Python<'py>, da: &LabeledArray) -> PyResult<Bound<'py, PyAny>> {
    let coords = PyDict::new_bound(py);
    for dim in da.dims() {
        if let Some(grid) = da.coord(dim) {
            coords.set_item(dim, grid_to_py(py, grid))?;
        }
    }
    let attrs = PyDict::new_bound(py);
    for (key, value) in da.attrs() {
        attrs.set_item(key, value)?;
    }

    let kwargs = PyDict::new_bound(py);
    kwargs.set_item("dims", PyList::new_bound(py, da.dims()))?;
    kwargs.set_item("coords", coords)?;
    kwargs.set_item("attrs", attrs)?;

    py.import_bound("xarray")?
        .getattr("DataArray")?
        .call((da.values().to_pyarray_bound(py),), Some(&kwargs))
}

/// Read an `xarray.DataArray` into a labeled array
fn labeled_from_xarray(da: &Bound<'_, PyAny>) -> PyResult<LabeledArray> {
    let py = da.py();
    let dims: Vec<String> = da.getattr("dims")?.extract()?;
    let values = py.import_bound("numpy")?.getattr("asarray")?.call(
        (da.getattr("values")?,),
        Some(&[("dtype", "float64")].into_py_dict_bound(py)),
    )?;
    let values: PyReadonlyArrayDyn<'_, f64> = values.extract()?;

    let mut labeled = LabeledArray::with_dims(values.as_array().to_owned(), dims.clone())?;
    let coords = da.getattr("coords")?;
    for dim in &dims {
        if coords.contains(dim)? {
            let coord = da.get_item(dim)?.getattr("values")?;
            labeled.assign_coord(dim, grid_from_py(&coord)?)?;
        }
    }
    let data_name = da
        .getattr("attrs")?
        .call_method1("get", (DATA_NAME_ATTR,))?;
    if !data_name.is_none() {
        labeled.set_attr(DATA_NAME_ATTR, data_name.str()?.extract::<String>()?);
    }
    Ok(labeled)
}

/// Define the Python class for a gridded field of fixed dimensionality
macro_rules! gridded_field_class {
    ($py_name:ident, $class_name:literal, $dim:literal) => {
        #[doc = concat!("Python wrapper for a ", stringify!($dim), "-D gridded field")]
        #[pyclass(name = $class_name, module = "gridfield.core")]
        #[derive(Debug, Clone, Default)]
        pub struct $py_name(pub GriddedField<$dim>);

        #[pymethods]
        impl $py_name {
            #[new]
            fn new() -> Self {
                Self::default()
            }

            /// Dimensionality of the field
            #[getter]
            fn dim(&self) -> usize {
                self.0.dim()
            }

            #[getter]
            fn name(&self) -> Option<String> {
                self.0.name().map(str::to_string)
            }

            #[setter]
            fn set_name(&mut self, name: Option<String>) {
                self.0.set_name(name);
            }

            /// Copy of the data as a numpy array
            #[getter]
            fn data<'py>(&self, py: Python<'py>) -> Bound<'py, PyArrayDyn<FloatValue>> {
                self.0.data().to_pyarray_bound(py)
            }

            #[setter]
            fn set_data(&mut self, data: PyReadonlyArrayDyn<'_, FloatValue>) -> PyResult<()> {
                Ok(self.0.set_data(data.as_array().to_owned())?)
            }

            /// Grids in axis order
            #[getter]
            fn grids(&self, py: Python<'_>) -> Vec<PyObject> {
                self.0.grids().iter().map(|g| grid_to_py(py, g)).collect()
            }

            #[getter]
            fn gridnames(&self) -> Vec<String> {
                self.0.gridnames().to_vec()
            }

            fn get_grid(&self, py: Python<'_>, axis: usize) -> PyResult<PyObject> {
                Ok(grid_to_py(py, self.0.grid(axis)?))
            }

            fn set_grid(&mut self, axis: usize, grid: &Bound<'_, PyAny>) -> PyResult<()> {
                Ok(self.0.set_grid(axis, grid_from_py(grid)?)?)
            }

            fn get_grid_name(&self, axis: usize) -> PyResult<String> {
                Ok(self.0.grid_name(axis)?.to_string())
            }

            fn set_grid_name(&mut self, axis: usize, name: String) -> PyResult<()> {
                Ok(self.0.set_grid_name(axis, name)?)
            }

            /// Raise if the grid lengths do not match the data shape
            fn checksize_strict(&self) -> PyResult<()> {
                Ok(self.0.checksize_strict()?)
            }

            /// Return a new gridded field containing a slice of the current one.
            ///
            /// Parameters
            /// ----------
            /// s : slice
            ///     Slice.
            /// axis : int
            ///     Axis to slice along.
            #[pyo3(signature = (s=None, axis=0))]
            fn extract_slice(&self, s: Option<&Bound<'_, PyAny>>, axis: usize) -> PyResult<Self> {
                Ok(Self(self.0.extract_slice(&slice_from_py(s)?, axis)?))
            }

            /// Interpolate an axis of the field to a new grid.
            ///
            /// Parameters
            /// ----------
            /// new_grid : sequence of float
            ///     The coordinates of the interpolated values.
            /// axis : int
            ///     Axis of the data along which to interpolate.
            /// type : str or callable
            ///     "linear", "log10", "log" or a rescaling function.
            /// hidden_kwargs : dict, optional
            ///     Interpolation options: ``kind``, ``out_of_bounds``, ``assume_sorted``.
            #[pyo3(signature = (new_grid, axis=0, r#type=None, hidden_kwargs=None))]
            fn refine_grid(
                &self,
                new_grid: Vec<FloatValue>,
                axis: usize,
                r#type: Option<&Bound<'_, PyAny>>,
                hidden_kwargs: Option<&Bound<'_, PyAny>>,
            ) -> PyResult<Self> {
                let (rescaling, failure) = rescaling_from_py(r#type)?;
                let options = options_from_py(hidden_kwargs)?;
                let refined = self.0.refine_grid(new_grid, axis, &rescaling, &options);
                if let Some(err) = failure.take() {
                    return Err(err);
                }
                Ok(Self(refined?))
            }

            /// Convert the gridded field to a dict.
            ///
            /// Grid names are used as keys, unnamed grids become ``grid1``, ``grid2``, ...
            /// The data is stored under ``data``. Values are copies.
            fn to_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
                let dict = PyDict::new_bound(py);
                for (key, value) in self.0.to_mapping()?.iter() {
                    match value {
                        MappingValue::Grid(grid) => dict.set_item(key, grid_to_py(py, grid))?,
                        MappingValue::Data(data) => dict.set_item(key, data.to_pyarray_bound(py))?,
                    }
                }
                Ok(dict)
            }

            /// Convert the gridded field to an ``xarray.DataArray``.
            fn to_xarray<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyAny>> {
                labeled_to_xarray(py, &self.0.to_labeled_array()?)
            }

            /// Create a gridded field from an ``xarray.DataArray``.
            ///
            /// Raises
            /// ------
            /// RuntimeError
            ///     If the number of dimensions does not match.
            #[staticmethod]
            fn from_xarray(da: &Bound<'_, PyAny>) -> PyResult<Self> {
                let labeled = labeled_from_xarray(da)?;
                Ok(Self(from_labeled_array(&labeled)?))
            }

            fn __repr__(&self) -> String {
                field_repr($class_name, &self.0)
            }
        }
    };
}

gridded_field_class!(PyGriddedField1, "GriddedField1", 1);
gridded_field_class!(PyGriddedField2, "GriddedField2", 2);
gridded_field_class!(PyGriddedField3, "GriddedField3", 3);
gridded_field_class!(PyGriddedField4, "GriddedField4", 4);
gridded_field_class!(PyGriddedField5, "GriddedField5", 5);
gridded_field_class!(PyGriddedField6, "GriddedField6", 6);
