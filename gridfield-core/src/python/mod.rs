//! Python bindings for gridded fields
//!
//! Exposes `GriddedField1` to `GriddedField6` with the slicing, regridding and
//! conversion operations. Grids cross the boundary as numpy arrays (numeric grids)
//! or lists of strings (label grids). Labeled arrays are converted to and from
//! `xarray.DataArray`, which is imported lazily so xarray is only needed when used.

use crate::errors::GriddedFieldError;
use crate::field::GriddedFieldAccess;
use crate::grid::Grid;
use numpy::{PyReadonlyArray1, ToPyArray};
use pyo3::exceptions::{PyRuntimeError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyList;
use std::sync::{Arc, Mutex};

mod field;

pub use field::{
    PyGriddedField1, PyGriddedField2, PyGriddedField3, PyGriddedField4, PyGriddedField5,
    PyGriddedField6,
};

impl From<GriddedFieldError> for PyErr {
    fn from(err: GriddedFieldError) -> PyErr {
        match &err {
            GriddedFieldError::DimensionMismatch { .. } => PyRuntimeError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// First error raised by a callback invoked from inside Rust code
///
/// Callbacks such as a custom rescaling cannot return an error through the Rust API,
/// so they record it here and the caller re-raises it afterwards. Clones share the slot.
pub(crate) struct CallbackError<E>(Arc<Mutex<Option<E>>>);

impl<E> Default for CallbackError<E> {
    fn default() -> Self {
        Self(Arc::new(Mutex::new(None)))
    }
}

impl<E> Clone for CallbackError<E> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<E> CallbackError<E> {
    /// Keep `err` unless an earlier error is already recorded
    pub(crate) fn record(&self, err: E) {
        if let Ok(mut slot) = self.0.lock() {
            slot.get_or_insert(err);
        }
    }

    pub(crate) fn take(&self) -> Option<E> {
        self.0.lock().ok().and_then(|mut slot| slot.take())
    }
}

/// `repr()` of a wrapped field
pub(crate) fn field_repr<F: GriddedFieldAccess>(class_name: &str, field: &F) -> String {
    format!(
        "{}(name={:?}, gridnames={:?}, shape={:?})",
        class_name,
        field.name(),
        field.gridnames(),
        field.data().shape()
    )
}

/// Numeric grids become numpy arrays, label grids lists of str
pub(crate) fn grid_to_py(py: Python<'_>, grid: &Grid) -> PyObject {
    match grid {
        Grid::Vector(values) => values.to_pyarray_bound(py).into_any().unbind(),
        Grid::Labels(labels) => PyList::new_bound(py, labels).into_any().unbind(),
    }
}

/// Accepts float numpy arrays, sequences of numbers and sequences of str
pub(crate) fn grid_from_py(obj: &Bound<'_, PyAny>) -> PyResult<Grid> {
    if let Ok(values) = obj.extract::<PyReadonlyArray1<'_, f64>>() {
        return Ok(Grid::Vector(values.as_array().to_owned()));
    }
    if let Ok(values) = obj.extract::<Vec<f64>>() {
        return Ok(Grid::from(values));
    }
    if let Ok(labels) = obj.extract::<Vec<String>>() {
        return Ok(Grid::Labels(labels));
    }
    Err(PyTypeError::new_err(
        "A grid must be a sequence of numbers or a sequence of strings",
    ))
}

/// Register the gridded field classes with the Python module.
#[pymodule]
pub fn core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyGriddedField1>()?;
    m.add_class::<PyGriddedField2>()?;
    m.add_class::<PyGriddedField3>()?;
    m.add_class::<PyGriddedField4>()?;
    m.add_class::<PyGriddedField5>()?;
    m.add_class::<PyGriddedField6>()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::GriddedField2;
    use ndarray::array;

    #[test]
    fn callback_error_keeps_first_error() {
        let failure = CallbackError::default();
        assert_eq!(failure.take(), None::<String>);

        let recorder = failure.clone();
        recorder.record("first".to_string());
        recorder.record("second".to_string());
        assert_eq!(failure.take(), Some("first".to_string()));
        assert_eq!(failure.take(), None);
    }

    #[test]
    fn callback_error_from_rescaling_closure() {
        let failure = CallbackError::default();
        let recorder = failure.clone();
        let rescaling = crate::rescale::Rescaling::custom(move |x| {
            if x < 0.0 {
                recorder.record(format!("negative coordinate {}", x));
                f64::NAN
            } else {
                x.sqrt()
            }
        });

        assert_eq!(rescaling.apply(4.0), 2.0);
        assert!(failure.take().is_none());
        assert!(rescaling.apply(-1.0).is_nan());
        assert_eq!(failure.take(), Some("negative coordinate -1".to_string()));
    }

    #[test]
    fn repr_lists_name_gridnames_and_shape() {
        let field = GriddedField2::from_parts(
            Some("Temperature".to_string()),
            vec![Grid::from(vec![0.0, 1.0]), Grid::from_labels(["a"])],
            vec!["x".to_string(), String::new()],
            array![[1.0], [2.0]].into_dyn(),
        )
        .unwrap();
        assert_eq!(
            field_repr("GriddedField2", &field),
            r#"GriddedField2(name=Some("Temperature"), gridnames=["x", ""], shape=[2, 1])"#
        );
        assert_eq!(
            field_repr("GriddedField2", &GriddedField2::new()),
            r#"GriddedField2(name=None, gridnames=["", ""], shape=[0, 0])"#
        );
    }
}
