//! Coordinate grids for a single axis of a gridded field
//!
//! A grid is either numeric ([`Grid::Vector`]), which is what interpolation needs,
//! or a list of labels ([`Grid::Labels`]) for axes such as species or channel names.
//! Both variants can be sliced with an [`AxisSlice`] and keep their variant when they are.
//!
//! ```rust
//! use gridfield_core::grid::Grid;
//! use gridfield_core::slice::AxisSlice;
//!
//! let grid = Grid::from(vec![0.0, 1.0, 2.0]);
//! assert_eq!(grid.slice(&AxisSlice::range(0, 2)).unwrap(), Grid::from(vec![0.0, 1.0]));
//!
//! let species = Grid::from_labels(["H2O", "O3", "CO2"]);
//! assert_eq!(species.slice(&AxisSlice::range(1, 3)).unwrap(), Grid::from_labels(["O3", "CO2"]));
//! ```

use crate::errors::GriddedFieldResult;
use crate::slice::AxisSlice;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

pub type FloatValue = f64;

/// Coordinates of one axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Grid {
    /// Numeric coordinates
    Vector(Array1<FloatValue>),
    /// Named positions (e.g. species tags)
    Labels(Vec<String>),
}

impl Default for Grid {
    fn default() -> Self {
        Grid::Vector(Array1::zeros(0))
    }
}

impl Grid {
    /// Build a label grid from a list of names
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Grid::Labels(labels.into_iter().map(Into::into).collect())
    }

    /// Positional grid `0, 1, ..., len - 1`
    pub fn index(len: usize) -> Self {
        Grid::Vector(Array1::range(0.0, len as FloatValue, 1.0))
    }

    pub fn len(&self) -> usize {
        match self {
            Grid::Vector(values) => values.len(),
            Grid::Labels(labels) => labels.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name of the variant, used in error messages and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Grid::Vector(_) => "vector",
            Grid::Labels(_) => "labels",
        }
    }

    /// Numeric coordinates, if this is a vector grid
    pub fn as_vector(&self) -> Option<&Array1<FloatValue>> {
        match self {
            Grid::Vector(values) => Some(values),
            Grid::Labels(_) => None,
        }
    }

    /// Labels, if this is a label grid
    pub fn as_labels(&self) -> Option<&[String]> {
        match self {
            Grid::Vector(_) => None,
            Grid::Labels(labels) => Some(labels),
        }
    }

    /// Take the positions selected by `slice`, keeping the variant
    pub fn slice(&self, slice: &AxisSlice) -> GriddedFieldResult<Grid> {
        let indices = slice.indices(self.len())?;
        Ok(self.select(&indices))
    }

    /// Take the given positions, keeping the variant
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds
    pub fn select(&self, indices: &[usize]) -> Grid {
        match self {
            Grid::Vector(values) => Grid::Vector(indices.iter().map(|&i| values[i]).collect()),
            Grid::Labels(labels) => {
                Grid::Labels(indices.iter().map(|&i| labels[i].clone()).collect())
            }
        }
    }
}

impl From<Array1<FloatValue>> for Grid {
    fn from(values: Array1<FloatValue>) -> Self {
        Grid::Vector(values)
    }
}

impl From<Vec<FloatValue>> for Grid {
    fn from(values: Vec<FloatValue>) -> Self {
        Grid::Vector(Array1::from(values))
    }
}

impl From<&[FloatValue]> for Grid {
    fn from(values: &[FloatValue]) -> Self {
        Grid::Vector(Array1::from(values.to_vec()))
    }
}

impl From<Vec<String>> for Grid {
    fn from(labels: Vec<String>) -> Self {
        Grid::Labels(labels)
    }
}
