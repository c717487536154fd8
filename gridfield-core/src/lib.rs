//! Gridded fields: N-dimensional data bundled with named coordinate grids.
//!
//! The container lives in [`field`], the operations on it (slicing, regridding and
//! conversion to labeled arrays and plain mappings) in [`extras`].

pub mod errors;
pub mod extras;
pub mod field;
pub mod grid;
pub mod interpolate;
pub mod labeled;
pub mod mapping;
#[cfg(feature = "python")]
pub mod python;
pub mod rescale;
pub mod slice;

pub use extras::{from_labeled_array, GriddedFieldExt};
pub use field::{
    GriddedField, GriddedField1, GriddedField2, GriddedField3, GriddedField4, GriddedField5,
    GriddedField6, GriddedFieldAccess,
};
pub use grid::Grid;
