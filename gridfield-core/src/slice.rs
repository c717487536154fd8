//! Python-style slices along a single axis
//!
//! An [`AxisSlice`] is a `start:stop:step` triple where every part is optional,
//! resolved against an axis length the same way Python slices are:
//!
//! - negative `start`/`stop` count from the end of the axis,
//! - bounds past either end are clamped instead of failing,
//! - a negative `step` walks the axis backwards.
//!
//! ```rust
//! use gridfield_core::slice::AxisSlice;
//!
//! assert_eq!(AxisSlice::full().indices(3).unwrap(), vec![0, 1, 2]);
//! assert_eq!(AxisSlice::range(1, 10).indices(3).unwrap(), vec![1, 2]);
//! assert_eq!(AxisSlice::full().with_step(-1).indices(3).unwrap(), vec![2, 1, 0]);
//! ```

use crate::errors::{GriddedFieldError, GriddedFieldResult};
use serde::{Deserialize, Serialize};
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

/// Slice along one axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisSlice {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

impl AxisSlice {
    pub fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self {
        Self { start, stop, step }
    }

    /// The slice covering the whole axis (`:`)
    pub fn full() -> Self {
        Self::default()
    }

    /// `start:stop`
    pub fn range(start: isize, stop: isize) -> Self {
        Self::new(Some(start), Some(stop), None)
    }

    /// Builder method replacing the step
    pub fn with_step(mut self, step: isize) -> Self {
        self.step = Some(step);
        self
    }

    /// Resolve the slice into the positions it selects on an axis of length `len`
    ///
    /// Fails with [`GriddedFieldError::ZeroSliceStep`] if the step is zero.
    pub fn indices(&self, len: usize) -> GriddedFieldResult<Vec<usize>> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(GriddedFieldError::ZeroSliceStep);
        }
        let len = len as isize;
        let (lower, upper) = if step > 0 { (0, len) } else { (-1, len - 1) };

        let clamp = |bound: isize| {
            if bound < 0 {
                (bound + len).max(lower)
            } else {
                bound.min(upper)
            }
        };
        let start = self
            .start
            .map(clamp)
            .unwrap_or(if step > 0 { lower } else { upper });
        let stop = self
            .stop
            .map(clamp)
            .unwrap_or(if step > 0 { upper } else { lower });

        let mut indices = Vec::new();
        let mut i = start;
        while (step > 0 && i < stop) || (step < 0 && i > stop) {
            indices.push(i as usize);
            match i.checked_add(step) {
                Some(next) => i = next,
                None => break,
            }
        }
        Ok(indices)
    }
}

impl From<Range<usize>> for AxisSlice {
    fn from(r: Range<usize>) -> Self {
        Self::range(r.start as isize, r.end as isize)
    }
}

impl From<RangeFrom<usize>> for AxisSlice {
    fn from(r: RangeFrom<usize>) -> Self {
        Self::new(Some(r.start as isize), None, None)
    }
}

impl From<RangeTo<usize>> for AxisSlice {
    fn from(r: RangeTo<usize>) -> Self {
        Self::new(None, Some(r.end as isize), None)
    }
}

impl From<RangeFull> for AxisSlice {
    fn from(_: RangeFull) -> Self {
        Self::full()
    }
}
