//! One-dimensional interpolation of N-dimensional data along a single axis
//!
//! Every target coordinate is reduced to a [`Stencil`] over the source coordinates
//! (an exact source position, a weighted pair of neighbours or a fill value), which is
//! then applied to whole hyperslabs of the data at once.
//!
//! The behaviour is configured with an immutable [`InterpolationOptions`] record that
//! can be built in code or read from TOML:
//!
//! ```rust
//! use gridfield_core::interpolate::{InterpolationKind, InterpolationOptions, OutOfBounds};
//!
//! let options = InterpolationOptions::from_toml(
//!     r#"
//! kind = "nearest"
//! out_of_bounds = "extrapolate"
//! "#,
//! )
//! .unwrap();
//! assert_eq!(options.kind, InterpolationKind::Nearest);
//! assert_eq!(options.out_of_bounds, OutOfBounds::Extrapolate);
//! assert!(!options.assume_sorted);
//! ```

use crate::errors::{GriddedFieldError, GriddedFieldResult};
use crate::grid::FloatValue;
use ndarray::{Array1, ArrayD, Axis, Zip};
use serde::{Deserialize, Serialize};

/// How values between source coordinates are computed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationKind {
    /// Piecewise linear
    #[default]
    Linear,
    /// Closest source point, ties go to the lower neighbour
    Nearest,
    /// Closest source point at or below the target
    Previous,
    /// Closest source point at or above the target
    Next,
}

impl InterpolationKind {
    /// Minimum number of source points the kind can work with
    pub fn min_points(&self) -> usize {
        match self {
            InterpolationKind::Linear => 2,
            _ => 1,
        }
    }
}

/// Treatment of targets outside the source coordinate range
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutOfBounds {
    /// Fail with [`GriddedFieldError::ExtrapolationNotAllowed`]
    #[default]
    Error,
    /// Use constant values below and above the range
    Fill { below: FloatValue, above: FloatValue },
    /// Linear kinds continue the end segments, the step kinds repeat the end values
    Extrapolate,
}

impl OutOfBounds {
    /// Fill both sides with the same value
    pub fn fill(value: FloatValue) -> Self {
        OutOfBounds::Fill {
            below: value,
            above: value,
        }
    }
}

/// Per-call interpolation configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InterpolationOptions {
    pub kind: InterpolationKind,
    pub out_of_bounds: OutOfBounds,
    /// Skip sorting the source coordinates. Unsorted input is then an error.
    pub assume_sorted: bool,
}

impl InterpolationOptions {
    /// Read options from a TOML document. Missing keys take their defaults.
    pub fn from_toml(document: &str) -> GriddedFieldResult<Self> {
        toml::from_str(document).map_err(|e| GriddedFieldError::InvalidOptions(e.to_string()))
    }

    pub fn with_kind(mut self, kind: InterpolationKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_out_of_bounds(mut self, out_of_bounds: OutOfBounds) -> Self {
        self.out_of_bounds = out_of_bounds;
        self
    }

    pub fn with_assume_sorted(mut self, assume_sorted: bool) -> Self {
        self.assume_sorted = assume_sorted;
        self
    }
}

/// Contribution of the source data to one target coordinate
///
/// Indices refer to positions in the caller's (possibly unsorted) source coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Stencil {
    Exact(usize),
    Between {
        lower: usize,
        upper: usize,
        weight: FloatValue,
    },
    Fill(FloatValue),
}

fn check_finite(values: &Array1<FloatValue>) -> GriddedFieldResult<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(GriddedFieldError::NonFiniteCoordinate {
            index,
            value: values[index],
        }),
        None => Ok(()),
    }
}

/// Positions of `x` in increasing coordinate order
fn sorted_order(x: &Array1<FloatValue>, assume_sorted: bool) -> GriddedFieldResult<Vec<usize>> {
    let mut order: Vec<usize> = (0..x.len()).collect();
    if !assume_sorted {
        order.sort_by(|&a, &b| x[a].total_cmp(&x[b]));
    }
    for pair in order.windows(2) {
        if x[pair[1]] <= x[pair[0]] {
            return Err(GriddedFieldError::NonMonotonicGrid {
                index: pair[1],
                value: x[pair[1]],
            });
        }
    }
    Ok(order)
}

struct Stencils<'a> {
    x: &'a Array1<FloatValue>,
    order: &'a [usize],
    options: &'a InterpolationOptions,
}

impl Stencils<'_> {
    fn coord(&self, sorted_index: usize) -> FloatValue {
        self.x[self.order[sorted_index]]
    }

    fn linear(&self, lower: usize, upper: usize, target: FloatValue) -> Stencil {
        let (x0, x1) = (self.coord(lower), self.coord(upper));
        Stencil::Between {
            lower: self.order[lower],
            upper: self.order[upper],
            weight: (target - x0) / (x1 - x0),
        }
    }

    fn out_of_range(&self, target: FloatValue, below: bool) -> GriddedFieldResult<Stencil> {
        let last = self.order.len() - 1;
        match self.options.out_of_bounds {
            OutOfBounds::Error => Err(GriddedFieldError::ExtrapolationNotAllowed {
                target,
                side: if below { "below" } else { "above" }.to_string(),
                limit: self.coord(if below { 0 } else { last }),
            }),
            OutOfBounds::Fill { below: value, .. } if below => Ok(Stencil::Fill(value)),
            OutOfBounds::Fill { above: value, .. } => Ok(Stencil::Fill(value)),
            OutOfBounds::Extrapolate => Ok(match self.options.kind {
                InterpolationKind::Linear if below => self.linear(0, 1, target),
                InterpolationKind::Linear => self.linear(last - 1, last, target),
                _ if below => Stencil::Exact(self.order[0]),
                _ => Stencil::Exact(self.order[last]),
            }),
        }
    }

    fn stencil(&self, target: FloatValue) -> GriddedFieldResult<Stencil> {
        let last = self.order.len() - 1;
        if target < self.coord(0) {
            return self.out_of_range(target, true);
        }
        if target > self.coord(last) {
            return self.out_of_range(target, false);
        }

        // Number of source points at or below the target, at least 1 here
        let count = self.order.partition_point(|&i| self.x[i] <= target);
        let lower = count - 1;
        if self.coord(lower) == target {
            return Ok(Stencil::Exact(self.order[lower]));
        }
        let upper = count;

        Ok(match self.options.kind {
            InterpolationKind::Linear => self.linear(lower, upper, target),
            InterpolationKind::Nearest => {
                let midpoint = 0.5 * (self.coord(lower) + self.coord(upper));
                if target <= midpoint {
                    Stencil::Exact(self.order[lower])
                } else {
                    Stencil::Exact(self.order[upper])
                }
            }
            InterpolationKind::Previous => Stencil::Exact(self.order[lower]),
            InterpolationKind::Next => Stencil::Exact(self.order[upper]),
        })
    }
}

/// Interpolate `data` along `axis` from coordinates `x` to coordinates `x_new`
///
/// The result has the shape of `data` except along `axis`, where its length is
/// `x_new.len()`. Targets that coincide with a source coordinate reproduce the
/// source values exactly.
///
/// # Errors
///
/// * [`GriddedFieldError::AxisOutOfBounds`] - `axis` is not an axis of `data`
/// * [`GriddedFieldError::ShapeMismatch`] - `x` and the data disagree in length
/// * [`GriddedFieldError::InsufficientPoints`] - too few points for the kind
/// * [`GriddedFieldError::NonFiniteCoordinate`] - NaN or infinite coordinates
/// * [`GriddedFieldError::NonMonotonicGrid`] - duplicate (or, with `assume_sorted`, unsorted) coordinates
/// * [`GriddedFieldError::ExtrapolationNotAllowed`] - target outside the range with [`OutOfBounds::Error`]
pub fn interp1d_along_axis(
    x: &Array1<FloatValue>,
    data: &ArrayD<FloatValue>,
    axis: usize,
    x_new: &Array1<FloatValue>,
    options: &InterpolationOptions,
) -> GriddedFieldResult<ArrayD<FloatValue>> {
    if axis >= data.ndim() {
        return Err(GriddedFieldError::AxisOutOfBounds {
            axis,
            dim: data.ndim(),
        });
    }
    let data_len = data.len_of(Axis(axis));
    if x.len() != data_len {
        return Err(GriddedFieldError::ShapeMismatch {
            coords: x.len(),
            data: data_len,
        });
    }
    if x.len() < options.kind.min_points() {
        return Err(GriddedFieldError::InsufficientPoints {
            required: options.kind.min_points(),
            got: x.len(),
        });
    }
    check_finite(x)?;
    check_finite(x_new)?;

    let order = sorted_order(x, options.assume_sorted)?;
    let stencils = Stencils {
        x,
        order: &order,
        options,
    };
    let plan = x_new
        .iter()
        .map(|&target| stencils.stencil(target))
        .collect::<GriddedFieldResult<Vec<_>>>()?;

    let mut shape = data.shape().to_vec();
    shape[axis] = x_new.len();
    let mut result = ArrayD::zeros(shape);

    for (j, stencil) in plan.iter().enumerate() {
        let mut lane = result.index_axis_mut(Axis(axis), j);
        match *stencil {
            Stencil::Exact(i) => lane.assign(&data.index_axis(Axis(axis), i)),
            Stencil::Fill(value) => lane.fill(value),
            Stencil::Between {
                lower,
                upper,
                weight,
            } => {
                Zip::from(&mut lane)
                    .and(&data.index_axis(Axis(axis), lower))
                    .and(&data.index_axis(Axis(axis), upper))
                    .for_each(|out, &a, &b| *out = a + (b - a) * weight);
            }
        }
    }

    Ok(result)
}
