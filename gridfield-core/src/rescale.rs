//! Rescaling of axis coordinates before interpolation
//!
//! Interpolating in a transformed coordinate (for example log-pressure instead of
//! pressure) is done by rescaling both the source and the target coordinates with
//! the same monotonic function.

use crate::errors::GriddedFieldError;
use crate::grid::FloatValue;
use ndarray::Array1;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Monotonic transform applied to axis values before interpolation
#[derive(Clone, Default)]
pub enum Rescaling {
    /// Identity
    #[default]
    Linear,
    /// Base-10 logarithm
    Log10,
    /// Natural logarithm
    Log,
    /// User supplied transform
    Custom(Arc<dyn Fn(FloatValue) -> FloatValue + Send + Sync>),
}

impl Rescaling {
    /// Wrap a closure as a custom rescaling
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(FloatValue) -> FloatValue + Send + Sync + 'static,
    {
        Rescaling::Custom(Arc::new(f))
    }

    pub fn apply(&self, value: FloatValue) -> FloatValue {
        match self {
            Rescaling::Linear => value,
            Rescaling::Log10 => value.log10(),
            Rescaling::Log => value.ln(),
            Rescaling::Custom(f) => f(value),
        }
    }

    /// Rescale every coordinate of a grid
    pub fn apply_all(&self, values: &Array1<FloatValue>) -> Array1<FloatValue> {
        match self {
            Rescaling::Linear => values.clone(),
            _ => values.mapv(|v| self.apply(v)),
        }
    }
}

impl fmt::Debug for Rescaling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rescaling::Linear => write!(f, "Linear"),
            Rescaling::Log10 => write!(f, "Log10"),
            Rescaling::Log => write!(f, "Log"),
            Rescaling::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

impl FromStr for Rescaling {
    type Err = GriddedFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Rescaling::Linear),
            "log10" => Ok(Rescaling::Log10),
            "log" => Ok(Rescaling::Log),
            other => Err(GriddedFieldError::UnknownRescaling(other.to_string())),
        }
    }
}
