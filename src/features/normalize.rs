//! Corpus-wide min-max scaling of a single feature column.

use serde::{Deserialize, Serialize};

use crate::sentiment::round_to;

/// Output for a column whose values are all equal and non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstantColumnPolicy {
    #[default]
    Zero,
    One,
}

impl ConstantColumnPolicy {
    pub fn value(self) -> f64 {
        match self {
            Self::Zero => 0.0,
            Self::One => 1.0,
        }
    }
}

fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    let mut it = values.iter().copied();
    let first = it.next()?;
    Some(it.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

/// True when every value is the same non-zero number (min == max != 0).
pub fn is_degenerate(values: &[f64]) -> bool {
    matches!(bounds(values), Some((lo, hi)) if hi != 0.0 && lo == hi)
}

/// Scales `values` to [0, 1] with two-decimal rounding.
///
/// A column whose maximum is 0 is returned unchanged. A constant non-zero
/// column becomes `policy.value()` everywhere.
pub fn normalize_column(values: &[f64], policy: ConstantColumnPolicy) -> Vec<f64> {
    let Some((lo, hi)) = bounds(values) else {
        return Vec::new();
    };
    if hi == 0.0 {
        return values.to_vec();
    }
    if lo == hi {
        return vec![policy.value(); values.len()];
    }
    let span = hi - lo;
    values.iter().map(|x| round_to((x - lo) / span, 2)).collect()
}
