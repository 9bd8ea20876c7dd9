use crate::models::{ImputationCounts, ObservationField};

/// How missing values in a column are replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImputationStrategy {
    /// Linear interpolation between the nearest known neighbours, then the column mean
    InterpolateThenMean,
    /// A missing reading means nothing was recorded
    Zero,
}

impl ImputationStrategy {
    pub fn for_field(field: ObservationField) -> Self {
        match field {
            ObservationField::Precipitation => ImputationStrategy::Zero,
            ObservationField::Tmax | ObservationField::Tmin | ObservationField::Humidity => {
                ImputationStrategy::InterpolateThenMean
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImputedColumn {
    pub values: Vec<Option<f64>>,
    pub counts: ImputationCounts,
}

pub fn impute_column(values: &[Option<f64>], strategy: ImputationStrategy) -> ImputedColumn {
    let mut counts = ImputationCounts::default();

    let values = match strategy {
        ImputationStrategy::Zero => {
            let (filled, n) = fill_with_constant(values, 0.0);
            counts.zero_filled = n;
            filled
        }
        ImputationStrategy::InterpolateThenMean => {
            let (interpolated, n) = interpolate_linear(values);
            counts.interpolated = n;
            let (filled, n) = fill_with_mean(&interpolated);
            counts.mean_filled = n;
            filled
        }
    };

    ImputedColumn { values, counts }
}

/// Fill interior gaps by position-weighted linear interpolation.
///
/// Only gaps with a known value on both sides are filled; leading and
/// trailing runs are left missing. Returns the new column and the number of
/// values filled.
pub fn interpolate_linear(values: &[Option<f64>]) -> (Vec<Option<f64>>, usize) {
    let mut result = values.to_vec();
    let mut filled = 0;
    let mut previous: Option<(usize, f64)> = None;

    for (i, value) in values.iter().enumerate() {
        let Some(current) = *value else {
            continue;
        };

        if let Some((start, start_value)) = previous {
            let span = (i - start) as f64;
            for (gap, slot) in result.iter_mut().enumerate().take(i).skip(start + 1) {
                let offset = (gap - start) as f64;
                *slot = Some(start_value + (current - start_value) * offset / span);
                filled += 1;
            }
        }

        previous = Some((i, current));
    }

    (result, filled)
}

/// Replace missing values with the mean of the present ones.
///
/// A column with no present values is returned unchanged.
pub fn fill_with_mean(values: &[Option<f64>]) -> (Vec<Option<f64>>, usize) {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return (values.to_vec(), 0);
    }

    let mean = present.iter().sum::<f64>() / present.len() as f64;
    fill_with_constant(values, mean)
}

pub fn fill_with_constant(values: &[Option<f64>], constant: f64) -> (Vec<Option<f64>>, usize) {
    let missing = values.iter().filter(|v| v.is_none()).count();
    let filled = values.iter().map(|v| Some(v.unwrap_or(constant))).collect();
    (filled, missing)
}
