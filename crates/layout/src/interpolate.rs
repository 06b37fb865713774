use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub width: f64,
    pub value: f64,
}

impl Breakpoint {
    pub const fn new(width: f64, value: f64) -> Self {
        Self { width, value }
    }
}

/// Width-ordered breakpoints. Construction guarantees at least one entry,
/// finite coordinates and strictly increasing widths, so evaluation can't
/// fail afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")]
pub struct BreakpointTable {
    points: Vec<Breakpoint>,
}

impl BreakpointTable {
    pub fn new(points: Vec<Breakpoint>) -> Result<Self, LayoutError> {
        validate(&points)?;
        Ok(Self { points })
    }

    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self, LayoutError> {
        Self::new(
            pairs
                .iter()
                .map(|&(width, value)| Breakpoint::new(width, value))
                .collect(),
        )
    }

    /// Built-in tables only. The literals are increasing and finite; a test
    /// re-validates every default table.
    pub(crate) fn from_sorted_literals(pairs: &[(f64, f64)]) -> Self {
        Self {
            points: pairs
                .iter()
                .map(|&(width, value)| Breakpoint::new(width, value))
                .collect(),
        }
    }

    pub fn points(&self) -> &[Breakpoint] {
        &self.points
    }

    pub fn value_at(&self, width: f64) -> f64 {
        evaluate(&self.points, width)
    }
}

impl TryFrom<Vec<[f64; 2]>> for BreakpointTable {
    type Error = LayoutError;

    fn try_from(pairs: Vec<[f64; 2]>) -> Result<Self, Self::Error> {
        Self::new(
            pairs
                .into_iter()
                .map(|[width, value]| Breakpoint::new(width, value))
                .collect(),
        )
    }
}

impl From<BreakpointTable> for Vec<[f64; 2]> {
    fn from(table: BreakpointTable) -> Self {
        table
            .points
            .into_iter()
            .map(|point| [point.width, point.value])
            .collect()
    }
}

/// Piecewise-linear lookup over `points`, clamped to the end values outside
/// the table's range.
pub fn interpolate(points: &[Breakpoint], width: f64) -> Result<f64, LayoutError> {
    validate(points)?;
    Ok(evaluate(points, width))
}

fn validate(points: &[Breakpoint]) -> Result<(), LayoutError> {
    if points.is_empty() {
        return Err(LayoutError::InvalidConfiguration(
            "breakpoint table must have at least one entry".into(),
        ));
    }
    if let Some(point) = points
        .iter()
        .find(|point| !point.width.is_finite() || !point.value.is_finite())
    {
        return Err(LayoutError::InvalidConfiguration(format!(
            "breakpoint ({}, {}) is not finite",
            point.width, point.value
        )));
    }
    if let Some(pair) = points.windows(2).find(|pair| pair[1].width <= pair[0].width) {
        return Err(LayoutError::InvalidConfiguration(format!(
            "breakpoint widths must be strictly increasing ({} then {})",
            pair[0].width, pair[1].width
        )));
    }
    Ok(())
}

fn evaluate(points: &[Breakpoint], width: f64) -> f64 {
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return 0.0,
    };

    if width.is_nan() || width <= first.width {
        return first.value;
    }
    if width >= last.width {
        return last.value;
    }

    // Half-open segments [a, b) so an exact breakpoint hits `a` and returns
    // its stored value untouched.
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a.width <= width && width < b.width {
            let t = (width - a.width) / (b.width - a.width);
            return a.value + t * (b.value - a.value);
        }
    }
    last.value
}

#[cfg(test)]
#[path = "tests/interpolate_tests.rs"]
mod tests;
