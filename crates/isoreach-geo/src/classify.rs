//! Classification of the reduced per-cell series.
//!
//! Three schemes, mirroring what choropleth tooling offers: explicit bin
//! edges, Fisher-Jenks natural breaks, and a binary predicate over two
//! attributes.

use isoreach_core::error::{IsoreachError, Result};
use serde::{Deserialize, Serialize};

/// How to partition a value series into classes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    /// Explicit inclusive upper bin edges, ascending; values above the
    /// last edge fall into a trailing open class
    UserDefined { edges: Vec<f64> },
    /// Fisher-Jenks natural breaks into `classes` classes
    NaturalBreaks { classes: usize },
}

/// A classified series: inner upper edges plus one class index per value.
///
/// `edges.len() + 1` classes; class `i` holds values `v <= edges[i]` not
/// already claimed by a lower class.
#[derive(Debug, Clone)]
pub struct Classification {
    pub edges: Vec<f64>,
    pub assignments: Vec<usize>,
}

impl Classification {
    pub fn class_count(&self) -> usize {
        self.edges.len() + 1
    }

    /// Cell count per class
    pub fn histogram(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.class_count()];
        for &class in &self.assignments {
            counts[class] += 1;
        }
        counts
    }
}

/// Classify a series under a scheme
pub fn classify(values: &[f64], scheme: &Scheme) -> Result<Classification> {
    if values.is_empty() {
        return Err(IsoreachError::EmptyLayer { layer: "classification input".to_string() });
    }

    let edges = match scheme {
        Scheme::UserDefined { edges } => {
            if edges.is_empty() || edges.windows(2).any(|w| w[0] >= w[1]) {
                return Err(IsoreachError::ConfigInvalid {
                    key: "edges".to_string(),
                    reason: "bin edges must be non-empty and strictly ascending".to_string(),
                });
            }
            edges.clone()
        }
        Scheme::NaturalBreaks { classes } => natural_breaks(values, *classes)?,
    };

    let assignments = values.iter().map(|v| assign(*v, &edges)).collect();
    Ok(Classification { edges, assignments })
}

/// Class index of a value given inner upper edges
fn assign(value: f64, edges: &[f64]) -> usize {
    edges
        .iter()
        .position(|edge| value <= *edge)
        .unwrap_or(edges.len())
}

/// Fisher-Jenks natural breaks: the inner upper edges (k - 1 of them)
/// partitioning the sorted series into k classes with minimal
/// within-class sum of squared deviations.
///
/// The classic O(k·n²) dynamic program over the sorted values, as used by
/// the usual choropleth classifiers.
pub fn natural_breaks(values: &[f64], classes: usize) -> Result<Vec<f64>> {
    if classes == 0 {
        return Err(IsoreachError::ConfigInvalid {
            key: "classes".to_string(),
            reason: "at least one class is required".to_string(),
        });
    }

    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return Err(IsoreachError::ConfigInvalid {
            key: "classes".to_string(),
            reason: "no finite values to classify".to_string(),
        });
    }
    sorted.sort_by(f64::total_cmp);

    let mut distinct = 1usize;
    for w in sorted.windows(2) {
        if w[0] < w[1] {
            distinct += 1;
        }
    }
    if classes > distinct {
        return Err(IsoreachError::ConfigInvalid {
            key: "classes".to_string(),
            reason: format!("{classes} classes requested but only {distinct} distinct values"),
        });
    }

    let n = sorted.len();
    let k = classes;

    // lower_class_limits[i][j]: 1-based index of the first value of class
    // j when the first i values are split into j classes
    let mut lower_class_limits = vec![vec![0usize; k + 1]; n + 1];
    let mut variance = vec![vec![0f64; k + 1]; n + 1];
    for j in 1..=k {
        lower_class_limits[1][j] = 1;
        for i in 2..=n {
            variance[i][j] = f64::INFINITY;
        }
    }

    for i in 2..=n {
        let mut sum = 0.0;
        let mut sum_squares = 0.0;
        let mut count = 0.0;
        let mut within = 0.0;

        for m in 1..=i {
            let lower = i - m; // 0-based index of the class's first value
            let value = sorted[lower];
            count += 1.0;
            sum += value;
            sum_squares += value * value;
            within = sum_squares - (sum * sum) / count;

            if lower > 0 {
                for j in 2..=k {
                    let candidate = within + variance[lower][j - 1];
                    if variance[i][j] >= candidate {
                        lower_class_limits[i][j] = lower + 1;
                        variance[i][j] = candidate;
                    }
                }
            }
        }
        lower_class_limits[i][1] = 1;
        variance[i][1] = within;
    }

    // Walk the limits backwards; each class's lower limit is the previous
    // class's upper edge
    let mut edges = vec![0.0; k - 1];
    let mut right = n;
    for j in (2..=k).rev() {
        let lower = lower_class_limits[right][j] - 1;
        edges[j - 2] = sorted[lower - 1];
        right = lower;
    }
    Ok(edges)
}

/// Outcome of the binary predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flag {
    Yes,
    No,
}

impl std::fmt::Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Flag::Yes => write!(f, "Yes"),
            Flag::No => write!(f, "No"),
        }
    }
}

/// "first strictly below a threshold AND second strictly above another",
/// e.g. travel time under 35 minutes while more than 5 km away.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinaryPredicate {
    pub first_below: f64,
    pub second_above: f64,
}

impl BinaryPredicate {
    pub fn new(first_below: f64, second_above: f64) -> Self {
        Self { first_below, second_above }
    }

    pub fn evaluate(&self, first: f64, second: f64) -> Flag {
        if first < self.first_below && second > self.second_above {
            Flag::Yes
        } else {
            Flag::No
        }
    }

    /// Evaluate over paired series
    pub fn evaluate_all(&self, firsts: &[f64], seconds: &[f64]) -> Vec<Flag> {
        firsts
            .iter()
            .zip(seconds)
            .map(|(a, b)| self.evaluate(*a, *b))
            .collect()
    }
}
