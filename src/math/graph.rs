//! Function sampling for plots.
//!
//! Evaluates an expression at evenly spaced points of its free variable,
//! in parallel using rayon.

use crate::error::GraphError;
use crate::math::expr::Expr;
use crate::math::parser::parse;
use rayon::prelude::*;
use serde::Serialize;

/// Default plotting variable.
pub const DEFAULT_VARIABLE: &str = "x";

/// Default sampling domain.
pub const DEFAULT_DOMAIN: (f64, f64) = (-10.0, 10.0);

/// Default number of sample points.
pub const DEFAULT_SAMPLE_COUNT: usize = 400;

/// Largest number of sample points a single plot may request.
pub const MAX_SAMPLE_COUNT: usize = 100_000;

/// Horizontal axis label.
pub const X_LABEL: &str = "x";

/// Vertical axis label.
pub const Y_LABEL: &str = "f(x)";

/// Sampling configuration.
///
/// # Examples
///
/// ```
/// use study_assist::math::GraphConfig;
///
/// let config = GraphConfig::new().with_domain(0.0, 1.0).with_count(11);
/// assert_eq!(config.count, 11);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GraphConfig {
    /// Free variable to substitute.
    pub variable: String,
    /// Inclusive sampling interval.
    pub domain: (f64, f64),
    /// Number of points.
    pub count: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            variable: DEFAULT_VARIABLE.to_string(),
            domain: DEFAULT_DOMAIN,
            count: DEFAULT_SAMPLE_COUNT,
        }
    }
}

impl GraphConfig {
    /// Creates the default configuration: `x` over `[-10, 10]`, 400 points.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the plotting variable.
    #[must_use]
    pub fn with_variable(mut self, variable: impl Into<String>) -> Self {
        self.variable = variable.into();
        self
    }

    /// Sets the sampling interval.
    #[must_use]
    pub const fn with_domain(mut self, lo: f64, hi: f64) -> Self {
        self.domain = (lo, hi);
        self
    }

    /// Sets the number of sample points.
    #[must_use]
    pub const fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    fn validate(&self) -> Result<(), GraphError> {
        let (lo, hi) = self.domain;
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(GraphError::InvalidDomain {
                reason: format!("[{lo}, {hi}] is not an increasing finite interval"),
            });
        }
        // Spacing is computed from the width, so it must be finite too.
        if !(hi - lo).is_finite() {
            return Err(GraphError::InvalidDomain {
                reason: format!("[{lo}, {hi}] is too wide to sample"),
            });
        }
        if !(2..=MAX_SAMPLE_COUNT).contains(&self.count) {
            return Err(GraphError::InvalidDomain {
                reason: format!(
                    "need between 2 and {MAX_SAMPLE_COUNT} sample points, got {}",
                    self.count
                ),
            });
        }
        Ok(())
    }

    /// The `i`-th of `count` evenly spaced points, both ends included.
    #[allow(clippy::cast_precision_loss)]
    fn point(&self, i: usize) -> f64 {
        let (lo, hi) = self.domain;
        if i + 1 == self.count {
            return hi;
        }
        lo + (hi - lo) * (i as f64) / ((self.count - 1) as f64)
    }
}

/// One `(x, f(x))` pair. `y` is `NaN` where the function is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    /// Abscissa.
    pub x: f64,
    /// Function value.
    pub y: f64,
}

/// A sampled curve ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plot {
    /// Expression as entered.
    pub expression: String,
    /// Normalized expression, used as the legend.
    pub legend: String,
    /// Horizontal axis label.
    pub x_label: &'static str,
    /// Vertical axis label.
    pub y_label: &'static str,
    /// Samples in increasing `x` order.
    pub samples: Vec<Sample>,
}

impl Plot {
    /// Samples with a finite `y`.
    pub fn finite_samples(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter().filter(|s| s.y.is_finite())
    }

    /// Smallest and largest finite `y`, if any.
    #[must_use]
    pub fn y_range(&self) -> Option<(f64, f64)> {
        self.finite_samples().fold(None, |acc, s| match acc {
            None => Some((s.y, s.y)),
            Some((lo, hi)) => Some((lo.min(s.y), hi.max(s.y))),
        })
    }
}

/// Samples `expr` over the configured domain.
///
/// # Errors
///
/// - [`GraphError::InvalidDomain`] for an empty or degenerate domain.
/// - [`GraphError::Unparseable`] if `expr` does not parse.
/// - [`GraphError::MissingVariable`] if the variable does not occur.
/// - [`GraphError::NoFiniteSamples`] if no point evaluates.
pub fn sample(expr: &str, config: &GraphConfig) -> Result<Vec<Sample>, GraphError> {
    config.validate()?;
    let tree = parse(expr, &config.variable)?;
    sample_tree(&tree, config)
}

/// Samples `expr` and packages the result with its labels.
///
/// # Errors
///
/// Same as [`sample`].
pub fn plot(expr: &str, config: &GraphConfig) -> Result<Plot, GraphError> {
    config.validate()?;
    let tree = parse(expr, &config.variable)?;
    let samples = sample_tree(&tree, config)?;

    Ok(Plot {
        expression: expr.to_string(),
        legend: tree.to_string(),
        x_label: X_LABEL,
        y_label: Y_LABEL,
        samples,
    })
}

fn sample_tree(tree: &Expr, config: &GraphConfig) -> Result<Vec<Sample>, GraphError> {
    if !tree.mentions(&config.variable) {
        return Err(GraphError::MissingVariable {
            variable: config.variable.clone(),
        });
    }

    let samples: Vec<Sample> = (0..config.count)
        .into_par_iter()
        .map(|i| {
            let x = config.point(i);
            let y = tree
                .eval_with(&config.variable, x)
                .ok()
                .filter(|y| y.is_finite())
                .unwrap_or(f64::NAN);
            Sample { x, y }
        })
        .collect();

    if samples.iter().all(|s| s.y.is_nan()) {
        return Err(GraphError::NoFiniteSamples);
    }

    Ok(samples)
}
