//! Discretised search space over named configuration parameters.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::task::TaskData;

/// Tolerance absorbing float error when counting grid points on an axis.
const AXIS_EPSILON: f64 = 1e-9;

/// Per-parameter grid indices identifying one point of a [`ParameterSpace`].
pub type Genome = Vec<usize>;

/// Inclusive range `[min, max]` sampled every `step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
    /// Grid spacing; zero pins the parameter to `min`.
    #[serde(default)]
    pub step: f64,
}

impl ParameterRange {
    pub fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Range holding a single value.
    pub fn fixed(value: f64) -> Self {
        Self::new(value, value, 0.0)
    }

    /// Number of grid points on this axis (at least 1).
    pub fn points(&self) -> usize {
        if self.step <= 0.0 || self.max <= self.min {
            return 1;
        }
        ((self.max - self.min) / self.step + AXIS_EPSILON).floor() as usize + 1
    }

    /// Value at grid index `i`, capped at `max`.
    pub fn value(&self, i: usize) -> f64 {
        (self.min + i as f64 * self.step).min(self.max.max(self.min))
    }

    fn check(&self, name: &str) -> Result<(), SimError> {
        let bad = |why: &str| Err(SimError::InvalidParameterSpace(format!("{name}: {why}")));
        if !(self.min.is_finite() && self.max.is_finite() && self.step.is_finite()) {
            return bad("bounds and step must be finite");
        }
        if self.min > self.max {
            return bad("min is greater than max");
        }
        if self.step < 0.0 {
            return bad("step is negative");
        }
        Ok(())
    }
}

/// Named parameter ranges in a fixed (lexicographic) order.
///
/// A point of the space is a [`Genome`]: one grid index per parameter, in
/// the order of [`names`](Self::names). Candidates are produced by applying
/// the decoded values to a template configuration with
/// [`TaskData::set_parameter`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSpace {
    ranges: BTreeMap<String, ParameterRange>,
}

impl ParameterSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a parameter, builder style.
    pub fn with(mut self, name: impl Into<String>, range: ParameterRange) -> Self {
        self.insert(name, range);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, range: ParameterRange) {
        self.ranges.insert(name.into(), range);
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Number of parameters.
    pub fn dimensions(&self) -> usize {
        self.ranges.len()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ranges.keys().map(String::as_str)
    }

    /// Every grid value of parameter `name`; empty if the space lacks it.
    pub fn grid_values(&self, name: &str) -> Vec<f64> {
        self.ranges
            .get(name)
            .map_or_else(Vec::new, |r| (0..r.points()).map(|i| r.value(i)).collect())
    }

    /// Grid points per axis, in parameter order.
    pub fn axis_lengths(&self) -> Vec<usize> {
        self.ranges.values().map(ParameterRange::points).collect()
    }

    /// Total number of grid points, or `None` if it overflows `usize`.
    pub fn size(&self) -> Option<usize> {
        self.ranges
            .values()
            .try_fold(1usize, |acc, r| acc.checked_mul(r.points()))
    }

    /// Checks every range, that every name addresses a field of `template`
    /// and that solar array indices stay below `solar_profiles`.
    ///
    /// # Errors
    ///
    /// `SimError::InvalidParameterSpace` for a malformed range,
    /// `SimError::IndexOutOfRange` for a solar array the site has no profile
    /// for, and `SimError::UnknownParameter` for a name no configuration
    /// field answers to.
    pub fn validate(&self, template: &TaskData, solar_profiles: usize) -> Result<(), SimError> {
        let mut scratch = template.clone();
        for (name, range) in &self.ranges {
            range.check(name)?;
            match solar_array_index(name) {
                Some(index) if index >= solar_profiles => {
                    return Err(SimError::IndexOutOfRange {
                        field: "solar_panels",
                        index,
                        len: solar_profiles,
                    });
                }
                _ => {}
            }
            scratch.set_parameter(name, range.min)?;
        }
        Ok(())
    }

    /// Genome of the `index`-th grid point; the first parameter varies
    /// fastest. Indices past [`size`](Self::size) wrap around.
    pub fn decode(&self, index: usize) -> Genome {
        let mut rest = index;
        self.ranges
            .values()
            .map(|r| {
                let len = r.points();
                let digit = rest % len;
                rest /= len;
                digit
            })
            .collect()
    }

    /// Parameter values of `genome`, in parameter order.
    pub fn values(&self, genome: &[usize]) -> Vec<f64> {
        self.ranges
            .values()
            .zip(genome)
            .map(|(r, &i)| r.value(i))
            .collect()
    }

    /// Applies `genome` to a copy of `template`.
    ///
    /// # Errors
    ///
    /// Returns `SimError::UnknownParameter` if a name addresses no field.
    pub fn task(&self, template: &TaskData, genome: &[usize]) -> Result<TaskData, SimError> {
        let mut task = template.clone();
        for ((name, range), &i) in self.ranges.iter().zip(genome) {
            task.set_parameter(name, range.value(i))?;
        }
        Ok(task)
    }

    /// Uniformly random grid point.
    pub fn random_genome<R: Rng + ?Sized>(&self, rng: &mut R) -> Genome {
        self.ranges
            .values()
            .map(|r| rng.random_range(0..r.points()))
            .collect()
    }
}

/// Array index of a `solar_panels[i].field` name.
fn solar_array_index(name: &str) -> Option<usize> {
    let rest = name.strip_prefix("solar_panels[")?;
    let (index, _) = rest.split_once(']')?;
    index.parse().ok()
}
