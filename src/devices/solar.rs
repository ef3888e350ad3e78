use crate::error::SimError;
use crate::task::SolarPanel;

/// Solar generation from one or more arrays sharing the site's yield profiles.
///
/// Generation is `Σ yield_scalar × solar_yields[yield_index][t]`.
#[derive(Debug, Clone)]
pub struct SolarArray<'a> {
    arrays: Vec<(f32, &'a [f32])>,
}

impl<'a> SolarArray<'a> {
    /// Binds each panel to its yield profile.
    ///
    /// # Errors
    ///
    /// Returns `SimError::IndexOutOfRange` if a panel's `yield_index` does
    /// not address a site profile.
    pub fn new(panels: &[SolarPanel], yields: &'a [Vec<f32>]) -> Result<Self, SimError> {
        let arrays = panels
            .iter()
            .map(|p| {
                yields
                    .get(p.yield_index)
                    .map(|y| (p.yield_scalar.max(0.0), y.as_slice()))
                    .ok_or(SimError::IndexOutOfRange {
                        field: "solar_panels.yield_index",
                        index: p.yield_index,
                        len: yields.len(),
                    })
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { arrays })
    }

    /// Generation at timestep `t` (kWh).
    pub fn generation(&self, t: usize) -> f32 {
        self.arrays
            .iter()
            .map(|(kwp, y)| kwp * y.get(t).copied().unwrap_or(0.0))
            .sum()
    }
}
