use crate::error::SimError;
use crate::task::Grid;

/// Grid exchange settled for one timestep (kWh).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GridStep {
    /// Energy imported.
    pub import: f32,
    /// Energy exported.
    pub export: f32,
    /// Deficit the import limit could not cover.
    pub shortfall: f32,
    /// Surplus the export limit could not take.
    pub curtailed: f32,
}

/// Site grid connection with headroom-derated import and export limits.
///
/// A site without a connection behaves as one with zero limits: every
/// deficit is shortfall and every surplus is curtailed.
#[derive(Debug, Clone)]
pub struct GridConnection<'a> {
    max_import_kwh: f32,
    max_export_kwh: f32,
    tariff: &'a [f32],
    /// Export price (£/kWh).
    pub export_tariff: f32,
}

impl<'a> GridConnection<'a> {
    /// Creates the connection for timesteps of `dt_hours`.
    ///
    /// # Errors
    ///
    /// Returns `SimError::IndexOutOfRange` if `tariff_index` does not
    /// address a site tariff.
    pub fn new(grid: &Grid, tariffs: &'a [Vec<f32>], dt_hours: f32) -> Result<Self, SimError> {
        let tariff = tariffs
            .get(grid.tariff_index)
            .ok_or(SimError::IndexOutOfRange {
                field: "grid.tariff_index",
                index: grid.tariff_index,
                len: tariffs.len(),
            })?;
        let derate =
            |kw: f32, headroom: f32| kw.max(0.0) * (1.0 - headroom.clamp(0.0, 1.0)) * dt_hours;
        Ok(Self {
            max_import_kwh: derate(grid.grid_import, grid.import_headroom),
            max_export_kwh: derate(grid.grid_export, grid.export_headroom),
            tariff,
            export_tariff: grid.export_tariff,
        })
    }

    /// A connection with zero limits and no tariff.
    pub fn disconnected() -> Self {
        Self {
            max_import_kwh: 0.0,
            max_export_kwh: 0.0,
            tariff: &[],
            export_tariff: 0.0,
        }
    }

    /// Import price at timestep `t` (£/kWh); zero when disconnected.
    pub fn import_price(&self, t: usize) -> f32 {
        self.tariff.get(t).copied().unwrap_or(0.0)
    }

    /// Largest import per step (kWh).
    pub fn max_import_kwh(&self) -> f32 {
        self.max_import_kwh
    }

    /// Settles a net site position against the limits.
    ///
    /// `net_kwh` is positive for a deficit (import) and negative for a
    /// surplus (export).
    pub fn settle(&self, net_kwh: f32) -> GridStep {
        if net_kwh >= 0.0 {
            let import = net_kwh.min(self.max_import_kwh);
            GridStep {
                import,
                shortfall: net_kwh - import,
                ..GridStep::default()
            }
        } else {
            let surplus = -net_kwh;
            let export = surplus.min(self.max_export_kwh);
            GridStep {
                export,
                curtailed: surplus - export,
                ..GridStep::default()
            }
        }
    }
}
