//! Building loads and fabric retrofit selection.

use crate::error::SimError;
use crate::site::{CostItem, FabricIntervention, SiteData};
use crate::task::Building;

/// The fabric intervention chosen by a configuration, if any.
///
/// Index `0` means no intervention; index `i` selects the site's
/// intervention `i - 1`.
#[derive(Debug, Clone, Copy)]
pub struct FabricModel<'a> {
    intervention: Option<&'a FabricIntervention>,
}

impl<'a> FabricModel<'a> {
    /// Selects an intervention by configuration index.
    ///
    /// # Errors
    ///
    /// Returns `SimError::IndexOutOfRange` when `index` exceeds the number
    /// of site interventions.
    pub fn select(interventions: &'a [FabricIntervention], index: usize) -> Result<Self, SimError> {
        let intervention = match index {
            0 => None,
            i => Some(interventions.get(i - 1).ok_or(SimError::IndexOutOfRange {
                field: "building.fabric_intervention_index",
                index: i,
                len: interventions.len(),
            })?),
        };
        Ok(Self { intervention })
    }

    /// No intervention.
    pub fn none() -> Self {
        Self { intervention: None }
    }

    /// Capital cost of the intervention (£).
    pub fn capex(&self) -> f64 {
        self.intervention.map_or(0.0, |i| i.cost)
    }

    /// Itemised cost, when the site provides one.
    pub fn cost_breakdown(&self) -> Option<&'a [CostItem]> {
        self.intervention.and_then(|i| i.cost_breakdown.as_deref())
    }

    /// Reduction of the peak heating load (kW).
    pub fn peak_hload_reduction(&self) -> f32 {
        self.intervention.map_or(0.0, |i| i.peak_hload_reduction)
    }

    /// Space-heating reduction at timestep `t` (kWh).
    pub fn reduction(&self, t: usize) -> f32 {
        self.intervention
            .and_then(|i| i.hload_reduction.get(t).copied())
            .unwrap_or(0.0)
    }
}

/// Scaled building demand with the fabric reduction applied.
#[derive(Debug, Clone)]
pub struct BuildingLoads<'a> {
    eload: &'a [f32],
    hload: &'a [f32],
    electrical_scalar: f32,
    heat_scalar: f32,
    /// Selected fabric intervention.
    pub fabric: FabricModel<'a>,
}

impl<'a> BuildingLoads<'a> {
    /// Binds a building configuration to the site series.
    ///
    /// A disabled building contributes no demand.
    ///
    /// # Errors
    ///
    /// Returns `SimError::IndexOutOfRange` for an invalid fabric index.
    pub fn new(building: Option<&Building>, site: &'a SiteData) -> Result<Self, SimError> {
        let Some(b) = building else {
            return Ok(Self {
                eload: &[],
                hload: &[],
                electrical_scalar: 0.0,
                heat_scalar: 0.0,
                fabric: FabricModel::none(),
            });
        };
        Ok(Self {
            eload: &site.building_eload,
            hload: &site.building_hload,
            electrical_scalar: b.scalar_electrical_load.max(0.0),
            heat_scalar: b.scalar_heat_load.max(0.0),
            fabric: FabricModel::select(&site.fabric_interventions, b.fabric_intervention_index)?,
        })
    }

    /// Electrical demand at `t` (kWh).
    pub fn electrical(&self, t: usize) -> f32 {
        self.eload.get(t).copied().unwrap_or(0.0) * self.electrical_scalar
    }

    /// Space-heating demand at `t` after the fabric reduction, floored at 0.
    pub fn space_heat(&self, t: usize) -> f32 {
        let raw = self.hload.get(t).copied().unwrap_or(0.0) * self.heat_scalar;
        (raw - self.fabric.reduction(t)).max(0.0)
    }

    /// Peak heating load after the fabric reduction (kW).
    pub fn peak_heat_load(&self, site_peak_kw: f32) -> f32 {
        (site_peak_kw * self.heat_scalar - self.fabric.peak_hload_reduction()).max(0.0)
    }
}
