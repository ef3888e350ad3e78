//! Dense heat pump performance lookup by integer air temperature.

use interp::{InterpMode, interp};

use crate::site::HeatPumpTable;

/// Heat output and electrical input per kW of rated heat pump power, for
/// one fixed send temperature, tabulated at every integer degree of air
/// temperature the source tables cover.
///
/// Queries outside the covered range return the edge value.
#[derive(Debug, Clone)]
pub struct TemperatureLookup {
    send_temperature: f32,
    /// Air temperature of index 0.
    offset: i32,
    heat: Vec<f32>,
    input: Vec<f32>,
}

/// Linear interpolation with the query clamped to the sample range.
fn interp_clamped(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    match xs.len() {
        0 => 0.0,
        1 => ys[0],
        n => interp(xs, ys, x.clamp(xs[0], xs[n - 1]), &InterpMode::default()),
    }
}

/// Collapses a table to one value per air temperature at `send_temperature`.
fn column_at(table: &HeatPumpTable, send_temperature: f32) -> (Vec<f64>, Vec<f64>) {
    let sends: Vec<f64> = table.send_temperatures.iter().map(|&s| f64::from(s)).collect();
    let airs: Vec<f64> = table.air_temperatures.iter().map(|&a| f64::from(a)).collect();
    let column = table
        .values
        .iter()
        .map(|row| {
            let row: Vec<f64> = row.iter().map(|&v| f64::from(v)).collect();
            interp_clamped(&sends, &row, f64::from(send_temperature))
        })
        .collect();
    (airs, column)
}

impl TemperatureLookup {
    /// Builds the dense lookup for one send temperature.
    ///
    /// Each table is first interpolated across its send-temperature columns,
    /// then across air temperature at every integer degree from the floor of
    /// the lowest to the ceiling of the highest air temperature of either
    /// table.
    ///
    /// # Arguments
    ///
    /// * `input_table` - Electrical input per kW rated
    /// * `output_table` - Heat output per kW rated
    /// * `send_temperature` - Flow temperature (°C)
    pub fn new(
        input_table: &HeatPumpTable,
        output_table: &HeatPumpTable,
        send_temperature: f32,
    ) -> Self {
        let (in_air, in_col) = column_at(input_table, send_temperature);
        let (out_air, out_col) = column_at(output_table, send_temperature);

        let edges = in_air.iter().chain(&out_air).copied();
        let lo = edges.clone().fold(f64::INFINITY, f64::min);
        let hi = edges.fold(f64::NEG_INFINITY, f64::max);
        let (lo, hi) = if lo.is_finite() && hi.is_finite() {
            (lo.floor() as i32, hi.ceil() as i32)
        } else {
            (0, 0)
        };

        let (heat, input) = (lo..=hi)
            .map(|deg| {
                let x = f64::from(deg);
                (
                    interp_clamped(&out_air, &out_col, x) as f32,
                    interp_clamped(&in_air, &in_col, x) as f32,
                )
            })
            .unzip();

        Self {
            send_temperature,
            offset: lo,
            heat,
            input,
        }
    }

    /// Returns `(heat_output, electrical_input)` per kW rated at `air_temp`.
    ///
    /// The temperature is rounded to the nearest degree and clamped to the
    /// covered range; NaN maps to the lowest entry.
    pub fn lookup(&self, air_temp: f32) -> (f32, f32) {
        let last = self.heat.len().saturating_sub(1);
        let rel = air_temp.round() - self.offset as f32;
        let idx = if rel >= 0.0 {
            (rel as usize).min(last)
        } else {
            0
        };
        match (self.heat.get(idx), self.input.get(idx)) {
            (Some(&h), Some(&i)) => (h, i),
            _ => (0.0, 0.0),
        }
    }

    /// Send temperature the lookup was built for.
    pub fn send_temperature(&self) -> f32 {
        self.send_temperature
    }

    /// Lowest and highest tabulated air temperature.
    pub fn temperature_range(&self) -> (i32, i32) {
        (
            self.offset,
            self.offset + self.heat.len().saturating_sub(1) as i32,
        )
    }
}
