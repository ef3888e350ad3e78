//! Per-day tariff statistics used by tariff-aware dispatch.

/// Percentile used when none is given.
pub const DEFAULT_PERCENTILE: f32 = 0.25;

/// Guards day boundaries against accumulated floating error.
const DAY_EPSILON: f64 = 1e-9;

/// Mean and low percentile of an import tariff over consecutive 24 h blocks.
///
/// Blocks start at the first timestep, not at calendar midnight. A final
/// partial block uses only its own samples.
#[derive(Debug, Clone)]
pub struct DayTariffStats {
    day_of_step: Vec<usize>,
    averages: Vec<f32>,
    percentiles: Vec<f32>,
    lengths: Vec<usize>,
}

impl DayTariffStats {
    /// Builds the statistics with [`DEFAULT_PERCENTILE`].
    pub fn new(tariff: &[f32], timestep_hours: f32) -> Self {
        Self::with_percentile(tariff, timestep_hours, DEFAULT_PERCENTILE)
    }

    /// Builds the statistics for an arbitrary percentile.
    ///
    /// # Arguments
    ///
    /// * `tariff` - Import price per timestep
    /// * `timestep_hours` - Duration of one timestep
    /// * `percentile` - Fraction in `[0, 1]`; the selected sample is at
    ///   index `floor(percentile * n)` of the sorted day, clamped to the day
    pub fn with_percentile(tariff: &[f32], timestep_hours: f32, percentile: f32) -> Self {
        let n = tariff.len();
        let dt = f64::from(timestep_hours);
        let total_hours = n as f64 * dt;
        let total_days = if n == 0 {
            0
        } else {
            ((total_hours / 24.0 - DAY_EPSILON).ceil() as usize).max(1)
        };

        let day_of_step: Vec<usize> = (0..n)
            .map(|t| {
                let day = (t as f64 * dt / 24.0 + DAY_EPSILON).floor() as usize;
                day.min(total_days.saturating_sub(1))
            })
            .collect();

        let mut buckets: Vec<Vec<f32>> = vec![Vec::new(); total_days];
        for (&day, &price) in day_of_step.iter().zip(tariff) {
            buckets[day].push(price);
        }

        let p = f64::from(percentile.clamp(0.0, 1.0));
        let mut averages = Vec::with_capacity(total_days);
        let mut percentiles = Vec::with_capacity(total_days);
        let mut lengths = Vec::with_capacity(total_days);
        for mut samples in buckets {
            lengths.push(samples.len());
            if samples.is_empty() {
                averages.push(0.0);
                percentiles.push(0.0);
                continue;
            }
            let sum: f64 = samples.iter().map(|&s| f64::from(s)).sum();
            averages.push((sum / samples.len() as f64) as f32);

            let k = ((p * samples.len() as f64).floor() as usize).min(samples.len() - 1);
            let (_, kth, _) = samples.select_nth_unstable_by(k, f32::total_cmp);
            percentiles.push(*kth);
        }

        Self {
            day_of_step,
            averages,
            percentiles,
            lengths,
        }
    }

    /// Day block containing timestep `t`.
    ///
    /// # Panics
    ///
    /// Panics if `t` is not a timestep of the series.
    pub fn day_index(&self, t: usize) -> usize {
        self.day_of_step[t]
    }

    /// Mean tariff of the day containing timestep `t`.
    ///
    /// # Panics
    ///
    /// Panics if `t` is not a timestep of the series.
    pub fn day_average(&self, t: usize) -> f32 {
        self.averages[self.day_of_step[t]]
    }

    /// Low-percentile tariff of the day containing timestep `t`.
    ///
    /// # Panics
    ///
    /// Panics if `t` is not a timestep of the series.
    pub fn day_percentile(&self, t: usize) -> f32 {
        self.percentiles[self.day_of_step[t]]
    }

    /// Number of day blocks.
    pub fn total_days(&self) -> usize {
        self.lengths.len()
    }

    /// Samples per day block; sums to the series length.
    pub fn day_lengths(&self) -> &[usize] {
        &self.lengths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn hourly_two_days() {
        let mut tariff = vec![0.30; 24];
        tariff.extend(vec![0.10; 24]);
        let stats = DayTariffStats::new(&tariff, 1.0);
        assert_eq!(stats.total_days(), 2);
        assert_eq!(stats.day_lengths(), &[24, 24]);
        assert_eq!(stats.day_index(23), 0);
        assert_eq!(stats.day_index(24), 1);
        assert_relative_eq!(stats.day_average(0), 0.30);
        assert_relative_eq!(stats.day_average(47), 0.10);
    }

    #[test]
    fn percentile_selects_floor_index() {
        // Sorted: 1..=8, p = 0.25 -> index 2 -> 3.0.
        let tariff = [8.0, 1.0, 7.0, 2.0, 6.0, 3.0, 5.0, 4.0];
        let stats = DayTariffStats::new(&tariff, 3.0);
        assert_eq!(stats.total_days(), 1);
        assert_eq!(stats.day_percentile(5), 3.0);
        assert_relative_eq!(stats.day_average(0), 4.5);
    }

    #[test]
    fn percentile_one_clamps_to_max() {
        let tariff = [0.2, 0.5, 0.1];
        let stats = DayTariffStats::with_percentile(&tariff, 8.0, 1.0);
        assert_eq!(stats.day_percentile(0), 0.5);
    }

    #[test]
    fn partial_last_day_uses_own_samples() {
        // 30 hourly samples: a full day then a 6 hour tail.
        let mut tariff = vec![0.2; 24];
        tariff.extend([0.4, 0.6, 0.4, 0.6, 0.4, 0.6]);
        let stats = DayTariffStats::new(&tariff, 1.0);
        assert_eq!(stats.total_days(), 2);
        assert_eq!(stats.day_lengths(), &[24, 6]);
        assert_relative_eq!(stats.day_average(29), 0.5, epsilon = 1e-6);
        assert_eq!(stats.day_percentile(29), 0.4);
    }

    #[test]
    fn single_sample_day() {
        let stats = DayTariffStats::new(&[0.33], 24.0);
        assert_eq!(stats.day_lengths(), &[1]);
        assert_eq!(stats.day_average(0), 0.33);
        assert_eq!(stats.day_percentile(0), 0.33);
    }

    #[test]
    fn non_divisor_timestep_lengths_sum_to_n() {
        let tariff = vec![0.25; 100];
        let stats = DayTariffStats::new(&tariff, 0.7);
        assert_eq!(stats.day_lengths().iter().sum::<usize>(), 100);
        assert_eq!(stats.total_days(), 3);
    }

    #[test]
    fn half_hourly_boundaries_are_stable() {
        let tariff = vec![0.1; 96];
        let stats = DayTariffStats::new(&tariff, 0.5);
        assert_eq!(stats.day_lengths(), &[48, 48]);
    }

    #[test]
    fn flat_tariff_average_and_percentile_equal_the_price() {
        for (price, n, dt) in [(0.1_f32, 30, 1.0_f32), (0.37, 100, 0.7), (0.2, 7, 5.0)] {
            let stats = DayTariffStats::new(&vec![price; n], dt);
            // Each case ends on a partial day.
            let lengths = stats.day_lengths();
            assert_eq!(lengths.iter().sum::<usize>(), n);
            assert!(lengths[lengths.len() - 1] < lengths[0]);
            for t in 0..n {
                assert_relative_eq!(stats.day_average(t), price, epsilon = 1e-6);
                assert_eq!(stats.day_percentile(t), price);
            }
        }
    }

    #[test]
    fn empty_tariff_has_no_days() {
        let stats = DayTariffStats::new(&[], 1.0);
        assert_eq!(stats.total_days(), 0);
        assert!(stats.day_lengths().is_empty());
    }
}
