use crate::config::SearchParams;
use crate::error::{FfResult, FittsForgeError};
use serde::{Deserialize, Serialize};

/// Geometric cooling: `T_{k+1} = rate * T_k`, `N` proposals per temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnealSchedule {
    pub initial_temperature: f64,
    pub final_temperature: f64,
    pub cooling_rate: f64,
    pub iterations_per_temperature: usize,
}

impl AnnealSchedule {
    pub fn new(
        initial_temperature: f64,
        final_temperature: f64,
        cooling_rate: f64,
        iterations_per_temperature: usize,
    ) -> FfResult<Self> {
        let schedule = Self {
            initial_temperature,
            final_temperature,
            cooling_rate,
            iterations_per_temperature,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Requires `T0 > Tf > 0`, `0 < rate < 1` and `N >= 1`.
    pub fn validate(&self) -> FfResult<()> {
        let (t0, tf, r) = (
            self.initial_temperature,
            self.final_temperature,
            self.cooling_rate,
        );
        if !(t0.is_finite() && tf.is_finite() && tf > 0.0 && t0 > tf) {
            return Err(FittsForgeError::InvalidParameter(format!(
                "temperatures must satisfy T0 > Tf > 0, got T0={} Tf={}",
                t0, tf
            )));
        }
        if !(r > 0.0 && r < 1.0) {
            return Err(FittsForgeError::InvalidParameter(format!(
                "cooling rate must be in (0, 1), got {}",
                r
            )));
        }
        if self.iterations_per_temperature == 0 {
            return Err(FittsForgeError::InvalidParameter(
                "iterations per temperature must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of outer (temperature) steps, `⌈log(Tf/T0) / log(rate)⌉`.
    ///
    /// Counted with the same repeated multiplication the engine uses so the
    /// two always agree, even when `T0 * rate^k` lands exactly on `Tf`.
    pub fn outer_steps(&self) -> usize {
        let mut t = self.initial_temperature;
        let mut steps = 0;
        while t > self.final_temperature {
            t *= self.cooling_rate;
            steps += 1;
        }
        steps
    }

    pub fn total_iterations(&self) -> usize {
        self.outer_steps()
            .saturating_mul(self.iterations_per_temperature)
    }
}

impl From<&SearchParams> for AnnealSchedule {
    fn from(p: &SearchParams) -> Self {
        Self {
            initial_temperature: p.temp_initial,
            final_temperature: p.temp_final,
            cooling_rate: p.cooling_rate,
            iterations_per_temperature: p.iterations_per_temp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outer_steps_halving() {
        let s = AnnealSchedule::new(1.0, 0.01, 0.5, 10).unwrap();
        assert_eq!(s.outer_steps(), 7);
        assert_eq!(s.total_iterations(), 70);
    }

    #[test]
    fn test_exact_boundary_is_not_revisited() {
        // 1 -> 0.5 -> 0.25 -> 0.125 (== Tf stops)
        let s = AnnealSchedule::new(1.0, 0.125, 0.5, 1).unwrap();
        assert_eq!(s.outer_steps(), 3);
    }

    #[test]
    fn test_total_iterations_saturates() {
        let s = AnnealSchedule::new(1.0, 0.5, 0.9, usize::MAX).unwrap();
        assert_eq!(s.outer_steps(), 7);
        assert_eq!(s.total_iterations(), usize::MAX);
    }

    #[test]
    fn test_default_search_params_are_valid() {
        let s = AnnealSchedule::from(&SearchParams::default());
        assert!(s.validate().is_ok());
    }
}
