//! Emission release series.
//!
//! A scenario carries one daily series per release target. Direct releases
//! go to air, the three water columns, the river and freshwater suspended
//! sediment, the three sediment beds, the four surface soils, and the four
//! deep soils. All series share the climate window length and are read by
//! day index.

use crate::compartment::SoilKind;
use crate::errors::{FateError, FateResult};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Daily release rates, kg/day, one value per simulated day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseSeries {
    /// Scenario label carried through to output, e.g. "baseline" or "spill".
    pub scenario: String,
    pub air: Array1<f64>,
    pub river_water: Array1<f64>,
    pub river_sus_sed: Array1<f64>,
    pub fresh_water: Array1<f64>,
    pub fresh_sus_sed: Array1<f64>,
    pub sea_water: Array1<f64>,
    pub sea_sus_sed: Array1<f64>,
    pub river_sediment: Array1<f64>,
    pub fresh_sediment: Array1<f64>,
    pub sea_sediment: Array1<f64>,
    pub soil: [Array1<f64>; 4],
    pub deep_soil: [Array1<f64>; 4],
}

/// One day's release rates, kg/day.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReleaseDay {
    pub air: f64,
    pub river_water: f64,
    pub river_sus_sed: f64,
    pub fresh_water: f64,
    pub fresh_sus_sed: f64,
    pub sea_water: f64,
    pub sea_sus_sed: f64,
    pub river_sediment: f64,
    pub fresh_sediment: f64,
    pub sea_sediment: f64,
    pub soil: [f64; 4],
    pub deep_soil: [f64; 4],
}

impl ReleaseSeries {
    /// A zero-release scenario over `days` days.
    pub fn zero(scenario: impl Into<String>, days: usize) -> Self {
        let z = || Array1::zeros(days);
        Self {
            scenario: scenario.into(),
            air: z(),
            river_water: z(),
            river_sus_sed: z(),
            fresh_water: z(),
            fresh_sus_sed: z(),
            sea_water: z(),
            sea_sus_sed: z(),
            river_sediment: z(),
            fresh_sediment: z(),
            sea_sediment: z(),
            soil: [z(), z(), z(), z()],
            deep_soil: [z(), z(), z(), z()],
        }
    }

    pub fn len(&self) -> usize {
        self.air.len()
    }

    pub fn is_empty(&self) -> bool {
        self.air.is_empty()
    }

    /// All series must share one length.
    pub fn validate(&self) -> FateResult<()> {
        let n = self.air.len();
        let same = [
            self.river_water.len(),
            self.river_sus_sed.len(),
            self.fresh_water.len(),
            self.fresh_sus_sed.len(),
            self.sea_water.len(),
            self.sea_sus_sed.len(),
            self.river_sediment.len(),
            self.fresh_sediment.len(),
            self.sea_sediment.len(),
        ]
        .iter()
        .all(|len| *len == n)
            && self.soil.iter().all(|s| s.len() == n)
            && self.deep_soil.iter().all(|s| s.len() == n);
        if same {
            Ok(())
        } else {
            Err(FateError::SeriesLengthMismatch(format!(
                "release series for scenario '{}' differ in length",
                self.scenario
            )))
        }
    }

    pub fn day(&self, index: usize) -> FateResult<ReleaseDay> {
        if index >= self.len() {
            return Err(FateError::Config(format!(
                "release day {index} beyond series of {} days",
                self.len()
            )));
        }
        Ok(ReleaseDay {
            air: self.air[index],
            river_water: self.river_water[index],
            river_sus_sed: self.river_sus_sed[index],
            fresh_water: self.fresh_water[index],
            fresh_sus_sed: self.fresh_sus_sed[index],
            sea_water: self.sea_water[index],
            sea_sus_sed: self.sea_sus_sed[index],
            river_sediment: self.river_sediment[index],
            fresh_sediment: self.fresh_sediment[index],
            sea_sediment: self.sea_sediment[index],
            soil: self.soil.clone().map(|s| s[index]),
            deep_soil: self.deep_soil.clone().map(|s| s[index]),
        })
    }
}

impl ReleaseDay {
    pub fn soil(&self, kind: SoilKind) -> f64 {
        self.soil[kind.index()]
    }

    pub fn deep_soil(&self, kind: SoilKind) -> f64 {
        self.deep_soil[kind.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn zero_series_validates_and_reads() {
        let series = ReleaseSeries::zero("baseline", 5);
        series.validate().unwrap();
        let day = series.day(4).unwrap();
        assert_eq!(day.air, 0.0);
        assert_eq!(day.soil(SoilKind::Urban), 0.0);
        assert!(series.day(5).is_err());
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let mut series = ReleaseSeries::zero("bad", 3);
        series.sea_water = array![1.0, 2.0];
        assert!(series.validate().is_err());
    }
}
