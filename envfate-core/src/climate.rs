//! Daily climate forcing.
//!
//! Raw records arrive in the units the monitoring products use (mm of
//! precipitation, m/s of wind, m³/s of flow, °C). The engine consumes derived
//! per-day variants: precipitation in m/day, wind in m/day, flow in m³/day,
//! temperature in K. Both are exposed on [`ClimateDay`] because some
//! calculators (curve-number runoff, wind-erosion thresholds) are fitted in
//! their fitted units.

use crate::compartment::SECONDS_PER_DAY;
use crate::errors::{FateError, FateResult};
use chrono::NaiveDate;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Daily climate record series, anchored at `start` with one entry per day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClimateSeries {
    pub start: NaiveDate,
    /// Precipitation, mm/day.
    pub precip_mm: Array1<f64>,
    /// Evaporation, mm/day.
    pub evap_mm: Array1<f64>,
    /// Wind speed, m/s.
    pub windspeed_m_s: Array1<f64>,
    /// River flow, m³/s.
    pub flow_river_m3_s: Array1<f64>,
    /// Lake/freshwater flow, m³/s.
    pub flow_fresh_m3_s: Array1<f64>,
    /// Air temperature, °C.
    pub temperature_c: Array1<f64>,
}

/// One day of forcing with the derived unit variants alongside the raw ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateDay {
    pub precip_mm: f64,
    pub precip_m: f64,
    pub evap_mm: f64,
    pub windspeed_m_s: f64,
    pub windspeed_m_d: f64,
    pub flow_river_m3_s: f64,
    pub flow_river_m3_d: f64,
    pub flow_fresh_m3_s: f64,
    pub flow_fresh_m3_d: f64,
    pub temperature_k: f64,
}

impl ClimateDay {
    /// All-zero forcing at the given temperature. Useful in tests and for
    /// scenarios with a dormant atmosphere.
    pub fn calm(temperature_c: f64) -> Self {
        Self {
            precip_mm: 0.0,
            precip_m: 0.0,
            evap_mm: 0.0,
            windspeed_m_s: 0.0,
            windspeed_m_d: 0.0,
            flow_river_m3_s: 0.0,
            flow_river_m3_d: 0.0,
            flow_fresh_m3_s: 0.0,
            flow_fresh_m3_d: 0.0,
            temperature_k: temperature_c + 273.15,
        }
    }
}

impl ClimateSeries {
    /// Validate that every series has the same length.
    pub fn new(
        start: NaiveDate,
        precip_mm: Array1<f64>,
        evap_mm: Array1<f64>,
        windspeed_m_s: Array1<f64>,
        flow_river_m3_s: Array1<f64>,
        flow_fresh_m3_s: Array1<f64>,
        temperature_c: Array1<f64>,
    ) -> FateResult<Self> {
        let n = precip_mm.len();
        let lengths = [
            evap_mm.len(),
            windspeed_m_s.len(),
            flow_river_m3_s.len(),
            flow_fresh_m3_s.len(),
            temperature_c.len(),
        ];
        if lengths.iter().any(|&l| l != n) {
            return Err(FateError::SeriesLengthMismatch(format!(
                "precip={}, evap={}, wind={}, river flow={}, fresh flow={}, temperature={}",
                n, lengths[0], lengths[1], lengths[2], lengths[3], lengths[4]
            )));
        }
        Ok(Self {
            start,
            precip_mm,
            evap_mm,
            windspeed_m_s,
            flow_river_m3_s,
            flow_fresh_m3_s,
            temperature_c,
        })
    }

    pub fn len(&self) -> usize {
        self.precip_mm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Last date covered by the record, if any.
    pub fn end(&self) -> Option<NaiveDate> {
        if self.is_empty() {
            None
        } else {
            Some(self.start + chrono::Duration::days(self.len() as i64 - 1))
        }
    }

    /// Day offset of `date` within the record.
    pub fn day_index(&self, date: NaiveDate) -> FateResult<usize> {
        let offset = (date - self.start).num_days();
        if offset < 0 || offset as usize >= self.len() {
            return Err(FateError::DateOutOfRange {
                requested: date.to_string(),
                available: format!(
                    "{}..={}",
                    self.start,
                    self.end().map(|d| d.to_string()).unwrap_or_default()
                ),
            });
        }
        Ok(offset as usize)
    }

    /// Forcing for the day at `index`, with derived unit variants.
    pub fn day(&self, index: usize) -> FateResult<ClimateDay> {
        if index >= self.len() {
            return Err(FateError::DateOutOfRange {
                requested: format!("day index {index}"),
                available: format!("0..{}", self.len()),
            });
        }
        Ok(ClimateDay {
            precip_mm: self.precip_mm[index],
            precip_m: self.precip_mm[index] / 1000.0,
            evap_mm: self.evap_mm[index],
            windspeed_m_s: self.windspeed_m_s[index],
            windspeed_m_d: self.windspeed_m_s[index] * SECONDS_PER_DAY,
            flow_river_m3_s: self.flow_river_m3_s[index],
            flow_river_m3_d: self.flow_river_m3_s[index] * SECONDS_PER_DAY,
            flow_fresh_m3_s: self.flow_fresh_m3_s[index],
            flow_fresh_m3_d: self.flow_fresh_m3_s[index] * SECONDS_PER_DAY,
            temperature_k: self.temperature_c[index] + 273.15,
        })
    }

    /// Restrict the record to `[window_start, window_end]` inclusive.
    pub fn slice(&self, window_start: NaiveDate, window_end: NaiveDate) -> FateResult<Self> {
        if window_end < window_start {
            return Err(FateError::Config(format!(
                "window end {window_end} precedes start {window_start}"
            )));
        }
        let first = self.day_index(window_start)?;
        let last = self.day_index(window_end)?;
        let take = |a: &Array1<f64>| a.slice(ndarray::s![first..=last]).to_owned();
        Ok(Self {
            start: window_start,
            precip_mm: take(&self.precip_mm),
            evap_mm: take(&self.evap_mm),
            windspeed_m_s: take(&self.windspeed_m_s),
            flow_river_m3_s: take(&self.flow_river_m3_s),
            flow_fresh_m3_s: take(&self.flow_fresh_m3_s),
            temperature_c: take(&self.temperature_c),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn series() -> ClimateSeries {
        ClimateSeries::new(
            NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
            array![2.0, 0.0, 10.0],
            array![1.0, 1.0, 1.0],
            array![3.0, 0.0, 6.0],
            array![100.0, 80.0, 120.0],
            array![10.0, 8.0, 12.0],
            array![15.0, 20.0, -5.0],
        )
        .unwrap()
    }

    #[test]
    fn derived_units_follow_raw_records() {
        let day = series().day(0).unwrap();
        assert_relative_eq!(day.precip_m, 0.002);
        assert_relative_eq!(day.windspeed_m_d, 3.0 * 86_400.0);
        assert_relative_eq!(day.flow_river_m3_d, 100.0 * 86_400.0);
        assert_relative_eq!(day.temperature_k, 288.15);
    }

    #[test]
    fn mismatched_lengths_rejected() {
        let result = ClimateSeries::new(
            NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
            array![1.0, 2.0],
            array![1.0],
            array![1.0, 2.0],
            array![1.0, 2.0],
            array![1.0, 2.0],
            array![1.0, 2.0],
        );
        assert!(matches!(result, Err(FateError::SeriesLengthMismatch(_))));
    }

    #[test]
    fn slicing_by_date_window() {
        let s = series();
        let sliced = s
            .slice(
                NaiveDate::from_ymd_opt(2010, 1, 2).unwrap(),
                NaiveDate::from_ymd_opt(2010, 1, 3).unwrap(),
            )
            .unwrap();
        assert_eq!(sliced.len(), 2);
        assert_relative_eq!(sliced.precip_mm[0], 0.0);
        assert_relative_eq!(sliced.precip_mm[1], 10.0);
    }

    #[test]
    fn out_of_range_date_fails_loudly() {
        let s = series();
        let before = NaiveDate::from_ymd_opt(2009, 12, 31).unwrap();
        assert!(matches!(
            s.day_index(before),
            Err(FateError::DateOutOfRange { .. })
        ));
    }
}
