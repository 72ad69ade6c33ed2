//! Per-process flux accounting.
//!
//! Each day the assemblers record every process as a mass flow in kg/day:
//! source compartment, destination, and magnitude. Either endpoint may be
//! the domain boundary: releases and background inflows arrive from
//! outside, degradation, burial, advective outflow, and leaching leave to a
//! designated sink. Records keep the order they were pushed in, so a day's
//! ledger reads the same way across runs and compartment subsets only drop
//! rows, never reorder them.

use envfate_core::Medium;
use serde::Serialize;

/// One process flow on one day, kg/day. A `None` endpoint is the domain
/// boundary.
#[derive(Debug, Clone, Serialize)]
pub struct FluxRecord {
    /// Process label, e.g. "degradation" or "sediment burial".
    pub process: &'static str,
    pub from: Option<Medium>,
    pub to: Option<Medium>,
    pub kg_per_day: f64,
}

/// A day's ordered flux records.
#[derive(Debug, Default)]
pub struct FluxLedger {
    records: Vec<FluxRecord>,
}

impl FluxLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a compartment-to-compartment flow.
    pub fn transfer(&mut self, process: &'static str, from: Medium, to: Medium, kg_per_day: f64) {
        self.records.push(FluxRecord {
            process,
            from: Some(from),
            to: Some(to),
            kg_per_day,
        });
    }

    /// Record a flow into a designated sink.
    pub fn sink(&mut self, process: &'static str, from: Medium, kg_per_day: f64) {
        self.records.push(FluxRecord {
            process,
            from: Some(from),
            to: None,
            kg_per_day,
        });
    }

    /// Record an inflow from outside the domain.
    pub fn inflow(&mut self, process: &'static str, to: Medium, kg_per_day: f64) {
        self.records.push(FluxRecord {
            process,
            from: None,
            to: Some(to),
            kg_per_day,
        });
    }

    pub fn records(&self) -> &[FluxRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total flow delivered into a compartment, kg/day, inflows included.
    pub fn total_into(&self, medium: Medium) -> f64 {
        self.records
            .iter()
            .filter(|r| r.to == Some(medium))
            .map(|r| r.kg_per_day)
            .sum()
    }

    /// Total flow leaving a compartment, kg/day, sinks included.
    pub fn total_out_of(&self, medium: Medium) -> f64 {
        self.records
            .iter()
            .filter(|r| r.from == Some(medium))
            .map(|r| r.kg_per_day)
            .sum()
    }

    /// Total entering the domain from outside, kg/day.
    pub fn inflow_total(&self) -> f64 {
        self.records
            .iter()
            .filter(|r| r.from.is_none())
            .map(|r| r.kg_per_day)
            .sum()
    }

    /// Total leaving the domain through sinks, kg/day.
    pub fn sink_total(&self) -> f64 {
        self.records
            .iter()
            .filter(|r| r.to.is_none())
            .map(|r| r.kg_per_day)
            .sum()
    }

    /// Total for one named process, kg/day.
    pub fn process_total(&self, process: &str) -> f64 {
        self.records
            .iter()
            .filter(|r| r.process == process)
            .map(|r| r.kg_per_day)
            .sum()
    }

    /// Net rate of change of the whole domain, kg/day: inflows minus sinks.
    pub fn net_domain_rate(&self) -> f64 {
        self.inflow_total() - self.sink_total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn totals_sum_by_endpoint() {
        let mut ledger = FluxLedger::new();
        ledger.inflow("release", Medium::Air, 1.0);
        ledger.transfer("dry deposition", Medium::Air, Medium::SeaWater, 2.0);
        ledger.transfer("diffusion", Medium::SeaWater, Medium::Air, 0.5);
        ledger.sink("degradation", Medium::SeaWater, 1.5);
        assert_relative_eq!(ledger.total_into(Medium::SeaWater), 2.0);
        assert_relative_eq!(ledger.total_out_of(Medium::SeaWater), 2.0);
        assert_relative_eq!(ledger.total_into(Medium::Air), 1.5);
        assert_relative_eq!(ledger.sink_total(), 1.5);
        assert_relative_eq!(ledger.net_domain_rate(), -0.5);
    }

    #[test]
    fn records_serialize_for_reporting() {
        let mut ledger = FluxLedger::new();
        ledger.inflow("release", Medium::Air, 1.0);
        ledger.sink("degradation", Medium::SeaWater, 0.5);
        let value = serde_json::to_value(ledger.records()).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["process"], "release");
        assert!(rows[0]["from"].is_null(), "inflows come from the boundary");
        assert!(rows[1]["to"].is_null(), "sinks leave the domain");
        assert_eq!(rows[1]["kg_per_day"], 0.5);
    }

    #[test]
    fn records_keep_push_order() {
        let mut ledger = FluxLedger::new();
        ledger.transfer("a", Medium::Air, Medium::RiverWater, 1.0);
        ledger.sink("b", Medium::RiverWater, 2.0);
        ledger.transfer("c", Medium::RiverWater, Medium::RiverSediment, 3.0);
        let names: Vec<_> = ledger.records().iter().map(|r| r.process).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
