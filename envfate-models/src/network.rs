//! Transport-network audit.
//!
//! A day's flux ledger doubles as a directed graph: compartments are nodes,
//! process flows are edges. Building the graph makes two checks cheap: no
//! edge may touch an absent compartment, and every present compartment
//! should appear in at least one flow once the chemical has spread. The
//! graph also renders to Graphviz for eyeballing a scenario's topology.

use crate::fluxes::FluxRecord;
use envfate_core::{Medium, Presence};
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct TransportNetwork {
    graph: DiGraph<Medium, &'static str>,
    nodes: HashMap<Medium, NodeIndex>,
}

impl TransportNetwork {
    /// Build the graph of one day's compartment-to-compartment flows.
    /// Sink flows have no destination node and contribute only their source.
    pub fn from_records(records: &[FluxRecord]) -> Self {
        let mut network = Self::default();
        for record in records {
            let from = record.from.map(|m| network.node(m));
            let to = record.to.map(|m| network.node(m));
            if let (Some(from), Some(to)) = (from, to) {
                network.graph.add_edge(from, to, record.process);
            }
        }
        network
    }

    fn node(&mut self, medium: Medium) -> NodeIndex {
        if let Some(index) = self.nodes.get(&medium) {
            return *index;
        }
        let index = self.graph.add_node(medium);
        self.nodes.insert(medium, index);
        index
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Media touched by any flow while toggled absent. Always empty for a
    /// correctly gated assembler.
    pub fn absent_endpoints(&self, presence: &Presence) -> Vec<Medium> {
        self.nodes
            .keys()
            .filter(|m| !presence.has(**m))
            .copied()
            .collect()
    }

    /// Present media that no flow touches.
    pub fn untouched(&self, presence: &Presence, media: &[Medium]) -> Vec<Medium> {
        media
            .iter()
            .filter(|m| presence.has(**m) && !self.nodes.contains_key(m))
            .copied()
            .collect()
    }

    /// Graphviz rendering of the active topology.
    pub fn to_dot(&self) -> String {
        format!("{:?}", Dot::with_config(&self.graph, &[Config::GraphContentOnly]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fluxes::FluxLedger;
    use envfate_core::Toggles;

    fn sample_ledger() -> FluxLedger {
        let mut ledger = FluxLedger::new();
        ledger.transfer("dry deposition", Medium::Air, Medium::SeaWater, 1.0);
        ledger.transfer("sedimentation", Medium::SeaWater, Medium::SeaSediment, 0.4);
        ledger.sink("degradation", Medium::SeaWater, 0.1);
        ledger
    }

    #[test]
    fn graph_follows_the_ledger() {
        let network = TransportNetwork::from_records(sample_ledger().records());
        assert_eq!(network.node_count(), 3);
        assert_eq!(network.edge_count(), 2, "sinks add no edge");
    }

    #[test]
    fn absent_endpoints_are_flagged() {
        let network = TransportNetwork::from_records(sample_ledger().records());
        let no_sea = Presence::resolve(&Toggles {
            sea_water: false,
            ..Toggles::default()
        });
        let absent = network.absent_endpoints(&no_sea);
        assert!(absent.contains(&Medium::SeaWater));
    }

    #[test]
    fn untouched_media_are_listed() {
        let network = TransportNetwork::from_records(sample_ledger().records());
        let untouched = network.untouched(
            &Presence::all(),
            &[Medium::Air, Medium::RiverWater, Medium::SeaSediment],
        );
        assert_eq!(untouched, vec![Medium::RiverWater]);
    }
}
