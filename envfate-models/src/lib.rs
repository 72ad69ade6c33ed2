//! Chemistry-specific assemblers over the core process library: the
//! fugacity formalism for neutral organics, the aquivalence formalism for
//! metals and ionizable organics, and the mass-balance formalism for
//! nanomaterials, plus the flux ledger, presence-aware routing tables, and
//! the transport-network audit they share.

pub mod aquivalence;
pub mod fixtures;
pub mod fluxes;
pub mod nano;
pub mod network;
pub mod organic;
pub mod routing;

pub use aquivalence::{AquivalenceChemical, AquivalenceDay, AquivalenceModel};
pub use fluxes::{FluxLedger, FluxRecord};
pub use nano::{NanoDay, NanoModel};
pub use network::TransportNetwork;
pub use organic::{OrganicDay, OrganicModel};
pub use routing::{RouteChain, RouteOutcome};
