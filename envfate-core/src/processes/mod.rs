//! Process calculators shared by the chemistry-specific assemblers.
//!
//! Fugacity-space calculators yield D values in mol/(Pa·day); mass-space
//! calculators yield first-order rate constants in 1/day or fluxes in
//! kg/day. Every calculator returns zero on degenerate input (zero area,
//! volume, flow, or capacity) instead of dividing by it.

pub mod advection;
pub mod degradation;
pub mod deposition;
pub mod diffusion;
pub mod nano;
pub mod sediment;
pub mod soil;
