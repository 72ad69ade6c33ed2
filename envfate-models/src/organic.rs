//! Fugacity assembler for non-ionizing organic chemicals.
//!
//! The 15 states are compartment fugacities (Pa) in the layout of
//! [`organic_layout`]. Each day compiles into a linear term table: every
//! process is either a source (mol/day into one state) or a D-value term
//! (mol/(Pa·day) from one state, delivered to another state or to a sink).
//! The derivative of state $i$ is then
//!
//! $$ \frac{df_i}{dt} = \frac{1}{V_i Z_i}
//!    \left( \sum_{sources} N + \sum_{in} D f_{from} - \sum_{out} D f_i \right) $$
//!
//! with a zero-capacity state pinned at zero. Building the table once per
//! day keeps the derivative evaluation allocation-free inside the
//! integrator, and the same table prices every process in kg/day for the
//! flux ledger, in a fixed push order.
//!
//! Absent compartments carry zero capacity, so their terms are filtered out
//! at table construction; fluxes whose natural destination is absent follow
//! the fallback chains in [`crate::routing`].

use crate::fluxes::FluxLedger;
use crate::routing::{self, RouteOutcome};
use envfate_core::compartment::organic_layout as lay;
use envfate_core::params::{
    Background, Environment, OrganicChemical, ReleaseDay, WaterBodyEnv, WaterVolumes,
};
use envfate_core::partition::FugacityTable;
use envfate_core::processes::{advection, degradation, deposition, diffusion, sediment, soil};
use envfate_core::{safe_div, ClimateDay, FateResult, Medium, Presence, SoilKind};

/// The compartment behind each state index.
pub fn medium_of(state: usize) -> Medium {
    match state {
        lay::AIR => Medium::Air,
        lay::RIVER_WATER => Medium::RiverWater,
        lay::RIVER_SEDIMENT => Medium::RiverSediment,
        lay::FRESH_WATER => Medium::FreshWater,
        lay::FRESH_SEDIMENT => Medium::FreshSediment,
        lay::SEA_WATER => Medium::SeaWater,
        lay::SEA_SEDIMENT => Medium::SeaSediment,
        _ => {
            let kind = SoilKind::ALL[(state - 7) / 2];
            if (state - 7) % 2 == 0 {
                Medium::SoilSolid(kind)
            } else {
                Medium::DeepSoil(kind)
            }
        }
    }
}

/// State receiving a routed flux. Suspended-sediment destinations collapse
/// into their water column, which carries that phase in this layout.
pub(crate) fn state_of(medium: Medium) -> usize {
    match medium {
        Medium::Air | Medium::Aerosol => lay::AIR,
        Medium::RiverWater | Medium::RiverSusSed => lay::RIVER_WATER,
        Medium::RiverSediment => lay::RIVER_SEDIMENT,
        Medium::FreshWater | Medium::FreshSusSed => lay::FRESH_WATER,
        Medium::FreshSediment => lay::FRESH_SEDIMENT,
        Medium::SeaWater | Medium::SeaSusSed => lay::SEA_WATER,
        Medium::SeaSediment => lay::SEA_SEDIMENT,
        Medium::SoilSolid(k) | Medium::SoilWater(k) => lay::soil_surface(k),
        Medium::DeepSoil(k) => lay::soil_deep(k),
    }
}

/// Scenario inputs for the organic chemistry.
#[derive(Debug, Clone)]
pub struct OrganicModel {
    pub chem: OrganicChemical,
    pub env: Environment,
    pub presence: Presence,
    pub background: Background,
}

/// One D-value process: flux = `d` times the source fugacity, mol/day.
#[derive(Debug, Clone, Copy)]
struct Term {
    process: &'static str,
    from: usize,
    to: Option<usize>,
    d: f64,
}

/// A constant source, mol/day.
#[derive(Debug, Clone, Copy)]
struct Source {
    process: &'static str,
    to: usize,
    mol_per_day: f64,
}

/// One day's compiled term table.
#[derive(Debug)]
pub struct OrganicDay {
    capacities: [f64; lay::N],
    terms: Vec<Term>,
    sources: Vec<Source>,
    molar_mass: f64,
}

struct TableBuilder {
    capacities: [f64; lay::N],
    terms: Vec<Term>,
    sources: Vec<Source>,
}

impl TableBuilder {
    /// A term is kept only when both endpoints hold capacity; an absent or
    /// empty compartment neither sheds nor receives it.
    fn term(&mut self, process: &'static str, from: usize, to: Option<usize>, d: f64) {
        let live = d > 0.0
            && self.capacities[from] > 0.0
            && to.map_or(true, |t| self.capacities[t] > 0.0);
        if live {
            self.terms.push(Term {
                process,
                from,
                to,
                d,
            });
        }
    }

    /// A routed term follows its fallback chain; an exhausted chain drops
    /// the process entirely.
    fn routed(&mut self, chain: &routing::RouteChain, presence: &Presence, from: usize, d: f64) {
        if let RouteOutcome::Deliver(medium) = chain.resolve(presence) {
            self.term(chain.process, from, Some(state_of(medium)), d);
        }
    }

    fn source(&mut self, process: &'static str, to: usize, mol_per_day: f64) {
        if mol_per_day > 0.0 && self.capacities[to] > 0.0 {
            self.sources.push(Source {
                process,
                to,
                mol_per_day,
            });
        }
    }
}

struct WaterRow<'a> {
    water: usize,
    sed: usize,
    body: &'a WaterBodyEnv,
    vols: &'a WaterVolumes,
    z_ss: f64,
    z_bulk: f64,
    z_sed_solid: f64,
    z_sed_bulk: f64,
    water_rate: f64,
    ss_rate: f64,
    sed_water_rate: f64,
    sed_solid_rate: f64,
    inflow_m3_d: f64,
    background: f64,
    outflow_m3_d: f64,
    /// Downstream state for the water-column outflow; `None` leaves the
    /// domain.
    outflow_to: Option<usize>,
}

impl OrganicModel {
    /// Compile the term table for one day of forcing.
    pub fn day_system(&self, climate: &ClimateDay, release: &ReleaseDay) -> FateResult<OrganicDay> {
        let geom = self.env.geometry(&self.presence, climate.flow_river_m3_s)?;
        let z = FugacityTable::new(&self.chem, &self.env, &geom, climate.temperature_k);
        let rates = self.chem.rates();
        let m = self.chem.molar_mass;

        let mut b = TableBuilder {
            capacities: z.capacities(&geom),
            terms: Vec::new(),
            sources: Vec::new(),
        };

        // direct releases
        b.source("release", lay::AIR, release.air / m);
        b.source(
            "release",
            lay::RIVER_WATER,
            (release.river_water + release.river_sus_sed) / m,
        );
        b.source("release", lay::RIVER_SEDIMENT, release.river_sediment / m);
        b.source(
            "release",
            lay::FRESH_WATER,
            (release.fresh_water + release.fresh_sus_sed) / m,
        );
        b.source("release", lay::FRESH_SEDIMENT, release.fresh_sediment / m);
        b.source(
            "release",
            lay::SEA_WATER,
            (release.sea_water + release.sea_sus_sed) / m,
        );
        b.source("release", lay::SEA_SEDIMENT, release.sea_sediment / m);
        for kind in SoilKind::ALL {
            b.source("release", lay::soil_surface(kind), release.soil(kind) / m);
            b.source("release", lay::soil_deep(kind), release.deep_soil(kind) / m);
        }

        // air advection
        let g_air = advection::g_air(climate.windspeed_m_d, geom.total_area, self.env.air.height);
        b.source(
            "background inflow",
            lay::AIR,
            advection::inflow_mol(g_air, self.background.air, m),
        );
        b.term(
            "advective outflow",
            lay::AIR,
            None,
            advection::d_advection(g_air, z.air_bulk),
        );
        b.term(
            "degradation",
            lay::AIR,
            None,
            degradation::d_degradation(geom.air, rates.air, z.air)
                + degradation::d_degradation(geom.aerosol, rates.aerosol, z.aerosol),
        );

        // deposition pathways out of air, one term per receiving surface
        let v_aerosol = deposition::settling_velocity(
            self.env.air.aerosol.particle_radius,
            self.env.air.aerosol.particle_density,
            self.env.air.density,
            self.env.air.dyn_viscosity,
        );
        let surfaces: [(usize, f64); 7] = [
            (lay::RIVER_WATER, geom.river.area),
            (lay::FRESH_WATER, geom.fresh.area),
            (lay::SEA_WATER, geom.sea.area),
            (lay::soil_surface(SoilKind::Undeveloped), geom.soils[0].area),
            (lay::soil_surface(SoilKind::Urban), geom.soils[1].area),
            (lay::soil_surface(SoilKind::Agricultural), geom.soils[2].area),
            (lay::soil_surface(SoilKind::Biosolid), geom.soils[3].area),
        ];
        for (state, area) in surfaces {
            b.term(
                "rain dissolution",
                lay::AIR,
                Some(state),
                advection::d_rain_dissolution(climate.precip_m, area, z.water),
            );
            b.term(
                "dry deposition",
                lay::AIR,
                Some(state),
                deposition::d_deposition(v_aerosol, area, z.aerosol * geom.aerosol_fraction),
            );
            b.term(
                "wet deposition",
                lay::AIR,
                Some(state),
                deposition::d_wet_deposition(
                    climate.precip_m,
                    self.env.air.aerosol.scavenging_ratio,
                    area,
                    z.aerosol,
                    geom.aerosol_fraction,
                ),
            );
        }

        // diffusive air-water exchange
        let d_mol_air = diffusion::diffusivity_air(m, climate.temperature_k);
        let d_mol_water = diffusion::diffusivity_water(m);
        let k_air = diffusion::mtc(d_mol_air, diffusion::AIR_FILM_M);
        let k_water = diffusion::mtc(d_mol_water, diffusion::WATER_FILM_M);
        for (state, area) in &surfaces[..3] {
            let d = diffusion::d_air_water(*area, k_air, z.air, k_water, z.water);
            b.term("diffusion", lay::AIR, Some(*state), d);
            b.term("diffusion", *state, Some(lay::AIR), d);
        }

        // diffusive air-soil exchange and wind erosion
        for kind in SoilKind::ALL {
            let i = kind.index();
            let s = &self.env.soils[i];
            let surf = lay::soil_surface(kind);
            let k_soil_air = diffusion::soil_air_mtc(d_mol_air, s.air_content, s.water_content, s.depth);
            let k_soil_water =
                diffusion::soil_water_mtc(d_mol_water, s.air_content, s.water_content, s.depth);
            let d = diffusion::d_air_soil(
                geom.soils[i].area,
                k_air,
                z.air,
                k_soil_air,
                k_soil_water,
                z.water,
            );
            b.term("diffusion", lay::AIR, Some(surf), d);
            b.term("diffusion", surf, Some(lay::AIR), d);
            b.routed(
                &routing::WIND_EROSION,
                &self.presence,
                surf,
                soil::d_wind_erosion(
                    climate.windspeed_m_s,
                    self.env.air.density,
                    s,
                    z.soil_solid[i],
                ),
            );
        }

        // water columns and their beds
        let rows = [
            WaterRow {
                water: lay::RIVER_WATER,
                sed: lay::RIVER_SEDIMENT,
                body: &self.env.river,
                vols: &geom.river,
                z_ss: z.river_sus_sed,
                z_bulk: z.river_bulk,
                z_sed_solid: z.river_sed_solid,
                z_sed_bulk: z.river_sed_bulk,
                water_rate: rates.river_water,
                ss_rate: rates.river_sus_sed,
                sed_water_rate: rates.river_sed_water,
                sed_solid_rate: rates.river_sed_solid,
                inflow_m3_d: climate.flow_river_m3_d,
                background: self.background.river,
                outflow_m3_d: climate.flow_river_m3_d,
                outflow_to: None,
            },
            WaterRow {
                water: lay::FRESH_WATER,
                sed: lay::FRESH_SEDIMENT,
                body: &self.env.fresh,
                vols: &geom.fresh,
                z_ss: z.fresh_sus_sed,
                z_bulk: z.fresh_bulk,
                z_sed_solid: z.fresh_sed_solid,
                z_sed_bulk: z.fresh_sed_bulk,
                water_rate: rates.fresh_water,
                ss_rate: rates.fresh_sus_sed,
                sed_water_rate: rates.fresh_sed_water,
                sed_solid_rate: rates.fresh_sed_solid,
                inflow_m3_d: climate.flow_fresh_m3_d,
                background: self.background.fresh,
                outflow_m3_d: climate.flow_fresh_m3_d,
                // the lake drains into the coastal sea
                outflow_to: self.presence.sea_water.then_some(lay::SEA_WATER),
            },
            WaterRow {
                water: lay::SEA_WATER,
                sed: lay::SEA_SEDIMENT,
                body: &self.env.sea,
                vols: &geom.sea,
                z_ss: z.sea_sus_sed,
                z_bulk: z.sea_bulk,
                z_sed_solid: z.sea_sed_solid,
                z_sed_bulk: z.sea_sed_bulk,
                water_rate: rates.sea_water,
                ss_rate: rates.sea_sus_sed,
                sed_water_rate: rates.sea_sed_water,
                sed_solid_rate: rates.sea_sed_solid,
                inflow_m3_d: 0.0,
                background: 0.0,
                // tidal exchange turns the basin over faster than the river
                outflow_m3_d: 10.0 * climate.flow_fresh_m3_d,
                outflow_to: None,
            },
        ];
        let k_sed = diffusion::mtc(d_mol_water, diffusion::SEDIMENT_FILM_M);
        for row in &rows {
            b.source(
                "background inflow",
                row.water,
                advection::inflow_mol(row.inflow_m3_d, row.background, m),
            );
            b.term(
                "degradation",
                row.water,
                None,
                degradation::d_degradation(row.vols.water, row.water_rate, z.water)
                    + degradation::d_degradation(row.vols.sus_sed, row.ss_rate, row.z_ss),
            );
            let v_ss = deposition::settling_velocity(
                row.body.ss_radius,
                row.body.ss_density,
                row.body.density,
                row.body.dyn_viscosity,
            );
            b.term(
                "suspended sediment deposition",
                row.water,
                Some(row.sed),
                deposition::d_deposition(v_ss, row.vols.area, row.z_ss * row.vols.sus_sed_fraction),
            );
            b.term(
                "advective outflow",
                row.water,
                row.outflow_to,
                advection::d_advection(row.outflow_m3_d, row.z_bulk),
            );
            let d_ws = diffusion::d_sediment_water(row.vols.area, k_sed, z.water);
            b.term("diffusion", row.water, Some(row.sed), d_ws);
            b.term("diffusion", row.sed, Some(row.water), d_ws);
            b.term(
                "resuspension",
                row.sed,
                Some(row.water),
                sediment::d_resuspension(
                    row.vols.area,
                    row.body.sediment.resuspension_rate,
                    row.z_sed_solid,
                ),
            );
            b.term(
                "sediment burial",
                row.sed,
                None,
                sediment::d_burial(row.vols.area, row.body.sediment.burial_rate, row.z_sed_solid),
            );
            b.source(
                "background inflow",
                row.sed,
                advection::inflow_mol(
                    row.inflow_m3_d * row.body.sediment.advective_fraction,
                    row.background,
                    m,
                ),
            );
            b.term(
                "bed advection",
                row.sed,
                None,
                sediment::d_sediment_advection(
                    row.outflow_m3_d,
                    row.body.sediment.advective_fraction,
                    row.z_sed_bulk,
                ),
            );
            b.term(
                "degradation",
                row.sed,
                None,
                degradation::d_degradation(row.vols.sediment_solid, row.sed_solid_rate, row.z_sed_solid)
                    + degradation::d_degradation(row.vols.sediment_water, row.sed_water_rate, z.water),
            );
        }

        // soils: degradation, runoff, erosion, infiltration, leaching
        let water_area = self.env.river.area + self.env.fresh.area;
        let river_share = safe_div(self.env.river.area, water_area);
        let fresh_share = safe_div(self.env.fresh.area, water_area);
        for kind in SoilKind::ALL {
            let i = kind.index();
            let s = &self.env.soils[i];
            let gvol = &geom.soils[i];
            let surf = lay::soil_surface(kind);
            let deep = lay::soil_deep(kind);

            // the undeveloped soil keeps its per-phase degradation record;
            // the managed soils carry a single bulk half-life
            let d_deg_surf = if kind == SoilKind::Undeveloped {
                degradation::d_degradation(gvol.air, rates.soil_air, z.air)
                    + degradation::d_degradation(gvol.water, rates.soil_water, z.water)
                    + degradation::d_degradation(gvol.solid, rates.soil_solid, z.soil_solid[i])
            } else {
                degradation::d_degradation(gvol.total, rates.soil_solid, z.soil_bulk[i])
            };
            b.term("degradation", surf, None, d_deg_surf);

            let d_run = soil::d_runoff(climate.precip_mm, gvol.retention, gvol.area, z.water);
            b.routed(&routing::RUNOFF_RIVER, &self.presence, surf, d_run * river_share);
            b.routed(&routing::RUNOFF_FRESH, &self.presence, surf, d_run * fresh_share);

            let d_ero = soil::d_erosion(climate.precip_mm, s, z.soil_solid[i]);
            b.routed(&routing::SOIL_EROSION_RIVER, &self.presence, surf, d_ero * river_share);
            b.routed(&routing::SOIL_EROSION_FRESH, &self.presence, surf, d_ero * fresh_share);

            let (d_infiltration, infiltration_flow) = soil::d_infiltration(
                climate.precip_mm,
                gvol.retention,
                climate.evap_mm,
                s.field_capacity,
                s.water_content,
                gvol.area,
                z.water,
            );
            b.term("infiltration", surf, Some(deep), d_infiltration);
            // leachate continues to groundwater, out of the domain
            b.term("leaching", deep, None, soil::d_leach(infiltration_flow, z.water));
            b.term(
                "degradation",
                deep,
                None,
                degradation::d_degradation(gvol.deep, rates.deep_soil, z.deep_soil[i]),
            );
        }

        log::trace!(
            "organic day table: {} terms, {} sources",
            b.terms.len(),
            b.sources.len()
        );
        Ok(OrganicDay {
            capacities: b.capacities,
            terms: b.terms,
            sources: b.sources,
            molar_mass: m,
        })
    }
}

impl OrganicDay {
    /// Rate of change of each state fugacity, Pa/day.
    pub fn derivatives(&self, f: &[f64; lay::N]) -> [f64; lay::N] {
        let mut net = [0.0_f64; lay::N];
        for s in &self.sources {
            net[s.to] += s.mol_per_day;
        }
        for t in &self.terms {
            let flux = t.d * f[t.from];
            net[t.from] -= flux;
            if let Some(to) = t.to {
                net[to] += flux;
            }
        }
        let mut out = [0.0_f64; lay::N];
        for i in 0..lay::N {
            out[i] = safe_div(net[i], self.capacities[i]);
        }
        out
    }

    /// Price every process at the given state, kg/day, in table order.
    pub fn fluxes(&self, f: &[f64; lay::N]) -> FluxLedger {
        let mut ledger = FluxLedger::new();
        for s in &self.sources {
            ledger.inflow(s.process, medium_of(s.to), s.mol_per_day * self.molar_mass);
        }
        for t in &self.terms {
            let kg = t.d * f[t.from] * self.molar_mass;
            match t.to {
                Some(to) => ledger.transfer(t.process, medium_of(t.from), medium_of(to), kg),
                None => ledger.sink(t.process, medium_of(t.from), kg),
            }
        }
        ledger
    }

    /// Per-state $V Z$ capacities, mol/Pa.
    pub fn capacities(&self) -> &[f64; lay::N] {
        &self.capacities
    }

    /// Compartment inventories, kg.
    pub fn masses_kg(&self, f: &[f64; lay::N]) -> [f64; lay::N] {
        let mut out = [0.0_f64; lay::N];
        for i in 0..lay::N {
            out[i] = f[i] * self.capacities[i] * self.molar_mass;
        }
        out
    }

    pub fn total_mass_kg(&self, f: &[f64; lay::N]) -> f64 {
        self.masses_kg(f).iter().sum()
    }
}

/// An empty-domain state vector.
pub fn zero_state() -> [f64; lay::N] {
    [0.0; lay::N]
}
