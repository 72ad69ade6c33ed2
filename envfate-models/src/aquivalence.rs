//! Aquivalence assembler for metals and ionizable organics.
//!
//! Fugacity is replaced by aquivalence: the truly dissolved phase takes
//! capacity $Z = 1$ and every sorbed phase scales by its distribution
//! coefficient times the sorbent density or concentration. The 15 states
//! share the layout of the organic chemistry; within each water column the
//! burden speciates into particulate, colloidal, and truly dissolved (for
//! metals) or neutral and ionic (for ionizable organics), and each process
//! moves only the species it can carry:
//!
//! * advection carries the whole bulk capacity,
//! * settling carries the particulate term,
//! * sediment-water diffusion carries the dissolved and colloidal terms at
//!   their own mass-transfer coefficients,
//! * runoff and infiltration carry pore water, erosion carries solids.
//!
//! Metals have no gas phase and never degrade. The neutral species of an
//! ionizable organic does volatilize: its gas capacity is $K_{AW}$ times the
//! neutral dissolved capacity, and it exchanges with the water columns and
//! soils through the same two-film interfaces the neutral-organic chemistry
//! uses, with rain dissolving it back out of the air. Ionizables degrade
//! with their per-compartment half-lives against the bulk capacity.

use crate::fluxes::FluxLedger;
use crate::organic::{medium_of, state_of};
use crate::routing::{self, RouteOutcome};
use envfate_core::compartment::organic_layout as lay;
use envfate_core::params::{
    Background, DegradationRates, Environment, IonizableChemical, MetalChemical, ReleaseDay,
    WaterBodyEnv,
};
use envfate_core::processes::{advection, degradation, deposition, diffusion, sediment, soil};
use envfate_core::{safe_div, ClimateDay, FateResult, Presence, SoilKind, SECONDS_PER_DAY};

/// Bed diffusion exchanges through this share of the bed area.
const SED_DIFF_AREA_FRACTION: f64 = 0.6;
/// Sediment-water MTC of the truly dissolved species, m/s.
const MTC_DISSOLVED: f64 = 1.0e-5;
/// Sediment-water MTC of the colloidal species, m/s.
const MTC_COLLOID: f64 = 7.0e-7;

/// The chemistry running under the aquivalence formalism.
#[derive(Debug, Clone)]
pub enum AquivalenceChemical {
    Metal(MetalChemical),
    Ionizable(IonizableChemical),
}

impl AquivalenceChemical {
    pub fn molar_mass(&self) -> f64 {
        match self {
            Self::Metal(m) => m.molar_mass,
            Self::Ionizable(i) => i.neutral.molar_mass,
        }
    }

    /// Solid-water distribution coefficient, m³/kg, for a sorbent of the
    /// given organic-carbon content at the given pH. Metals ignore both.
    fn kd(&self, oc_fraction: f64, ph: f64, sed: bool) -> f64 {
        match self {
            Self::Metal(m) => {
                if sed {
                    m.kd_sediment
                } else {
                    m.kd_sus_sed
                }
            }
            Self::Ionizable(i) => {
                let neutral = i.neutral_fraction(ph);
                // L/kg koc down to m³/kg
                (neutral * i.neutral.koc + (1.0 - neutral) * i.koc_ion) * oc_fraction / 1000.0
            }
        }
    }

    fn kd_soil(&self, oc_fraction: f64) -> f64 {
        match self {
            Self::Metal(m) => m.kd_soil,
            Self::Ionizable(_) => self.kd(oc_fraction, 7.0, false),
        }
    }

    fn kd_colloid(&self, ph: f64) -> f64 {
        match self {
            Self::Metal(m) => m.kd_colloid,
            // colloids sorb like suspended organic matter
            Self::Ionizable(i) => self.kd(0.4, ph, false) * i.neutral.kow.log10().max(1.0) / 10.0,
        }
    }

    /// Neutral species fraction in solution at the given pH. Metals carry
    /// no neutral organic species.
    fn neutral_fraction(&self, ph: f64) -> f64 {
        match self {
            Self::Metal(_) => 0.0,
            Self::Ionizable(i) => i.neutral_fraction(ph),
        }
    }

    /// Gas-phase capacity of the neutral species against the dissolved
    /// unit, $K_{AW} \cdot Fr_n$. Zero for metals.
    fn z_gas(&self, ph: f64) -> f64 {
        match self {
            Self::Metal(_) => 0.0,
            Self::Ionizable(i) => i.neutral.kaw * i.neutral_fraction(ph),
        }
    }

    fn rates(&self) -> DegradationRates {
        match self {
            Self::Metal(_) => envfate_core::params::DegradationHalfLives::none().rates(),
            Self::Ionizable(i) => i.neutral.rates(),
        }
    }
}

/// Scenario inputs for the aquivalence chemistries.
#[derive(Debug, Clone)]
pub struct AquivalenceModel {
    pub chem: AquivalenceChemical,
    pub env: Environment,
    pub presence: Presence,
    pub background: Background,
}

#[derive(Debug, Clone, Copy)]
struct Term {
    process: &'static str,
    from: usize,
    to: Option<usize>,
    d: f64,
}

#[derive(Debug, Clone, Copy)]
struct Source {
    process: &'static str,
    to: usize,
    mol_per_day: f64,
}

/// One day's compiled term table over aquivalence states.
#[derive(Debug)]
pub struct AquivalenceDay {
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

/// Per-body aquivalence capacity split.
struct WaterZ {
    /// Particulate term, sorbed to the suspended load.
    particulate: f64,
    /// Colloidal term.
    colloidal: f64,
    /// Full column capacity, dissolved included.
    bulk: f64,
    sed_solid: f64,
    sed_bulk: f64,
}

fn water_z(chem: &AquivalenceChemical, body: &WaterBodyEnv) -> WaterZ {
    let particulate = chem.kd(body.ss_oc_fraction, body.ph, false) * body.ss_concentration;
    let colloidal = chem.kd_colloid(body.ph) * body.colloid_concentration;
    let sed_solid =
        chem.kd(body.sediment.oc_fraction, body.ph, true) * body.sediment.solid_density;
    WaterZ {
        particulate,
        colloidal,
        bulk: 1.0 + particulate + colloidal,
        sed_solid,
        sed_bulk: (1.0 - body.sediment.solid_fraction)
            + body.sediment.solid_fraction * sed_solid,
    }
}

impl AquivalenceModel {
    /// Compile the term table for one day of forcing.
    pub fn day_system(
        &self,
        climate: &ClimateDay,
        release: &ReleaseDay,
    ) -> FateResult<AquivalenceDay> {
        let geom = self.env.geometry(&self.presence, climate.flow_river_m3_s)?;
        let m = self.chem.molar_mass();
        let rates = self.chem.rates();
        let air = &self.env.air;

        // aerosol sorption plus the neutral-species gas phase, if any
        let z_air_gas = self.chem.z_gas(7.0);
        let z_air_bulk = z_air_gas
            + geom.aerosol_fraction
                * self.chem.kd(air.aerosol.oc_fraction, 7.0, false)
                * air.aerosol.particle_density;
        let river_z = water_z(&self.chem, &self.env.river);
        let fresh_z = water_z(&self.chem, &self.env.fresh);
        let sea_z = water_z(&self.chem, &self.env.sea);
        let soil_solid_z =
            SoilKind::ALL.map(|k| {
                let s = &self.env.soils[k.index()];
                self.chem.kd_soil(s.oc_fraction) * s.solid_density
            });
        let deep_z = SoilKind::ALL.map(|k| {
            let s = &self.env.soils[k.index()];
            self.chem.kd_soil(s.deep_oc_fraction) * s.solid_density
        });
        let soil_bulk_z = SoilKind::ALL.map(|k| {
            let s = &self.env.soils[k.index()];
            s.water_content + (1.0 - s.air_content - s.water_content) * soil_solid_z[k.index()]
        });

        let mut capacities = [0.0_f64; lay::N];
        capacities[lay::AIR] = geom.air_total * z_air_bulk;
        capacities[lay::RIVER_WATER] = (geom.river.water + geom.river.sus_sed) * river_z.bulk;
        capacities[lay::RIVER_SEDIMENT] = geom.river.sediment_total * river_z.sed_bulk;
        capacities[lay::FRESH_WATER] = (geom.fresh.water + geom.fresh.sus_sed) * fresh_z.bulk;
        capacities[lay::FRESH_SEDIMENT] = geom.fresh.sediment_total * fresh_z.sed_bulk;
        capacities[lay::SEA_WATER] = (geom.sea.water + geom.sea.sus_sed) * sea_z.bulk;
        capacities[lay::SEA_SEDIMENT] = geom.sea.sediment_total * sea_z.sed_bulk;
        for kind in SoilKind::ALL {
            let i = kind.index();
            capacities[lay::soil_surface(kind)] = geom.soils[i].total * soil_bulk_z[i];
            capacities[lay::soil_deep(kind)] = geom.soils[i].deep * deep_z[i];
        }

        let mut b = TableBuilder {
            capacities,
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

        // air: particulate advection and deposition
        let g_air = advection::g_air(climate.windspeed_m_d, geom.total_area, air.height);
        b.source(
            "background inflow",
            lay::AIR,
            advection::inflow_mol(g_air, self.background.air, m),
        );
        b.term(
            "advective outflow",
            lay::AIR,
            None,
            advection::d_advection(g_air, z_air_bulk),
        );
        b.term(
            "degradation",
            lay::AIR,
            None,
            degradation::d_degradation(geom.air_total, rates.aerosol, z_air_bulk),
        );
        let v_aerosol = deposition::settling_velocity(
            air.aerosol.particle_radius,
            air.aerosol.particle_density,
            air.density,
            air.dyn_viscosity,
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
                "dry deposition",
                lay::AIR,
                Some(state),
                deposition::d_deposition(v_aerosol, area, z_air_bulk),
            );
            b.term(
                "wet deposition",
                lay::AIR,
                Some(state),
                climate.precip_m * air.aerosol.scavenging_ratio * area * z_air_bulk,
            );
        }

        // neutral-species gas exchange, skipped entirely for metals
        if z_air_gas > 0.0 {
            for (state, area) in surfaces {
                b.term(
                    "rain dissolution",
                    lay::AIR,
                    Some(state),
                    climate.precip_m * area * self.chem.neutral_fraction(7.0),
                );
            }
            let d_mol_air = diffusion::diffusivity_air(m, climate.temperature_k);
            let d_mol_water = diffusion::diffusivity_water(m);
            let k_air = diffusion::mtc(d_mol_air, diffusion::AIR_FILM_M);
            let k_water = diffusion::mtc(d_mol_water, diffusion::WATER_FILM_M);
            let waters: [(usize, f64, &WaterBodyEnv); 3] = [
                (lay::RIVER_WATER, geom.river.area, &self.env.river),
                (lay::FRESH_WATER, geom.fresh.area, &self.env.fresh),
                (lay::SEA_WATER, geom.sea.area, &self.env.sea),
            ];
            for (state, area, body) in waters {
                let d = diffusion::d_air_water(
                    area,
                    k_air,
                    z_air_gas,
                    k_water,
                    self.chem.neutral_fraction(body.ph),
                );
                b.term("diffusion", lay::AIR, Some(state), d);
                b.term("diffusion", state, Some(lay::AIR), d);
            }
            for kind in SoilKind::ALL {
                let i = kind.index();
                let s = &self.env.soils[i];
                let surf = lay::soil_surface(kind);
                let k_soil_air =
                    diffusion::soil_air_mtc(d_mol_air, s.air_content, s.water_content, s.depth);
                let k_soil_water =
                    diffusion::soil_water_mtc(d_mol_water, s.air_content, s.water_content, s.depth);
                let d = diffusion::d_air_soil(
                    geom.soils[i].area,
                    k_air,
                    z_air_gas,
                    k_soil_air,
                    k_soil_water,
                    self.chem.neutral_fraction(7.0),
                );
                b.term("diffusion", lay::AIR, Some(surf), d);
                b.term("diffusion", surf, Some(lay::AIR), d);
            }
        }

        // water columns and beds
        struct Row<'a> {
            water: usize,
            sed: usize,
            body: &'a WaterBodyEnv,
            vols: &'a envfate_core::params::WaterVolumes,
            z: &'a WaterZ,
            water_rate: f64,
            sed_rate: f64,
            inflow_m3_d: f64,
            background: f64,
            outflow_m3_d: f64,
            outflow_to: Option<usize>,
        }
        let rows = [
            Row {
                water: lay::RIVER_WATER,
                sed: lay::RIVER_SEDIMENT,
                body: &self.env.river,
                vols: &geom.river,
                z: &river_z,
                water_rate: rates.river_water,
                sed_rate: rates.river_sed_solid,
                inflow_m3_d: climate.flow_river_m3_d,
                background: self.background.river,
                outflow_m3_d: climate.flow_river_m3_d,
                outflow_to: None,
            },
            Row {
                water: lay::FRESH_WATER,
                sed: lay::FRESH_SEDIMENT,
                body: &self.env.fresh,
                vols: &geom.fresh,
                z: &fresh_z,
                water_rate: rates.fresh_water,
                sed_rate: rates.fresh_sed_solid,
                inflow_m3_d: climate.flow_fresh_m3_d,
                background: self.background.fresh,
                outflow_m3_d: climate.flow_fresh_m3_d,
                outflow_to: self.presence.sea_water.then_some(lay::SEA_WATER),
            },
            Row {
                water: lay::SEA_WATER,
                sed: lay::SEA_SEDIMENT,
                body: &self.env.sea,
                vols: &geom.sea,
                z: &sea_z,
                water_rate: rates.sea_water,
                sed_rate: rates.sea_sed_solid,
                inflow_m3_d: 0.0,
                background: 0.0,
                // tidal exchange turns the basin over faster than the river
                outflow_m3_d: 10.0 * climate.flow_fresh_m3_d,
                outflow_to: None,
            },
        ];
        for row in &rows {
            b.source(
                "background inflow",
                row.water,
                advection::inflow_mol(row.inflow_m3_d, row.background, m),
            );
            b.term(
                "advective outflow",
                row.water,
                row.outflow_to,
                advection::d_advection(row.outflow_m3_d, row.z.bulk),
            );
            b.term(
                "degradation",
                row.water,
                None,
                degradation::d_degradation(
                    row.vols.water + row.vols.sus_sed,
                    row.water_rate,
                    row.z.bulk,
                ),
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
                deposition::d_deposition(v_ss, row.vols.area, row.z.particulate),
            );
            // dissolved and colloidal species diffuse across the bed face
            let d_diff = row.vols.area
                * SED_DIFF_AREA_FRACTION
                * SECONDS_PER_DAY
                * (MTC_DISSOLVED + MTC_COLLOID * row.z.colloidal);
            b.term("diffusion", row.water, Some(row.sed), d_diff);
            b.term("diffusion", row.sed, Some(row.water), d_diff);
            b.term(
                "resuspension",
                row.sed,
                Some(row.water),
                sediment::d_resuspension(
                    row.vols.area,
                    row.body.sediment.resuspension_rate,
                    row.z.sed_solid,
                ),
            );
            b.term(
                "sediment burial",
                row.sed,
                None,
                sediment::d_burial(row.vols.area, row.body.sediment.burial_rate, row.z.sed_solid),
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
                    row.z.sed_bulk,
                ),
            );
            b.term(
                "degradation",
                row.sed,
                None,
                degradation::d_degradation(row.vols.sediment_total, row.sed_rate, row.z.sed_bulk),
            );
        }

        // soils
        let water_area = self.env.river.area + self.env.fresh.area;
        let river_share = safe_div(self.env.river.area, water_area);
        let fresh_share = safe_div(self.env.fresh.area, water_area);
        for kind in SoilKind::ALL {
            let i = kind.index();
            let s = &self.env.soils[i];
            let gvol = &geom.soils[i];
            let surf = lay::soil_surface(kind);
            let deep = lay::soil_deep(kind);

            b.term(
                "degradation",
                surf,
                None,
                degradation::d_degradation(gvol.total, rates.soil_solid, soil_bulk_z[i]),
            );
            // runoff carries pore water at unit capacity
            let d_run = soil::d_runoff(climate.precip_mm, gvol.retention, gvol.area, 1.0);
            b.routed(&routing::RUNOFF_RIVER, &self.presence, surf, d_run * river_share);
            b.routed(&routing::RUNOFF_FRESH, &self.presence, surf, d_run * fresh_share);
            let d_ero = soil::erosion_volume(climate.precip_mm, s) * soil_solid_z[i];
            b.routed(&routing::SOIL_EROSION_RIVER, &self.presence, surf, d_ero * river_share);
            b.routed(&routing::SOIL_EROSION_FRESH, &self.presence, surf, d_ero * fresh_share);
            b.routed(
                &routing::WIND_EROSION,
                &self.presence,
                surf,
                soil::wind_erosion_volume(
                    climate.windspeed_m_s,
                    air.density,
                    gvol.area,
                    s.solid_density,
                    &s.wind,
                ) * soil_solid_z[i],
            );
            let (d_infiltration, infiltration_flow) = soil::d_infiltration(
                climate.precip_mm,
                gvol.retention,
                climate.evap_mm,
                s.field_capacity,
                s.water_content,
                gvol.area,
                1.0,
            );
            b.term("infiltration", surf, Some(deep), d_infiltration);
            b.term("leaching", deep, None, soil::d_leach(infiltration_flow, 1.0));
            b.term(
                "degradation",
                deep,
                None,
                degradation::d_degradation(gvol.deep, rates.deep_soil, deep_z[i]),
            );
        }

        log::trace!(
            "aquivalence day table: {} terms, {} sources",
            b.terms.len(),
            b.sources.len()
        );
        Ok(AquivalenceDay {
            capacities: b.capacities,
            terms: b.terms,
            sources: b.sources,
            molar_mass: m,
        })
    }
}

impl AquivalenceDay {
    /// Rate of change of each state aquivalence, 1/day against its own unit.
    pub fn derivatives(&self, q: &[f64; lay::N]) -> [f64; lay::N] {
        let mut net = [0.0_f64; lay::N];
        for s in &self.sources {
            net[s.to] += s.mol_per_day;
        }
        for t in &self.terms {
            let flux = t.d * q[t.from];
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
    pub fn fluxes(&self, q: &[f64; lay::N]) -> FluxLedger {
        let mut ledger = FluxLedger::new();
        for s in &self.sources {
            ledger.inflow(s.process, medium_of(s.to), s.mol_per_day * self.molar_mass);
        }
        for t in &self.terms {
            let kg = t.d * q[t.from] * self.molar_mass;
            match t.to {
                Some(to) => ledger.transfer(t.process, medium_of(t.from), medium_of(to), kg),
                None => ledger.sink(t.process, medium_of(t.from), kg),
            }
        }
        ledger
    }

    pub fn capacities(&self) -> &[f64; lay::N] {
        &self.capacities
    }

    /// Compartment inventories, kg.
    pub fn masses_kg(&self, q: &[f64; lay::N]) -> [f64; lay::N] {
        let mut out = [0.0_f64; lay::N];
        for i in 0..lay::N {
            out[i] = q[i] * self.capacities[i] * self.molar_mass;
        }
        out
    }

    pub fn total_mass_kg(&self, q: &[f64; lay::N]) -> f64 {
        self.masses_kg(q).iter().sum()
    }
}
