//! Mass-balance assembler for engineered nanomaterials.
//!
//! The 33 states are compartment inventories in kg, in the layout of
//! [`nano_layout`]: free particles per medium, attached particles riding
//! the suspended loads, dissolved pools alongside every water body,
//! sediment bed and soil, and the deep soil layers. Nanomaterial does not
//! degrade; mass leaves the domain only by advection, burial, leaching when
//! no river is present to receive it, and as the dissolved species advects
//! away.
//!
//! Each day compiles into a rate table: sources in kg/day, first-order
//! terms (1/day against the source state), and dissolution terms, which are
//! the one nonlinearity, slowing as the co-located dissolved pool
//! approaches its dissolvable ceiling.

use crate::fluxes::FluxLedger;
use crate::routing::{self, RouteOutcome};
use envfate_core::compartment::nano_layout as lay;
use envfate_core::params::{
    Background, DissolutionFit, Environment, NanoChemical, ReleaseDay,
};
use envfate_core::processes::{advection, deposition, nano, sediment, soil};
use envfate_core::{safe_div, ClimateDay, FateResult, Medium, Presence, SoilKind};

/// The compartment behind each state index. Dissolved pools report their
/// host compartment; process labels carry the "dissolved" distinction.
pub fn medium_of(state: usize) -> Medium {
    match state {
        lay::AIR => Medium::Air,
        lay::AEROSOL => Medium::Aerosol,
        lay::RIVER_WATER | lay::DISSOLVED_RIVER => Medium::RiverWater,
        lay::RIVER_SUS_SED => Medium::RiverSusSed,
        lay::RIVER_SEDIMENT | lay::DISSOLVED_RIVER_SED => Medium::RiverSediment,
        lay::FRESH_WATER | lay::DISSOLVED_FRESH => Medium::FreshWater,
        lay::FRESH_SUS_SED => Medium::FreshSusSed,
        lay::FRESH_SEDIMENT | lay::DISSOLVED_FRESH_SED => Medium::FreshSediment,
        lay::SEA_WATER | lay::DISSOLVED_SEA => Medium::SeaWater,
        lay::SEA_SUS_SED => Medium::SeaSusSed,
        lay::SEA_SEDIMENT | lay::DISSOLVED_SEA_SED => Medium::SeaSediment,
        11..=18 => {
            let kind = SoilKind::ALL[(state - 11) / 2];
            if (state - 11) % 2 == 0 {
                Medium::SoilSolid(kind)
            } else {
                Medium::SoilWater(kind)
            }
        }
        25..=28 => Medium::SoilWater(SoilKind::ALL[state - 25]),
        _ => Medium::DeepSoil(SoilKind::ALL[state - 29]),
    }
}

fn state_of(medium: Medium) -> usize {
    match medium {
        Medium::Air => lay::AIR,
        Medium::Aerosol => lay::AEROSOL,
        Medium::RiverWater => lay::RIVER_WATER,
        Medium::RiverSusSed => lay::RIVER_SUS_SED,
        Medium::RiverSediment => lay::RIVER_SEDIMENT,
        Medium::FreshWater => lay::FRESH_WATER,
        Medium::FreshSusSed => lay::FRESH_SUS_SED,
        Medium::FreshSediment => lay::FRESH_SEDIMENT,
        Medium::SeaWater => lay::SEA_WATER,
        Medium::SeaSusSed => lay::SEA_SUS_SED,
        Medium::SeaSediment => lay::SEA_SEDIMENT,
        Medium::SoilSolid(k) => lay::soil_solid(k),
        Medium::SoilWater(k) => lay::soil_water(k),
        Medium::DeepSoil(k) => lay::deep_soil(k),
    }
}

/// Scenario inputs for the nanomaterial chemistry.
#[derive(Debug, Clone)]
pub struct NanoModel {
    pub chem: NanoChemical,
    pub env: Environment,
    pub presence: Presence,
    pub background: Background,
}

#[derive(Debug, Clone, Copy)]
struct Term {
    process: &'static str,
    from: usize,
    to: Option<usize>,
    rate: f64,
}

#[derive(Debug, Clone, Copy)]
struct Source {
    process: &'static str,
    to: usize,
    kg_per_day: f64,
}

/// Dissolution couples the particle pool to its dissolved pool and is
/// evaluated against both inventories.
#[derive(Debug, Clone, Copy)]
struct Dissolution {
    from: usize,
    to: usize,
    fit: DissolutionFit,
    kdis: f64,
}

#[derive(Debug)]
pub struct NanoDay {
    present: [bool; lay::N],
    terms: Vec<Term>,
    sources: Vec<Source>,
    dissolutions: Vec<Dissolution>,
}

struct TableBuilder {
    present: [bool; lay::N],
    terms: Vec<Term>,
    sources: Vec<Source>,
    dissolutions: Vec<Dissolution>,
}

impl TableBuilder {
    fn term(&mut self, process: &'static str, from: usize, to: Option<usize>, rate: f64) {
        let live =
            rate > 0.0 && self.present[from] && to.map_or(true, |t| self.present[t]);
        if live {
            self.terms.push(Term {
                process,
                from,
                to,
                rate,
            });
        }
    }

    fn routed(
        &mut self,
        chain: &routing::RouteChain,
        presence: &Presence,
        from: usize,
        rate: f64,
    ) {
        if let RouteOutcome::Deliver(medium) = chain.resolve(presence) {
            self.term(chain.process, from, Some(state_of(medium)), rate);
        }
    }

    fn source(&mut self, process: &'static str, to: usize, kg_per_day: f64) {
        if kg_per_day > 0.0 && self.present[to] {
            self.sources.push(Source {
                process,
                to,
                kg_per_day,
            });
        }
    }

    fn dissolution(&mut self, from: usize, to: usize, fit: DissolutionFit, kdis: f64) {
        if kdis > 0.0 && self.present[from] && self.present[to] {
            self.dissolutions.push(Dissolution {
                from,
                to,
                fit,
                kdis,
            });
        }
    }
}

fn presence_mask(p: &Presence) -> [bool; lay::N] {
    let mut mask = [false; lay::N];
    mask[lay::AIR] = p.air;
    mask[lay::AEROSOL] = p.aerosol;
    mask[lay::RIVER_WATER] = p.river_water;
    mask[lay::RIVER_SUS_SED] = p.river_sus_sed;
    mask[lay::RIVER_SEDIMENT] = p.river_sediment;
    mask[lay::FRESH_WATER] = p.fresh_water;
    mask[lay::FRESH_SUS_SED] = p.fresh_sus_sed;
    mask[lay::FRESH_SEDIMENT] = p.fresh_sediment;
    mask[lay::SEA_WATER] = p.sea_water;
    mask[lay::SEA_SUS_SED] = p.sea_sus_sed;
    mask[lay::SEA_SEDIMENT] = p.sea_sediment;
    // dissolved pools live and die with their host
    mask[lay::DISSOLVED_RIVER] = p.river_water;
    mask[lay::DISSOLVED_RIVER_SED] = p.river_sediment;
    mask[lay::DISSOLVED_FRESH] = p.fresh_water;
    mask[lay::DISSOLVED_FRESH_SED] = p.fresh_sediment;
    mask[lay::DISSOLVED_SEA] = p.sea_water;
    mask[lay::DISSOLVED_SEA_SED] = p.sea_sediment;
    for kind in SoilKind::ALL {
        let i = kind.index();
        mask[lay::soil_solid(kind)] = p.soil_solid[i];
        mask[lay::soil_water(kind)] = p.soil_water[i];
        mask[lay::dissolved_soil_water(kind)] = p.soil_water[i];
        mask[lay::deep_soil(kind)] = p.deep_soil[i];
    }
    mask
}

impl NanoModel {
    /// Compile the rate table for one day of forcing.
    pub fn day_system(&self, climate: &ClimateDay, release: &ReleaseDay) -> FateResult<NanoDay> {
        let geom = self.env.geometry(&self.presence, climate.flow_river_m3_s)?;
        let chem = &self.chem;
        let air = &self.env.air;

        let mut b = TableBuilder {
            present: presence_mask(&self.presence),
            terms: Vec::new(),
            sources: Vec::new(),
            dissolutions: Vec::new(),
        };

        // direct releases
        b.source("release", lay::AIR, release.air);
        b.source("release", lay::RIVER_WATER, release.river_water);
        b.source("release", lay::RIVER_SUS_SED, release.river_sus_sed);
        b.source("release", lay::RIVER_SEDIMENT, release.river_sediment);
        b.source("release", lay::FRESH_WATER, release.fresh_water);
        b.source("release", lay::FRESH_SUS_SED, release.fresh_sus_sed);
        b.source("release", lay::FRESH_SEDIMENT, release.fresh_sediment);
        b.source("release", lay::SEA_WATER, release.sea_water);
        b.source("release", lay::SEA_SUS_SED, release.sea_sus_sed);
        b.source("release", lay::SEA_SEDIMENT, release.sea_sediment);
        for kind in SoilKind::ALL {
            b.source("release", lay::soil_solid(kind), release.soil(kind));
            b.source("release", lay::deep_soil(kind), release.deep_soil(kind));
        }

        // air column: advection, deposition, attachment to aerosol
        let g_air = advection::g_air(climate.windspeed_m_d, geom.total_area, air.height);
        b.source(
            "background inflow",
            lay::AIR,
            advection::inflow_kg(g_air, self.background.air),
        );
        let k_adv_air = advection::advection_rate(g_air, geom.air_total);
        b.term("advective outflow", lay::AIR, None, k_adv_air);
        b.term("advective outflow", lay::AEROSOL, None, k_adv_air);
        b.term(
            "heteroaggregation",
            lay::AIR,
            Some(lay::AEROSOL),
            nano::heteroaggregation_rate(chem.khet_air, air.aerosol.concentration),
        );

        // deposition splits by receiving area; free particles settle at
        // their agglomerate size, aerosol-attached ones at the aerosol size
        let v_free = deposition::settling_velocity(
            chem.radius_agg,
            chem.density,
            air.density,
            air.dyn_viscosity,
        );
        let v_attached = deposition::settling_velocity(
            air.aerosol.particle_radius,
            air.aerosol.particle_density,
            air.density,
            air.dyn_viscosity,
        );
        let k_dry_free = deposition::deposition_rate(v_free, air.height);
        let k_dry_attached = deposition::deposition_rate(v_attached, air.height);
        let k_wet = deposition::wet_deposition_rate(
            climate.precip_m,
            air.aerosol.scavenging_ratio,
            air.height,
        );
        let area_frac = |a: f64| safe_div(a, geom.total_area);
        let water_surfaces = [
            (lay::RIVER_WATER, lay::RIVER_SUS_SED, geom.river.area),
            (lay::FRESH_WATER, lay::FRESH_SUS_SED, geom.fresh.area),
            (lay::SEA_WATER, lay::SEA_SUS_SED, geom.sea.area),
        ];
        for (water, sus_sed, area) in water_surfaces {
            let frac = area_frac(area);
            b.term("dry deposition", lay::AIR, Some(water), k_dry_free * frac);
            b.term("wet deposition", lay::AIR, Some(water), k_wet * frac);
            b.term("dry deposition", lay::AEROSOL, Some(sus_sed), k_dry_attached * frac);
            b.term("wet deposition", lay::AEROSOL, Some(sus_sed), k_wet * frac);
        }
        for kind in SoilKind::ALL {
            let frac = area_frac(geom.soils[kind.index()].area);
            b.term("dry deposition", lay::AIR, Some(lay::soil_solid(kind)), k_dry_free * frac);
            b.term("wet deposition", lay::AIR, Some(lay::soil_water(kind)), k_wet * frac);
            b.term(
                "dry deposition",
                lay::AEROSOL,
                Some(lay::soil_solid(kind)),
                k_dry_attached * frac,
            );
            b.term(
                "wet deposition",
                lay::AEROSOL,
                Some(lay::soil_water(kind)),
                k_wet * frac,
            );
        }

        // water columns, suspended loads, beds, dissolved pools
        struct Row<'a> {
            water: usize,
            sus_sed: usize,
            sed: usize,
            dis: usize,
            dis_sed: usize,
            body: &'a envfate_core::params::WaterBodyEnv,
            vols: &'a envfate_core::params::WaterVolumes,
            ksed_free: f64,
            khet: f64,
            kdis_water: f64,
            kdis_sed: f64,
            fit_water: DissolutionFit,
            fit_sed: DissolutionFit,
            inflow_m3_d: f64,
            background: f64,
            outflow_m3_d: f64,
            /// Downstream states for the water, suspended, bed, and the two
            /// dissolved outflows; `None` leaves the domain.
            water_to: Option<usize>,
            sus_sed_to: Option<usize>,
            sed_to: Option<usize>,
            dis_to: Option<usize>,
            dis_sed_to: Option<usize>,
        }
        let rows = [
            Row {
                water: lay::RIVER_WATER,
                sus_sed: lay::RIVER_SUS_SED,
                sed: lay::RIVER_SEDIMENT,
                dis: lay::DISSOLVED_RIVER,
                dis_sed: lay::DISSOLVED_RIVER_SED,
                body: &self.env.river,
                vols: &geom.river,
                ksed_free: chem.ksed_river,
                khet: chem.khet_river,
                kdis_water: chem.kdis_river,
                kdis_sed: chem.kdis_river_sed,
                fit_water: chem.dissolution.river,
                fit_sed: chem.dissolution.river_sediment,
                inflow_m3_d: climate.flow_river_m3_d,
                background: self.background.river,
                outflow_m3_d: climate.flow_river_m3_d,
                water_to: None,
                sus_sed_to: None,
                sed_to: None,
                dis_to: None,
                dis_sed_to: None,
            },
            Row {
                water: lay::FRESH_WATER,
                sus_sed: lay::FRESH_SUS_SED,
                sed: lay::FRESH_SEDIMENT,
                dis: lay::DISSOLVED_FRESH,
                dis_sed: lay::DISSOLVED_FRESH_SED,
                body: &self.env.fresh,
                vols: &geom.fresh,
                ksed_free: chem.ksed_fresh,
                khet: chem.khet_fresh,
                kdis_water: chem.kdis_fresh,
                kdis_sed: chem.kdis_fresh_sed,
                fit_water: chem.dissolution.fresh,
                fit_sed: chem.dissolution.fresh_sediment,
                inflow_m3_d: climate.flow_fresh_m3_d,
                background: self.background.fresh,
                outflow_m3_d: climate.flow_fresh_m3_d,
                water_to: self.presence.sea_water.then_some(lay::SEA_WATER),
                sus_sed_to: if self.presence.sea_sus_sed {
                    Some(lay::SEA_SUS_SED)
                } else if self.presence.sea_water {
                    Some(lay::SEA_WATER)
                } else {
                    None
                },
                sed_to: self.presence.sea_sediment.then_some(lay::SEA_SEDIMENT),
                dis_to: self.presence.sea_water.then_some(lay::DISSOLVED_SEA),
                dis_sed_to: self.presence.sea_sediment.then_some(lay::DISSOLVED_SEA_SED),
            },
            Row {
                water: lay::SEA_WATER,
                sus_sed: lay::SEA_SUS_SED,
                sed: lay::SEA_SEDIMENT,
                dis: lay::DISSOLVED_SEA,
                dis_sed: lay::DISSOLVED_SEA_SED,
                body: &self.env.sea,
                vols: &geom.sea,
                ksed_free: chem.ksed_sea,
                khet: chem.khet_sea,
                kdis_water: chem.kdis_sea,
                kdis_sed: chem.kdis_sea_sed,
                fit_water: chem.dissolution.sea,
                fit_sed: chem.dissolution.sea_sediment,
                inflow_m3_d: 0.0,
                background: 0.0,
                // tidal exchange turns the basin over faster than the river
                outflow_m3_d: 10.0 * climate.flow_fresh_m3_d,
                water_to: None,
                sus_sed_to: None,
                sed_to: None,
                dis_to: None,
                dis_sed_to: None,
            },
        ];
        let resuspension_chains = [
            &routing::RESUSPENSION_RIVER,
            &routing::RESUSPENSION_FRESH,
            &routing::RESUSPENSION_SEA,
        ];
        for (row, resusp_chain) in rows.iter().zip(resuspension_chains) {
            b.source(
                "background inflow",
                row.water,
                advection::inflow_kg(row.inflow_m3_d, row.background),
            );
            let volume = row.vols.water + row.vols.sus_sed;
            b.term(
                "sedimentation",
                row.water,
                Some(row.sed),
                nano::sedimentation_rate(row.ksed_free, row.body.depth),
            );
            b.term(
                "heteroaggregation",
                row.water,
                Some(row.sus_sed),
                nano::heteroaggregation_rate(row.khet, row.body.ss_concentration),
            );
            let v_ss = deposition::settling_velocity(
                row.body.ss_radius,
                row.body.ss_density,
                row.body.density,
                row.body.dyn_viscosity,
            );
            b.term(
                "sedimentation",
                row.sus_sed,
                Some(row.sed),
                deposition::deposition_rate(v_ss, row.body.depth),
            );
            let k_adv = advection::advection_rate(row.outflow_m3_d, volume);
            let k_bed_adv = advection::advection_rate(
                row.outflow_m3_d * row.body.sediment.advective_fraction,
                row.vols.sediment_total,
            );
            b.term("advective outflow", row.water, row.water_to, k_adv);
            b.term("advective outflow", row.sus_sed, row.sus_sed_to, k_adv);
            b.term("bed advection", row.sed, row.sed_to, k_bed_adv);
            b.term("dissolved advective outflow", row.dis, row.dis_to, k_adv);
            b.term("dissolved bed advection", row.dis_sed, row.dis_sed_to, k_bed_adv);
            b.routed(
                resusp_chain,
                &self.presence,
                row.sed,
                sediment::bed_rate(row.body.sediment.resuspension_rate, row.body.sediment.depth),
            );
            b.term(
                "sediment burial",
                row.sed,
                None,
                sediment::bed_rate(row.body.sediment.burial_rate, row.body.sediment.depth),
            );
            b.dissolution(row.water, row.dis, row.fit_water, row.kdis_water);
            b.dissolution(row.sed, row.dis_sed, row.fit_sed, row.kdis_sed);
        }

        // sea spray lifts surface particles into the aerosol
        b.routed(
            &routing::SEA_SPRAY,
            &self.presence,
            lay::SEA_WATER,
            nano::aerosolization_rate(
                climate.windspeed_m_s,
                geom.coastal_area,
                chem.enrichment_factor,
                geom.sea.water + geom.sea.sus_sed,
            ),
        );

        // soils
        let water_area = self.env.river.area + self.env.fresh.area;
        let river_share = safe_div(self.env.river.area, water_area);
        let fresh_share = safe_div(self.env.fresh.area, water_area);
        for kind in SoilKind::ALL {
            let i = kind.index();
            let s = &self.env.soils[i];
            let gvol = &geom.soils[i];
            let solid = lay::soil_solid(kind);
            let water = lay::soil_water(kind);
            let dis = lay::dissolved_soil_water(kind);
            let deep = lay::deep_soil(kind);

            b.routed(
                &routing::WIND_EROSION,
                &self.presence,
                solid,
                safe_div(
                    soil::wind_erosion_volume(
                        climate.windspeed_m_s,
                        air.density,
                        gvol.area,
                        s.solid_density,
                        &s.wind,
                    ),
                    gvol.solid,
                ),
            );
            let k_erosion = safe_div(soil::erosion_volume(climate.precip_mm, s), gvol.solid);
            b.routed(
                &routing::SOIL_EROSION_RIVER,
                &self.presence,
                solid,
                k_erosion * river_share,
            );
            b.routed(
                &routing::SOIL_EROSION_FRESH,
                &self.presence,
                solid,
                k_erosion * fresh_share,
            );

            let (k_to_water, k_to_solid) =
                nano::elution_exchange(chem.elution[i], gvol.solid_fraction, s.water_content);
            b.term("elution", solid, Some(water), k_to_water);
            b.term("elution", water, Some(solid), k_to_solid);

            let k_runoff = safe_div(
                soil::runoff_volume(climate.precip_mm, gvol.retention, gvol.area),
                gvol.water,
            );
            b.routed(&routing::RUNOFF_RIVER, &self.presence, water, k_runoff * river_share);
            b.routed(&routing::RUNOFF_FRESH, &self.presence, water, k_runoff * fresh_share);

            let infiltration_m3 = soil::infiltration_volume(
                climate.precip_mm,
                gvol.retention,
                climate.evap_mm,
                s.field_capacity,
                s.water_content,
                gvol.area,
            );
            b.term(
                "infiltration",
                water,
                Some(deep),
                safe_div(infiltration_m3, gvol.water),
            );
            b.dissolution(water, dis, chem.dissolution.soil[i], chem.kdis_soil[i]);

            // dissolved runoff follows the same water split into the
            // dissolved pools downstream
            let dis_river = self
                .presence
                .river_water
                .then_some(lay::DISSOLVED_RIVER);
            let dis_fresh = if self.presence.fresh_water {
                Some(lay::DISSOLVED_FRESH)
            } else if self.presence.sea_water {
                Some(lay::DISSOLVED_SEA)
            } else {
                None
            };
            if let Some(to) = dis_river {
                b.term("dissolved runoff", dis, Some(to), k_runoff * river_share);
            }
            if let Some(to) = dis_fresh {
                b.term("dissolved runoff", dis, Some(to), k_runoff * fresh_share);
            }

            // leachate drains to the river, or to groundwater without one
            let k_leach = safe_div(infiltration_m3, gvol.deep);
            if self.presence.river_water {
                b.term("leaching", deep, Some(lay::RIVER_WATER), k_leach);
            } else {
                b.term("leaching", deep, None, k_leach);
            }
        }

        log::trace!(
            "nano day table: {} terms, {} sources, {} dissolution couplings",
            b.terms.len(),
            b.sources.len(),
            b.dissolutions.len()
        );
        Ok(NanoDay {
            present: b.present,
            terms: b.terms,
            sources: b.sources,
            dissolutions: b.dissolutions,
        })
    }
}

impl NanoDay {
    /// Rate of change of each state inventory, kg/day.
    pub fn derivatives(&self, m: &[f64; lay::N]) -> [f64; lay::N] {
        let mut net = [0.0_f64; lay::N];
        for s in &self.sources {
            net[s.to] += s.kg_per_day;
        }
        for t in &self.terms {
            let flux = t.rate * m[t.from];
            net[t.from] -= flux;
            if let Some(to) = t.to {
                net[to] += flux;
            }
        }
        for d in &self.dissolutions {
            let flux = nano::dissolution_flux(&d.fit, d.kdis, m[d.from], m[d.to]);
            net[d.from] -= flux;
            net[d.to] += flux;
        }
        for (i, live) in self.present.iter().enumerate() {
            if !live {
                net[i] = 0.0;
            }
        }
        net
    }

    /// Price every process at the given state, kg/day, in table order.
    pub fn fluxes(&self, m: &[f64; lay::N]) -> FluxLedger {
        let mut ledger = FluxLedger::new();
        for s in &self.sources {
            ledger.inflow(s.process, medium_of(s.to), s.kg_per_day);
        }
        for t in &self.terms {
            let kg = t.rate * m[t.from];
            match t.to {
                Some(to) => ledger.transfer(t.process, medium_of(t.from), medium_of(to), kg),
                None => ledger.sink(t.process, medium_of(t.from), kg),
            }
        }
        for d in &self.dissolutions {
            let kg = nano::dissolution_flux(&d.fit, d.kdis, m[d.from], m[d.to]);
            ledger.transfer("dissolution", medium_of(d.from), medium_of(d.to), kg);
        }
        ledger
    }

    pub fn total_mass_kg(&self, m: &[f64; lay::N]) -> f64 {
        m.iter().sum()
    }
}

pub fn zero_state() -> [f64; lay::N] {
    [0.0; lay::N]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use approx::assert_relative_eq;
    use envfate_core::Toggles;

    fn model() -> NanoModel {
        NanoModel {
            chem: fixtures::nano_chemical(),
            env: fixtures::environment(),
            presence: Presence::all(),
            background: Background::clean(),
        }
    }

    #[test]
    fn empty_domain_stays_empty() {
        let day = model()
            .day_system(&fixtures::climate_day(), &ReleaseDay::default())
            .unwrap();
        assert!(day.derivatives(&zero_state()).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn internal_transport_conserves_mass() {
        let mut release = ReleaseDay::default();
        release.sea_water = 3.0;
        let day = model()
            .day_system(&fixtures::climate_day(), &release)
            .unwrap();
        let mut m = zero_state();
        m[lay::SEA_WATER] = 40.0;
        m[lay::SEA_SUS_SED] = 5.0;
        m[lay::soil_solid(SoilKind::Agricultural)] = 10.0;
        let dmdt = day.derivatives(&m);
        let total_rate: f64 = dmdt.iter().sum();
        let ledger = day.fluxes(&m);
        assert_relative_eq!(total_rate, ledger.net_domain_rate(), max_relative = 1.0e-9);
    }

    #[test]
    fn dissolution_feeds_the_dissolved_pool() {
        let day = model()
            .day_system(&fixtures::climate_day(), &ReleaseDay::default())
            .unwrap();
        let mut m = zero_state();
        m[lay::RIVER_WATER] = 20.0;
        let dmdt = day.derivatives(&m);
        assert!(dmdt[lay::DISSOLVED_RIVER] > 0.0);
    }

    #[test]
    fn absent_aerosol_reroutes_wind_erosion_into_air() {
        let mut model = model();
        model.presence = Presence::resolve(&Toggles {
            aerosol: false,
            ..Toggles::default()
        });
        let mut climate = fixtures::climate_day();
        climate.windspeed_m_s = 30.0;
        climate.windspeed_m_d = 30.0 * 86_400.0;
        let day = model.day_system(&climate, &ReleaseDay::default()).unwrap();
        let mut m = zero_state();
        m[lay::soil_solid(SoilKind::Undeveloped)] = 50.0;
        let ledger = day.fluxes(&m);
        assert!(ledger.total_into(Medium::Air) > 0.0);
        assert_eq!(ledger.total_into(Medium::Aerosol), 0.0);
    }

    #[test]
    fn lake_outflow_reaches_the_sea_chain() {
        let day = model()
            .day_system(&fixtures::climate_day(), &ReleaseDay::default())
            .unwrap();
        let mut m = zero_state();
        m[lay::FRESH_WATER] = 10.0;
        m[lay::FRESH_SUS_SED] = 2.0;
        let dmdt = day.derivatives(&m);
        assert!(dmdt[lay::SEA_WATER] > 0.0);
        assert!(dmdt[lay::SEA_SUS_SED] > 0.0);
    }

    #[test]
    fn leachate_without_a_river_leaves_the_domain() {
        let mut model = model();
        model.presence = Presence::resolve(&Toggles {
            river_water: false,
            ..Toggles::default()
        });
        let mut climate = fixtures::climate_day();
        climate.precip_mm = 25.0;
        climate.precip_m = 0.025;
        let day = model.day_system(&climate, &ReleaseDay::default()).unwrap();
        let mut m = zero_state();
        m[lay::deep_soil(SoilKind::Urban)] = 8.0;
        let ledger = day.fluxes(&m);
        assert!(ledger.process_total("leaching") > 0.0);
        assert_relative_eq!(
            ledger.process_total("leaching"),
            ledger.sink_total(),
            max_relative = 1.0e-9
        );
    }
}
