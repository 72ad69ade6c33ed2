//! Cross-chemistry conservation and routing checks.
//!
//! Every process moves material between compartments or across the domain
//! boundary, so for any state the mass rate of change summed over all
//! compartments must equal the ledger's boundary balance. The same tables
//! feed the transport network, which must never touch an absent compartment
//! no matter which presence pattern is active.

use envfate_core::params::{Background, ReleaseDay};
use envfate_core::{ClimateDay, Presence, Toggles};
use envfate_models::{
    fixtures, nano, organic, AquivalenceChemical, AquivalenceModel, NanoModel, OrganicModel,
    TransportNetwork,
};

/// Presence patterns worth auditing: the full domain, each water body
/// removed, the particle phases removed, and a land-only domain.
fn presence_patterns() -> Vec<Presence> {
    let full = Toggles::default();
    let no_river = Toggles {
        river_water: false,
        ..Toggles::default()
    };
    let no_lake = Toggles {
        fresh_water: false,
        ..Toggles::default()
    };
    let no_sea = Toggles {
        sea_water: false,
        ..Toggles::default()
    };
    let no_particles = Toggles {
        aerosol: false,
        river_sus_sed: false,
        fresh_sus_sed: false,
        sea_sus_sed: false,
        ..Toggles::default()
    };
    let land_only = Toggles {
        river_water: false,
        fresh_water: false,
        sea_water: false,
        ..Toggles::default()
    };
    let no_biosolid_soil = Toggles {
        soil: [true, true, true, false],
        ..Toggles::default()
    };
    [
        full,
        no_river,
        no_lake,
        no_sea,
        no_particles,
        land_only,
        no_biosolid_soil,
    ]
        .iter()
        .map(Presence::resolve)
        .collect()
}

fn wet_day() -> ClimateDay {
    let mut day = fixtures::climate_day();
    day.precip_mm = 12.0;
    day.precip_m = 0.012;
    day.windspeed_m_s = 9.0;
    day.windspeed_m_d = 9.0 * 86_400.0;
    day
}

fn everywhere_release() -> ReleaseDay {
    ReleaseDay {
        air: 5.0,
        river_water: 1.0,
        fresh_water: 1.0,
        sea_water: 1.0,
        soil: [2.0; 4],
        ..ReleaseDay::default()
    }
}

#[test]
fn organic_balance_closes_under_every_presence_pattern() {
    let chem = fixtures::organic_chemical();
    for (climate, label) in [(fixtures::climate_day(), "dry"), (wet_day(), "wet")] {
        for presence in presence_patterns() {
            let model = OrganicModel {
                chem: chem.clone(),
                env: fixtures::environment(),
                presence,
                background: Background::clean(),
            };
            let day = model
                .day_system(&climate, &everywhere_release())
                .expect("day system should assemble");
            let f = [2.0e-7_f64; 15];
            let d = day.derivatives(&f);
            let mass_rate: f64 = d
                .iter()
                .zip(day.capacities())
                .map(|(df, vz)| df * vz * chem.molar_mass)
                .sum();
            let ledger = day.fluxes(&f);
            let imbalance = (mass_rate - ledger.net_domain_rate()).abs();
            assert!(
                imbalance < 1.0e-6 * ledger.inflow_total().max(1.0),
                "{label} day leaks {imbalance} kg/day"
            );
        }
    }
}

#[test]
fn aquivalence_balance_closes_under_every_presence_pattern() {
    let chem = AquivalenceChemical::Metal(fixtures::metal_chemical());
    for presence in presence_patterns() {
        let model = AquivalenceModel {
            chem: chem.clone(),
            env: fixtures::environment(),
            presence,
            background: Background::clean(),
        };
        let day = model
            .day_system(&wet_day(), &everywhere_release())
            .expect("day system should assemble");
        let q = [3.0e-6_f64; 15];
        let d = day.derivatives(&q);
        let mass_rate: f64 = d
            .iter()
            .zip(day.capacities())
            .map(|(dq, vz)| dq * vz * chem.molar_mass())
            .sum();
        let ledger = day.fluxes(&q);
        let imbalance = (mass_rate - ledger.net_domain_rate()).abs();
        assert!(
            imbalance < 1.0e-6 * ledger.inflow_total().max(1.0),
            "aquivalence day leaks {imbalance} kg/day"
        );
    }
}

#[test]
fn nano_balance_closes_under_every_presence_pattern() {
    for presence in presence_patterns() {
        let model = NanoModel {
            chem: fixtures::nano_chemical(),
            env: fixtures::environment(),
            presence,
            background: Background::clean(),
        };
        let day = model
            .day_system(&wet_day(), &everywhere_release())
            .expect("day system should assemble");
        let mut m = nano::zero_state();
        for (i, value) in m.iter_mut().enumerate() {
            if presence.has(nano::medium_of(i)) {
                *value = 0.5;
            }
        }
        let d = day.derivatives(&m);
        let mass_rate: f64 = d.iter().sum();
        let ledger = day.fluxes(&m);
        let imbalance = (mass_rate - ledger.net_domain_rate()).abs();
        assert!(
            imbalance < 1.0e-6 * ledger.inflow_total().max(1.0),
            "nano day leaks {imbalance} kg/day"
        );
    }
}

#[test]
fn no_flux_ever_touches_an_absent_compartment() {
    for presence in presence_patterns() {
        let organic = OrganicModel {
            chem: fixtures::organic_chemical(),
            env: fixtures::environment(),
            presence,
            background: Background::clean(),
        };
        let day = organic
            .day_system(&wet_day(), &everywhere_release())
            .expect("day system should assemble");
        let network = TransportNetwork::from_records(day.fluxes(&[1.0e-7; 15]).records());
        assert!(
            network.absent_endpoints(&presence).is_empty(),
            "organic fluxes reach absent media: {:?}",
            network.absent_endpoints(&presence)
        );

        let nano = NanoModel {
            chem: fixtures::nano_chemical(),
            env: fixtures::environment(),
            presence,
            background: Background::clean(),
        };
        let day = nano
            .day_system(&wet_day(), &everywhere_release())
            .expect("day system should assemble");
        let network = TransportNetwork::from_records(day.fluxes(&[0.5; 33]).records());
        assert!(
            network.absent_endpoints(&presence).is_empty(),
            "nano fluxes reach absent media: {:?}",
            network.absent_endpoints(&presence)
        );
    }
}

#[test]
fn calm_day_parks_every_weather_driven_process() {
    let climate = ClimateDay::calm(15.0);
    let weather_processes = [
        "advective outflow",
        "wet deposition",
        "rain dissolution",
        "soil runoff",
        "soil erosion",
        "wind erosion",
        "infiltration",
        "leaching",
        "bed advection",
        "sea spray aerosolization",
        "dissolved runoff",
    ];

    let organic = OrganicModel {
        chem: fixtures::organic_chemical(),
        env: fixtures::environment(),
        presence: Presence::all(),
        background: Background::clean(),
    };
    let day = organic
        .day_system(&climate, &ReleaseDay::default())
        .expect("day system should assemble");
    let ledger = day.fluxes(&[1.0e-5; 15]);
    for process in weather_processes {
        assert_eq!(
            ledger.process_total(process),
            0.0,
            "organic {process} ran without forcing"
        );
    }

    let nano = NanoModel {
        chem: fixtures::nano_chemical(),
        env: fixtures::environment(),
        presence: Presence::all(),
        background: Background::clean(),
    };
    let day = nano
        .day_system(&climate, &ReleaseDay::default())
        .expect("day system should assemble");
    let ledger = day.fluxes(&[10.0; 33]);
    for process in weather_processes {
        assert_eq!(
            ledger.process_total(process),
            0.0,
            "nano {process} ran without forcing"
        );
    }
}

#[test]
fn calm_zero_forcing_day_is_finite_everywhere() {
    let climate = ClimateDay::calm(15.0);
    let presence = Presence::all();
    let organic = OrganicModel {
        chem: fixtures::organic_chemical(),
        env: fixtures::environment(),
        presence,
        background: Background::clean(),
    };
    let day = organic
        .day_system(&climate, &ReleaseDay::default())
        .expect("day system should assemble");
    for f in [organic::zero_state(), [1.0e-5; 15]] {
        assert!(day.derivatives(&f).iter().all(|d| d.is_finite()));
    }

    let nano = NanoModel {
        chem: fixtures::nano_chemical(),
        env: fixtures::environment(),
        presence,
        background: Background::clean(),
    };
    let day = nano
        .day_system(&climate, &ReleaseDay::default())
        .expect("day system should assemble");
    for m in [nano::zero_state(), [10.0; 33]] {
        assert!(day.derivatives(&m).iter().all(|d| d.is_finite()));
    }
}
