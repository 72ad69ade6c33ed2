//! End-to-end scenario runs through the daily driver.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use envfate::sim::{FateModel, Simulation};
use envfate::{ClimateSeries, Presence, ScenarioConfig, SoilKind};
use envfate_core::compartment::{nano_layout, organic_layout};
use envfate_core::params::{Background, ReleaseSeries};
use envfate_models::{fixtures, NanoModel, OrganicModel};
use ndarray::Array1;

const DAYS: usize = 10;

fn config(class: &str) -> ScenarioConfig {
    ScenarioConfig::from_toml_str(&format!(
        r#"
        name = "ten-day-check"
        class = "{class}"
        start = "2015-03-01"
        end = "2015-03-10"
        "#
    ))
    .expect("config should parse")
}

/// Mild March forcing: a couple of rain days mid-window, steady flows.
fn climate() -> ClimateSeries {
    let mut precip = Array1::zeros(DAYS);
    precip[3] = 8.0;
    precip[4] = 15.0;
    ClimateSeries::new(
        NaiveDate::from_ymd_opt(2015, 3, 1).expect("valid date"),
        precip,
        Array1::from_elem(DAYS, 1.5),
        Array1::from_elem(DAYS, 5.0),
        Array1::from_elem(DAYS, 50.0),
        Array1::from_elem(DAYS, 30.0),
        Array1::from_elem(DAYS, 8.0),
    )
    .expect("series lengths agree")
}

/// A windless, rainless, flowless window at 15 °C.
fn calm_climate() -> ClimateSeries {
    ClimateSeries::new(
        NaiveDate::from_ymd_opt(2015, 3, 1).expect("valid date"),
        Array1::zeros(DAYS),
        Array1::zeros(DAYS),
        Array1::zeros(DAYS),
        Array1::zeros(DAYS),
        Array1::zeros(DAYS),
        Array1::from_elem(DAYS, 15.0),
    )
    .expect("series lengths agree")
}

fn organic_model(presence: Presence) -> FateModel {
    FateModel::Organic(OrganicModel {
        chem: fixtures::organic_chemical(),
        env: fixtures::environment(),
        presence,
        background: Background::clean(),
    })
}

#[test]
fn air_release_spreads_without_creating_mass() {
    let config = config("organic");
    let mut release = ReleaseSeries::zero("ten-day-check", DAYS);
    release.air.fill(5.0);
    let sim = Simulation::new(
        &config,
        organic_model(Presence::resolve(&config.toggles)),
        &climate(),
        release,
    )
    .expect("simulation should assemble");

    let run = sim.run();
    assert!(run.error.is_none(), "run aborted: {:?}", run.error);
    assert_eq!(run.days.len(), DAYS);
    assert_eq!(
        run.days[0].date,
        NaiveDate::from_ymd_opt(2015, 3, 1).expect("valid date")
    );

    // Degradation and outflow only remove mass, so the domain can never
    // hold more than was released.
    let released = 5.0 * DAYS as f64;
    let held = run.total_mass_kg();
    assert!(held > 0.0, "released chemical should persist somewhere");
    assert!(
        held < released,
        "domain holds {held} kg out of {released} kg released"
    );

    // Mass leaves the air column for the surfaces once it rains.
    let rain_day = &run.days[4];
    let deposited: f64 = rain_day.fluxes.process_total("wet deposition");
    assert!(deposited > 0.0, "rain should scavenge the air column");
}

#[test]
fn removing_the_lake_pins_its_compartments_all_run() {
    let mut config = config("organic");
    config.toggles.fresh_water = false;
    let mut release = ReleaseSeries::zero("ten-day-check", DAYS);
    release.air.fill(5.0);
    release.soil[0].fill(3.0);
    let sim = Simulation::new(
        &config,
        organic_model(Presence::resolve(&config.toggles)),
        &climate(),
        release,
    )
    .expect("simulation should assemble");

    let run = sim.run();
    assert!(run.error.is_none(), "run aborted: {:?}", run.error);
    for day in &run.days {
        assert_eq!(day.state[organic_layout::FRESH_WATER], 0.0);
        assert_eq!(day.state[organic_layout::FRESH_SEDIMENT], 0.0);
    }
    // The river still drains somewhere.
    let last = run.days.last().expect("ten days ran");
    assert!(last.fluxes.process_total("advective outflow") > 0.0);
}

#[test]
fn removing_agricultural_soil_pins_its_layers_all_run() {
    let mut config = config("organic");
    config.toggles.soil = [true, true, false, true];
    let mut release = ReleaseSeries::zero("ten-day-check", DAYS);
    release.air.fill(5.0);
    // releases aimed at the missing soil go nowhere
    release.soil[SoilKind::Agricultural.index()].fill(3.0);
    let sim = Simulation::new(
        &config,
        organic_model(Presence::resolve(&config.toggles)),
        &climate(),
        release,
    )
    .expect("simulation should assemble");

    let run = sim.run();
    assert!(run.error.is_none(), "run aborted: {:?}", run.error);
    let surf = organic_layout::soil_surface(SoilKind::Agricultural);
    let deep = organic_layout::soil_deep(SoilKind::Agricultural);
    for day in &run.days {
        assert_eq!(day.state[surf], 0.0);
        assert_eq!(day.state[deep], 0.0);
        assert_eq!(day.masses_kg[surf], 0.0);
    }
    // the other surfaces still take the air burden once it rains
    assert!(run.days[4].fluxes.process_total("wet deposition") > 0.0);
    assert!(run.total_mass_kg() < 5.0 * DAYS as f64);
}

#[test]
fn deep_soil_decays_at_its_half_life_under_calm_forcing() {
    let config = config("organic");
    let mut release = ReleaseSeries::zero("ten-day-check", DAYS);
    release.deep_soil[0].fill(4.0);
    let sim = Simulation::new(
        &config,
        organic_model(Presence::resolve(&config.toggles)),
        &calm_climate(),
        release,
    )
    .expect("simulation should assemble");

    let run = sim.run();
    assert!(run.error.is_none(), "run aborted: {:?}", run.error);
    // With no rain there is no percolation, so the deep layer only
    // degrades and the inventory follows R/k (1 - exp(-k t)). The
    // half-life is in hours, the rate in 1/day.
    let k = 24.0 * std::f64::consts::LN_2
        / fixtures::organic_chemical().half_lives.deep_soil;
    let expected = 4.0 / k * (1.0 - (-k * DAYS as f64).exp());
    assert_relative_eq!(run.total_mass_kg(), expected, max_relative = 1.0e-6);
}

#[test]
fn zero_forcing_zero_release_stays_empty() {
    let config = config("organic");
    let sim = Simulation::new(
        &config,
        organic_model(Presence::resolve(&config.toggles)),
        &climate(),
        ReleaseSeries::zero("ten-day-check", DAYS),
    )
    .expect("simulation should assemble");

    let run = sim.run();
    assert!(run.error.is_none());
    for day in &run.days {
        assert!(day.state.iter().all(|&s| s == 0.0));
        assert!(day.masses_kg.iter().all(|&m| m == 0.0));
    }
}

#[test]
fn nano_release_builds_a_dissolved_pool() {
    let config = config("nano");
    let mut release = ReleaseSeries::zero("ten-day-check", DAYS);
    release.river_water.fill(2.0);
    let sim = Simulation::new(
        &config,
        FateModel::Nano(NanoModel {
            chem: fixtures::nano_chemical(),
            env: fixtures::environment(),
            presence: Presence::resolve(&config.toggles),
            background: Background::clean(),
        }),
        &climate(),
        release,
    )
    .expect("simulation should assemble");

    let run = sim.run();
    assert!(run.error.is_none(), "run aborted: {:?}", run.error);
    let last = run.days.last().expect("ten days ran");
    assert!(last.state[nano_layout::RIVER_SEDIMENT] > 0.0);
    assert!(
        last.state[nano_layout::DISSOLVED_RIVER] > 0.0,
        "particles in the river should shed a dissolved fraction"
    );
    assert!(run.total_mass_kg() < 2.0 * DAYS as f64);
}

#[test]
fn release_window_mismatch_is_rejected() {
    let config = config("organic");
    let release = ReleaseSeries::zero("ten-day-check", DAYS - 1);
    let err = Simulation::new(
        &config,
        organic_model(Presence::resolve(&config.toggles)),
        &climate(),
        release,
    );
    assert!(err.is_err(), "short release series must be rejected");
}
