//! Daily simulation driver.
//!
//! The engine steps one calendar day at a time: forcing, geometry, and the
//! process tables are frozen at the day's values, the stiff state system is
//! integrated across the day with an explicit Runge-Kutta solver, and the
//! day's fluxes are priced at the starting state. The flat state vector
//! exists only at this boundary; everywhere else states travel as named
//! layout arrays.
//!
//! A day that produces a non-finite derivative or drives a state negative
//! beyond tolerance aborts the run; the output keeps every day up to and
//! including the last valid one, and the error names the day and the
//! offending compartment. Negative excursions within tolerance are solver
//! noise and are clamped to zero.

use chrono::NaiveDate;
use envfate_core::compartment::{nano_layout, organic_layout};
use envfate_core::{ClimateSeries, FateError, FateResult, ScenarioConfig};
use envfate_models::{
    AquivalenceDay, AquivalenceModel, FluxLedger, NanoDay, NanoModel, OrganicDay, OrganicModel,
};
use log::{debug, info};
use nalgebra::SVector;
use ode_solvers::Rk4;

/// States this close below zero are solver noise, not mass creation.
pub const NEGATIVE_TOLERANCE: f64 = 1.0e-9;

/// Fixed integration step within a day. The fastest process rates are a few
/// per day, so fifty steps resolve them comfortably.
pub const DAY_STEP: f64 = 0.02;

/// The chemistry driving a simulation.
#[derive(Debug, Clone)]
pub enum FateModel {
    Organic(OrganicModel),
    Aquivalence(AquivalenceModel),
    Nano(NanoModel),
}

impl FateModel {
    fn state_len(&self) -> usize {
        match self {
            FateModel::Organic(_) | FateModel::Aquivalence(_) => organic_layout::N,
            FateModel::Nano(_) => nano_layout::N,
        }
    }

    /// State labels in integrator order.
    pub fn state_names(&self) -> &'static [&'static str] {
        match self {
            FateModel::Organic(_) | FateModel::Aquivalence(_) => &organic_layout::NAMES,
            FateModel::Nano(_) => &nano_layout::NAMES,
        }
    }
}

/// One simulated day in the output.
#[derive(Debug)]
pub struct DayResult {
    pub date: NaiveDate,
    /// End-of-day state in integrator order (fugacity, aquivalence, or kg).
    pub state: Vec<f64>,
    /// End-of-day compartment inventories, kg.
    pub masses_kg: Vec<f64>,
    /// The day's process fluxes priced at the start-of-day state.
    pub fluxes: FluxLedger,
}

/// Completed (or aborted) run: every day up to the last valid one, and the
/// abort reason if there was one.
#[derive(Debug)]
pub struct SimulationRun {
    pub days: Vec<DayResult>,
    pub error: Option<FateError>,
}

impl SimulationRun {
    pub fn total_mass_kg(&self) -> f64 {
        self.days
            .last()
            .map(|d| d.masses_kg.iter().sum())
            .unwrap_or(0.0)
    }
}

/// A configured scenario ready to step.
#[derive(Debug)]
pub struct Simulation {
    pub model: FateModel,
    pub climate: ClimateSeries,
    pub release: envfate_core::params::ReleaseSeries,
    pub start: NaiveDate,
    pub days: usize,
}

impl Simulation {
    /// Wire a scenario together, trimming the climate record to the
    /// configured window and validating the release series against it.
    pub fn new(
        config: &ScenarioConfig,
        model: FateModel,
        climate: &ClimateSeries,
        release: envfate_core::params::ReleaseSeries,
    ) -> FateResult<Self> {
        let window = climate.slice(config.start, config.end)?;
        release.validate()?;
        if release.len() != window.len() {
            return Err(FateError::SeriesLengthMismatch(format!(
                "release series spans {} days, window spans {}",
                release.len(),
                window.len()
            )));
        }
        Ok(Self {
            model,
            climate: window,
            release,
            start: config.start,
            days: config.days(),
        })
    }

    /// Step the whole window. Never panics; an unphysical day ends the run
    /// early with the abort reason in the result.
    pub fn run(&self) -> SimulationRun {
        let n = self.model.state_len();
        let mut state = vec![0.0_f64; n];
        let mut days = Vec::with_capacity(self.days);
        info!(
            "starting {}-day run from {} for scenario '{}'",
            self.days, self.start, self.release.scenario
        );

        for index in 0..self.days {
            let date = self.start + chrono::Duration::days(index as i64);
            match self.step_day(index, &mut state) {
                Ok((fluxes, masses_kg)) => {
                    debug!(
                        "day {date}: {:.3e} kg in domain",
                        masses_kg.iter().sum::<f64>()
                    );
                    days.push(DayResult {
                        date,
                        state: state.clone(),
                        masses_kg,
                        fluxes,
                    });
                }
                Err(error) => {
                    info!("run aborted on {date}: {error}");
                    return SimulationRun {
                        days,
                        error: Some(error),
                    };
                }
            }
        }
        SimulationRun { days, error: None }
    }

    /// Integrate one day in place. Returns the day's flux ledger (priced at
    /// the start-of-day state) and the end-of-day inventories in kg.
    fn step_day(&self, index: usize, state: &mut [f64]) -> FateResult<(FluxLedger, Vec<f64>)> {
        let climate = self.climate.day(index)?;
        let release = self.release.day(index)?;
        match &self.model {
            FateModel::Organic(model) => {
                let day = model.day_system(&climate, &release)?;
                let start = to_array::<{ organic_layout::N }>(state);
                let ledger = day.fluxes(&start);
                let end = integrate_organic(&day, start)?;
                state.copy_from_slice(&end);
                check_state(index, self.model.state_names(), state)?;
                let masses = day.masses_kg(&to_array::<{ organic_layout::N }>(state));
                Ok((ledger, masses.to_vec()))
            }
            FateModel::Aquivalence(model) => {
                let day = model.day_system(&climate, &release)?;
                let start = to_array::<{ organic_layout::N }>(state);
                let ledger = day.fluxes(&start);
                let end = integrate_aquivalence(&day, start)?;
                state.copy_from_slice(&end);
                check_state(index, self.model.state_names(), state)?;
                let masses = day.masses_kg(&to_array::<{ organic_layout::N }>(state));
                Ok((ledger, masses.to_vec()))
            }
            FateModel::Nano(model) => {
                let day = model.day_system(&climate, &release)?;
                let start = to_array::<{ nano_layout::N }>(state);
                let ledger = day.fluxes(&start);
                let end = integrate_nano(&day, start)?;
                state.copy_from_slice(&end);
                check_state(index, self.model.state_names(), state)?;
                Ok((ledger, state.to_vec()))
            }
        }
    }
}

fn to_array<const N: usize>(state: &[f64]) -> [f64; N] {
    let mut out = [0.0_f64; N];
    out.copy_from_slice(state);
    out
}

/// Clamp tolerance-level negatives and reject everything worse.
fn check_state(day: usize, names: &[&'static str], state: &mut [f64]) -> FateResult<()> {
    for (i, value) in state.iter_mut().enumerate() {
        if !value.is_finite() {
            return Err(FateError::NonFiniteDerivative {
                day,
                compartment: names[i].to_string(),
            });
        }
        if *value < 0.0 {
            if *value < -NEGATIVE_TOLERANCE {
                return Err(FateError::NegativeState {
                    day,
                    compartment: names[i].to_string(),
                    value: *value,
                    tolerance: NEGATIVE_TOLERANCE,
                });
            }
            *value = 0.0;
        }
    }
    Ok(())
}

struct OrganicOde<'a>(&'a OrganicDay);

impl ode_solvers::System<f64, SVector<f64, { organic_layout::N }>> for OrganicOde<'_> {
    fn system(
        &self,
        _t: f64,
        y: &SVector<f64, { organic_layout::N }>,
        dy: &mut SVector<f64, { organic_layout::N }>,
    ) {
        let mut state = [0.0_f64; organic_layout::N];
        state.copy_from_slice(y.as_slice());
        let d = self.0.derivatives(&state);
        dy.copy_from_slice(&d);
    }
}

struct AquivalenceOde<'a>(&'a AquivalenceDay);

impl ode_solvers::System<f64, SVector<f64, { organic_layout::N }>> for AquivalenceOde<'_> {
    fn system(
        &self,
        _t: f64,
        y: &SVector<f64, { organic_layout::N }>,
        dy: &mut SVector<f64, { organic_layout::N }>,
    ) {
        let mut state = [0.0_f64; organic_layout::N];
        state.copy_from_slice(y.as_slice());
        let d = self.0.derivatives(&state);
        dy.copy_from_slice(&d);
    }
}

struct NanoOde<'a>(&'a NanoDay);

impl ode_solvers::System<f64, SVector<f64, { nano_layout::N }>> for NanoOde<'_> {
    fn system(
        &self,
        _t: f64,
        y: &SVector<f64, { nano_layout::N }>,
        dy: &mut SVector<f64, { nano_layout::N }>,
    ) {
        let mut state = [0.0_f64; nano_layout::N];
        state.copy_from_slice(y.as_slice());
        let d = self.0.derivatives(&state);
        dy.copy_from_slice(&d);
    }
}

macro_rules! integrate_day {
    ($name:ident, $ode:ident, $day:ty, $n:expr) => {
        fn $name(day: &$day, start: [f64; $n]) -> FateResult<[f64; $n]> {
            let y0 = SVector::<f64, { $n }>::from_row_slice(&start);
            let mut stepper = Rk4::new($ode(day), 0.0, y0, 1.0, DAY_STEP);
            stepper
                .integrate()
                .map_err(|e| FateError::Config(format!("integrator: {e}")))?;
            let mut out = [0.0_f64; $n];
            match stepper.y_out().last() {
                Some(end) => out.copy_from_slice(end.as_slice()),
                None => out = start,
            }
            Ok(out)
        }
    };
}

integrate_day!(integrate_organic, OrganicOde, OrganicDay, organic_layout::N);
integrate_day!(integrate_aquivalence, AquivalenceOde, AquivalenceDay, organic_layout::N);
integrate_day!(integrate_nano, NanoOde, NanoDay, nano_layout::N);
