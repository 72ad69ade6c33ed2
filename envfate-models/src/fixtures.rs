//! Canned scenario inputs shared by the test suites.
//!
//! A small temperate catchment: a 60 km river feeding a lake, a coastal sea,
//! and the four managed-land soil classes, with pyrene, zinc, and an
//! aggregated nano-TiO2 as the reference chemicals.

use envfate_core::params::{
    AerosolEnv, AirEnv, DegradationHalfLives, DissolutionFit, DissolutionParams, Environment,
    MetalChemical, NanoChemical, OrganicChemical, SedimentEnv, SoilEnv, WaterBodyEnv,
    WindErosionEnv,
};
use envfate_core::ClimateDay;

pub fn environment() -> Environment {
    let sediment = SedimentEnv {
        depth: 0.05,
        solid_fraction: 0.8,
        solid_density: 2400.0,
        oc_fraction: 0.04,
        burial_rate: 1.1e-6,
        resuspension_rate: 6.0e-7,
        advective_fraction: 0.01,
    };
    let water = |area: f64, depth: f64| WaterBodyEnv {
        area,
        depth,
        density: 998.0,
        dyn_viscosity: 1.0e-3,
        ph: 7.0,
        ss_concentration: 0.05,
        colloid_concentration: 2.0e-3,
        ss_density: 2400.0,
        ss_radius: 2.5e-6,
        ss_oc_fraction: 0.05,
        sediment,
    };
    let wind = WindErosionEnv {
        roughness: 0.005,
        k_constant: 0.0015,
        a_constant: 1.0,
        tsv: 7.0,
        tsv_min: 5.0,
        z_wind: 10.0,
        perc_wind: 0.4,
        wind_constant: 5.4,
        perc_uncovered: 0.2,
        perc_suspended: 0.1,
    };
    let soil = |area: f64| SoilEnv {
        area,
        depth: 0.1,
        deep_depth: 1.0,
        air_content: 0.25,
        water_content: 0.25,
        oc_fraction: 0.02,
        deep_oc_fraction: 0.01,
        solid_density: 2600.0,
        curve_number: 74.0,
        field_capacity: 0.3,
        erodibility: 0.28,
        slope_factor: 1.3,
        cover_factor: 0.2,
        practice_factor: 0.7,
        wind,
    };
    Environment {
        air: AirEnv {
            height: 800.0,
            density: 1.2,
            dyn_viscosity: 1.8e-5,
            aerosol: AerosolEnv {
                concentration: 4.0e-8,
                particle_density: 1500.0,
                particle_radius: 5.0e-7,
                oc_fraction: 0.2,
                scavenging_ratio: 2.0e5,
            },
        },
        river_length: 60_000.0,
        river_width: 50.0,
        river: water(3.0e6, 4.0),
        fresh: water(2.0e7, 10.0),
        sea: water(8.0e7, 20.0),
        coastal_area: 1.0e6,
        soils: [soil(4.0e8), soil(1.0e8), soil(2.0e8), soil(5.0e7)],
    }
}

pub fn organic_chemical() -> OrganicChemical {
    OrganicChemical {
        name: "pyrene".into(),
        molar_mass: 0.2023,
        molar_volume: 214.0,
        kow: 1.0e5,
        kaw: 5.0e-4,
        koc: 4.0e4,
        half_lives: DegradationHalfLives {
            air: 170.0,
            aerosol: 1700.0,
            river_water: 1700.0,
            river_sus_sed: 5500.0,
            river_sed_water: 1700.0,
            river_sed_solid: 17_000.0,
            fresh_water: 1700.0,
            fresh_sus_sed: 5500.0,
            fresh_sed_water: 1700.0,
            fresh_sed_solid: 17_000.0,
            sea_water: 1700.0,
            sea_sus_sed: 5500.0,
            sea_sed_water: 1700.0,
            sea_sed_solid: 17_000.0,
            soil_air: 170.0,
            soil_water: 1700.0,
            soil_solid: 17_000.0,
            deep_soil: 55_000.0,
        },
    }
}

pub fn metal_chemical() -> MetalChemical {
    MetalChemical {
        name: "zinc".into(),
        molar_mass: 0.0654,
        kd_sus_sed: 110.0,
        kd_sediment: 75.0,
        kd_soil: 40.0,
        kd_colloid: 250.0,
    }
}

pub fn nano_chemical() -> NanoChemical {
    let fit = DissolutionFit {
        max_fraction: 0.3,
        shape: 1.0,
    };
    NanoChemical {
        name: "nano-TiO2".into(),
        density: 4230.0,
        radius_agg: 1.5e-7,
        khet_air: 0.5,
        khet_river: 1.2,
        khet_fresh: 0.9,
        khet_sea: 2.5,
        ksed_river: 0.4,
        ksed_fresh: 0.3,
        ksed_sea: 0.5,
        kdis_river: 1.0e-3,
        kdis_river_sed: 5.0e-4,
        kdis_fresh: 1.0e-3,
        kdis_fresh_sed: 5.0e-4,
        kdis_sea: 2.0e-3,
        kdis_sea_sed: 8.0e-4,
        kdis_soil: [4.0e-4; 4],
        elution: [0.01; 4],
        enrichment_factor: 10.0,
        dissolution: DissolutionParams {
            river: fit,
            river_sediment: fit,
            fresh: fit,
            fresh_sediment: fit,
            sea: fit,
            sea_sediment: fit,
            soil: [fit; 4],
        },
    }
}

/// A dry, breezy 15 °C day with steady river and lake flows.
pub fn climate_day() -> ClimateDay {
    ClimateDay {
        precip_mm: 0.0,
        precip_m: 0.0,
        evap_mm: 2.0,
        windspeed_m_s: 4.0,
        windspeed_m_d: 4.0 * 86_400.0,
        flow_river_m3_s: 50.0,
        flow_river_m3_d: 50.0 * 86_400.0,
        flow_fresh_m3_s: 30.0,
        flow_fresh_m3_d: 30.0 * 86_400.0,
        temperature_k: 288.15,
    }
}
