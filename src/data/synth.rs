//! Synthetic field sheets for trying the reports without survey data.
//!
//! Both generators are driven by a seeded `StdRng`, so the same seed always
//! writes byte-identical files.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{Normal, Poisson};

use crate::domain::{AmphibianRecord, LifeStage, SeawaterSample, SynthConfig};
use crate::error::AppError;

/// Share of seawater rows written with a blank chlorophyll value.
const MISSING_CHLOROPHYLL_RATE: f64 = 0.02;
/// Share of amphibian rows written with a blank count.
const MISSING_COUNT_RATE: f64 = 0.05;

const SPECIES: [(&str, f64); 3] = [("RAMU", 0.7), ("PSRE", 0.2), ("BUBO", 0.1)];
const STAGES: [(LifeStage, f64, f64); 4] = [
    // (stage, probability, mean count)
    (LifeStage::Adult, 0.35, 4.0),
    (LifeStage::SubAdult, 0.2, 3.0),
    (LifeStage::Tadpole, 0.35, 40.0),
    (LifeStage::EggMass, 0.1, 2.0),
];

/// A generated seawater row; chlorophyll may be left blank in the CSV.
#[derive(Debug, Clone, Copy)]
pub struct SynthSeawaterRow {
    pub sample: SeawaterSample,
    pub chlorophyll_recorded: bool,
}

/// Paths written by [`write_synthetic_inputs`].
#[derive(Debug, Clone)]
pub struct SynthOutput {
    pub amphibians: PathBuf,
    pub seawater: PathBuf,
}

pub fn generate_amphibians(rows: usize, seed: u64) -> Result<Vec<AmphibianRecord>, AppError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let lakes: Vec<String> = (0..30).map(|i| (10_100 + i * 37).to_string()).collect();

    let mut out = Vec::with_capacity(rows);
    for _ in 0..rows {
        let species = pick_weighted(&mut rng, &SPECIES);
        let (stage, mean_count) = pick_weighted(&mut rng, &STAGES.map(|(s, w, m)| ((s, m), w)));

        let year = rng.gen_range(1995..=2002);
        let survey_date = NaiveDate::from_ymd_opt(year, rng.gen_range(6..=9), rng.gen_range(1..=28))
            .ok_or_else(|| AppError::numeric("Generated an invalid survey date."))?;

        // Some lakes are consistently more productive than others.
        let lake_idx = rng.gen_range(0..lakes.len());
        let lake_factor = 0.5 + (lake_idx % 7) as f64 * 0.25;
        let poisson = Poisson::new(mean_count * lake_factor)
            .map_err(|e| AppError::numeric(format!("Count distribution error: {e}")))?;
        let roll: f64 = rng.r#gen();
        let count = if roll < MISSING_COUNT_RATE {
            None
        } else {
            let draw: f64 = poisson.sample(&mut rng);
            Some(draw as u64)
        };

        out.push(AmphibianRecord {
            species: species.to_string(),
            life_stage: stage,
            survey_date,
            lake_id: lakes[lake_idx].clone(),
            location: Some("shore".to_string()),
            count,
        });
    }
    Ok(out)
}

pub fn generate_seawater(rows: usize, seed: u64) -> Result<Vec<SynthSeawaterRow>, AppError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = |mean: f64, sd: f64| {
        Normal::new(mean, sd).map_err(|e| AppError::numeric(format!("Noise distribution error: {e}")))
    };
    let temp_dist = normal(11.0, 3.0)?;
    let sal_dist = normal(33.6, 0.3)?;
    let unit = normal(0.0, 1.0)?;

    let mut out = Vec::with_capacity(rows);
    for _ in 0..rows {
        let depth: f64 = rng.gen_range(0.0..500.0);
        // Water cools with depth.
        let temperature = (temp_dist.sample(&mut rng) - depth * 0.01).max(1.0);
        let salinity = sal_dist.sample(&mut rng);
        let phosphate = (3.0 - 0.18 * temperature + 0.15 * unit.sample(&mut rng)).max(0.05);
        let nitrate = (0.15 * unit.sample(&mut rng)).abs();
        let chlorophyll = (0.6 * unit.sample(&mut rng)).exp() * 0.4;
        let o2_saturation = 150.0 - 2.2 * temperature + 1.5 * (salinity - 33.6) - 18.0 * phosphate
            - 0.03 * depth
            + 0.8 * chlorophyll
            + 3.0 * unit.sample(&mut rng);

        let roll: f64 = rng.r#gen();
        out.push(SynthSeawaterRow {
            sample: SeawaterSample {
                o2_saturation,
                temperature,
                salinity,
                phosphate,
                nitrate,
                chlorophyll,
                depth,
            },
            chlorophyll_recorded: roll >= MISSING_CHLOROPHYLL_RATE,
        });
    }
    Ok(out)
}

/// Write `amphibians.csv` and `seawater.csv` into `config.out_dir`.
pub fn write_synthetic_inputs(config: &SynthConfig) -> Result<SynthOutput, AppError> {
    std::fs::create_dir_all(&config.out_dir).map_err(|e| {
        AppError::input(format!("Failed to create '{}': {e}", config.out_dir.display()))
    })?;

    let amphibians = generate_amphibians(config.amphibian_rows, config.seed)?;
    // Offset so the two sheets do not share a random stream.
    let seawater = generate_seawater(config.seawater_rows, config.seed.wrapping_add(1))?;

    let out = SynthOutput {
        amphibians: config.out_dir.join("amphibians.csv"),
        seawater: config.out_dir.join("seawater.csv"),
    };
    write_amphibians_csv(create(&out.amphibians)?, &amphibians)?;
    write_seawater_csv(create(&out.seawater)?, &seawater)?;

    tracing::info!(
        amphibians = %out.amphibians.display(),
        seawater = %out.seawater.display(),
        "wrote synthetic inputs"
    );
    Ok(out)
}

pub fn write_amphibians_csv<W: Write>(writer: W, records: &[AmphibianRecord]) -> Result<(), AppError> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record([
        "lake_id",
        "survey_date",
        "amphibian_species",
        "amphibian_life_stage",
        "amphibian_number",
        "amphibian_location",
    ])
    .map_err(write_err)?;
    for r in records {
        w.write_record([
            r.lake_id.clone(),
            r.survey_date.format("%Y-%m-%d").to_string(),
            r.species.clone(),
            r.life_stage.display_name().to_string(),
            r.count.map(|c| c.to_string()).unwrap_or_default(),
            r.location.clone().unwrap_or_default(),
        ])
        .map_err(write_err)?;
    }
    w.flush().map_err(|e| AppError::input(format!("Failed to flush CSV: {e}")))
}

pub fn write_seawater_csv<W: Write>(writer: W, rows: &[SynthSeawaterRow]) -> Result<(), AppError> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(["sta_id", "depth_m", "t_deg_c", "salinity", "o2sat", "po4u_m", "no2u_m", "chlor_a"])
        .map_err(write_err)?;
    for (i, row) in rows.iter().enumerate() {
        let s = &row.sample;
        let chlor = if row.chlorophyll_recorded {
            format!("{:.4}", s.chlorophyll)
        } else {
            "NA".to_string()
        };
        w.write_record([
            format!("S{:04}", i + 1),
            format!("{:.1}", s.depth),
            format!("{:.3}", s.temperature),
            format!("{:.3}", s.salinity),
            format!("{:.2}", s.o2_saturation),
            format!("{:.3}", s.phosphate),
            format!("{:.3}", s.nitrate),
            chlor,
        ])
        .map_err(write_err)?;
    }
    w.flush().map_err(|e| AppError::input(format!("Failed to flush CSV: {e}")))
}

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path).map_err(|e| AppError::input(format!("Failed to create '{}': {e}", path.display())))
}

fn write_err(e: csv::Error) -> AppError {
    AppError::input(format!("Failed to write CSV row: {e}"))
}

fn pick_weighted<T: Copy>(rng: &mut StdRng, choices: &[(T, f64)]) -> T {
    let total: f64 = choices.iter().map(|(_, w)| w).sum();
    let mut roll = rng.r#gen::<f64>() * total;
    for &(item, w) in choices {
        if roll < w {
            return item;
        }
        roll -= w;
    }
    choices[choices.len() - 1].0
}
