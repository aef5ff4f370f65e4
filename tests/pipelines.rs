use std::path::PathBuf;

use eda_reports::app::pipeline::{COUNTS_FIGURE, run_counts, run_seawater};
use eda_reports::data::write_synthetic_inputs;
use eda_reports::domain::{CountsConfig, CvConfig, LifeStage, SeawaterConfig, SynthConfig};
use eda_reports::io::write_comparison;
use eda_reports::report::{format_equation, format_seawater_report};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("eda-it-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn synth(dir: &PathBuf) -> eda_reports::data::SynthOutput {
    write_synthetic_inputs(&SynthConfig {
        out_dir: dir.clone(),
        seed: 11,
        amphibian_rows: 600,
        seawater_rows: 150,
    })
    .unwrap()
}

#[test]
fn counts_pipeline_end_to_end() {
    let dir = scratch_dir("counts");
    let inputs = synth(&dir);

    let config = CountsConfig {
        input: inputs.amphibians,
        species: "RAMU".to_string(),
        top_n: 5,
        out_dir: dir.clone(),
        plot: true,
        width: 40,
    };
    let run = run_counts(&config).unwrap();

    assert_eq!(run.records_read, 600);
    assert!(run.records_used > 0 && run.records_used < 600);
    assert!(run.stage_year.keys().all(|(stage, _)| *stage != LifeStage::EggMass));
    assert_eq!(run.lakes.len(), 5);
    assert!(run.lakes.windows(2).all(|w| w[0].total >= w[1].total));

    let figure = run.figure.unwrap();
    assert_eq!(figure, dir.join(COUNTS_FIGURE));
    assert!(std::fs::read_to_string(&figure).unwrap().contains("<svg"));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn seawater_pipeline_end_to_end() {
    let dir = scratch_dir("seawater");
    let inputs = synth(&dir);

    let config = SeawaterConfig {
        input: inputs.seawater,
        cv: CvConfig { folds: 10, seed: 42 },
        final_model: None,
        export: None,
    };
    let run = run_seawater(&config).unwrap();
    let cmp = &run.comparison;

    assert_eq!(run.data.rows_read, 150);
    assert_eq!(run.data.samples.len() + run.data.rows_incomplete, 150);
    assert_eq!(cmp.fits.len(), 5);
    assert_eq!(cmp.cv.fold_errors.len(), 50);
    assert!(cmp.cv.fold_errors.iter().all(|e| e.rmse >= 0.0));
    assert_eq!(cmp.reported_fit().formula.id, cmp.leaders.aicc);

    // Same seed, same folds, same errors.
    let again = run_seawater(&config).unwrap();
    assert_eq!(again.comparison.cv.assignment, cmp.cv.assignment);
    assert_eq!(again.comparison.cv.fold_errors, cmp.cv.fold_errors);

    let report = format_seawater_report(&run.data, cmp);
    assert!(report.contains(&format_equation(cmp.reported_fit())));

    let mut buf = Vec::new();
    write_comparison(&mut buf, &run.data, cmp).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
    assert_eq!(json["criteria"].as_array().unwrap().len(), 5);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_input_is_an_input_error() {
    let config = SeawaterConfig {
        input: PathBuf::from("/nonexistent/seawater.csv"),
        cv: CvConfig::default(),
        final_model: None,
        export: None,
    };
    let err = run_seawater(&config).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}
