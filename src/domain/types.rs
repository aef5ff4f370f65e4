//! Shared domain types.
//!
//! Records are immutable once ingested; everything else (sums, fits, folds) is
//! derived from them and recomputed on demand.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Maturity class of an observed amphibian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeStage {
    Adult,
    SubAdult,
    Tadpole,
    EggMass,
}

impl LifeStage {
    /// Stages shown in the counts report, in stacking order.
    pub const REPORTED: [LifeStage; 3] = [LifeStage::Adult, LifeStage::SubAdult, LifeStage::Tadpole];

    pub fn display_name(self) -> &'static str {
        match self {
            LifeStage::Adult => "Adult",
            LifeStage::SubAdult => "SubAdult",
            LifeStage::Tadpole => "Tadpole",
            LifeStage::EggMass => "EggMass",
        }
    }

    /// Adults and sub-adults count towards the per-lake totals.
    pub fn is_post_metamorphic(self) -> bool {
        matches!(self, LifeStage::Adult | LifeStage::SubAdult)
    }
}

impl fmt::Display for LifeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for LifeStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Field sheets spell these several ways: "SubAdult", "sub-adult", "Egg Mass".
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "adult" => Ok(LifeStage::Adult),
            "subadult" => Ok(LifeStage::SubAdult),
            "tadpole" => Ok(LifeStage::Tadpole),
            "eggmass" => Ok(LifeStage::EggMass),
            _ => Err(format!("Unknown life stage `{s}`.")),
        }
    }
}

/// One amphibian survey observation.
#[derive(Debug, Clone, PartialEq)]
pub struct AmphibianRecord {
    /// Species code, e.g. `RAMU` for the mountain yellow-legged frog.
    pub species: String,
    pub life_stage: LifeStage,
    pub survey_date: NaiveDate,
    pub lake_id: String,
    pub location: Option<String>,
    /// Observed count; `None` when the sheet left it blank.
    pub count: Option<u64>,
}

impl AmphibianRecord {
    pub fn year(&self) -> i32 {
        self.survey_date.year()
    }
}

/// Summed adult + sub-adult count for one lake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LakeCount {
    pub lake_id: String,
    pub total: u64,
}

/// A seawater bottle sample with the fields used for modelling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeawaterSample {
    /// Dissolved-oxygen saturation (%). The response of every model.
    pub o2_saturation: f64,
    /// Temperature (°C).
    pub temperature: f64,
    /// Salinity (PSU).
    pub salinity: f64,
    /// Phosphate (µM).
    pub phosphate: f64,
    /// Nitrite/nitrate (µM).
    pub nitrate: f64,
    /// Chlorophyll-a (µg/L).
    pub chlorophyll: f64,
    /// Depth (m).
    pub depth: f64,
}

/// A covariate available to the oxygen-saturation models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Predictor {
    Temperature,
    Salinity,
    Phosphate,
    Nitrate,
    Chlorophyll,
    Depth,
}

impl Predictor {
    pub fn display_name(self) -> &'static str {
        match self {
            Predictor::Temperature => "temperature",
            Predictor::Salinity => "salinity",
            Predictor::Phosphate => "phosphate",
            Predictor::Nitrate => "nitrate",
            Predictor::Chlorophyll => "chlorophyll",
            Predictor::Depth => "depth",
        }
    }

    pub fn value(self, sample: &SeawaterSample) -> f64 {
        match self {
            Predictor::Temperature => sample.temperature,
            Predictor::Salinity => sample.salinity,
            Predictor::Phosphate => sample.phosphate,
            Predictor::Nitrate => sample.nitrate,
            Predictor::Chlorophyll => sample.chlorophyll,
            Predictor::Depth => sample.depth,
        }
    }
}

/// A fixed linear model: `o2_saturation ~ 1 + predictors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelFormula {
    pub id: String,
    pub predictors: Vec<Predictor>,
}

impl ModelFormula {
    pub fn new(id: impl Into<String>, predictors: &[Predictor]) -> Self {
        Self {
            id: id.into(),
            predictors: predictors.to_vec(),
        }
    }

    /// Number of regression coefficients, intercept included.
    pub fn coef_len(&self) -> usize {
        self.predictors.len() + 1
    }

    /// `o2_sat ~ temperature + salinity + ...`
    pub fn describe(&self) -> String {
        let terms: Vec<&str> = self.predictors.iter().map(|p| p.display_name()).collect();
        format!("o2_sat ~ {}", terms.join(" + "))
    }
}

/// One estimated coefficient with its inference statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coefficient {
    /// `"(Intercept)"` or the predictor name.
    pub term: String,
    pub estimate: f64,
    pub std_error: f64,
    pub t_value: f64,
    pub p_value: f64,
}

/// An OLS fit of one formula on one set of samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FittedModel {
    pub formula: ModelFormula,
    pub coefficients: Vec<Coefficient>,
    pub sse: f64,
    pub n: usize,
    /// Residual degrees of freedom `n - p`.
    pub df_residual: usize,
    pub log_likelihood: f64,
    /// Parameters counted by information criteria: coefficients + residual variance.
    pub k: usize,
}

impl FittedModel {
    pub fn estimates(&self) -> Vec<f64> {
        self.coefficients.iter().map(|c| c.estimate).collect()
    }

    pub fn r_squared(&self, sst: f64) -> f64 {
        if sst > 0.0 { 1.0 - self.sse / sst } else { f64::NAN }
    }
}

/// Information criteria for one fitted model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Criteria {
    pub k: usize,
    pub n: usize,
    pub log_likelihood: f64,
    pub aic: f64,
    pub aicc: f64,
    pub bic: f64,
}

/// Cross-validation settings, passed explicitly to the CV routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CvConfig {
    pub folds: usize,
    pub seed: u64,
}

impl Default for CvConfig {
    fn default() -> Self {
        Self { folds: 10, seed: 42 }
    }
}

/// Settings for the amphibian counts report.
#[derive(Debug, Clone)]
pub struct CountsConfig {
    pub input: PathBuf,
    pub species: String,
    pub top_n: usize,
    pub out_dir: PathBuf,
    pub plot: bool,
    pub width: usize,
}

/// Settings for the seawater model-comparison report.
#[derive(Debug, Clone)]
pub struct SeawaterConfig {
    pub input: PathBuf,
    pub cv: CvConfig,
    /// 1-based index into the candidate formulas; `None` reports the lowest-AICc model.
    pub final_model: Option<usize>,
    pub export: Option<PathBuf>,
}

/// Settings for synthetic input generation.
#[derive(Debug, Clone)]
pub struct SynthConfig {
    pub out_dir: PathBuf,
    pub seed: u64,
    pub amphibian_rows: usize,
    pub seawater_rows: usize,
}
