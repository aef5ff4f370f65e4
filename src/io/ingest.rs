//! CSV ingest for both report inputs.
//!
//! Both field sheets are read from their CSV export. Headers are matched
//! case-insensitively (a UTF-8 BOM on the first header is stripped) and unused
//! columns are ignored.
//!
//! Malformed input is fatal: a missing required column or an unparseable value
//! aborts the load with exit code 2 and the offending line number. The only
//! rows dropped silently are seawater rows with a blank/`NA` modelled field
//! (incomplete cases), so every candidate model is fitted on the same rows.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;

use crate::domain::{AmphibianRecord, LifeStage, SeawaterSample};
use crate::error::AppError;

/// Amphibian sheet column names.
pub const COL_SPECIES: &str = "amphibian_species";
pub const COL_LIFE_STAGE: &str = "amphibian_life_stage";
pub const COL_SURVEY_DATE: &str = "survey_date";
pub const COL_LAKE_ID: &str = "lake_id";
pub const COL_COUNT: &str = "amphibian_number";
pub const COL_LOCATION: &str = "amphibian_location";

/// Seawater sheet column names, paired with the domain field they feed.
pub const SEAWATER_COLUMNS: [(&str, &str); 7] = [
    ("o2sat", "o2_saturation"),
    ("t_deg_c", "temperature"),
    ("salinity", "salinity"),
    ("po4u_m", "phosphate"),
    ("no2u_m", "nitrate"),
    ("chlor_a", "chlorophyll"),
    ("depth_m", "depth"),
];

/// Seawater ingest output.
#[derive(Debug, Clone)]
pub struct SeawaterData {
    pub samples: Vec<SeawaterSample>,
    pub rows_read: usize,
    /// Rows skipped because a modelled field was blank or `NA`.
    pub rows_incomplete: usize,
}

pub fn load_amphibians(path: &Path) -> Result<Vec<AmphibianRecord>, AppError> {
    let file = open(path)?;
    read_amphibians(file)
}

pub fn load_seawater(path: &Path) -> Result<SeawaterData, AppError> {
    let file = open(path)?;
    read_seawater(file)
}

fn open(path: &Path) -> Result<File, AppError> {
    File::open(path).map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Parse amphibian survey rows from any CSV source.
pub fn read_amphibians<R: Read>(reader: R) -> Result<Vec<AmphibianRecord>, AppError> {
    let mut reader = csv_reader(reader);
    let header_map = read_header_map(&mut reader)?;
    for col in [COL_SPECIES, COL_LIFE_STAGE, COL_SURVEY_DATE, COL_LAKE_ID, COL_COUNT] {
        require_column(&header_map, col)?;
    }

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header line; CSV lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::input(format!("Line {line}: CSV parse error: {e}")))?;
        let row = parse_amphibian_row(&record, &header_map)
            .map_err(|e| AppError::input(format!("Line {line}: {e}")))?;
        records.push(row);
    }

    tracing::info!(rows = records.len(), "loaded amphibian records");
    Ok(records)
}

/// Parse seawater samples from any CSV source, keeping complete cases only.
pub fn read_seawater<R: Read>(reader: R) -> Result<SeawaterData, AppError> {
    let mut reader = csv_reader(reader);
    let header_map = read_header_map(&mut reader)?;
    for (col, _) in SEAWATER_COLUMNS {
        require_column(&header_map, col)?;
    }

    let mut samples = Vec::new();
    let mut rows_read = 0usize;
    let mut rows_incomplete = 0usize;

    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        rows_read += 1;
        let record = result.map_err(|e| AppError::input(format!("Line {line}: CSV parse error: {e}")))?;

        let mut values = [0.0f64; SEAWATER_COLUMNS.len()];
        let mut complete = true;
        for (slot, (col, _)) in values.iter_mut().zip(SEAWATER_COLUMNS) {
            match parse_opt_f64(get_optional(&record, &header_map, col))
                .map_err(|e| AppError::input(format!("Line {line}: column `{col}`: {e}")))?
            {
                Some(v) => *slot = v,
                None => complete = false,
            }
        }

        if !complete {
            rows_incomplete += 1;
            continue;
        }

        let [o2_saturation, temperature, salinity, phosphate, nitrate, chlorophyll, depth] = values;
        samples.push(SeawaterSample {
            o2_saturation,
            temperature,
            salinity,
            phosphate,
            nitrate,
            chlorophyll,
            depth,
        });
    }

    if rows_incomplete > 0 {
        tracing::warn!(rows_incomplete, "dropped seawater rows with missing modelled values");
    }
    tracing::info!(rows = samples.len(), "loaded seawater samples");

    if samples.is_empty() {
        return Err(AppError::insufficient("No complete seawater rows to model."));
    }

    Ok(SeawaterData {
        samples,
        rows_read,
        rows_incomplete,
    })
}

fn read_header_map<R: Read>(reader: &mut csv::Reader<R>) -> Result<HashMap<String, usize>, AppError> {
    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?;
    Ok(build_header_map(headers))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn require_column(header_map: &HashMap<String, usize>, name: &str) -> Result<(), AppError> {
    if header_map.contains_key(name) {
        Ok(())
    } else {
        Err(AppError::input(format!("Missing required column: `{name}`")))
    }
}

fn parse_amphibian_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<AmphibianRecord, String> {
    let species = get_required(record, header_map, COL_SPECIES)?.to_string();
    let life_stage: LifeStage = get_required(record, header_map, COL_LIFE_STAGE)?.parse()?;
    let survey_date = parse_date(get_required(record, header_map, COL_SURVEY_DATE)?)?;
    let lake_id = get_required(record, header_map, COL_LAKE_ID)?.to_string();
    let location = get_optional(record, header_map, COL_LOCATION).map(str::to_string);
    let count = parse_count(get_optional(record, header_map, COL_COUNT))?;

    Ok(AmphibianRecord {
        species,
        life_stage,
        survey_date,
        lake_id,
        location,
        count,
    })
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = *header_map.get(name)?;
    let value = record.get(idx)?.trim();
    if is_missing(value) { None } else { Some(value) }
}

fn get_required<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Result<&'a str, String> {
    get_optional(record, header_map, name).ok_or_else(|| format!("Missing value for `{name}`."))
}

fn is_missing(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("na") || value.eq_ignore_ascii_case("nan")
}

fn parse_opt_f64(value: Option<&str>) -> Result<Option<f64>, String> {
    let Some(s) = value else {
        return Ok(None);
    };
    let v: f64 = s.parse().map_err(|_| format!("`{s}` is not a number."))?;
    if v.is_finite() {
        Ok(Some(v))
    } else {
        Err(format!("`{s}` is not a finite number."))
    }
}

fn parse_count(value: Option<&str>) -> Result<Option<u64>, String> {
    let Some(s) = value else {
        return Ok(None);
    };
    if let Ok(n) = s.parse::<u64>() {
        return Ok(Some(n));
    }
    // Spreadsheet exports sometimes write whole numbers as `12.0`.
    match s.parse::<f64>() {
        Ok(v) if v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 => Ok(Some(v as u64)),
        _ => Err(format!("`{s}` is not a non-negative whole count.")),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    Err(format!("Invalid date `{s}` (expected YYYY-MM-DD or M/D/YYYY)."))
}
