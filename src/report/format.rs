//! Formatted terminal output for both reports.
//!
//! All formatting lives here so the aggregation and fitting code stays free of
//! presentation details, and output changes stay in one place.

use crate::counts::{StageYearCounts, years};
use crate::domain::{FittedModel, LakeCount, LifeStage};
use crate::fit::criteria::CriteriaTable;
use crate::fit::cv::CvResult;
use crate::fit::selection::ModelComparison;
use crate::io::ingest::SeawaterData;
use crate::math::total_sum_of_squares;

/// Inputs of the counts report, gathered by the pipeline.
#[derive(Debug, Clone)]
pub struct CountsSummary<'a> {
    pub species: &'a str,
    pub records_read: usize,
    pub records_used: usize,
    pub stage_year: &'a StageYearCounts,
    pub lakes: &'a [LakeCount],
}

pub fn format_counts_report(summary: &CountsSummary<'_>) -> String {
    let mut out = String::new();
    out.push_str("=== eda - Amphibian counts ===\n");
    out.push_str(&format!("Species: {}\n", summary.species));
    out.push_str(&format!(
        "Records: read={} | used={} (egg masses and other species excluded)\n",
        summary.records_read, summary.records_used
    ));

    out.push_str("\nCounts by year and life stage:\n");
    out.push_str(&format_stage_year_table(summary.stage_year));

    out.push_str(&format!("\nTop {} lakes (adult + sub-adult):\n", summary.lakes.len()));
    out.push_str(&format_top_lakes(summary.lakes));
    out
}

pub fn format_stage_year_table(counts: &StageYearCounts) -> String {
    let years = years(counts);
    if years.is_empty() {
        return "(no records)\n".to_string();
    }

    let mut out = String::new();
    push_row(&mut out, &format!("{:<6} {:>10} {:>10} {:>10} {:>10}", "year", "Adult", "SubAdult", "Tadpole", "total"));
    push_row(&mut out, &format!("{:-<6} {:-<10} {:-<10} {:-<10} {:-<10}", "", "", "", "", ""));
    for year in years {
        let values: Vec<u64> = LifeStage::REPORTED
            .iter()
            .map(|&s| counts.get(&(s, year)).copied().unwrap_or(0))
            .collect();
        let total: u64 = values.iter().sum();
        push_row(
            &mut out,
            &format!("{year:<6} {:>10} {:>10} {:>10} {total:>10}", values[0], values[1], values[2]),
        );
    }
    out
}

pub fn format_top_lakes(lakes: &[LakeCount]) -> String {
    if lakes.is_empty() {
        return "(no adult or sub-adult counts)\n".to_string();
    }
    let mut out = String::new();
    push_row(&mut out, &format!("{:<4} {:<12} {:>10}", "rank", "lake_id", "count"));
    push_row(&mut out, &format!("{:-<4} {:-<12} {:-<10}", "", "", ""));
    for (i, lake) in lakes.iter().enumerate() {
        push_row(
            &mut out,
            &format!("{:<4} {:<12} {:>10}", i + 1, truncate(&lake.lake_id, 12), lake.total),
        );
    }
    out
}

/// Full text of the seawater model-comparison report.
pub fn format_seawater_report(data: &SeawaterData, cmp: &ModelComparison) -> String {
    let mut out = String::new();
    out.push_str("=== eda - Seawater oxygen-saturation models ===\n");
    out.push_str(&format!(
        "Samples: read={} | complete={} | dropped (missing values)={}\n",
        data.rows_read,
        data.samples.len(),
        data.rows_incomplete
    ));

    out.push_str("\nCandidate models:\n");
    for fit in &cmp.fits {
        out.push_str(&format!("  {:<8} {}\n", fit.formula.id, fit.formula.describe()));
    }

    out.push_str("\nInformation criteria (sorted by AICc):\n");
    out.push_str(&format_criteria_table(&cmp.criteria));

    out.push_str(&format!(
        "\n{}-fold cross-validation (seed {}):\n",
        cmp.cv.folds, cmp.cv.seed
    ));
    out.push_str(&format_cv_summary(&cmp.cv));
    out.push_str("\nPer-fold RMSE:\n");
    out.push_str(&format_fold_table(&cmp.cv));

    out.push_str("\nLowest by signal:\n");
    out.push_str(&format!("- AICc     : {}\n", cmp.leaders.aicc));
    out.push_str(&format!("- BIC      : {}\n", cmp.leaders.bic));
    out.push_str(&format!("- CV RMSE  : {}\n", cmp.leaders.cv_rmse));

    let reported = cmp.reported_fit();
    let observed: Vec<f64> = data.samples.iter().map(|s| s.o2_saturation).collect();
    out.push_str(&format!(
        "\nReported model: {} ({})\n",
        reported.formula.id,
        reported.formula.describe()
    ));
    out.push_str(&format!(
        "n={} | residual df={} | R^2={:.4}\n",
        reported.n,
        reported.df_residual,
        reported.r_squared(total_sum_of_squares(&observed))
    ));
    out.push_str(&format_coefficients(reported));
    out.push_str(&format!("\n{}\n", format_equation(reported)));
    out
}

pub fn format_criteria_table(table: &CriteriaTable) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        &format!(
            "{:<8} {:>3} {:>12} {:>10} {:>12} {:>10} {:>12}",
            "model", "K", "AICc", "dAICc", "BIC", "dBIC", "logLik"
        ),
    );
    push_row(
        &mut out,
        &format!("{:-<8} {:-<3} {:-<12} {:-<10} {:-<12} {:-<10} {:-<12}", "", "", "", "", "", "", ""),
    );
    for row in &table.rows {
        let c = &row.criteria;
        push_row(
            &mut out,
            &format!(
                "{:<8} {:>3} {:>12.3} {:>10.3} {:>12.3} {:>10.3} {:>12.3}",
                row.model_id, c.k, c.aicc, row.delta_aicc, c.bic, row.delta_bic, c.log_likelihood
            ),
        );
    }
    out
}

pub fn format_cv_summary(cv: &CvResult) -> String {
    let mut out = String::new();
    push_row(&mut out, &format!("{:<8} {:>12} {:>12}", "model", "mean RMSE", "sd RMSE"));
    push_row(&mut out, &format!("{:-<8} {:-<12} {:-<12}", "", "", ""));
    for s in &cv.summaries {
        push_row(
            &mut out,
            &format!("{:<8} {:>12.4} {:>12.4}", s.model_id, s.mean_rmse, s.sd_rmse),
        );
    }
    out
}

/// Folds down, models across.
pub fn format_fold_table(cv: &CvResult) -> String {
    let ids: Vec<&str> = cv.summaries.iter().map(|s| s.model_id.as_str()).collect();
    let columns: Vec<Vec<f64>> = ids.iter().map(|id| cv.rmse_by_fold(id)).collect();

    let mut out = String::new();
    let mut header = format!("{:<5}", "fold");
    let mut rule = format!("{:-<5}", "");
    for id in &ids {
        header.push_str(&format!(" {:>10}", truncate(id, 10)));
        rule.push_str(&format!(" {:-<10}", ""));
    }
    push_row(&mut out, &header);
    push_row(&mut out, &rule);

    for fold in 0..cv.folds {
        let mut line = format!("{:<5}", fold + 1);
        for col in &columns {
            match col.get(fold) {
                Some(v) => line.push_str(&format!(" {v:>10.4}")),
                None => line.push_str(&format!(" {:>10}", "-")),
            }
        }
        push_row(&mut out, &line);
    }
    out
}

pub fn format_coefficients(fit: &FittedModel) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        &format!("{:<12} {:>12} {:>12} {:>10} {:>10}", "term", "estimate", "std.error", "t", "p"),
    );
    push_row(&mut out, &format!("{:-<12} {:-<12} {:-<12} {:-<10} {:-<10}", "", "", "", "", ""));
    for c in &fit.coefficients {
        push_row(
            &mut out,
            &format!(
                "{:<12} {:>12.4} {:>12.4} {:>10.3} {:>10}",
                c.term,
                c.estimate,
                c.std_error,
                c.t_value,
                fmt_p(c.p_value)
            ),
        );
    }
    out
}

/// `o2_sat = 150.123 - 1.234*temperature + 0.456*salinity`
pub fn format_equation(fit: &FittedModel) -> String {
    let mut eq = String::from("o2_sat = ");
    let mut terms = fit.coefficients.iter();
    if let Some(intercept) = terms.next() {
        eq.push_str(&format!("{:.3}", intercept.estimate));
    }
    for c in terms {
        let sign = if c.estimate < 0.0 { '-' } else { '+' };
        eq.push_str(&format!(" {sign} {:.3}*{}", c.estimate.abs(), c.term));
    }
    eq
}

fn fmt_p(p: f64) -> String {
    if p.is_nan() {
        "NA".to_string()
    } else if p < 1e-4 {
        "<0.0001".to_string()
    } else {
        format!("{p:.4}")
    }
}

fn push_row(out: &mut String, row: &str) {
    out.push_str(row.trim_end());
    out.push('\n');
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coefficient, ModelFormula, Predictor};

    fn coef(term: &str, estimate: f64) -> Coefficient {
        Coefficient {
            term: term.to_string(),
            estimate,
            std_error: 0.1,
            t_value: estimate / 0.1,
            p_value: 0.5,
        }
    }

    fn fitted() -> FittedModel {
        FittedModel {
            formula: ModelFormula::new("Model 1", &[Predictor::Temperature, Predictor::Salinity]),
            coefficients: vec![coef("(Intercept)", 150.1234), coef("temperature", -1.2), coef("salinity", 0.456)],
            sse: 1.0,
            n: 10,
            df_residual: 7,
            log_likelihood: -3.0,
            k: 4,
        }
    }

    #[test]
    fn equation_uses_signs_and_three_decimals() {
        assert_eq!(
            format_equation(&fitted()),
            "o2_sat = 150.123 - 1.200*temperature + 0.456*salinity"
        );
    }

    #[test]
    fn stage_year_table_fills_missing_cells_with_zero() {
        let mut counts = StageYearCounts::new();
        counts.insert((LifeStage::Adult, 1999), 3);
        counts.insert((LifeStage::Tadpole, 2000), 40);
        let txt = format_stage_year_table(&counts);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "1999            3          0          0          3");
        assert_eq!(lines[3], "2000            0          0         40         40");
    }

    #[test]
    fn top_lakes_table_lists_ranks() {
        let lakes = vec![
            LakeCount { lake_id: "10102".into(), total: 9 },
            LakeCount { lake_id: "20001".into(), total: 4 },
        ];
        let txt = format_top_lakes(&lakes);
        assert!(txt.lines().nth(2).unwrap().starts_with("1    10102"));
        assert!(txt.lines().nth(3).unwrap().ends_with(" 4"));
    }

    #[test]
    fn p_values_are_compact() {
        assert_eq!(fmt_p(0.00001), "<0.0001");
        assert_eq!(fmt_p(0.0312), "0.0312");
        assert_eq!(fmt_p(f64::NAN), "NA");
    }
}
