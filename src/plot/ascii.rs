//! Terminal bar charts for the counts report.
//!
//! Deterministic, fixed-width output so the report reads the same in a log
//! file as in a terminal. Stacked bars use one glyph per life stage:
//! `A` adult, `S` sub-adult, `T` tadpole.

use crate::counts::{StageYearCounts, years};
use crate::domain::{LakeCount, LifeStage};

fn stage_glyph(stage: LifeStage) -> char {
    match stage {
        LifeStage::Adult => 'A',
        LifeStage::SubAdult => 'S',
        LifeStage::Tadpole => 'T',
        LifeStage::EggMass => 'E',
    }
}

/// Scale `value` onto `0..=width` cells relative to `max`.
fn cells(value: u64, max: u64, width: usize) -> usize {
    if max == 0 {
        return 0;
    }
    ((value as f64 / max as f64) * width as f64).round() as usize
}

/// One stacked bar per survey year.
pub fn render_stage_year_bars(counts: &StageYearCounts, width: usize) -> String {
    let width = width.max(10);
    let years = years(counts);
    if years.is_empty() {
        return "(no records)\n".to_string();
    }

    let cell = |stage: LifeStage, year: i32| counts.get(&(stage, year)).copied().unwrap_or(0);
    let totals: Vec<u64> = years
        .iter()
        .map(|&y| LifeStage::REPORTED.iter().map(|&s| cell(s, y)).sum())
        .collect();
    let max = totals.iter().copied().max().unwrap_or(0);

    let mut out = String::new();
    for (&year, &total) in years.iter().zip(&totals) {
        // Stack by cumulative boundaries so rounding never exceeds the total bar.
        let mut bar = String::new();
        let mut cum = 0u64;
        for &stage in &LifeStage::REPORTED {
            let start = cells(cum, max, width);
            cum += cell(stage, year);
            let end = cells(cum, max, width);
            bar.extend(std::iter::repeat_n(stage_glyph(stage), end - start));
        }
        out.push_str(format!("{year} | {bar:<width$} {total}").trim_end());
        out.push('\n');
    }
    out.push_str("       A=Adult S=SubAdult T=Tadpole\n");
    out
}

/// One bar per lake, labelled with its total.
pub fn render_lake_bars(lakes: &[LakeCount], width: usize) -> String {
    let width = width.max(10);
    if lakes.is_empty() {
        return "(no adult or sub-adult counts)\n".to_string();
    }

    let max = lakes.iter().map(|l| l.total).max().unwrap_or(0);
    let id_width = lakes.iter().map(|l| l.lake_id.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for lake in lakes {
        let bar = "#".repeat(cells(lake.total, max, width));
        out.push_str(
            format!("{:>id_width$} | {bar:<width$} {}", lake.lake_id, lake.total).trim_end(),
        );
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacked_bars_golden_snapshot() {
        let mut counts = StageYearCounts::new();
        counts.insert((LifeStage::Adult, 2000), 5);
        counts.insert((LifeStage::Tadpole, 2000), 5);
        counts.insert((LifeStage::SubAdult, 2001), 5);

        let txt = render_stage_year_bars(&counts, 10);
        let expected = concat!(
            "2000 | AAAAATTTTT 10\n",
            "2001 | SSSSS      5\n",
            "       A=Adult S=SubAdult T=Tadpole\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn lake_bars_golden_snapshot() {
        let lakes = vec![
            LakeCount { lake_id: "10102".into(), total: 20 },
            LakeCount { lake_id: "7".into(), total: 10 },
            LakeCount { lake_id: "8".into(), total: 0 },
        ];
        let txt = render_lake_bars(&lakes, 10);
        let expected = concat!(
            "10102 | ########## 20\n",
            "    7 | #####      10\n",
            "    8 |            0\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_inputs_render_placeholders() {
        assert_eq!(render_stage_year_bars(&StageYearCounts::new(), 20), "(no records)\n");
        assert_eq!(render_lake_bars(&[], 20), "(no adult or sub-adult counts)\n");
    }
}
