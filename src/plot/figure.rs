//! Plotters-rendered SVG figure for the amphibian counts report.
//!
//! Two panels side by side:
//! - left: stacked bars of yearly counts, one segment per life stage
//! - right: the top lakes by adult + sub-adult count, each bar labelled
//!
//! All series and bounds are computed before drawing so the render functions
//! only deal with layout.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::counts::{StageYearCounts, years};
use crate::domain::{LakeCount, LifeStage};
use crate::error::AppError;

pub const FIGURE_WIDTH: u32 = 1200;
pub const FIGURE_HEIGHT: u32 = 500;

/// One colour per reported life stage, same order as `LifeStage::REPORTED`.
const STAGE_COLORS: [RGBColor; 3] = [
    RGBColor(0x1b, 0x9e, 0x77),
    RGBColor(0xd9, 0x5f, 0x02),
    RGBColor(0x75, 0x70, 0xb3),
];
const LAKE_COLOR: RGBColor = RGBColor(0x2c, 0x7f, 0xb8);

/// Render both panels into an SVG file at `path`.
pub fn render_counts_figure(
    path: &Path,
    counts: &StageYearCounts,
    lakes: &[LakeCount],
    species: &str,
) -> Result<(), AppError> {
    draw_figure(path, counts, lakes, species)
        .map_err(|e| AppError::numeric(format!("Failed to render figure '{}': {e}", path.display())))?;
    tracing::info!(path = %path.display(), "wrote counts figure");
    Ok(())
}

fn draw_figure(
    path: &Path,
    counts: &StageYearCounts,
    lakes: &[LakeCount],
    species: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(path, (FIGURE_WIDTH, FIGURE_HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let panels = root.split_evenly((1, 2));
    draw_stage_years(&panels[0], counts, species)?;
    draw_top_lakes(&panels[1], lakes, species)?;

    root.present()?;
    Ok(())
}

/// Count for one stage/year cell, zero when absent.
fn cell(counts: &StageYearCounts, stage: LifeStage, year: i32) -> u64 {
    counts.get(&(stage, year)).copied().unwrap_or(0)
}

fn draw_stage_years<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    counts: &StageYearCounts,
    species: &str,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let years = years(counts);
    let (Some(&first), Some(&last)) = (years.first(), years.last()) else {
        area.titled(&format!("{species}: no records"), ("sans-serif", 20))?;
        return Ok(());
    };

    let max_total = years
        .iter()
        .map(|&y| LifeStage::REPORTED.iter().map(|&s| cell(counts, s, y)).sum::<u64>())
        .max()
        .unwrap_or(0);
    let y_top = max_total + max_total / 10 + 1;

    let mut chart = ChartBuilder::on(area)
        .caption(format!("{species} counts by year and life stage"), ("sans-serif", 20))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((first..last + 1).into_segmented(), 0u64..y_top)?;

    let label_year = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(y) if years.contains(y) => y.to_string(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Survey year")
        .y_desc("Count")
        .x_labels(years.len() + 1)
        .x_label_formatter(&label_year)
        .draw()?;

    for (idx, &stage) in LifeStage::REPORTED.iter().enumerate() {
        let color = STAGE_COLORS[idx];
        let below = &LifeStage::REPORTED[..idx];
        let bars = years.iter().map(|&year| {
            let base: u64 = below.iter().map(|&s| cell(counts, s, year)).sum();
            let top = base + cell(counts, stage, year);
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(year), base), (SegmentValue::Exact(year + 1), top)],
                color.filled(),
            );
            bar.set_margin(0, 0, 4, 4);
            bar
        });
        chart
            .draw_series(bars)?
            .label(stage.display_name())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

fn draw_top_lakes<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    lakes: &[LakeCount],
    species: &str,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    if lakes.is_empty() {
        area.titled(&format!("{species}: no adult or sub-adult counts"), ("sans-serif", 20))?;
        return Ok(());
    }

    let max_total = lakes.iter().map(|l| l.total).max().unwrap_or(0);
    // Headroom for the value labels above each bar.
    let y_top = max_total + max_total / 8 + 1;
    let n = lakes.len() as i32;

    let mut chart = ChartBuilder::on(area)
        .caption(
            format!("Top {} lakes, adult + sub-adult {species}", lakes.len()),
            ("sans-serif", 20),
        )
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0..n).into_segmented(), 0u64..y_top)?;

    let label_lake = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) => lakes
            .get(*i as usize)
            .map(|l| l.lake_id.clone())
            .unwrap_or_default(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Lake id")
        .y_desc("Count")
        .x_labels(lakes.len() + 1)
        .x_label_formatter(&label_lake)
        .draw()?;

    chart.draw_series(lakes.iter().enumerate().map(|(i, lake)| {
        let i = i as i32;
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(i), 0), (SegmentValue::Exact(i + 1), lake.total)],
            LAKE_COLOR.filled(),
        );
        bar.set_margin(0, 0, 12, 12);
        bar
    }))?;

    let label_offset = max_total / 40 + 1;
    chart.draw_series(lakes.iter().enumerate().map(|(i, lake)| {
        Text::new(
            lake.total.to_string(),
            (SegmentValue::CenterOf(i as i32), lake.total + label_offset),
            ("sans-serif", 14),
        )
    }))?;

    Ok(())
}
