// Chart module: turns a reference table plus the person's data point into
// a drawable description, and renders it with `plotters`.
//
// `ChartRenderer` is the seam the session talks to, so the interactive
// flow can be exercised without touching the filesystem or fonts.

use std::ops::Range;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use log::debug;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;

use crate::person::Sex;
use crate::reference::{Indicator, ReferenceTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineStyle {
    pub color: (u8, u8, u8),
    pub dashed: bool,
}

const BLACK_RGB: (u8, u8, u8) = (0, 0, 0);
const RED_RGB: (u8, u8, u8) = (255, 0, 0);
const ORANGE_RGB: (u8, u8, u8) = (255, 165, 0);
const GREEN_RGB: (u8, u8, u8) = (0, 128, 0);

impl LineStyle {
    /// Style of the reference curve with z-score `z`.
    pub fn for_curve(indicator: Indicator, z: i8) -> Self {
        let (color, dashed) = match (indicator, z.unsigned_abs()) {
            (_, 0) => (GREEN_RGB, false),
            (_, 1) => (ORANGE_RGB, false),
            (Indicator::HeightForAge, 2) => (RED_RGB, true),
            (Indicator::BmiForAge, 2) => (RED_RGB, false),
            _ => (BLACK_RGB, true),
        };
        LineStyle { color, dashed }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub label: String,
    pub style: LineStyle,
    pub points: Vec<(f64, f64)>,
}

/// Everything needed to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub lines: Vec<Line>,
    /// The person's (age, value), drawn as "You".
    pub point: (f64, f64),
}

impl ChartSpec {
    pub fn new(table: &ReferenceTable, age: u8, value: f64) -> Self {
        let group = match table.sex {
            Sex::Male => "Boys",
            Sex::Female => "Girls",
        };
        let first = table.ages.iter().min().copied().unwrap_or(5);
        let last = table.ages.iter().max().copied().unwrap_or(19);

        let lines = table
            .curves
            .iter()
            .map(|curve| Line {
                label: curve.label(),
                style: LineStyle::for_curve(table.indicator, curve.z),
                points: table.ages.iter().map(|a| f64::from(*a)).zip(curve.values.iter().copied()).collect(),
            })
            .collect();

        ChartSpec {
            title: format!("{} for Age {} ({} to {} years old)", table.indicator.name(), group, first, last),
            x_desc: "Age (years)".to_string(),
            y_desc: table.indicator.unit_desc().to_string(),
            lines,
            point: (f64::from(age), value),
        }
    }

    /// Axis ranges covering every curve and the data point, padded a bit.
    pub fn axis_ranges(&self) -> (Range<f64>, Range<f64>) {
        let xs = self.lines.iter().flat_map(|l| l.points.iter().map(|p| p.0)).chain([self.point.0]);
        let ys = self.lines.iter().flat_map(|l| l.points.iter().map(|p| p.1)).chain([self.point.1]);
        let (x_min, x_max) = bounds(xs);
        let (y_min, y_max) = bounds(ys);
        let pad = ((y_max - y_min) * 0.05).max(1.0);
        (x_min - 0.5..x_max + 0.5, y_min - pad..y_max + pad)
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// Something that can persist a chart at `output`.
pub trait ChartRenderer {
    fn render(&self, chart: &ChartSpec, output: &Path) -> Result<()>;
}

/// Renders with `plotters`: SVG when the output ends in `.svg`, PNG
/// otherwise.
#[derive(Debug, Clone, Copy)]
pub struct PlottersRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for PlottersRenderer {
    fn default() -> Self {
        PlottersRenderer { width: 1000, height: 600 }
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&self, chart: &ChartSpec, output: &Path) -> Result<()> {
        let size = (self.width, self.height);
        let svg = output.extension().map_or(false, |e| e.eq_ignore_ascii_case("svg"));
        let drawn = if svg {
            draw(SVGBackend::new(output, size).into_drawing_area(), chart)
        } else {
            draw(BitMapBackend::new(output, size).into_drawing_area(), chart)
        };
        drawn.with_context(|| format!("Failed to render {}", output.display()))?;

        debug!("rendered `{}` to {}", chart.title, output.display());
        Ok(())
    }
}

fn plot_err(e: impl std::fmt::Display) -> anyhow::Error {
    anyhow!("{}", e)
}

fn draw<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, chart: &ChartSpec) -> Result<()> {
    root.fill(&WHITE).map_err(plot_err)?;

    let (x_range, y_range) = chart.axis_ranges();
    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, ("sans-serif", 24).into_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)
        .map_err(plot_err)?;

    ctx.configure_mesh()
        .x_desc(chart.x_desc.as_str())
        .y_desc(chart.y_desc.as_str())
        .draw()
        .map_err(plot_err)?;

    for line in &chart.lines {
        let (r, g, b) = line.style.color;
        let style = RGBColor(r, g, b).stroke_width(2);
        let series = if line.style.dashed {
            ctx.draw_series(DashedLineSeries::new(line.points.clone(), 8, 5, style))
        } else {
            ctx.draw_series(LineSeries::new(line.points.clone(), style))
        }
        .map_err(plot_err)?;
        series
            .label(line.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    ctx.draw_series(std::iter::once(Circle::new(chart.point, 6, BLACK.filled())))
        .map_err(plot_err)?
        .label("You")
        .legend(|(x, y)| Circle::new((x + 10, y), 5, BLACK.filled()));

    ctx.configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    Ok(())
}
