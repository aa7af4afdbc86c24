//! Static Dashboard Renderer
//! Draws the KPI tiles and the four chart panels onto one bitmap and writes a PNG.
//!
//! Layout (see `layout.rs`):
//! 1. Four KPI tiles: large bold value over a small label, grey background
//! 2. Bar chart: average time to hire per department (spans two cells)
//! 3. Pie chart: source of hire share with percentage labels
//! 4. Line chart: first-year attrition per quarter
//! 5. Bar chart: offer acceptance rate per department
//!
//! The image is rendered into memory and only moved onto the output path once
//! it has been fully encoded, so a failed run never leaves a partial PNG.

use super::layout::{GridLayout, Panel};
use super::palette::{
    category_color, sequential, ATTRITION_LINE, AXIS, BLUES, GREENS, GRID, TILE_BACKGROUND,
};
use crate::stats::{DashboardData, KpiTile, QuarterAttrition, SourceShare};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const TITLE_TIME_TO_HIRE: &str = "Average Time to Hire by Department";
pub const TITLE_SOURCE: &str = "Source of Hire Distribution";
pub const TITLE_ATTRITION: &str = "First-Year Attrition Rate by Quarter";
pub const TITLE_ACCEPTANCE: &str = "Offer Acceptance Rate by Department";

// Sizes in points; converted with the canvas DPI.
const KPI_VALUE_PT: f64 = 22.0;
const KPI_LABEL_PT: f64 = 14.0;
const TITLE_PT: f64 = 12.0;
const AXIS_PT: f64 = 10.0;
const LINE_PT: f64 = 1.5;
const GRID_PT: f64 = 0.5;
const MARKER_PT: f64 = 3.0;

/// Pie wedges start here and run counter-clockwise.
const PIE_START_DEG: f64 = 140.0;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid canvas {width}x{height} px at {dpi} DPI")]
    InvalidCanvas { width: u32, height: u32, dpi: u32 },
    #[error("Cannot write to output directory {}: {source}", path.display())]
    Output { path: PathBuf, source: io::Error },
    #[error("Failed to draw dashboard: {0}")]
    Draw(String),
    #[error("Canvas buffer does not match {width}x{height}")]
    Buffer { width: u32, height: u32 },
    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Failed to write {}: {source}", path.display())]
    Persist { path: PathBuf, source: io::Error },
}

fn draw_err<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Draw(err.to_string())
}

/// Canvas size and resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub width_px: u32,
    pub height_px: u32,
    pub dpi: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from_inches(18.0, 10.0, 300)
    }
}

impl RenderOptions {
    pub fn from_inches(width_in: f64, height_in: f64, dpi: u32) -> Self {
        Self {
            width_px: (width_in * dpi as f64).round().max(0.0) as u32,
            height_px: (height_in * dpi as f64).round().max(0.0) as u32,
            dpi,
        }
    }

    fn validate(&self) -> Result<(), RenderError> {
        if self.width_px == 0 || self.height_px == 0 || self.dpi == 0 {
            return Err(RenderError::InvalidCanvas {
                width: self.width_px,
                height: self.height_px,
                dpi: self.dpi,
            });
        }
        Ok(())
    }
}

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Owned drawing surface for one dashboard.
///
/// Holds the root drawing area, the grid and the DPI. Every panel call gets
/// its sub-area from here; there is no shared "current figure".
pub struct DashboardCanvas<'a> {
    root: Area<'a>,
    layout: GridLayout,
    dpi: u32,
}

impl<'a> DashboardCanvas<'a> {
    pub fn new(buffer: &'a mut [u8], options: &RenderOptions) -> Result<Self, RenderError> {
        let root =
            BitMapBackend::with_buffer(buffer, (options.width_px, options.height_px))
                .into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        Ok(Self {
            root,
            layout: GridLayout::new(options.width_px, options.height_px),
            dpi: options.dpi,
        })
    }

    /// Sub-area for one panel, in panel-local pixel coordinates.
    pub fn panel(&self, panel: Panel) -> Area<'a> {
        let rect = self.layout.panel_rect(panel);
        self.root
            .clone()
            .shrink((rect.x, rect.y), (rect.width, rect.height))
    }

    /// Points to pixels at the canvas DPI.
    pub fn px(&self, points: f64) -> f64 {
        points * self.dpi as f64 / 72.0
    }

    fn text(&self, points: f64, bold: bool) -> TextStyle<'static> {
        let style = if bold {
            FontStyle::Bold
        } else {
            FontStyle::Normal
        };
        TextStyle::from((FontFamily::SansSerif, self.px(points), style)).color(&BLACK)
    }

    fn stroke(&self, points: f64) -> u32 {
        self.px(points).round().max(1.0) as u32
    }

    pub fn finish(self) -> Result<(), RenderError> {
        self.root.present().map_err(draw_err)
    }
}

/// Pixel bounds of a chart's plotting region inside its panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PlotFrame {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl PlotFrame {
    fn map_y(&self, value: f64, y_min: f64, y_max: f64) -> i32 {
        let ratio = ((value - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
        self.bottom - (ratio * (self.bottom - self.top) as f64).round() as i32
    }

    fn slot_width(&self, count: usize) -> f64 {
        (self.right - self.left) as f64 / count.max(1) as f64
    }

    fn slot_center(&self, index: usize, count: usize) -> i32 {
        self.left + (self.slot_width(count) * (index as f64 + 0.5)).round() as i32
    }
}

/// One pie wedge in degrees, counter-clockwise from the +x axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieSlice {
    pub start_deg: f64,
    pub sweep_deg: f64,
}

impl PieSlice {
    pub fn mid_deg(&self) -> f64 {
        self.start_deg + self.sweep_deg / 2.0
    }
}

/// Lay wedges end to end starting at 140 degrees.
pub fn pie_slices(shares: &[SourceShare]) -> Vec<PieSlice> {
    let total: f64 = shares.iter().map(|s| s.hires as f64).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut start = PIE_START_DEG;
    shares
        .iter()
        .map(|s| {
            let sweep = s.hires as f64 / total * 360.0;
            let slice = PieSlice {
                start_deg: start,
                sweep_deg: sweep,
            };
            start += sweep;
            slice
        })
        .collect()
}

/// Screen point at `deg` on a circle (y grows downward).
pub fn point_on_circle(center: (i32, i32), radius: f64, deg: f64) -> (i32, i32) {
    let rad = deg.to_radians();
    (
        center.0 + (radius * rad.cos()).round() as i32,
        center.1 - (radius * rad.sin()).round() as i32,
    )
}

pub fn percent_label(share_pct: f64) -> String {
    format!("{:.0}%", share_pct)
}

/// Round a raw axis step to 1, 2 or 5 times a power of ten.
pub fn nice_step(range: f64, target_steps: usize) -> f64 {
    if range.is_nan() || range <= 0.0 || target_steps == 0 {
        return 1.0;
    }
    let raw_step = range / target_steps as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let normalized = raw_step / magnitude;

    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };

    nice * magnitude
}

/// Bar chart ceiling: a little headroom, rounded up to a whole tick.
pub fn axis_ceiling(max_value: f64) -> f64 {
    if max_value.is_nan() || max_value <= 0.0 {
        return 1.0;
    }
    let padded = max_value * 1.05;
    let step = nice_step(padded, 5);
    (padded / step).ceil() * step
}

/// Attrition y-range: floor 0, ceiling the highest quarter plus 10 points.
pub fn attrition_axis_range(quarters: &[QuarterAttrition]) -> (f64, f64) {
    let max = quarters
        .iter()
        .map(|q| q.attrition_rate)
        .fold(0.0_f64, f64::max);
    (0.0, max + 10.0)
}

fn format_tick(value: f64, step: f64) -> String {
    if step >= 1.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

pub struct DashboardRenderer;

impl DashboardRenderer {
    /// Render the dashboard and atomically write it as PNG to `output`.
    pub fn render(
        data: &DashboardData,
        options: &RenderOptions,
        output: &Path,
    ) -> Result<(), RenderError> {
        options.validate()?;

        let dir = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let temp = tempfile::Builder::new()
            .prefix(".staffing-dashboard-")
            .suffix(".png")
            .tempfile_in(dir)
            .map_err(|source| RenderError::Output {
                path: dir.to_path_buf(),
                source,
            })?
            .into_temp_path();

        let (width, height) = (options.width_px, options.height_px);
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let canvas = DashboardCanvas::new(&mut buffer, options)?;
            Self::draw_dashboard(&canvas, data)?;
            canvas.finish()?;
        }

        let image = RgbImage::from_raw(width, height, buffer)
            .ok_or(RenderError::Buffer { width, height })?;
        image.save_with_format(&temp, ImageFormat::Png)?;
        temp.persist(output).map_err(|e| RenderError::Persist {
            path: output.to_path_buf(),
            source: e.error,
        })?;

        info!(
            path = %output.display(),
            width,
            height,
            dpi = options.dpi,
            "Dashboard image written"
        );
        Ok(())
    }

    /// Compose every panel onto the canvas in fixed order.
    pub fn draw_dashboard(canvas: &DashboardCanvas, data: &DashboardData) -> Result<(), RenderError> {
        for (i, tile) in data.summary.tiles().iter().enumerate() {
            Self::draw_kpi_tile(canvas, &canvas.panel(Panel::Kpi(i)), tile)?;
        }

        let departments: Vec<String> = data
            .departments
            .iter()
            .map(|d| d.department.clone())
            .collect();

        let days: Vec<f64> = data
            .departments
            .iter()
            .map(|d| d.avg_time_to_hire_days)
            .collect();
        Self::draw_bar_panel(
            canvas,
            &canvas.panel(Panel::DepartmentTimeToHire),
            TITLE_TIME_TO_HIRE,
            "Days",
            &departments,
            &days,
            &sequential(BLUES, days.len()),
        )?;

        Self::draw_pie_panel(canvas, &canvas.panel(Panel::SourceOfHire), &data.sources)?;

        Self::draw_line_panel(
            canvas,
            &canvas.panel(Panel::QuarterlyAttrition),
            &data.quarters,
        )?;

        let rates: Vec<f64> = data.departments.iter().map(|d| d.acceptance_rate).collect();
        Self::draw_bar_panel(
            canvas,
            &canvas.panel(Panel::DepartmentAcceptance),
            TITLE_ACCEPTANCE,
            "Acceptance Rate (%)",
            &departments,
            &rates,
            &sequential(GREENS, rates.len()),
        )?;

        debug!("All dashboard panels drawn");
        Ok(())
    }

    fn draw_kpi_tile(canvas: &DashboardCanvas, area: &Area, tile: &KpiTile) -> Result<(), RenderError> {
        let (w, h) = area.dim_in_pixel();
        area.fill(&TILE_BACKGROUND).map_err(draw_err)?;

        let centered = Pos::new(HPos::Center, VPos::Center);
        area.draw_text(
            &tile.value,
            &canvas.text(KPI_VALUE_PT, true).pos(centered),
            ((w / 2) as i32, (h as f64 * 0.4) as i32),
        )
        .map_err(draw_err)?;
        area.draw_text(
            tile.label,
            &canvas.text(KPI_LABEL_PT, false).pos(centered),
            ((w / 2) as i32, (h as f64 * 0.8) as i32),
        )
        .map_err(draw_err)?;
        Ok(())
    }

    fn draw_title(canvas: &DashboardCanvas, area: &Area, title: &str) -> Result<(), RenderError> {
        let (w, _) = area.dim_in_pixel();
        area.draw_text(
            title,
            &canvas
                .text(TITLE_PT, false)
                .pos(Pos::new(HPos::Center, VPos::Top)),
            ((w / 2) as i32, canvas.px(TITLE_PT * 0.5) as i32),
        )
        .map_err(draw_err)
    }

    fn plot_frame(canvas: &DashboardCanvas, area: &Area) -> PlotFrame {
        let (w, h) = area.dim_in_pixel();
        PlotFrame {
            left: canvas.px(AXIS_PT * 5.5) as i32,
            top: canvas.px(TITLE_PT * 2.4) as i32,
            right: w as i32 - (w as f64 * 0.03) as i32,
            bottom: h as i32 - canvas.px(AXIS_PT * 2.2) as i32,
        }
    }

    /// Grid lines, tick labels, axis lines and the rotated axis caption.
    fn draw_value_axis(
        canvas: &DashboardCanvas,
        area: &Area,
        frame: &PlotFrame,
        y_max: f64,
        caption: &str,
    ) -> Result<(), RenderError> {
        let step = nice_step(y_max, 5);
        let ticks = (y_max / step + 1e-9).floor() as usize;
        let tick_style = canvas
            .text(AXIS_PT, false)
            .pos(Pos::new(HPos::Right, VPos::Center));
        let pad = canvas.px(AXIS_PT * 0.4) as i32;

        for k in 0..=ticks {
            let value = k as f64 * step;
            let y = frame.map_y(value, 0.0, y_max);
            area.draw(&PathElement::new(
                vec![(frame.left, y), (frame.right, y)],
                GRID.stroke_width(canvas.stroke(GRID_PT)),
            ))
            .map_err(draw_err)?;
            area.draw_text(&format_tick(value, step), &tick_style, (frame.left - pad, y))
                .map_err(draw_err)?;
        }

        let axis_width = canvas.stroke(GRID_PT * 1.6);
        area.draw(&PathElement::new(
            vec![(frame.left, frame.top), (frame.left, frame.bottom)],
            AXIS.stroke_width(axis_width),
        ))
        .map_err(draw_err)?;
        area.draw(&PathElement::new(
            vec![(frame.left, frame.bottom), (frame.right, frame.bottom)],
            AXIS.stroke_width(axis_width),
        ))
        .map_err(draw_err)?;

        area.draw_text(
            caption,
            &canvas
                .text(AXIS_PT, false)
                .transform(FontTransform::Rotate270)
                .pos(Pos::new(HPos::Center, VPos::Center)),
            (
                canvas.px(AXIS_PT * 0.9) as i32,
                (frame.top + frame.bottom) / 2,
            ),
        )
        .map_err(draw_err)
    }

    fn draw_category_labels(
        canvas: &DashboardCanvas,
        area: &Area,
        frame: &PlotFrame,
        labels: &[String],
    ) -> Result<(), RenderError> {
        let style = canvas
            .text(AXIS_PT, false)
            .pos(Pos::new(HPos::Center, VPos::Top));
        let y = frame.bottom + canvas.px(AXIS_PT * 0.4) as i32;

        for (i, label) in labels.iter().enumerate() {
            area.draw_text(label, &style, (frame.slot_center(i, labels.len()), y))
                .map_err(draw_err)?;
        }
        Ok(())
    }

    fn draw_bar_panel(
        canvas: &DashboardCanvas,
        area: &Area,
        title: &str,
        caption: &str,
        labels: &[String],
        values: &[f64],
        colors: &[RGBColor],
    ) -> Result<(), RenderError> {
        Self::draw_title(canvas, area, title)?;
        let frame = Self::plot_frame(canvas, area);
        let y_max = axis_ceiling(values.iter().copied().fold(0.0_f64, f64::max));

        Self::draw_value_axis(canvas, area, &frame, y_max, caption)?;

        let half = (frame.slot_width(values.len()) * 0.4) as i32;
        for (i, (value, color)) in values.iter().zip(colors).enumerate() {
            let cx = frame.slot_center(i, values.len());
            area.draw(&Rectangle::new(
                [
                    (cx - half, frame.map_y(*value, 0.0, y_max)),
                    (cx + half, frame.bottom),
                ],
                color.filled(),
            ))
            .map_err(draw_err)?;
        }

        Self::draw_category_labels(canvas, area, &frame, labels)
    }

    fn draw_line_panel(
        canvas: &DashboardCanvas,
        area: &Area,
        quarters: &[QuarterAttrition],
    ) -> Result<(), RenderError> {
        Self::draw_title(canvas, area, TITLE_ATTRITION)?;
        let frame = Self::plot_frame(canvas, area);
        let (y_min, y_max) = attrition_axis_range(quarters);

        Self::draw_value_axis(canvas, area, &frame, y_max, "Attrition Rate (%)")?;

        let points: Vec<(i32, i32)> = quarters
            .iter()
            .enumerate()
            .map(|(i, q)| {
                (
                    frame.slot_center(i, quarters.len()),
                    frame.map_y(q.attrition_rate, y_min, y_max),
                )
            })
            .collect();

        area.draw(&PathElement::new(
            points.clone(),
            ATTRITION_LINE.stroke_width(canvas.stroke(LINE_PT)),
        ))
        .map_err(draw_err)?;
        let radius = canvas.px(MARKER_PT).round() as u32;
        for point in points {
            area.draw(&Circle::new(point, radius, ATTRITION_LINE.filled()))
                .map_err(draw_err)?;
        }

        let labels: Vec<String> = quarters.iter().map(|q| q.quarter.clone()).collect();
        Self::draw_category_labels(canvas, area, &frame, &labels)
    }

    fn draw_pie_panel(
        canvas: &DashboardCanvas,
        area: &Area,
        sources: &[SourceShare],
    ) -> Result<(), RenderError> {
        Self::draw_title(canvas, area, TITLE_SOURCE)?;

        let (w, h) = area.dim_in_pixel();
        let top = canvas.px(TITLE_PT * 2.4) as i32;
        let body_h = (h as i32 - top).max(1);
        let center = ((w / 2) as i32, top + body_h / 2);
        let radius = 0.36 * (w as i32).min(body_h) as f64;

        let label_style = canvas.text(AXIS_PT, false);
        let pct_style = canvas
            .text(AXIS_PT, false)
            .pos(Pos::new(HPos::Center, VPos::Center));

        for (i, (share, slice)) in sources.iter().zip(pie_slices(sources)).enumerate() {
            // One vertex per degree (at least two) keeps large wedges round.
            let steps = (slice.sweep_deg.ceil() as usize).max(2);
            let mut vertices = Vec::with_capacity(steps + 2);
            if slice.sweep_deg < 360.0 {
                vertices.push(center);
            }
            for k in 0..=steps {
                let deg = slice.start_deg + slice.sweep_deg * k as f64 / steps as f64;
                vertices.push(point_on_circle(center, radius, deg));
            }
            area.draw(&Polygon::new(vertices, category_color(i).filled()))
                .map_err(draw_err)?;

            let mid = slice.mid_deg();
            let h_pos = if mid.to_radians().cos() >= 0.0 {
                HPos::Left
            } else {
                HPos::Right
            };
            area.draw_text(
                &share.source,
                &label_style.pos(Pos::new(h_pos, VPos::Center)),
                point_on_circle(center, radius * 1.1, mid),
            )
            .map_err(draw_err)?;
            area.draw_text(
                &percent_label(share.share_pct),
                &pct_style,
                point_on_circle(center, radius * 0.6, mid),
            )
            .map_err(draw_err)?;
        }
        Ok(())
    }
}
