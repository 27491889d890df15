//! PNG snapshot of the top-spending donut chart.
//!
//! The chart is drawn analytically: every output pixel is supersampled
//! against the ring segments and legend swatches, then blended onto white.

use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgba, RgbaImage};
use thiserror::Error;

use crate::color::{Rgb, resolve_color};
use crate::month::YearMonth;
use crate::types::TopCategory;

pub const DEFAULT_SCALE: u32 = 2;
pub const MAX_SCALE: u32 = 4;

/// Logical size of the chart area, before scaling.
const CHART_WIDTH: f64 = 400.0;
const CHART_HEIGHT: f64 = 300.0;
const LEGEND_HEIGHT: f64 = 40.0;

const INNER_RADIUS: f64 = 0.65;
const OUTER_RADIUS: f64 = 0.85;
const PADDING_DEGREES: f64 = 5.0;

const SWATCH_RADIUS: f64 = 5.0;
const SWATCH_SPACING: f64 = 22.0;

const SUBSAMPLES: u32 = 4;
const BACKGROUND: Rgb = Rgb(255, 255, 255);
const EMPTY_RING: Rgb = Rgb(229, 231, 235);

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export directory {0} does not exist")]
    MissingDirectory(PathBuf),

    #[error("scale must be between 1 and {MAX_SCALE}, got {0}")]
    InvalidScale(u32),

    #[error("could not encode chart: {0}")]
    Image(#[from] image::ImageError),
}

/// `top-spending-categories-<YYYY-MM>.png`
pub fn export_filename(month: YearMonth) -> String {
    format!("top-spending-categories-{month}.png")
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    /// Degrees clockwise from twelve o'clock.
    start: f64,
    sweep: f64,
    color: Rgb,
}

#[derive(Debug)]
struct ChartLayout {
    segments: Vec<Segment>,
    swatches: Vec<(f64, Rgb)>,
}

impl ChartLayout {
    fn new(categories: &[TopCategory]) -> Self {
        let slices: Vec<&TopCategory> = categories.iter().filter(|c| c.amount > 0.0).collect();
        let total: f64 = slices.iter().map(|c| c.amount).sum();
        let padding = if slices.len() > 1 { PADDING_DEGREES } else { 0.0 };
        let available = 360.0 - padding * slices.len() as f64;

        let mut segments = Vec::with_capacity(slices.len());
        let mut cursor = padding / 2.0;
        for slice in &slices {
            let sweep = available * slice.amount / total;
            segments.push(Segment {
                start: cursor,
                sweep,
                color: resolve_color(&slice.category, slice.id).rgb(),
            });
            cursor += sweep + padding;
        }

        let row_width = SWATCH_SPACING * categories.len().saturating_sub(1) as f64;
        let first_x = (CHART_WIDTH - row_width) / 2.0;
        let swatches = categories
            .iter()
            .enumerate()
            .map(|(i, c)| {
                (
                    first_x + SWATCH_SPACING * i as f64,
                    resolve_color(&c.category, c.id).rgb(),
                )
            })
            .collect();

        Self { segments, swatches }
    }

    /// Paint at logical point `(x, y)`, if anything covers it.
    fn color_at(&self, x: f64, y: f64) -> Option<Rgb> {
        if y < CHART_HEIGHT {
            self.ring_color_at(x, y)
        } else {
            self.swatch_color_at(x, y)
        }
    }

    fn ring_color_at(&self, x: f64, y: f64) -> Option<Rgb> {
        let radius = CHART_WIDTH.min(CHART_HEIGHT) / 2.0;
        let dx = x - CHART_WIDTH / 2.0;
        let dy = y - CHART_HEIGHT / 2.0;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance < radius * INNER_RADIUS || distance > radius * OUTER_RADIUS {
            return None;
        }
        if self.segments.is_empty() {
            return Some(EMPTY_RING);
        }

        let angle = dx.atan2(-dy).to_degrees().rem_euclid(360.0);
        self.segments
            .iter()
            .find(|s| angle >= s.start && angle < s.start + s.sweep)
            .map(|s| s.color)
    }

    fn swatch_color_at(&self, x: f64, y: f64) -> Option<Rgb> {
        let cy = CHART_HEIGHT + LEGEND_HEIGHT / 2.0;
        self.swatches
            .iter()
            .find(|(cx, _)| {
                let (dx, dy) = (x - cx, y - cy);
                dx * dx + dy * dy <= SWATCH_RADIUS * SWATCH_RADIUS
            })
            .map(|(_, color)| *color)
    }
}

fn render(categories: &[TopCategory], scale: u32) -> RgbaImage {
    let layout = ChartLayout::new(categories);
    let width = CHART_WIDTH as u32 * scale;
    let height = (CHART_HEIGHT + LEGEND_HEIGHT) as u32 * scale;
    let step = 1.0 / f64::from(SUBSAMPLES);
    let samples = f64::from(SUBSAMPLES * SUBSAMPLES);

    RgbaImage::from_fn(width, height, |px, py| {
        let mut sum = [0.0f64; 3];
        for sy in 0..SUBSAMPLES {
            for sx in 0..SUBSAMPLES {
                let x = (f64::from(px) + (f64::from(sx) + 0.5) * step) / f64::from(scale);
                let y = (f64::from(py) + (f64::from(sy) + 0.5) * step) / f64::from(scale);
                let Rgb(r, g, b) = layout.color_at(x, y).unwrap_or(BACKGROUND);
                sum[0] += f64::from(r);
                sum[1] += f64::from(g);
                sum[2] += f64::from(b);
            }
        }
        Rgba([
            (sum[0] / samples).round() as u8,
            (sum[1] / samples).round() as u8,
            (sum[2] / samples).round() as u8,
            255,
        ])
    })
}

/// Renders the chart for `month` and writes it into `directory`.
pub fn export_chart(
    categories: &[TopCategory],
    month: YearMonth,
    directory: &Path,
    scale: u32,
) -> Result<PathBuf, ExportError> {
    if scale == 0 || scale > MAX_SCALE {
        return Err(ExportError::InvalidScale(scale));
    }
    if !directory.is_dir() {
        return Err(ExportError::MissingDirectory(directory.to_path_buf()));
    }

    let path = directory.join(export_filename(month));
    render(categories, scale).save_with_format(&path, ImageFormat::Png)?;
    tracing::info!(path = %path.display(), categories = categories.len(), "chart exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn top(id: i64, name: &str, amount: f64) -> TopCategory {
        TopCategory {
            id,
            category: name.to_string(),
            amount,
        }
    }

    fn march() -> YearMonth {
        YearMonth::new(2025, 3).unwrap()
    }

    #[test]
    fn filename_uses_month() {
        assert_eq!(
            export_filename(march()),
            "top-spending-categories-2025-03.png"
        );
    }

    #[test]
    fn writes_opaque_png_at_scale() {
        let dir = tempfile::tempdir().unwrap();
        let data = [top(1, "Food", 500.0), top(2, "Rent", 300.0), top(3, "Bills", 200.0)];

        let path = export_chart(&data, march(), dir.path(), 2).unwrap();
        assert_eq!(path, dir.path().join("top-spending-categories-2025-03.png"));

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.dimensions(), (800, 680));
        assert!(img.pixels().all(|p| p.0[3] == 255));
        // Donut hole and corners stay white.
        assert_eq!(img.get_pixel(400, 300).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn single_slice_fills_ring_with_curated_color() {
        let img = render(&[top(9, "Food", 42.0)], 2);
        // Midway between inner (97.5) and outer (127.5) radius, straight up.
        assert_eq!(img.get_pixel(400, 75).0, [0x10, 0xB9, 0x81, 255]);
    }

    #[test]
    fn slices_are_separated_by_padding() {
        let layout = ChartLayout::new(&[top(1, "Food", 1.0), top(2, "Travel", 1.0)]);
        assert_eq!(layout.segments.len(), 2);
        assert_eq!(layout.segments[0].start, 2.5);
        assert_eq!(layout.segments[0].sweep, 175.0);
        assert_eq!(layout.segments[1].start, 182.5);
        // Straight up falls in the gap.
        assert_eq!(layout.color_at(200.0, 37.5), None);
    }

    #[test]
    fn legend_has_one_swatch_per_category() {
        let data = [top(1, "Food", 1.0), top(2, "Travel", 0.0)];
        let layout = ChartLayout::new(&data);
        assert_eq!(layout.segments.len(), 1);
        assert_eq!(layout.swatches.len(), 2);
        let (x, color) = layout.swatches[1];
        assert_eq!(layout.color_at(x, 320.0), Some(color));
    }

    #[test]
    fn rejects_bad_scale_and_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            export_chart(&[], march(), dir.path(), 0),
            Err(ExportError::InvalidScale(0))
        ));
        assert!(matches!(
            export_chart(&[], march(), &dir.path().join("missing"), 1),
            Err(ExportError::MissingDirectory(_))
        ));
    }

    #[test]
    fn empty_chart_still_exports() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_chart(&[], march(), dir.path(), 1).unwrap();
        assert!(path.exists());
    }
}
