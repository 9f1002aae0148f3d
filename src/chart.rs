//! PNG charts of a province's energy consumption with the forecast point.
//!
//! The renderer only sees plain `(year, value)` points; it never touches the
//! tabular data the numbers came from.

use std::error::Error as StdError;
use std::ops::Range;

use image::{codecs::png::PngEncoder, ColorType, ImageEncoder};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use thiserror::Error;

use crate::config::ChartConfig;
use crate::domain::TrendLine;

const FONT: &str = "sans-serif";
const X_DESC: &str = "Tahun";
const Y_DESC: &str = "Konsumsi Energi (kkal/kap/hari)";

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("cannot chart: {0}")]
    InvalidData(String),

    #[error("drawing failed: {0}")]
    Drawing(String),

    #[error("PNG encoding failed: {0}")]
    Encoding(String),
}

type DrawResult = Result<(), Box<dyn StdError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartRenderer {
    width: u32,
    height: u32,
}

impl ChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn from_config(cfg: &ChartConfig) -> Self {
        Self::new(cfg.width, cfg.height)
    }

    /// Historical line with markers plus the highlighted prediction.
    pub fn render_series_with_prediction(
        &self,
        province: &str,
        history: &[(i32, f64)],
        prediction: (i32, f64),
    ) -> Result<Vec<u8>, ChartError> {
        let first = history
            .first()
            .ok_or_else(|| ChartError::InvalidData("no historical points".to_string()))?
            .0;
        let title = forecast_title(province, first, prediction.0);
        let (x_range, y_range) = bounds(history, prediction, &[])?;
        let x_labels = year_label_count(&x_range);

        self.render(|root| {
            let mut chart = ChartBuilder::on(root)
                .caption(&title, (FONT, 26))
                .margin(20)
                .x_label_area_size(45)
                .y_label_area_size(80)
                .build_cartesian_2d(x_range.clone(), y_range.clone())?;

            chart
                .configure_mesh()
                .x_desc(X_DESC)
                .y_desc(Y_DESC)
                .x_labels(x_labels)
                .x_label_formatter(&|x| format!("{:.0}", x))
                .y_label_formatter(&|y| format!("{:.0}", y))
                .draw()?;

            chart
                .draw_series(LineSeries::new(
                    history.iter().map(|&(x, y)| (f64::from(x), y)),
                    BLUE.stroke_width(2),
                ))?
                .label("Data Historis")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));
            chart.draw_series(
                history
                    .iter()
                    .map(|&(x, y)| Circle::new((f64::from(x), y), 4, BLUE.filled())),
            )?;

            draw_prediction(&mut chart, prediction)?;
            draw_legend(&mut chart)
        })
    }

    /// Historical scatter, dashed trend line up to the prediction year and the
    /// highlighted prediction.
    pub fn render_trend(
        &self,
        province: &str,
        history: &[(i32, f64)],
        trend: &TrendLine,
        prediction: (i32, f64),
    ) -> Result<Vec<u8>, ChartError> {
        let first = history
            .first()
            .ok_or_else(|| ChartError::InvalidData("no historical points".to_string()))?
            .0;
        let start = (f64::from(first), trend.value_at(f64::from(first)));
        let end = (f64::from(prediction.0), trend.value_at(f64::from(prediction.0)));
        let title = format!("Ekstrapolasi Linear Konsumsi Energi di {}", province);
        let (x_range, y_range) = bounds(history, prediction, &[start.1, end.1])?;
        let x_labels = year_label_count(&x_range);

        self.render(|root| {
            let mut chart = ChartBuilder::on(root)
                .caption(&title, (FONT, 26))
                .margin(20)
                .x_label_area_size(45)
                .y_label_area_size(80)
                .build_cartesian_2d(x_range.clone(), y_range.clone())?;

            chart
                .configure_mesh()
                .x_desc(X_DESC)
                .y_desc(Y_DESC)
                .x_labels(x_labels)
                .x_label_formatter(&|x| format!("{:.0}", x))
                .y_label_formatter(&|y| format!("{:.0}", y))
                .draw()?;

            chart
                .draw_series(
                    history
                        .iter()
                        .map(|&(x, y)| Circle::new((f64::from(x), y), 5, BLUE.filled())),
                )?
                .label("Data Historis")
                .legend(|(x, y)| Circle::new((x + 10, y), 4, BLUE.filled()));

            chart
                .draw_series(DashedLineSeries::new(vec![start, end], 10, 6, RED.stroke_width(2)))?
                .label("Trend Linear")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

            draw_prediction(&mut chart, prediction)?;
            draw_legend(&mut chart)
        })
    }

    fn render<F>(&self, draw: F) -> Result<Vec<u8>, ChartError>
    where
        F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> DrawResult,
    {
        let (width, height) = (self.width, self.height);
        if width == 0 || height == 0 {
            return Err(ChartError::InvalidData(format!("canvas {}x{}", width, height)));
        }

        let mut pixels = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
            root.fill(&WHITE)
                .map_err(|e| ChartError::Drawing(e.to_string()))?;
            draw(&root).map_err(|e| ChartError::Drawing(e.to_string()))?;
            root.present()
                .map_err(|e| ChartError::Drawing(e.to_string()))?;
        }

        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(&pixels, width, height, ColorType::Rgb8)
            .map_err(|e| ChartError::Encoding(e.to_string()))?;
        Ok(png)
    }
}

fn draw_prediction<'a, 'b: 'a>(
    chart: &mut ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    (year, value): (i32, f64),
) -> DrawResult {
    let at = (f64::from(year), value);
    chart
        .draw_series(std::iter::once(Circle::new(at, 7, RED.filled())))?
        .label(format!("Prediksi {}", year))
        .legend(|(x, y)| Circle::new((x + 10, y), 5, RED.filled()));
    chart.draw_series(std::iter::once(
        EmptyElement::at(at) + Text::new(prediction_label(value), (-24, -26), (FONT, 15).into_font()),
    ))?;
    Ok(())
}

fn draw_legend<'a, 'b: 'a>(
    chart: &mut ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
) -> DrawResult {
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((FONT, 14))
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}

pub fn forecast_title(province: &str, first_year: i32, prediction_year: i32) -> String {
    format!("Konsumsi Energi di {} ({}-{})", province, first_year, prediction_year)
}

pub fn prediction_label(value: f64) -> String {
    format!("{:.2}", value)
}

fn bounds(
    history: &[(i32, f64)],
    prediction: (i32, f64),
    extra: &[f64],
) -> Result<(Range<f64>, Range<f64>), ChartError> {
    let years = history.iter().map(|p| p.0).chain(std::iter::once(prediction.0));
    let (min_year, max_year) = years.fold((i32::MAX, i32::MIN), |(lo, hi), y| (lo.min(y), hi.max(y)));

    let values: Vec<f64> = history
        .iter()
        .map(|p| p.1)
        .chain(std::iter::once(prediction.1))
        .chain(extra.iter().copied())
        .collect();
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ChartError::InvalidData("non-finite value".to_string()));
    }
    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    let pad = ((hi - lo) * 0.1).max(hi.abs() * 0.01).max(1.0);

    Ok((
        (f64::from(min_year) - 0.5)..(f64::from(max_year) + 0.5),
        (lo - pad)..(hi + pad),
    ))
}

fn year_label_count(x_range: &Range<f64>) -> usize {
    (x_range.end - x_range.start).round() as usize + 1
}
