use chrono::{Duration, NaiveDateTime, NaiveTime};
use plotters::coord::types::RangedDateTime;
use plotters::prelude::*;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, SimulationError};
use crate::models::DailySummary;
use crate::reporters::ChartRenderer;
use crate::utils::constants::{CHART_HEIGHT, CHART_WIDTH};
use crate::utils::filename::city_file_stem;

struct Line {
    label: &'static str,
    color: RGBColor,
    points: Vec<(NaiveDateTime, f64)>,
}

fn chart_error<E: Display>(err: E) -> SimulationError {
    SimulationError::Chart(err.to_string())
}

/// Writes three SVG charts per city into an output directory:
/// `<city>_temperature.svg`, `<city>_humidity.svg` and `<city>_wind_speed.svg`.
pub struct SvgChartRenderer {
    output_dir: PathBuf,
    size: (u32, u32),
    written: Vec<PathBuf>,
}

impl SvgChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            size: (CHART_WIDTH, CHART_HEIGHT),
            written: Vec::new(),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Every chart file written so far
    pub fn written_files(&self) -> &[PathBuf] {
        &self.written
    }

    fn draw_chart(&mut self, file_name: String, title: &str, y_desc: &str, lines: &[Line]) -> Result<()> {
        let mut points = lines.iter().flat_map(|l| l.points.iter());
        let Some(&(first_x, first_y)) = points.next() else {
            debug!(chart = %file_name, "No values to plot");
            return Ok(());
        };

        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first_x, first_x, first_y, first_y);
        for &(x, y) in points {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }

        // Half a day either side keeps single-day series off the frame
        let x_start = min_x - Duration::hours(12);
        let x_end = max_x + Duration::hours(12);
        let y_padding = if (max_y - min_y).abs() > 1e-6 {
            (max_y - min_y) * 0.1
        } else {
            1.0
        };

        let path = self.output_dir.join(file_name);
        {
            let root = SVGBackend::new(&path, self.size).into_drawing_area();
            root.fill(&WHITE).map_err(chart_error)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(title, ("sans-serif", 22))
                .margin(15)
                .x_label_area_size(70)
                .y_label_area_size(60)
                .build_cartesian_2d(
                    RangedDateTime::from(x_start..x_end),
                    (min_y - y_padding)..(max_y + y_padding),
                )
                .map_err(chart_error)?;

            chart
                .configure_mesh()
                .x_desc("Date")
                .y_desc(y_desc)
                .x_label_formatter(&|dt: &NaiveDateTime| dt.format("%Y-%m-%d").to_string())
                .light_line_style(BLACK.mix(0.1))
                .draw()
                .map_err(chart_error)?;

            for line in lines {
                let color = line.color;
                chart
                    .draw_series(LineSeries::new(line.points.iter().copied(), color.stroke_width(2)))
                    .map_err(chart_error)?
                    .label(line.label)
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                    });

                chart
                    .draw_series(
                        line.points
                            .iter()
                            .map(|&point| Circle::new(point, 3, color.filled())),
                    )
                    .map_err(chart_error)?;
            }

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(chart_error)?;

            root.present().map_err(chart_error)?;
        }

        debug!(path = %path.display(), "Chart written");
        self.written.push(path);
        Ok(())
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn render(&mut self, city: &str, summaries: &[DailySummary]) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;

        let x = |s: &DailySummary| s.date.and_time(NaiveTime::MIN);
        let series = |f: fn(&DailySummary) -> Option<f64>| -> Vec<(NaiveDateTime, f64)> {
            summaries
                .iter()
                .filter_map(|s| f(s).map(|v| (x(s), v)))
                .collect()
        };
        let stem = city_file_stem(city);

        self.draw_chart(
            format!("{}_temperature.svg", stem),
            &format!("Daily Temperature Summary for {}", city),
            "Temperature (°C)",
            &[
                Line {
                    label: "Avg Temp",
                    color: BLUE,
                    points: series(|s| Some(s.avg_temp)),
                },
                Line {
                    label: "Max Temp",
                    color: RED,
                    points: series(|s| Some(s.max_temp)),
                },
                Line {
                    label: "Min Temp",
                    color: GREEN,
                    points: series(|s| Some(s.min_temp)),
                },
            ],
        )?;

        self.draw_chart(
            format!("{}_humidity.svg", stem),
            &format!("Daily Humidity Summary for {}", city),
            "Humidity (%)",
            &[Line {
                label: "Avg Humidity (%)",
                color: MAGENTA,
                points: series(|s| s.avg_humidity),
            }],
        )?;

        self.draw_chart(
            format!("{}_wind_speed.svg", stem),
            &format!("Daily Wind Speed Summary for {}", city),
            "Wind Speed (m/s)",
            &[Line {
                label: "Max Wind Speed (m/s)",
                color: RGBColor(255, 140, 0),
                points: series(|s| s.max_wind_speed),
            }],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeatherCondition;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn summary(day: u32, avg_humidity: Option<f64>) -> DailySummary {
        DailySummary {
            city: "New Delhi".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 10, day).unwrap(),
            avg_temp: 30.0 + f64::from(day % 3),
            max_temp: 35.0,
            min_temp: 25.0,
            avg_humidity,
            max_wind_speed: Some(6.5),
            dominant_condition: WeatherCondition::Clear,
            sample_count: Some(1),
        }
    }

    #[test]
    fn test_renders_three_charts() -> Result<()> {
        let dir = TempDir::new()?;
        let mut renderer = SvgChartRenderer::new(dir.path().join("charts"));

        renderer.render("New Delhi", &[summary(20, Some(40.0)), summary(21, Some(60.0))])?;

        let names: Vec<String> = renderer
            .written_files()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "new_delhi_temperature.svg",
                "new_delhi_humidity.svg",
                "new_delhi_wind_speed.svg"
            ]
        );

        let svg = std::fs::read_to_string(&renderer.written_files()[0])?;
        assert!(svg.contains("<svg"));
        Ok(())
    }

    #[test]
    fn test_single_day_and_missing_humidity() -> Result<()> {
        let dir = TempDir::new()?;
        let mut renderer = SvgChartRenderer::new(dir.path()).with_size(400, 300);

        renderer.render("New Delhi", &[summary(20, None)])?;

        // Humidity has nothing to plot, the other two still render
        assert_eq!(renderer.written_files().len(), 2);
        assert!(!dir.path().join("new_delhi_humidity.svg").exists());
        Ok(())
    }
}
