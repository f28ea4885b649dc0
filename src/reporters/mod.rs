//! Chart reporting over stored daily summaries.
//!
//! Rendering sits behind [`ChartRenderer`], which only ever sees summary rows
//! that have already been aggregated. [`Reporter`] does the store reads and
//! decides which cities have anything to draw.

pub mod svg_renderer;

pub use svg_renderer::SvgChartRenderer;

use tracing::debug;

use crate::error::Result;
use crate::models::DailySummary;
use crate::store::WeatherStore;
use crate::utils::progress::ProgressReporter;

pub trait ChartRenderer {
    /// Draw the temperature, humidity and wind charts for one city.
    /// `summaries` is non-empty and ordered by date.
    fn render(&mut self, city: &str, summaries: &[DailySummary]) -> Result<()>;
}

impl<R: ChartRenderer + ?Sized> ChartRenderer for &mut R {
    fn render(&mut self, city: &str, summaries: &[DailySummary]) -> Result<()> {
        (**self).render(city, summaries)
    }
}

pub struct Reporter<R: ChartRenderer> {
    renderer: R,
}

impl<R: ChartRenderer> Reporter<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Render already-loaded rows; returns `false` without rendering when empty
    pub fn report_summaries(&mut self, city: &str, summaries: &[DailySummary]) -> Result<bool> {
        if summaries.is_empty() {
            debug!(city, "No daily summaries, skipping charts");
            return Ok(false);
        }

        self.renderer.render(city, summaries)?;
        Ok(true)
    }

    pub fn report_city(&mut self, store: &WeatherStore, city: &str) -> Result<bool> {
        let summaries = store.summaries_for_city(city)?;
        self.report_summaries(city, &summaries)
    }

    /// Returns the number of cities that were rendered
    pub fn report_all(
        &mut self,
        store: &WeatherStore,
        cities: &[String],
        progress: Option<&ProgressReporter>,
    ) -> Result<usize> {
        let mut rendered = 0;

        for city in cities {
            if let Some(p) = progress {
                p.set_message(&format!("Charting {}", city));
            }

            if self.report_city(store, city)? {
                rendered += 1;
            }

            if let Some(p) = progress {
                p.increment(1);
            }
        }

        Ok(rendered)
    }
}
