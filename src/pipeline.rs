//! One pass of generate → store → aggregate → check → report.

use tracing::{info, warn};
use validator::Validate;

use crate::config::SimulationConfig;
use crate::error::Result;
use crate::processors::{
    AggregationReport, DailyAggregator, SampleGenerator, ThresholdChecker, ThresholdReport,
};
use crate::reporters::{ChartRenderer, Reporter};
use crate::store::WeatherStore;
use crate::utils::progress::ProgressReporter;

#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub samples_stored: usize,
    pub aggregation: AggregationReport,
    pub thresholds: ThresholdReport,
    pub cities_charted: usize,
}

pub struct WeatherPipeline {
    config: SimulationConfig,
    generator: SampleGenerator,
    silent: bool,
}

impl WeatherPipeline {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            generator: SampleGenerator::new(),
            silent: false,
        }
    }

    /// Suppress the progress bar
    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Run every stage against the configured database file.
    /// Pass `None` as the renderer to stop after the threshold check.
    pub fn run(&self, renderer: Option<&mut dyn ChartRenderer>) -> Result<PipelineReport> {
        self.config.validate()?;
        let store = WeatherStore::open(&self.config.database_path)?;
        self.run_with_store(&store, renderer)
    }

    pub fn run_with_store(
        &self,
        store: &WeatherStore,
        renderer: Option<&mut dyn ChartRenderer>,
    ) -> Result<PipelineReport> {
        self.config.validate()?;

        let cities = &self.config.cities;
        let stages = if renderer.is_some() { 3 } else { 2 };
        let progress = if self.silent {
            ProgressReporter::silent()
        } else {
            ProgressReporter::new(
                (cities.len() * stages) as u64,
                "Simulating weather...",
                false,
            )
        };

        info!(
            cities = cities.len(),
            days = self.config.days,
            "Generating and storing samples"
        );
        let samples_stored = self.simulate(store, &progress)?;

        info!(mode = ?self.config.aggregation_mode, "Rolling up daily summaries");
        let aggregation = DailyAggregator::with_mode(self.config.aggregation_mode).aggregate_all(
            store,
            cities,
            Some(&progress),
        )?;

        let thresholds =
            ThresholdChecker::with_threshold(self.config.threshold_temp).check(&aggregation.summaries);
        for breach in &thresholds.breaches {
            warn!(
                city = %breach.city,
                date = %breach.date,
                max_temp = breach.max_temp,
                "Daily maximum above {:.1}°C",
                thresholds.threshold
            );
        }

        let cities_charted = match renderer {
            Some(renderer) => {
                info!("Rendering charts");
                Reporter::new(renderer).report_all(store, cities, Some(&progress))?
            }
            None => 0,
        };

        progress.finish_with_message(&format!(
            "Stored {} samples, wrote {} summary rows",
            samples_stored,
            aggregation.total_rows()
        ));

        Ok(PipelineReport {
            samples_stored,
            aggregation,
            thresholds,
            cities_charted,
        })
    }

    fn simulate(&self, store: &WeatherStore, progress: &ProgressReporter) -> Result<usize> {
        let mut stored = 0;

        for city in &self.config.cities {
            progress.set_message(&format!("Simulating {}", city));

            let samples = self.generator.generate_now(city, self.config.days);
            stored += store.insert_samples(&samples)?;

            progress.increment(1);
        }

        Ok(stored)
    }
}

impl PipelineReport {
    pub fn summary(&self) -> String {
        format!(
            "Pipeline Summary:\n\
            - Samples stored: {}\n\
            - Summary rows written: {}\n\
            - Cities charted: {}\n\
            {}",
            self.samples_stored,
            self.aggregation.total_rows(),
            self.cities_charted,
            self.thresholds.summary()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DailySummary;

    #[derive(Default)]
    struct CountingRenderer {
        cities: Vec<String>,
    }

    impl ChartRenderer for CountingRenderer {
        fn render(&mut self, city: &str, _summaries: &[DailySummary]) -> Result<()> {
            self.cities.push(city.to_string());
            Ok(())
        }
    }

    fn pipeline(cities: &[&str], days: u32) -> WeatherPipeline {
        WeatherPipeline::new(
            SimulationConfig::default()
                .with_cities(cities.iter().copied())
                .with_days(days),
        )
        .with_silent(true)
    }

    #[test]
    fn test_run_with_store() -> Result<()> {
        let store = WeatherStore::open_in_memory()?;
        let mut renderer = CountingRenderer::default();

        let report = pipeline(&["Delhi", "Mumbai"], 4).run_with_store(&store, Some(&mut renderer))?;

        assert_eq!(report.samples_stored, 8);
        assert_eq!(report.aggregation.total_samples(), 8);
        assert_eq!(report.cities_charted, 2);
        assert_eq!(renderer.cities, vec!["Delhi".to_string(), "Mumbai".to_string()]);
        assert_eq!(store.sample_count(None)?, 8);
        Ok(())
    }

    #[test]
    fn test_invalid_config_touches_nothing() -> Result<()> {
        let store = WeatherStore::open_in_memory()?;

        let result = pipeline(&["Delhi"], 0).run_with_store(&store, None);

        assert!(matches!(result, Err(crate::error::SimulationError::Validation(_))));
        assert_eq!(store.sample_count(None)?, 0);
        Ok(())
    }

    #[test]
    fn test_run_without_renderer() -> Result<()> {
        let store = WeatherStore::open_in_memory()?;

        let report = pipeline(&["Chennai"], 3).run_with_store(&store, None)?;

        assert_eq!(report.cities_charted, 0);
        assert!(report.aggregation.total_rows() >= 1);
        assert!(report.summary().contains("Samples stored: 3"));
        Ok(())
    }
}
