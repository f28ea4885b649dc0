use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::error::Result;
use crate::processors::AggregationMode;
use crate::utils::constants::{
    DEFAULT_CHART_DIR, DEFAULT_CITIES, DEFAULT_DATABASE_FILE, DEFAULT_SIMULATION_DAYS,
    DEFAULT_THRESHOLD_TEMP,
};

/// Prefix for environment overrides, e.g. `WEATHER_SIM_DAYS=14`
pub const ENV_PREFIX: &str = "WEATHER_SIM";

/// Settings shared by every stage of a simulation run.
///
/// Example TOML:
/// ```toml
/// cities = ["Delhi", "Mumbai"]
/// days = 14
/// database_path = "sim.db"
/// aggregation_mode = "per_condition"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SimulationConfig {
    #[validate(length(min = 1))]
    pub cities: Vec<String>,

    #[validate(range(min = 1, max = 3650))]
    pub days: u32,

    pub database_path: PathBuf,

    pub chart_dir: PathBuf,

    #[validate(range(min = -90.0, max = 60.0))]
    pub threshold_temp: f64,

    pub aggregation_mode: AggregationMode,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cities: DEFAULT_CITIES.iter().map(|c| c.to_string()).collect(),
            days: DEFAULT_SIMULATION_DAYS,
            database_path: PathBuf::from(DEFAULT_DATABASE_FILE),
            chart_dir: PathBuf::from(DEFAULT_CHART_DIR),
            threshold_temp: DEFAULT_THRESHOLD_TEMP,
            aggregation_mode: AggregationMode::default(),
        }
    }
}

impl SimulationConfig {
    /// Layer defaults, an optional TOML file and `WEATHER_SIM_*` environment
    /// variables, then validate the result.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("cities"),
        );

        let cfg: SimulationConfig = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_cities<I, S>(mut self, cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cities = cities.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    pub fn with_chart_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.chart_dir = path.into();
        self
    }

    pub fn with_threshold_temp(mut self, threshold: f64) -> Self {
        self.threshold_temp = threshold;
        self
    }

    pub fn with_aggregation_mode(mut self, mode: AggregationMode) -> Self {
        self.aggregation_mode = mode;
        self
    }
}
