/// Cities simulated when no configuration overrides them
pub const DEFAULT_CITIES: [&str; 6] = [
    "Delhi",
    "Mumbai",
    "Chennai",
    "Bangalore",
    "Kolkata",
    "Hyderabad",
];

/// Number of simulated days per city
pub const DEFAULT_SIMULATION_DAYS: u32 = 7;

/// Alert threshold for daily maximum temperature (°C)
pub const DEFAULT_THRESHOLD_TEMP: f64 = 35.0;

/// File and directory defaults
pub const DEFAULT_DATABASE_FILE: &str = "weather_simulation.db";
pub const DEFAULT_CHART_DIR: &str = "charts";
pub const DEFAULT_EXPORT_DIR: &str = "output";

/// Simulation ranges
pub const TEMP_RANGE: (f64, f64) = (20.0, 45.0);
pub const FEELS_LIKE_SPREAD: f64 = 2.0;
pub const HUMIDITY_RANGE: (f64, f64) = (30.0, 90.0);
pub const WIND_SPEED_RANGE: (f64, f64) = (1.0, 15.0);

/// Table names
pub const SAMPLE_TABLE: &str = "weather";
pub const SUMMARY_TABLE: &str = "daily_summary";

/// Chart dimensions (pixels)
pub const CHART_WIDTH: u32 = 1000;
pub const CHART_HEIGHT: u32 = 600;

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
