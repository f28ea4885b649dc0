use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "weather-sim")]
#[command(about = "Multi-city weather simulator with daily roll-ups and charts")]
#[command(version)]
pub struct Cli {
    /// Defaults to `run` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Hide the progress bar")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Simulate, store, aggregate and chart every configured city
    Run {
        #[arg(short, long, help = "Days of samples per city")]
        days: Option<u32>,

        #[arg(long, help = "SQLite database file")]
        database: Option<PathBuf>,

        #[arg(long, help = "Directory for SVG charts")]
        chart_dir: Option<PathBuf>,

        #[arg(
            long,
            allow_negative_numbers = true,
            help = "Alert when a daily maximum exceeds this temperature (°C)"
        )]
        threshold: Option<f64>,

        #[arg(long, default_value = "false")]
        no_charts: bool,
    },

    /// Re-run the daily aggregation over stored samples
    Aggregate {
        #[arg(long, help = "SQLite database file")]
        database: Option<PathBuf>,
    },

    /// Render charts from stored daily summaries
    Report {
        #[arg(long, help = "SQLite database file")]
        database: Option<PathBuf>,

        #[arg(long, help = "Directory for SVG charts")]
        chart_dir: Option<PathBuf>,
    },

    /// Export stored daily summaries to Parquet
    Export {
        #[arg(long, help = "SQLite database file")]
        database: Option<PathBuf>,

        #[arg(
            short,
            long,
            help = "Output Parquet file path [default: output/weather-summary-{YYMMDD}.parquet]"
        )]
        output_file: Option<PathBuf>,

        #[arg(short, long, default_value = "snappy")]
        compression: String,
    },

    /// Display statistics over stored daily summaries
    Info {
        #[arg(long, help = "SQLite database file")]
        database: Option<PathBuf>,

        #[arg(long, default_value = "false", help = "Print statistics as JSON")]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["weather-sim", "--quiet"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.quiet);
    }

    #[test]
    fn test_run_overrides() {
        let cli = Cli::try_parse_from([
            "weather-sim",
            "run",
            "--days",
            "3",
            "--database",
            "sim.db",
            "--threshold",
            "38.5",
            "--no-charts",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Run {
                days,
                database,
                chart_dir,
                threshold,
                no_charts,
            }) => {
                assert_eq!(days, Some(3));
                assert_eq!(threshold, Some(38.5));
                assert_eq!(database, Some(PathBuf::from("sim.db")));
                assert!(chart_dir.is_none());
                assert!(no_charts);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_export_defaults() {
        let cli = Cli::try_parse_from(["weather-sim", "export"]).unwrap();
        match cli.command {
            Some(Commands::Export {
                output_file,
                compression,
                ..
            }) => {
                assert!(output_file.is_none());
                assert_eq!(compression, "snappy");
            }
            _ => panic!("expected export"),
        }
    }
}
