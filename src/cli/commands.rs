use std::path::PathBuf;
use tracing::info;
use validator::Validate;

use crate::analyzers::SummaryAnalyzer;
use crate::cli::args::{Cli, Commands};
use crate::config::SimulationConfig;
use crate::error::Result;
use crate::pipeline::WeatherPipeline;
use crate::processors::DailyAggregator;
use crate::reporters::{ChartRenderer, Reporter, SvgChartRenderer};
use crate::store::WeatherStore;
use crate::utils::filename::generate_default_export_filename;
use crate::utils::progress::ProgressReporter;
use crate::writers::ParquetWriter;

pub fn run(cli: Cli) -> Result<()> {
    let config = SimulationConfig::load(cli.config.as_deref())?;
    let quiet = cli.quiet;

    let command = cli.command.unwrap_or(Commands::Run {
        days: None,
        database: None,
        chart_dir: None,
        threshold: None,
        no_charts: false,
    });

    match command {
        Commands::Run {
            days,
            database,
            chart_dir,
            threshold,
            no_charts,
        } => {
            let mut config = with_database(config, database);
            if let Some(days) = days {
                config = config.with_days(days);
            }
            if let Some(dir) = chart_dir {
                config = config.with_chart_dir(dir);
            }
            if let Some(threshold) = threshold {
                config = config.with_threshold_temp(threshold);
            }
            // Flags bypass the checks done at load time
            config.validate()?;

            println!("Simulating weather data...");
            println!("Cities: {}", config.cities.join(", "));
            println!("Database: {}", config.database_path.display());

            let mut renderer = SvgChartRenderer::new(&config.chart_dir);
            let pipeline = WeatherPipeline::new(config).with_silent(quiet);
            let report = if no_charts {
                pipeline.run(None)?
            } else {
                pipeline.run(Some(&mut renderer as &mut dyn ChartRenderer))?
            };

            println!("\n{}", report.summary());
            if !no_charts {
                println!(
                    "\nWrote {} chart files to {}",
                    renderer.written_files().len(),
                    renderer.output_dir().display()
                );
            }
        }

        Commands::Aggregate { database } => {
            let config = with_database(config, database);
            let store = WeatherStore::open(&config.database_path)?;

            let progress = progress(config.cities.len(), "Aggregating...", quiet);
            let report = DailyAggregator::with_mode(config.aggregation_mode).aggregate_all(
                &store,
                &config.cities,
                Some(&progress),
            )?;
            progress.finish_with_message(&format!(
                "Wrote {} summary rows",
                report.total_rows()
            ));

            for city in &report.cities {
                println!("{}: {} samples -> {} rows", city.city, city.samples, city.rows);
            }
        }

        Commands::Report {
            database,
            chart_dir,
        } => {
            let mut config = with_database(config, database);
            if let Some(dir) = chart_dir {
                config = config.with_chart_dir(dir);
            }
            let store = WeatherStore::open(&config.database_path)?;

            let progress = progress(config.cities.len(), "Charting...", quiet);
            let mut reporter = Reporter::new(SvgChartRenderer::new(&config.chart_dir));
            let rendered = reporter.report_all(&store, &config.cities, Some(&progress))?;
            progress.finish_with_message(&format!("Charted {} cities", rendered));

            for path in reporter.renderer().written_files() {
                println!("{}", path.display());
            }
        }

        Commands::Export {
            database,
            output_file,
            compression,
        } => {
            let config = with_database(config, database);
            let output_file = output_file.unwrap_or_else(generate_default_export_filename);

            let store = WeatherStore::open(&config.database_path)?;
            let summaries = store.all_summaries()?;
            if summaries.is_empty() {
                println!("No daily summaries to export");
                return Ok(());
            }

            let writer = ParquetWriter::new().with_compression(&compression)?;
            if let Some(parent) = output_file.parent() {
                std::fs::create_dir_all(parent)?;
            }

            info!(rows = summaries.len(), path = %output_file.display(), "Exporting summaries");
            writer.write_summaries(&summaries, &output_file)?;

            let file_info = writer.get_file_info(&output_file)?;
            println!("\n{}", file_info.summary());
            println!("Export complete: {}", output_file.display());
        }

        Commands::Info { database, json } => {
            let config = with_database(config, database);
            let store = WeatherStore::open(&config.database_path)?;
            let summaries = store.all_summaries()?;
            if summaries.is_empty() {
                println!("No daily summaries in {}", config.database_path.display());
                return Ok(());
            }

            let stats = SummaryAnalyzer::new().analyze(&summaries)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Database: {}", config.database_path.display());
                println!("Stored samples: {}", store.sample_count(None)?);
                println!("\n{}", stats.detailed_summary());
            }
        }
    }

    Ok(())
}

fn with_database(config: SimulationConfig, database: Option<PathBuf>) -> SimulationConfig {
    match database {
        Some(path) => config.with_database_path(path),
        None => config,
    }
}

fn progress(cities: usize, message: &str, quiet: bool) -> ProgressReporter {
    ProgressReporter::new(cities as u64, message, quiet)
}
