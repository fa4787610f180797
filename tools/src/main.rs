//! sales-runner: headless runner for the sales analysis pipeline.
//!
//! Usage:
//!   sales-runner
//!   sales-runner --seed 7 --export-dir charts/
//!   sales-runner --config run.json --no-charts
//!   sales-runner --json > report.json

use anyhow::Result;
use sales_core::{
    config::GeneratorConfig,
    pipeline::{AnalysisReport, SalesPipeline},
    render::{render_charts, ChartRenderer, JsonChartExporter, RenderOutcome, TextChartRenderer},
};
use std::env;
use std::io;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let json_mode = has_flag(&args, "--json");
    let text_charts = !json_mode && !has_flag(&args, "--no-charts");
    let export_dir = flag_value(&args, "--export-dir");

    let mut config = match flag_value(&args, "--config") {
        Some(path) => {
            log::info!("Loading config from {path}");
            GeneratorConfig::load(path)?
        }
        None => GeneratorConfig::default(),
    };
    config.seed = parse_arg(&args, "--seed", config.seed);

    let pipeline = SalesPipeline::new(config)?;
    let report = pipeline.run()?;

    if json_mode {
        println!("{}", report.to_json()?);
    } else {
        print_header(pipeline.config(), export_dir);
        print!("{report}");
    }

    if text_charts {
        println!();
        let stdout = io::stdout();
        let mut renderer = TextChartRenderer::new(stdout.lock());
        let outcome = render_charts(&mut renderer, &report.charts);
        report_skipped(&renderer, &outcome);
    }

    if let Some(dir) = export_dir {
        let mut exporter = JsonChartExporter::new(dir);
        let outcome = render_charts(&mut exporter, &report.charts);
        report_skipped(&exporter, &outcome);
        if !json_mode {
            print_export_summary(&exporter, &report);
        }
    }

    Ok(())
}

fn print_header(config: &GeneratorConfig, export_dir: Option<&str>) {
    println!("Sales Performance Analysis: sales-runner");
    println!("  seed:       {}", config.seed);
    println!("  rng:        {}", config.rng.name());
    println!("  start:      {}", config.start_date);
    println!("  days:       {}", config.days);
    println!("  export_dir: {}", export_dir.unwrap_or("(none)"));
    println!();
}

fn print_export_summary(exporter: &JsonChartExporter, report: &AnalysisReport) {
    println!();
    println!("=== CHART EXPORT ===");
    println!("  dir:      {}", exporter.dir().display());
    println!("  written:  {} of {}", exporter.written().len(), report.charts.len());
    for path in exporter.written() {
        println!("    {}", path.display());
    }
}

/// Skipped charts are warnings, never failures.
fn report_skipped(renderer: &dyn ChartRenderer, outcome: &RenderOutcome) {
    for skipped in &outcome.skipped {
        eprintln!(
            "warning: {} renderer skipped chart '{}': {}",
            renderer.name(),
            skipped.chart,
            skipped.reason
        );
    }
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}

/// A value that fails to parse falls back to `default` with a warning.
fn parse_arg<T: std::str::FromStr + Copy + std::fmt::Display>(
    args: &[String],
    flag: &str,
    default: T,
) -> T {
    let Some(raw) = flag_value(args, flag) else {
        return default;
    };
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            log::warn!("Invalid value '{raw}' for {flag}, using {default}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn seed_flag_is_parsed() {
        let args = argv(&["sales-runner", "--seed", "7"]);
        assert_eq!(parse_arg(&args, "--seed", 42u64), 7);
    }

    #[test]
    fn missing_flag_keeps_default() {
        let args = argv(&["sales-runner", "--json"]);
        assert_eq!(parse_arg(&args, "--seed", 42u64), 42);
    }

    #[test]
    fn unparsable_value_falls_back_to_default() {
        let _ = env_logger::builder().is_test(true).try_init();
        let args = argv(&["sales-runner", "--seed", "forty-two"]);
        assert_eq!(parse_arg(&args, "--seed", 42u64), 42);
        let args = argv(&["sales-runner", "--seed", "-1"]);
        assert_eq!(parse_arg(&args, "--seed", 42u64), 42);
    }
}
