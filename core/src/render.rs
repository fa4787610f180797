//! Chart renderers.
//!
//! RULE: rendering never aborts a run. A renderer that fails on a chart
//! gets a warning logged and the chart is skipped; the remaining charts
//! and the statistical summary are unaffected.

use crate::{
    charts::{ChartData, ChartSpec},
    error::{SalesError, SalesResult},
};
use serde::Serialize;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

/// The contract every presentation backend must fulfill.
pub trait ChartRenderer {
    /// Stable name used in log lines.
    fn name(&self) -> &'static str;

    fn render(&mut self, chart: &ChartSpec) -> SalesResult<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedChart {
    pub chart:  String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderOutcome {
    pub rendered: Vec<String>,
    pub skipped:  Vec<SkippedChart>,
}

/// Feed every chart to `renderer`, skipping the ones it fails on.
pub fn render_charts(renderer: &mut dyn ChartRenderer, charts: &[ChartSpec]) -> RenderOutcome {
    let mut outcome = RenderOutcome::default();
    for chart in charts {
        match renderer.render(chart) {
            Ok(()) => outcome.rendered.push(chart.id.clone()),
            Err(e) => {
                log::warn!("Renderer '{}' skipped chart '{}': {e}", renderer.name(), chart.id);
                outcome.skipped.push(SkippedChart { chart: chart.id.clone(), reason: e.to_string() });
            }
        }
    }
    log::info!(
        "Renderer '{}': {} rendered, {} skipped",
        renderer.name(),
        outcome.rendered.len(),
        outcome.skipped.len()
    );
    outcome
}

// ── JSON export ────────────────────────────────────────────────

/// Writes each chart to `<dir>/<chart id>.json`.
pub struct JsonChartExporter {
    dir:     PathBuf,
    written: Vec<PathBuf>,
}

impl JsonChartExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), written: Vec::new() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in render order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn unavailable(&self, reason: String) -> SalesError {
        SalesError::RendererUnavailable { name: self.name().to_string(), reason }
    }
}

impl ChartRenderer for JsonChartExporter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn render(&mut self, chart: &ChartSpec) -> SalesResult<()> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| self.unavailable(format!("cannot create {}: {e}", self.dir.display())))?;

        let path = self.dir.join(format!("{}.json", chart.id));
        let json = serde_json::to_string_pretty(chart)?;
        std::fs::write(&path, json).map_err(|source| SalesError::Io {
            path: path.display().to_string(),
            source,
        })?;

        log::debug!("Wrote chart '{}' to {}", chart.id, path.display());
        self.written.push(path);
        Ok(())
    }
}

// ── Text charts ────────────────────────────────────────────────

const DEFAULT_BAR_WIDTH: usize = 40;

/// Draws horizontal bar charts as plain text into any writer.
pub struct TextChartRenderer<W: Write> {
    out:       W,
    bar_width: usize,
}

impl<W: Write> TextChartRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, bar_width: DEFAULT_BAR_WIDTH }
    }

    pub fn with_bar_width(mut self, bar_width: usize) -> Self {
        self.bar_width = bar_width.max(1);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn bar(&self, value: f64, max: f64) -> String {
        if max <= 0.0 || !value.is_finite() {
            return String::new();
        }
        let len = ((value / max) * self.bar_width as f64).round().max(0.0) as usize;
        "#".repeat(len)
    }

    fn write_rows(&mut self, rows: &[(String, f64)], precision: usize) -> std::io::Result<()> {
        let max = rows.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        let label_width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
        for (label, value) in rows {
            let bar = self.bar(*value, max);
            writeln!(
                self.out,
                "  {label:<label_width$} | {bar:<width$} {value:.precision$}",
                width = self.bar_width
            )?;
        }
        Ok(())
    }

    fn draw(&mut self, chart: &ChartSpec) -> std::io::Result<()> {
        writeln!(self.out, "{} ({} vs {})", chart.title, chart.y_label, chart.x_label)?;
        match &chart.data {
            ChartData::Line { points } => {
                let rows: Vec<(String, f64)> =
                    points.iter().map(|p| (p.date.to_string(), p.value)).collect();
                self.write_rows(&rows, 2)?;
            }
            ChartData::Bar { bars } => {
                let rows: Vec<(String, f64)> =
                    bars.iter().map(|b| (b.label.clone(), b.value)).collect();
                self.write_rows(&rows, 2)?;
            }
            ChartData::Histogram { bins } => {
                let rows: Vec<(String, f64)> = bins
                    .iter()
                    .map(|b| (format!("{:>7.2} - {:>7.2}", b.lower, b.upper), b.count as f64))
                    .collect();
                self.write_rows(&rows, 0)?;
            }
            ChartData::Scatter { series } => {
                for s in series {
                    let (x_lo, x_hi) = span(s.points.iter().map(|p| p.x));
                    let (y_lo, y_hi) = span(s.points.iter().map(|p| p.y));
                    writeln!(
                        self.out,
                        "  {:<8} {:>3} points  x {:.0}..{:.0}  y {:.2}..{:.2}",
                        s.region.name(),
                        s.points.len(),
                        x_lo,
                        x_hi,
                        y_lo,
                        y_hi
                    )?;
                }
            }
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}

fn span(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

impl<W: Write> ChartRenderer for TextChartRenderer<W> {
    fn name(&self) -> &'static str {
        "text"
    }

    fn render(&mut self, chart: &ChartSpec) -> SalesResult<()> {
        self.draw(chart).map_err(|e| SalesError::RendererUnavailable {
            name:   self.name().to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{BarValue, ChartData};

    fn bar_chart() -> ChartSpec {
        ChartSpec {
            id:      "bars".into(),
            title:   "Bars".into(),
            x_label: "Label".into(),
            y_label: "Value".into(),
            data:    ChartData::Bar {
                bars: vec![
                    BarValue { label: "a".into(), value: 10.0 },
                    BarValue { label: "bb".into(), value: 5.0 },
                ],
            },
            style:   Default::default(),
        }
    }

    #[test]
    fn text_bars_scale_to_largest_value() {
        let mut renderer = TextChartRenderer::new(Vec::new()).with_bar_width(10);
        renderer.render(&bar_chart()).unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();

        assert!(text.starts_with("Bars (Value vs Label)"));
        assert!(text.contains("  a  | ########## 10.00"));
        assert!(text.contains("  bb | #####      5.00"));
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failing_renderer_skips_without_aborting() {
        let mut renderer = TextChartRenderer::new(BrokenWriter);
        let charts = vec![bar_chart(), bar_chart()];
        let outcome = render_charts(&mut renderer, &charts);

        assert!(outcome.rendered.is_empty());
        assert_eq!(outcome.skipped.len(), 2);
        assert!(outcome.skipped[0].reason.contains("closed"));
    }
}
