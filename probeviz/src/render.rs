use std::error::Error;
use std::path::Path;

use plotters::prelude::*;
use probemodel::{ComparisonSeries, LoadFactorSample, Outcome, ResizeComparison, ResizePolicy};

use crate::config::ChartConfig;
use crate::error::{Result, VizError};

/// Draws the charts of a run. The pipeline only ever reads the data it hands over.
pub trait ChartRenderer {
    /// Insertion cost per policy against q
    fn render_resize(&mut self, comparison: &ResizeComparison, path: &Path) -> Result<()>;

    /// Raw success and fail search times against λ
    fn render_search(&mut self, samples: &[LoadFactorSample], path: &Path) -> Result<()>;

    /// Theoretical curves against the Q scaled measurements for one outcome
    fn render_comparison(&mut self, series: &ComparisonSeries, path: &Path) -> Result<()>;
}

type DrawResult = std::result::Result<(), Box<dyn Error>>;

/// PNG line charts through the plotters bitmap backend
#[derive(Debug, Clone, Copy)]
pub struct PlottersRenderer {
    size: (u32, u32),
}

impl PlottersRenderer {
    pub fn new(chart: ChartConfig) -> Self {
        Self {
            size: (chart.width, chart.height),
        }
    }
}

impl Default for PlottersRenderer {
    fn default() -> Self {
        Self::new(ChartConfig::default())
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render_resize(&mut self, comparison: &ResizeComparison, path: &Path) -> Result<()> {
        draw_resize(path, self.size, comparison).map_err(render_error)
    }

    fn render_search(&mut self, samples: &[LoadFactorSample], path: &Path) -> Result<()> {
        draw_search(path, self.size, samples).map_err(render_error)
    }

    fn render_comparison(&mut self, series: &ComparisonSeries, path: &Path) -> Result<()> {
        draw_comparison(path, self.size, series).map_err(render_error)
    }
}

fn render_error(err: Box<dyn Error>) -> VizError {
    VizError::Render(err.to_string())
}

fn policy_color(policy: ResizePolicy) -> RGBColor {
    match policy {
        ResizePolicy::NoRehash => BLUE,
        ResizePolicy::Doubling => RED,
        ResizePolicy::AddFixedIncrement => GREEN,
    }
}

/// Upper axis bound with some headroom, 1.0 when there is nothing to show
fn padded(max: f64) -> f64 {
    if max.is_finite() && max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

// The log and linear q axes are different coordinate types, so the
// drawing body is shared through a macro instead of a function.
macro_rules! draw_resize_series {
    ($chart:expr, $series:expr) => {{
        $chart
            .configure_mesh()
            .x_desc("q (initial size = 2^q)")
            .y_desc("Time per insertion (μs)")
            .draw()?;

        for (policy, points) in $series.iter() {
            let color = policy_color(*policy);
            $chart
                .draw_series(LineSeries::new(points.iter().copied(), color))?
                .label(policy.to_string())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }

        $chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }};
}

fn draw_resize(path: &Path, size: (u32, u32), comparison: &ResizeComparison) -> DrawResult {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let series: Vec<(ResizePolicy, Vec<(f64, f64)>)> = comparison
        .series()
        .iter()
        .map(|(policy, points)| {
            (
                *policy,
                points.iter().map(|&(q, t)| (f64::from(q), t)).collect(),
            )
        })
        .collect();

    let (q_min, q_max) = comparison.q_range();
    let lo = f64::from(q_min);
    let hi = if q_max > q_min { f64::from(q_max) } else { lo + 1.0 };
    let y_max = padded(comparison.max_time());
    let caption = ("Insertion Cost per Element vs Initial Table Size", ("sans-serif", 24));

    if comparison.log_q_axis() {
        let mut chart = ChartBuilder::on(&root)
            .caption(caption.0, caption.1)
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d((lo..hi).log_scale(), 0.0..y_max)?;
        draw_resize_series!(chart, series);
    } else {
        let mut chart = ChartBuilder::on(&root)
            .caption(caption.0, caption.1)
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(lo..hi, 0.0..y_max)?;
        draw_resize_series!(chart, series);
    }

    root.present()?;
    Ok(())
}

fn draw_search(path: &Path, size: (u32, u32), samples: &[LoadFactorSample]) -> DrawResult {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = padded(
        samples
            .iter()
            .flat_map(|s| [s.success_time, s.fail_time])
            .fold(0.0, f64::max),
    );

    let mut chart = ChartBuilder::on(&root)
        .caption("Search Time vs Load Factor", ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..1.0, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Load Factor (λ)")
        .y_desc("Average time per search (ns)")
        .draw()?;

    for (outcome, label, color) in [
        (Outcome::Success, "Successful Search", BLUE),
        (Outcome::Fail, "Unsuccessful Search", RED),
    ] {
        let points = samples.iter().map(|s| (s.load_factor, s.time(outcome)));
        chart
            .draw_series(LineSeries::new(points, color))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_comparison(path: &Path, size: (u32, u32), series: &ComparisonSeries) -> DrawResult {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = padded(
        series
            .linear()
            .iter()
            .chain(series.double())
            .copied()
            .chain(series.scaled().iter().map(|p| p.1))
            .filter(|v| v.is_finite())
            .fold(0.0, f64::max),
    );
    let caption = match series.outcome() {
        Outcome::Success => "Successful Search: Theoretical vs Measured",
        Outcome::Fail => "Unsuccessful Search: Theoretical vs Measured",
    };

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..1.0, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Load Factor (λ)")
        .y_desc("Number of Probes")
        .draw()?;

    chart
        .draw_series(LineSeries::new(series.linear_points(), BLUE))?
        .label("Theoretical Linear Probing")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart
        .draw_series(LineSeries::new(series.double_points(), GREEN))?
        .label("Theoretical Double Hashing")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));
    chart
        .draw_series(LineSeries::new(series.scaled().iter().copied(), RED).point_size(3))?
        .label(format!("Q × Measured Time (Q = {:.3e})", series.scale().value()))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
