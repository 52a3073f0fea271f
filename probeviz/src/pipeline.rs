//! The full run: load both datasets, derive Q, build the comparisons and
//! render every chart.
//!
//! A failure only takes down the charts that depend on the failing input or
//! computation, every other chart is still produced. The outcome of each
//! chart is collected in a [`RunReport`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use probemodel::{
    ComparisonBuilder, Outcome, ResizeComparison, ScaleEstimator, ScaleFactor, build_comparisons,
};
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::error::{Result, VizError};
use crate::loader;
use crate::render::ChartRenderer;

/// Charts produced by a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chart {
    RehashTiming,
    SearchPerformance,
    SuccessComparison,
    FailComparison,
}

impl Chart {
    pub const ALL: [Chart; 4] = [
        Chart::RehashTiming,
        Chart::SearchPerformance,
        Chart::SuccessComparison,
        Chart::FailComparison,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Chart::RehashTiming => "rehash_timing.png",
            Chart::SearchPerformance => "search_performance.png",
            Chart::SuccessComparison => "time_succ.png",
            Chart::FailComparison => "time_fail.png",
        }
    }

    fn comparison(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => Chart::SuccessComparison,
            Outcome::Fail => Chart::FailComparison,
        }
    }
}

impl fmt::Display for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Chart::RehashTiming => "rehash timing",
            Chart::SearchPerformance => "search performance",
            Chart::SuccessComparison => "success comparison",
            Chart::FailComparison => "fail comparison",
        };
        f.write_str(name)
    }
}

/// Path of the written image, or the error that stopped the chart.
/// Charts sharing a failed input share the same error.
pub type ChartResult = std::result::Result<PathBuf, Arc<VizError>>;

#[derive(Debug)]
pub struct ChartOutcome {
    pub chart: Chart,
    pub result: ChartResult,
}

#[derive(Debug, Default)]
pub struct RunReport {
    outcomes: Vec<ChartOutcome>,
    scale: Option<ScaleFactor>,
}

impl RunReport {
    pub fn outcomes(&self) -> &[ChartOutcome] {
        &self.outcomes
    }

    pub fn get(&self, chart: Chart) -> Option<&ChartResult> {
        self.outcomes
            .iter()
            .find(|o| o.chart == chart)
            .map(|o| &o.result)
    }

    /// Q used for both comparison charts, if it could be derived
    pub fn scale(&self) -> Option<ScaleFactor> {
        self.scale
    }

    pub fn rendered(&self) -> impl Iterator<Item = &Path> + '_ {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(PathBuf::as_path))
    }

    pub fn failures(&self) -> impl Iterator<Item = (Chart, &VizError)> + '_ {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.chart, &**e)))
    }

    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    fn record(&mut self, chart: Chart, result: ChartResult) {
        match &result {
            Ok(path) => info!(%chart, path = %path.display(), "chart saved"),
            Err(err) => warn!(%chart, error = %err, "chart skipped"),
        }
        self.outcomes.push(ChartOutcome { chart, result });
    }
}

/// Composes loader, estimator, builder and renderer.
/// Building one performs no I/O; everything happens in [`Pipeline::run`].
pub struct Pipeline<R: ChartRenderer> {
    config: PipelineConfig,
    estimator: ScaleEstimator,
    builder: ComparisonBuilder,
    renderer: R,
}

impl<R: ChartRenderer> Pipeline<R> {
    pub fn new(config: PipelineConfig, renderer: R) -> Result<Self> {
        config.validate()?;
        let estimator = ScaleEstimator::new(config.scale)?;
        let builder = ComparisonBuilder::new(config.grid)?;
        Ok(Self {
            config,
            estimator,
            builder,
            renderer,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Runs every chart. Only failing to create the output directory aborts
    /// the run, any other failure is recorded against the affected charts.
    pub fn run(&mut self) -> Result<RunReport> {
        fs::create_dir_all(&self.config.output_dir)?;
        let mut report = RunReport::default();

        self.run_resize(&mut report);
        self.run_load_factor(&mut report);

        info!(
            rendered = report.rendered().count(),
            failed = report.failures().count(),
            "run finished"
        );
        Ok(report)
    }

    fn run_resize(&mut self, report: &mut RunReport) {
        let chart = Chart::RehashTiming;
        let result = loader::load_resize(&self.config.resize_path)
            .and_then(|rows| Ok(ResizeComparison::from_samples(&rows)?))
            .and_then(|comparison| {
                self.render_to(chart, |r, path| r.render_resize(&comparison, path))
            });
        report.record(chart, result.map_err(Arc::new));
    }

    fn run_load_factor(&mut self, report: &mut RunReport) {
        let samples = match loader::load_load_factor(&self.config.load_factor_path) {
            Ok(samples) => samples,
            Err(err) => {
                let err = Arc::new(err);
                for chart in [
                    Chart::SearchPerformance,
                    Chart::SuccessComparison,
                    Chart::FailComparison,
                ] {
                    report.record(chart, Err(err.clone()));
                }
                return;
            }
        };

        let result = self.render_to(Chart::SearchPerformance, |r, path| {
            r.render_search(&samples, path)
        });
        report.record(Chart::SearchPerformance, result.map_err(Arc::new));

        match build_comparisons(&samples, &self.estimator, &self.builder) {
            Ok(comparisons) => {
                info!(
                    q = comparisons.scale().value(),
                    reference = %self.estimator.config().reference,
                    "derived scale factor"
                );
                report.scale = Some(comparisons.scale());
                for outcome in Outcome::ALL {
                    let chart = Chart::comparison(outcome);
                    let series = comparisons.get(outcome);
                    let result = self.render_to(chart, |r, path| r.render_comparison(series, path));
                    report.record(chart, result.map_err(Arc::new));
                }
            }
            Err(err) => {
                let err = Arc::new(VizError::from(err));
                for outcome in Outcome::ALL {
                    report.record(Chart::comparison(outcome), Err(err.clone()));
                }
            }
        }
    }

    fn render_to<F>(&mut self, chart: Chart, draw: F) -> Result<PathBuf>
    where
        F: FnOnce(&mut R, &Path) -> Result<()>,
    {
        let path = self.config.output_dir.join(chart.file_name());
        draw(&mut self.renderer, &path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use probemodel::{
        ComparisonSeries, LoadFactorSample, ModelError, ProbeModel, ResizePolicy, ScaleConfig,
        ScalePolicy,
    };
    use std::collections::HashMap;
    use tempfile::{TempDir, tempdir};

    /// Keeps what it was asked to draw instead of writing images
    #[derive(Default)]
    struct RecordingRenderer {
        resize: Option<ResizeComparison>,
        search: Option<Vec<LoadFactorSample>>,
        comparisons: HashMap<Outcome, ComparisonSeries>,
        paths: Vec<PathBuf>,
        fail_on: Option<Chart>,
    }

    impl RecordingRenderer {
        fn check(&mut self, chart: Chart, path: &Path) -> Result<()> {
            if self.fail_on == Some(chart) {
                return Err(VizError::Render(format!("cannot draw {chart}")));
            }
            self.paths.push(path.to_path_buf());
            Ok(())
        }
    }

    impl ChartRenderer for RecordingRenderer {
        fn render_resize(&mut self, comparison: &ResizeComparison, path: &Path) -> Result<()> {
            self.check(Chart::RehashTiming, path)?;
            self.resize = Some(comparison.clone());
            Ok(())
        }

        fn render_search(&mut self, samples: &[LoadFactorSample], path: &Path) -> Result<()> {
            self.check(Chart::SearchPerformance, path)?;
            self.search = Some(samples.to_vec());
            Ok(())
        }

        fn render_comparison(&mut self, series: &ComparisonSeries, path: &Path) -> Result<()> {
            self.check(Chart::comparison(series.outcome()), path)?;
            self.comparisons.insert(series.outcome(), series.clone());
            Ok(())
        }
    }

    const LOAD_FACTOR_CSV: &str =
        "LoadFactor,SuccessfulSearch,UnsuccessfulSearch\n0.1,120,140\n0.5,200,300\n0.9,600,1800\n";
    const RESIZE_CSV: &str = "q,NoRehash,Doubling,Add10000\n4,0.5,2.0,9.0\n8,0.4,1.5,8.0\n";

    fn setup(resize: Option<&str>, load_factor: Option<&str>) -> (TempDir, PipelineConfig) {
        let dir = tempdir().unwrap();
        let config = PipelineConfig {
            resize_path: dir.path().join("timing_results.csv"),
            load_factor_path: dir.path().join("load_factor_results.csv"),
            output_dir: dir.path().join("out"),
            ..PipelineConfig::default()
        };
        if let Some(content) = resize {
            fs::write(&config.resize_path, content).unwrap();
        }
        if let Some(content) = load_factor {
            fs::write(&config.load_factor_path, content).unwrap();
        }
        (dir, config)
    }

    #[test]
    fn test_full_run() {
        let (_dir, config) = setup(Some(RESIZE_CSV), Some(LOAD_FACTOR_CSV));
        let out = config.output_dir.clone();
        let mut pipeline = Pipeline::new(config, RecordingRenderer::default()).unwrap();

        let report = pipeline.run().unwrap();
        assert!(report.is_complete(), "{:?}", report.outcomes());
        assert!(out.is_dir());

        let rendered: Vec<&Path> = report.rendered().collect();
        let expected: Vec<PathBuf> = Chart::ALL.iter().map(|c| out.join(c.file_name())).collect();
        assert_eq!(rendered, expected.iter().map(PathBuf::as_path).collect::<Vec<_>>());

        let q = report.scale().unwrap().value();
        assert!((q - 0.0075).abs() < 1e-12);

        let renderer = pipeline.into_renderer();
        let success = &renderer.comparisons[&Outcome::Success];
        let scaled: Vec<f64> = success.scaled().iter().map(|p| p.1).collect();
        for (got, expected) in scaled.iter().zip([0.9, 1.5, 4.5]) {
            assert!((got - expected).abs() < 1e-9, "{scaled:?}");
        }
        assert_eq!(renderer.comparisons[&Outcome::Fail].scale(), success.scale());
        assert_eq!(renderer.search.unwrap().len(), 3);

        let resize = renderer.resize.unwrap();
        assert_eq!(resize.series().len(), 3);
        assert_eq!(
            resize.get(ResizePolicy::AddFixedIncrement),
            Some([(4, 9.0), (8, 8.0)].as_ref())
        );
    }

    #[test]
    fn test_missing_resize_file_keeps_load_factor_charts() {
        let (_dir, config) = setup(None, Some(LOAD_FACTOR_CSV));
        let mut pipeline = Pipeline::new(config, RecordingRenderer::default()).unwrap();

        let report = pipeline.run().unwrap();
        assert!(!report.is_complete());
        assert!(matches!(
            report.get(Chart::RehashTiming),
            Some(Err(err)) if matches!(**err, VizError::MissingInputFile { .. })
        ));
        for chart in [
            Chart::SearchPerformance,
            Chart::SuccessComparison,
            Chart::FailComparison,
        ] {
            assert!(matches!(report.get(chart), Some(Ok(_))), "{chart} failed");
        }
        assert_eq!(pipeline.renderer().paths.len(), 3);
    }

    #[test]
    fn test_missing_load_factor_file_keeps_resize_chart() {
        let (_dir, config) = setup(Some(RESIZE_CSV), None);
        let mut pipeline = Pipeline::new(config, RecordingRenderer::default()).unwrap();

        let report = pipeline.run().unwrap();
        assert!(matches!(report.get(Chart::RehashTiming), Some(Ok(_))));
        let failures: Vec<Chart> = report.failures().map(|(c, _)| c).collect();
        assert_eq!(
            failures,
            vec![
                Chart::SearchPerformance,
                Chart::SuccessComparison,
                Chart::FailComparison
            ]
        );
        assert!(report.scale().is_none());
    }

    #[test]
    fn test_missing_column_skips_dependent_charts() {
        let (_dir, config) = setup(
            Some("q,elapsed\n1,2\n"),
            Some("LoadFactor,SuccessfulSearch\n0.5,10\n"),
        );
        let mut pipeline = Pipeline::new(config, RecordingRenderer::default()).unwrap();

        let report = pipeline.run().unwrap();
        assert_eq!(report.failures().count(), 4);
        assert!(
            report
                .failures()
                .all(|(_, err)| matches!(err, VizError::MissingColumn { .. }))
        );
        assert!(pipeline.renderer().paths.is_empty());
    }

    #[test]
    fn test_degenerate_scale_skips_only_comparisons() {
        let (_dir, mut config) = setup(
            Some(RESIZE_CSV),
            Some("LoadFactor,SuccessfulSearch,UnsuccessfulSearch\n0.2,0,5\n0.6,0,9\n"),
        );
        config.scale = ScaleConfig {
            policy: ScalePolicy::MeanRatio,
            ..ScaleConfig::default()
        };
        let mut pipeline = Pipeline::new(config, RecordingRenderer::default()).unwrap();

        let report = pipeline.run().unwrap();
        assert!(matches!(report.get(Chart::RehashTiming), Some(Ok(_))));
        assert!(matches!(report.get(Chart::SearchPerformance), Some(Ok(_))));
        for chart in [Chart::SuccessComparison, Chart::FailComparison] {
            assert!(matches!(
                report.get(chart),
                Some(Err(err)) if matches!(**err, VizError::Model(ModelError::DegenerateScale(_)))
            ));
        }
        assert!(pipeline.renderer().comparisons.is_empty());
    }

    #[test]
    fn test_render_failure_is_local() {
        let (_dir, config) = setup(Some(RESIZE_CSV), Some(LOAD_FACTOR_CSV));
        let renderer = RecordingRenderer {
            fail_on: Some(Chart::SuccessComparison),
            ..RecordingRenderer::default()
        };
        let mut pipeline = Pipeline::new(config, renderer).unwrap();

        let report = pipeline.run().unwrap();
        let failures: Vec<Chart> = report.failures().map(|(c, _)| c).collect();
        assert_eq!(failures, vec![Chart::SuccessComparison]);
        assert!(pipeline.renderer().comparisons.contains_key(&Outcome::Fail));
    }

    #[test]
    fn test_fail_reference_model() {
        let (_dir, mut config) = setup(None, Some(LOAD_FACTOR_CSV));
        config.scale.reference = ProbeModel::LINEAR_FAIL;
        let mut pipeline = Pipeline::new(config, RecordingRenderer::default()).unwrap();

        let report = pipeline.run().unwrap();
        let q = report.scale().unwrap().value();
        assert!((q - 2.5 / 300.0).abs() < 1e-12);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = PipelineConfig {
            grid: probemodel::LambdaGrid {
                points: 1,
                ..probemodel::LambdaGrid::default()
            },
            ..PipelineConfig::default()
        };
        assert!(Pipeline::new(config, RecordingRenderer::default()).is_err());
    }
}
