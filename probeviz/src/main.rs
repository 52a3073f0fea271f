use std::path::Path;
use std::process::ExitCode;

use probeviz::{CONFIG_FILE, Pipeline, PipelineConfig, PlottersRenderer, RunReport};
use tracing::{error, info};

fn run() -> probeviz::Result<RunReport> {
    let config = PipelineConfig::load_or_default(Path::new(CONFIG_FILE))?;
    let renderer = PlottersRenderer::new(config.chart);
    let mut pipeline = Pipeline::new(config, renderer)?;
    pipeline.run()
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    match run() {
        Ok(report) => {
            info!(
                "{} of {} charts written",
                report.rendered().count(),
                report.outcomes().len()
            );
            // partial output is still a successful run
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
