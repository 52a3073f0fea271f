use std::fs;
use std::path::PathBuf;

use probeviz::{Pipeline, PipelineConfig, PlottersRenderer};

/// Writes a small synthetic pair of datasets and renders every chart from them.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let dir = PathBuf::from("target/probeviz-sample");
    fs::create_dir_all(&dir)?;

    let mut resize = String::from("q,NoRehash,Doubling,Add10000\n");
    for q in 1..=16u32 {
        let n = f64::from(q);
        let (doubling, fixed) = (0.05 + 0.4 / n, 0.05 + 0.02 * n * n);
        resize.push_str(&format!("{q},0.0500,{doubling:.4},{fixed:.4}\n"));
    }
    fs::write(dir.join("timing_results.csv"), resize)?;

    let mut load_factor = String::from("LoadFactor,SuccessfulSearch,UnsuccessfulSearch\n");
    for i in 1..20 {
        let lambda = f64::from(i) * 0.05;
        let success = 80.0 * 0.5 * (1.0 + 1.0 / (1.0 - lambda));
        let fail = 80.0 * 0.5 * (1.0 + 1.0 / ((1.0 - lambda) * (1.0 - lambda)));
        load_factor.push_str(&format!("{lambda:.2},{success:.2},{fail:.2}\n"));
    }
    fs::write(dir.join("load_factor_results.csv"), load_factor)?;

    let config = PipelineConfig {
        resize_path: dir.join("timing_results.csv"),
        load_factor_path: dir.join("load_factor_results.csv"),
        output_dir: dir.join("charts"),
        ..PipelineConfig::default()
    };
    let renderer = PlottersRenderer::new(config.chart);
    let report = Pipeline::new(config, renderer)?.run()?;

    for path in report.rendered() {
        println!("wrote {}", path.display());
    }
    for (chart, err) in report.failures() {
        println!("{chart}: {err}");
    }
    Ok(())
}
