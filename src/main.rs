// src/main.rs
use std::fs;
use std::path::PathBuf;
use anyhow::{Context, Result};
use log::info;
use soil_tdr::tdr::{
    render_s11_png, render_time_domain_png, PlotStyle, SimulationConfig, SweepOrchestrator,
};
// usage: soil-tdr [config.json] [output_dir]
fn main() -> Result<()> {
    env_logger::init();
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading config file {path}"))?;
            SimulationConfig::from_json_str(&text)
                .with_context(|| format!("parsing config file {path}"))?
        }
        None => SimulationConfig::default(),
    };
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".to_owned()));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    let orchestrator = SweepOrchestrator::from_config(config)?;
    let result = orchestrator.run()?;
    for trace in &result {
        let min_db = trace.s11_db.iter().copied().fold(f64::INFINITY, f64::min);
        let max_db = trace.s11_db.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        info!(
            "humidity {:.2}: S11 spans {min_db:.2} .. {max_db:.2} dB, reflected rms {:.4e}",
            trace.humidity,
            trace.reflected.rms()
        );
    }
    let outputs = [
        (
            "tdr_signals_time_domain.png",
            render_time_domain_png(&result, PlotStyle::default())?,
        ),
        (
            "s11_reflection_coefficient.png",
            render_s11_png(&result, PlotStyle::default())?,
        ),
    ];
    for (name, png) in outputs {
        let path = out_dir.join(name);
        fs::write(&path, png).with_context(|| format!("writing {}", path.display()))?;
        info!("saved {}", path.display());
    }
    Ok(())
}
