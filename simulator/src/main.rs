use anyhow::Context;
use clap::Parser;
use generator::scenario::Preset;
use gui_bridge::bridge::{gui_bind_address, GuiBridge};
use gui_bridge::model::VisualizationModel;
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "FMCW radar simulation driver")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Built-in scenario used when no workflow file is given
    #[arg(long, value_enum, default_value_t = Preset::Single)]
    preset: Preset,
    /// Override the number of simulated frames
    #[arg(long)]
    frames: Option<usize>,
    /// Seed for noise and randomly placed targets
    #[arg(long)]
    seed: Option<u64>,
    /// Write the last frame's map and peaks as JSON
    #[arg(long)]
    export: Option<PathBuf>,
    /// Keep the GUI bridge alive for incoming simulation requests
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut workflow_config = if let Some(path) = args.workflow {
        let mut cfg = WorkflowConfig::load(path)?;
        if let Some(seed) = args.seed {
            cfg.simulation.noise.seed = seed;
        }
        cfg
    } else {
        WorkflowConfig::from_preset(args.preset, args.seed.unwrap_or(0))?
    };
    if let Some(frames) = args.frames {
        workflow_config.frames = frames;
    }

    let runner = Arc::new(Runner::new(workflow_config));
    let result = runner.execute()?;

    for frame in &result.frames {
        println!("frame {} @ {:.3} s", frame.index, frame.start_time);
        for peak in &frame.peaks {
            println!(
                "  range {:>7.2} m  velocity {:>6.2} m/s  magnitude {:.3e}",
                peak.range_m, peak.velocity_mps, peak.magnitude
            );
        }
    }
    info!(
        "simulated {} frames, {} chirps, {} clipped ADC components",
        result.metrics.frames, result.metrics.chirps, result.metrics.clipped_components
    );

    let model = VisualizationModel::from_result(&result);
    if let Some(path) = args.export {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating export directory {}", parent.display()))?;
        }
        let json = serde_json::to_string(&model).context("serializing range-Doppler map")?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("exported range-Doppler map to {}", path.display());
    }

    if args.serve {
        let gui_bridge = GuiBridge::new(runner.clone());
        gui_bridge.publish(&model)?;
        gui_bridge.serve(gui_bind_address());
        gui_bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
