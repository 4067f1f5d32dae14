//! Generate a default configuration file
//!
//! Writes a JSON config with every tunable parameter at its default value.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use resistor_reader::config::BackgroundModel;
use resistor_reader::PipelineConfig;

#[derive(Parser, Debug)]
#[command(version, about = "Write the default reader configuration as JSON")]
struct Args {
    /// Output file
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let config = PipelineConfig::default();
    config.to_json_file(&args.output)?;

    eprintln!("Configuration saved to {}", args.output.display());
    eprintln!();
    eprintln!("Config summary:");
    eprintln!(
        "  Sampling: axis {:?}, core {:.0}%, min coverage {:.0}%, at least {} slices",
        config.sampling.axis,
        config.sampling.core_fraction * 100.0,
        config.sampling.min_coverage * 100.0,
        config.sampling.min_valid_slices
    );
    match &config.sampling.background {
        BackgroundModel::BorderMedian { delta_e } => {
            eprintln!("  Background: border median, ΔE ≤ {:.0}", delta_e)
        }
        BackgroundModel::Brightness { min_value, max_saturation } => eprintln!(
            "  Background: brightness, V ≥ {:.2}, S ≤ {:.2}",
            min_value, max_saturation
        ),
    }
    eprintln!(
        "  Segmentation: merge ΔE {:.0}, boundary run {}, body removal {}",
        config.segmentation.merge_delta_e,
        config.segmentation.boundary_run,
        if config.segmentation.remove_body { "on" } else { "off" }
    );
    eprintln!(
        "  Decoding: {} Ω to {} Ω, ambiguity above {:.0}%",
        config.decoding.min_ohms,
        config.decoding.max_ohms,
        config.decoding.ambiguity_threshold * 100.0
    );
    Ok(())
}
