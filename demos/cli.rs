//! Command-line interface for resistor_reader
//!
//! Reads one photograph, prints the reading as JSON to stdout and a human
//! summary to stderr.

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use resistor_reader::{logger, DecodeTrace, PipelineConfig, ResistorReader};

#[derive(Parser, Debug)]
#[command(version, about = "Read a resistor value from a photograph of its color bands")]
struct Args {
    /// Image of a single resistor, cropped around the body
    image: PathBuf,

    /// JSON configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the full decode trace instead of the reading alone
    #[arg(long)]
    debug: bool,

    /// Print stage timings to stderr
    #[arg(long)]
    timings: bool,
}

fn main() -> anyhow::Result<()> {
    logger::init_with_default("warn");
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    let reader = ResistorReader::new(config)?;

    match reader.read_file_traced(&args.image) {
        Ok(trace) => {
            print_result(&trace, args.debug)?;
            if args.timings {
                eprintln!();
                eprintln!("{}", trace.timings.summary());
            }
            Ok(())
        }
        Err(error) => {
            eprintln!("Reading failed: {}", error);
            if error.is_recoverable() {
                eprintln!("Suggestion: {}", error.user_message());
            }
            process::exit(1);
        }
    }
}

fn print_result(trace: &DecodeTrace, debug: bool) -> anyhow::Result<()> {
    let json = if debug {
        serde_json::to_string_pretty(trace)?
    } else {
        serde_json::to_string_pretty(&trace.reading)?
    };
    println!("{}", json);

    let reading = &trace.reading;
    let bands: Vec<&str> = reading.bands.iter().map(|code| code.name()).collect();

    eprintln!();
    eprintln!("Resistor Reading Summary:");
    eprintln!("  Value:      {} ({})", reading, reading.compact());
    eprintln!("  Bands:      {} ({})", bands.join("-"), reading.band_count);
    if let Some(ppm) = reading.tempco_ppm {
        eprintln!("  Tempco:     {} ppm/K", ppm);
    }
    eprintln!("  Direction:  {:?}", trace.orientation);
    eprintln!("  Confidence: {:.1}%", reading.confidence * 100.0);

    if reading.confidence < 0.5 {
        eprintln!("  Warning: Low confidence result. Consider better lighting or a tighter crop.");
    }
    Ok(())
}
