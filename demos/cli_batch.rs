//! Batch CLI for resistor_reader
//!
//! Reads every supported image in a directory and prints one CSV line per
//! file to stdout.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::Parser;
use resistor_reader::image_loader::is_supported_extension;
use resistor_reader::{logger, PipelineConfig, ResistorReader};

#[derive(Parser, Debug)]
#[command(version, about = "Read resistor values from every image in a directory")]
struct Args {
    /// Directory of images, or a single image
    input: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print per-file details to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    logger::init_with_default("warn");
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let config = PipelineConfig::from_json_file(path)
                .with_context(|| format!("loading {}", path.display()))?;
            eprintln!("Loaded configuration from {}", path.display());
            config
        }
        None => PipelineConfig::default(),
    };
    let reader = ResistorReader::new(config)?;

    let image_files = find_image_files(&args.input)
        .with_context(|| format!("listing {}", args.input.display()))?;
    if image_files.is_empty() {
        eprintln!("No image files found in {}", args.input.display());
        process::exit(1);
    }

    eprintln!("Found {} image files to process", image_files.len());
    println!("file,ohms,tolerance,bands,confidence,status");

    let mut success_count = 0;
    let mut error_count = 0;

    for (i, image_path) in image_files.iter().enumerate() {
        let filename = image_path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown");

        match reader.read_file(image_path) {
            Ok(reading) => {
                success_count += 1;
                let bands: Vec<&str> = reading.bands.iter().map(|code| code.name()).collect();
                println!(
                    "{},{},{},{},{:.3},ok",
                    filename,
                    reading.resistance_ohms,
                    reading.tolerance,
                    bands.join("-"),
                    reading.confidence
                );
                if args.verbose {
                    eprintln!("[{}/{}] {} → {}", i + 1, image_files.len(), filename, reading.compact());
                }
            }
            Err(error) => {
                error_count += 1;
                println!("{},,,,,{}", filename, error_kind(&error));
                if args.verbose {
                    eprintln!("[{}/{}] {} ✗ {}", i + 1, image_files.len(), filename, error);
                }
            }
        }
    }

    eprintln!();
    eprintln!("Batch processing complete:");
    eprintln!("  Success: {}", success_count);
    eprintln!("  Errors: {}", error_count);

    if error_count > 0 {
        process::exit(1);
    }
    Ok(())
}

fn error_kind(error: &resistor_reader::ReaderError) -> &'static str {
    use resistor_reader::ReaderError;

    match error.root() {
        ReaderError::Decode { .. } => "decode_error",
        ReaderError::EmptyScan { .. } => "empty_scan",
        ReaderError::InsufficientBands { .. } => "insufficient_bands",
        ReaderError::AmbiguousOrientation { .. } => "ambiguous_orientation",
        ReaderError::UnreadableBands { .. } => "unreadable_bands",
        _ => "error",
    }
}

fn find_image_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    if dir.is_file() {
        return Ok(vec![dir.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(is_supported_extension);
        if path.is_file() && supported {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
