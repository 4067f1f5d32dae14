//! Print the band colors for a resistance value
//!
//! The inverse of reading: given ohms, a tolerance and a band layout, list
//! the colors in reading order and check them with the decoder.

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use resistor_reader::{encode, BandLayout, Tolerance, ValueDecoder};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Layout {
    Three,
    Four,
    Five,
    Six,
}

#[derive(Parser, Debug)]
#[command(version, about = "Print the color bands for a resistance value")]
struct Args {
    /// Resistance in ohms, with an optional k/M/G suffix (e.g. 4.7k)
    value: String,

    /// Tolerance in percent [default: 20 for three bands, otherwise 5]
    #[arg(short, long)]
    tolerance: Option<u8>,

    /// Band layout
    #[arg(short, long, value_enum, default_value_t = Layout::Four)]
    layout: Layout,

    /// Temperature coefficient for six-band parts, in ppm/K
    #[arg(long, default_value_t = 100)]
    tempco: u16,
}

fn parse_ohms(value: &str) -> anyhow::Result<f64> {
    let value = value.trim().trim_end_matches(['Ω', 'R', 'r']);
    let (number, scale) = match value.chars().last() {
        Some('k') | Some('K') => (&value[..value.len() - 1], 1e3),
        Some('M') => (&value[..value.len() - 1], 1e6),
        Some('G') => (&value[..value.len() - 1], 1e9),
        _ => (value, 1.0),
    };
    let number: f64 = number
        .parse()
        .with_context(|| format!("'{}' is not a resistance", value))?;
    Ok(number * scale)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let ohms = parse_ohms(&args.value)?;
    let percent = match (args.tolerance, args.layout) {
        (Some(percent), _) => percent,
        (None, Layout::Three) => 20,
        (None, _) => 5,
    };
    let Some(tolerance) = Tolerance::from_percent(percent) else {
        bail!("unsupported tolerance {}%", percent);
    };
    let layout = match args.layout {
        Layout::Three => BandLayout::Three,
        Layout::Four => BandLayout::Four,
        Layout::Five => BandLayout::Five,
        Layout::Six => BandLayout::Six {
            tempco_ppm: args.tempco,
        },
    };

    let bands = encode(ohms, tolerance, layout)?;
    let names: Vec<&str> = bands.iter().map(|code| code.name()).collect();
    println!("{}", names.join("-"));

    let reading = ValueDecoder::default().decode_codes(&bands)?;
    eprintln!("Decodes as {} ({})", reading, reading.compact());
    Ok(())
}
