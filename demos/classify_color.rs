//! Classify a color to the nearest resistor color code
//!
//! Accepts a hex color or three RGB components and prints the closest code
//! with the distances to every reference color.

use anyhow::bail;
use clap::Parser;
use resistor_reader::color::{BandClassifier, ColorConverter};

#[derive(Parser, Debug)]
#[command(version, about = "Find the resistor color code nearest to a color")]
struct Args {
    /// "#RRGGBB", or three 0-255 components
    #[arg(required = true, num_args = 1..=3)]
    color: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let converter = ColorConverter::new();

    let [r, g, b] = match args.color.as_slice() {
        [hex] => converter.hex_to_rgb(hex)?,
        [r, g, b] => [r.parse()?, g.parse()?, b.parse()?],
        _ => bail!("expected a hex color or three RGB components"),
    };

    let classifier = BandClassifier::new();
    let lab = converter.rgb_to_lab(r, g, b);
    let result = classifier.classify(lab);

    println!("Input: RGB({}, {}, {}) = #{:02X}{:02X}{:02X}", r, g, b, r, g, b);
    println!("Lab:   L*={:.1}, a*={:.1}, b*={:.1}", lab.l, lab.a, lab.b);
    println!(
        "Match: {} (ΔE {:.1}, confidence {:.0}%)",
        result.code,
        result.distance,
        result.confidence * 100.0
    );
    println!();

    let mut distances: Vec<_> = classifier
        .references()
        .iter()
        .map(|(code, reference)| (*code, converter.delta_e(lab, *reference)))
        .collect();
    distances.sort_by(|a, b| a.1.total_cmp(&b.1));

    println!("{:<8} {:>8}", "code", "ΔE");
    for (code, distance) in distances {
        println!("{:<8} {:>8.1}", code.name(), distance);
    }
    Ok(())
}
