use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgb, RgbImage};
use resistor_reader::{ColorCode, PipelineConfig, ResistorReader, ValueDecoder};

/// 1200x400 photo of a yellow-violet-orange-gold resistor
fn synthetic_resistor() -> RgbImage {
    let bands = [
        (ColorCode::Yellow, 240..320),
        (ColorCode::Violet, 380..460),
        (ColorCode::Orange, 520..600),
        (ColorCode::Gold, 800..880),
    ];
    RgbImage::from_fn(1200, 400, |x, y| {
        if !(100..300).contains(&y) || !(120..1080).contains(&x) {
            return Rgb([250, 250, 250]);
        }
        bands
            .iter()
            .find(|(_, span)| span.contains(&x))
            .and_then(|(code, _)| code.reference_rgb())
            .map(Rgb)
            .unwrap_or(Rgb([222, 196, 152]))
    })
}

fn benchmark_pipeline(c: &mut Criterion) {
    let reader = ResistorReader::new(PipelineConfig::default()).unwrap();
    let image = synthetic_resistor();

    c.bench_function("read_image_1200x400", |b| {
        b.iter(|| reader.read_image(black_box(&image)).unwrap())
    });
}

fn benchmark_decoder(c: &mut Criterion) {
    let decoder = ValueDecoder::default();
    let codes = [ColorCode::Brown, ColorCode::Black, ColorCode::Red, ColorCode::Gold];

    c.bench_function("decode_codes_four_band", |b| {
        b.iter(|| decoder.decode_codes(black_box(&codes)).unwrap())
    });
}

criterion_group!(benches, benchmark_pipeline, benchmark_decoder);
criterion_main!(benches);
