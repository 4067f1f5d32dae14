//! Unified image loading with support for multiple formats
//!
//! Every supported file is decoded into an 8-bit `RgbImage`. Standard formats
//! go through the `image` crate; HEIC/HEIF photos need the `heic` feature,
//! which decodes them with `libheif-rs`.

use std::path::Path;

use image::RgbImage;
use tracing::debug;

use crate::error::{ReaderError, Result};

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    /// First frame only
    Gif,
    WebP,
    Tiff,
    Bmp,
    /// PBM, PGM and PPM
    Pnm,
    Qoi,
    /// HEIC/HEIF (Apple)
    Heic,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::WebP),
            "tiff" | "tif" => Some(ImageFormat::Tiff),
            "bmp" => Some(ImageFormat::Bmp),
            "pbm" | "pgm" | "ppm" | "pnm" => Some(ImageFormat::Pnm),
            "qoi" => Some(ImageFormat::Qoi),
            "heic" | "heif" => Some(ImageFormat::Heic),
            _ => None,
        }
    }

    /// Check if format requires libheif
    pub fn requires_heif(&self) -> bool {
        matches!(self, ImageFormat::Heic)
    }
}

/// Load an image from disk as 8-bit RGB
///
/// # Errors
///
/// Returns `ReaderError::Decode` if the file cannot be opened, the extension
/// is not a supported format, or decoding fails.
///
/// # Example
///
/// ```rust,no_run
/// use resistor_reader::image_loader::load_image;
/// use std::path::Path;
///
/// let image = load_image(Path::new("resistor.jpg"))?;
/// println!("Loaded image: {}x{}", image.width(), image.height());
/// # Ok::<(), resistor_reader::ReaderError>(())
/// ```
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let format = ImageFormat::from_extension(path).ok_or_else(|| ReaderError::Decode {
        message: format!("Unknown image format for file: {}", path.display()),
        source: None,
    })?;

    let image = if format.requires_heif() {
        load_heic(path)?
    } else {
        load_standard(path)?
    };

    debug!(
        path = %path.display(),
        ?format,
        width = image.width(),
        height = image.height(),
        "Loaded image"
    );
    Ok(image)
}

/// Load image using the `image` crate (standard formats)
fn load_standard(path: &Path) -> Result<RgbImage> {
    use image::ImageReader;

    let reader = ImageReader::open(path).map_err(|e| {
        ReaderError::decode(format!("Failed to open image file: {}", path.display()), e)
    })?;

    let image = reader.decode().map_err(|e| {
        ReaderError::decode(format!("Failed to decode image: {}", path.display()), e)
    })?;

    Ok(image.to_rgb8())
}

/// Load HEIC/HEIF image using libheif
#[cfg(feature = "heic")]
fn load_heic(path: &Path) -> Result<RgbImage> {
    use libheif_rs::{ColorSpace, HeifContext, LibHeif, RgbChroma};

    let lib_heif = LibHeif::new();

    let path_str = path.to_str().ok_or_else(|| ReaderError::Decode {
        message: format!("Invalid file path encoding: {}", path.display()),
        source: None,
    })?;

    let ctx = HeifContext::read_from_file(path_str).map_err(|e| {
        ReaderError::decode(format!("Failed to read HEIC file: {}", path.display()), e)
    })?;

    let handle = ctx
        .primary_image_handle()
        .map_err(|e| ReaderError::decode("Failed to get primary image handle", e))?;

    let image = lib_heif
        .decode(&handle, ColorSpace::Rgb(RgbChroma::Rgb), None)
        .map_err(|e| ReaderError::decode("Failed to decode HEIC image", e))?;

    let planes = image.planes();
    let plane = planes.interleaved.ok_or_else(|| ReaderError::Decode {
        message: "HEIC image has no interleaved RGB data".to_string(),
        source: None,
    })?;

    let (width, height) = (handle.width(), handle.height());
    let data = strip_stride(plane.data, width as usize * 3, plane.stride, height as usize);

    RgbImage::from_raw(width, height, data).ok_or_else(|| ReaderError::Decode {
        message: format!("HEIC plane is smaller than {}x{}", width, height),
        source: None,
    })
}

#[cfg(not(feature = "heic"))]
fn load_heic(path: &Path) -> Result<RgbImage> {
    Err(ReaderError::Decode {
        message: format!(
            "HEIC support is not enabled (build with the `heic` feature): {}",
            path.display()
        ),
        source: None,
    })
}

/// Copy row by row, dropping padding at the end of each row
#[cfg_attr(not(feature = "heic"), allow(dead_code))]
fn strip_stride(data: &[u8], row_bytes: usize, stride: usize, height: usize) -> Vec<u8> {
    if stride == row_bytes {
        return data.iter().take(row_bytes * height).copied().collect();
    }
    data.chunks(stride)
        .take(height)
        .flat_map(|row| row.iter().take(row_bytes))
        .copied()
        .collect()
}

/// Get list of all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &[
        "jpg", "jpeg", "png", "gif", "webp", "tiff", "tif", "bmp", "pbm", "pgm", "ppm", "pnm",
        "qoi", "heic", "heif",
    ]
}

/// Check if a file extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_extensions().contains(&ext_lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            ImageFormat::from_extension(Path::new("resistor.jpg")),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_extension(Path::new("resistor.JPEG")),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_extension(Path::new("resistor.png")),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_extension(Path::new("resistor.HEIF")),
            Some(ImageFormat::Heic)
        );
        assert_eq!(ImageFormat::from_extension(Path::new("resistor.xyz")), None);
        assert_eq!(ImageFormat::from_extension(Path::new("resistor")), None);
    }

    #[test]
    fn test_heif_requirement() {
        assert!(ImageFormat::Heic.requires_heif());
        assert!(!ImageFormat::Jpeg.requires_heif());
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_extension("jpg"));
        assert!(is_supported_extension("PNG"));
        assert!(is_supported_extension("heic"));
        assert!(!is_supported_extension("doc"));
    }

    #[test]
    fn test_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bands.png");
        let original = RgbImage::from_fn(4, 3, |x, y| Rgb([x as u8 * 60, y as u8 * 80, 7]));
        original.save(&path).unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let err = load_image(Path::new("no/such/resistor.png")).unwrap_err();
        assert!(matches!(err, ReaderError::Decode { source: Some(_), .. }));
    }

    #[test]
    fn test_unknown_extension_is_decode_error() {
        let err = load_image(Path::new("resistor.txt")).unwrap_err();
        assert!(matches!(err, ReaderError::Decode { source: None, .. }));
    }

    #[test]
    fn test_corrupt_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();
        let err = load_image(&path).unwrap_err();
        assert!(matches!(err, ReaderError::Decode { .. }));
    }

    #[test]
    fn test_strip_stride() {
        let data = [1, 2, 3, 0, 4, 5, 6, 0];
        assert_eq!(strip_stride(&data, 3, 4, 2), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(strip_stride(&data[..6], 3, 3, 2), vec![1, 2, 3, 0, 4, 5]);
    }
}
