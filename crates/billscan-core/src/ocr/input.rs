//! Uploaded invoice images.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, ImageReader};

use crate::error::OcrError;

/// File extensions accepted as invoice images (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "png", "jpeg"];

/// Smallest image side accepted by the Read API.
const MIN_SIDE: u32 = 50;

/// Largest image side accepted by the Read API.
const MAX_SIDE: u32 = 10_000;

/// Whether a path has one of the supported image extensions.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Raw bytes of one uploaded image.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// File name shown in warnings.
    pub name: String,

    /// Encoded image data as uploaded.
    pub bytes: Vec<u8>,
}

/// Format and size detected by [`ImageInput::preflight`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

impl ImageInput {
    /// Create an input from in-memory bytes.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read an image file. The name is the file name without directories.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes))
    }

    /// Check that the bytes are an image the OCR service will accept.
    ///
    /// Only the header is decoded; pixel data is left to the service.
    pub fn preflight(&self, max_bytes: usize) -> Result<ImageInfo, OcrError> {
        if self.bytes.is_empty() {
            return Err(OcrError::InvalidImage(format!("{} is empty", self.name)));
        }

        if self.bytes.len() > max_bytes {
            return Err(OcrError::InvalidImage(format!(
                "{} is {} bytes, limit is {}",
                self.name,
                self.bytes.len(),
                max_bytes
            )));
        }

        let reader = ImageReader::new(Cursor::new(&self.bytes))
            .with_guessed_format()
            .map_err(|e| OcrError::InvalidImage(e.to_string()))?;

        let format = match reader.format() {
            Some(f @ (ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Bmp | ImageFormat::Tiff)) => f,
            Some(other) => {
                return Err(OcrError::InvalidImage(format!(
                    "{} has unsupported format {:?}",
                    self.name, other
                )));
            }
            None => {
                return Err(OcrError::InvalidImage(format!(
                    "{} is not a recognized image",
                    self.name
                )));
            }
        };

        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| OcrError::InvalidImage(e.to_string()))?;

        let fits = |side: u32| (MIN_SIDE..=MAX_SIDE).contains(&side);
        if !fits(width) || !fits(height) {
            return Err(OcrError::InvalidImage(format!(
                "{} is {}x{}, sides must be between {} and {} pixels",
                self.name, width, height, MIN_SIDE, MAX_SIDE
            )));
        }

        Ok(ImageInfo {
            format,
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(width, height, Rgb([255u8, 255, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_image(Path::new("bill.png")));
        assert!(is_supported_image(Path::new("scans/bill.JPG")));
        assert!(is_supported_image(Path::new("bill.jpeg")));
        assert!(!is_supported_image(Path::new("bill.pdf")));
        assert!(!is_supported_image(Path::new("bill")));
    }

    #[test]
    fn test_preflight_accepts_png() {
        let input = ImageInput::new("bill.png", png_bytes(120, 80));
        let info = input.preflight(1024 * 1024).unwrap();

        assert_eq!(info.format, ImageFormat::Png);
        assert_eq!((info.width, info.height), (120, 80));
    }

    #[test]
    fn test_preflight_rejects_small_image() {
        let input = ImageInput::new("tiny.png", png_bytes(10, 10));
        assert!(matches!(
            input.preflight(1024 * 1024),
            Err(OcrError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_preflight_rejects_garbage_and_oversize() {
        let garbage = ImageInput::new("notes.png", b"Account Number: 1".to_vec());
        assert!(matches!(garbage.preflight(1024), Err(OcrError::InvalidImage(_))));

        let big = ImageInput::new("big.png", png_bytes(60, 60));
        assert!(matches!(big.preflight(16), Err(OcrError::InvalidImage(_))));

        let empty = ImageInput::new("empty.png", Vec::new());
        assert!(matches!(empty.preflight(1024), Err(OcrError::InvalidImage(_))));
    }

    #[test]
    fn test_from_path_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("march.png");
        std::fs::write(&path, png_bytes(60, 60)).unwrap();

        let input = ImageInput::from_path(&path).unwrap();
        assert_eq!(input.name, "march.png");
        assert!(!input.bytes.is_empty());
    }
}
