use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

use crate::error::CodecError;

/// How decoded pixels are laid out after `decode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Keep whatever layout the container stores (RGBA stays RGBA, 16-bit stays 16-bit).
    #[default]
    Unchanged,
    /// Force three 8-bit colour channels.
    Color,
    /// Force a single 8-bit luminance channel.
    Grayscale,
}

impl ColorMode {
    fn apply(self, image: DynamicImage) -> DynamicImage {
        match self {
            ColorMode::Unchanged => image,
            ColorMode::Color => DynamicImage::ImageRgb8(image.into_rgb8()),
            ColorMode::Grayscale => DynamicImage::ImageLuma8(image.into_luma8()),
        }
    }
}

/// Codec capability consumed by [`ImageBuffer`](crate::ImageBuffer).
///
/// The buffer owns exactly one codec and calls it only from `set_encoded`
/// (decode) and from the encode-on-read path (encode). Implementations must be
/// lossless for the round trip `decode(encode(m)) == m` to hold.
pub trait ImageCodec {
    /// Decode a container byte sequence into a pixel matrix.
    fn decode(&self, bytes: &[u8], mode: ColorMode) -> Result<DynamicImage, CodecError>;

    /// Encode a non-empty pixel matrix into the codec's container format.
    fn encode(&self, image: &DynamicImage) -> Result<Vec<u8>, CodecError>;
}

/// Default codec: sniffs the container on decode, always writes PNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

impl ImageCodec for PngCodec {
    fn decode(&self, bytes: &[u8], mode: ColorMode) -> Result<DynamicImage, CodecError> {
        if bytes.is_empty() {
            return Err(CodecError::Empty);
        }
        let image = image::load_from_memory(bytes).map_err(CodecError::Decode)?;
        Ok(mode.apply(image))
    }

    fn encode(&self, image: &DynamicImage) -> Result<Vec<u8>, CodecError> {
        let mut cursor = Cursor::new(Vec::new());
        image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(CodecError::Encode)?;
        Ok(cursor.into_inner())
    }
}
