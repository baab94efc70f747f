use image::{ColorType, DynamicImage, ImageBuffer as Pixels, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use pixlog::{CodecError, ColorMode, DecodeStatus, ImageBuffer, ImageCodec, PngCodec};
use proptest::prelude::*;
use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone, Default)]
struct CountingCodec {
    encodes: Arc<AtomicUsize>,
    decodes: Arc<AtomicUsize>,
}

impl ImageCodec for CountingCodec {
    fn decode(&self, bytes: &[u8], mode: ColorMode) -> Result<DynamicImage, CodecError> {
        self.decodes.fetch_add(1, Ordering::SeqCst);
        PngCodec.decode(bytes, mode)
    }

    fn encode(&self, image: &DynamicImage) -> Result<Vec<u8>, CodecError> {
        self.encodes.fetch_add(1, Ordering::SeqCst);
        PngCodec.encode(image)
    }
}

/// Codec that keeps the last encoded bytes in interior-mutable state.
#[derive(Default)]
struct RememberingCodec {
    last_encoded: RefCell<Vec<u8>>,
}

impl ImageCodec for RememberingCodec {
    fn decode(&self, bytes: &[u8], mode: ColorMode) -> Result<DynamicImage, CodecError> {
        PngCodec.decode(bytes, mode)
    }

    fn encode(&self, image: &DynamicImage) -> Result<Vec<u8>, CodecError> {
        let bytes = PngCodec.encode(image)?;
        *self.last_encoded.borrow_mut() = bytes.clone();
        Ok(bytes)
    }
}

fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 7) as u8, (y * 13) as u8, ((x + y) % 255) as u8])
    }))
}

#[test]
fn test_matrix_round_trips_through_encoded_bytes() {
    let original = gradient(17, 9);
    let mut buffer = ImageBuffer::new();
    buffer.set_matrix(&original);

    let bytes = buffer.encoded().to_vec();
    let decoded = PngCodec.decode(&bytes, ColorMode::Unchanged).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn test_set_encoded_reuses_bytes_without_reencoding() {
    let original = gradient(8, 8);
    let mut source = ImageBuffer::from_matrix(original.clone());
    let bytes = source.encoded().to_vec();

    let codec = CountingCodec::default();
    let mut fresh = ImageBuffer::with_codec(codec.clone());
    assert_eq!(fresh.set_encoded(bytes.clone()), DecodeStatus::Decoded);

    assert_eq!(fresh.matrix(), &original);
    assert!(!fresh.is_dirty());
    assert_eq!(fresh.encoded(), bytes.as_slice());
    assert_eq!(codec.decodes.load(Ordering::SeqCst), 1);
    assert_eq!(codec.encodes.load(Ordering::SeqCst), 0);
}

#[test]
fn test_repeated_reads_encode_once() {
    let codec = CountingCodec::default();
    let mut buffer = ImageBuffer::with_codec(codec.clone());
    buffer.set_matrix(&gradient(6, 5));

    let first = buffer.encoded().to_vec();
    let size = buffer.encoded_size();
    let second = buffer.encoded().to_vec();

    assert_eq!(first, second);
    assert_eq!(size, first.len());
    assert_eq!(codec.encodes.load(Ordering::SeqCst), 1);

    buffer.set_matrix(&gradient(6, 5));
    let _ = buffer.encoded_size();
    assert_eq!(codec.encodes.load(Ordering::SeqCst), 2);
}

#[test]
fn test_clear_resets_to_empty() {
    let mut buffer = ImageBuffer::from_matrix(gradient(3, 3));
    let _ = buffer.encoded();
    buffer.clear();

    assert!(buffer.is_empty());
    assert_eq!(buffer.width(), 0);
    assert_eq!(buffer.height(), 0);
    assert!(buffer.raw_ptr().is_null());
    assert_eq!(buffer.encoded_size(), 0);
}

#[test]
fn test_empty_matrix_never_reaches_codec() {
    let codec = CountingCodec::default();
    let mut buffer = ImageBuffer::with_codec(codec.clone());
    buffer.set_matrix(&DynamicImage::new_rgb8(0, 0));

    assert!(buffer.encoded().is_empty());
    assert_eq!(codec.encodes.load(Ordering::SeqCst), 0);
}

#[test]
fn test_accessors_describe_matrix() {
    let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 2, Rgba([1, 2, 3, 4])));
    let buffer = ImageBuffer::from_matrix(rgba);

    assert_eq!(buffer.width(), 4);
    assert_eq!(buffer.height(), 2);
    assert_eq!(buffer.channels(), 4);
    assert_eq!(buffer.pixel_type(), ColorType::Rgba8);
    assert_eq!(buffer.raw_data().len(), 4 * 2 * 4);
    assert_eq!(&buffer.raw_data()[..4], &[1, 2, 3, 4]);
    assert!(!buffer.raw_ptr().is_null());
    assert_eq!(buffer.raw_ptr(), buffer.raw_data().as_ptr());
}

#[test]
fn test_set_matrix_is_a_deep_copy() {
    let mut source = gradient(2, 2);
    let mut buffer = ImageBuffer::new();
    buffer.set_matrix(&source);

    if let Some(rgb) = source.as_mut_rgb8() {
        rgb.put_pixel(0, 0, Rgb([9, 9, 9]));
    }
    assert_ne!(buffer.matrix(), &source);
}

#[test]
fn test_sixteen_bit_matrix_round_trips() {
    let gray: Pixels<Luma<u16>, Vec<u16>> = Pixels::from_fn(5, 3, |x, y| Luma([(x * 1000 + y) as u16]));
    let original = DynamicImage::ImageLuma16(gray);
    let mut buffer = ImageBuffer::from_matrix(original.clone());

    let copy = ImageBuffer::from_encoded(buffer.encoded().to_vec());
    assert_eq!(copy.pixel_type(), ColorType::L16);
    assert_eq!(copy.matrix(), &original);
}

#[test]
fn test_color_mode_applies_on_decode() {
    let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([50, 60, 70, 255])));
    let bytes = ImageBuffer::from_matrix(rgba).encoded().to_vec();

    let mut color = ImageBuffer::new().with_color_mode(ColorMode::Color);
    assert_eq!(color.set_encoded(bytes.clone()), DecodeStatus::Decoded);
    assert_eq!(color.channels(), 3);

    let mut gray = ImageBuffer::new();
    gray.set_color_mode(ColorMode::Grayscale);
    gray.set_encoded(bytes);
    assert_eq!(gray.pixel_type(), ColorType::L8);
}

#[test]
fn test_undecodable_bytes_leave_buffer_empty() {
    let mut buffer = ImageBuffer::from_matrix(gradient(4, 4));
    let truncated = buffer.encoded()[..20].to_vec();

    assert_eq!(buffer.set_encoded(truncated), DecodeStatus::Malformed);
    assert!(buffer.is_empty());
    assert_eq!(buffer.encoded_size(), 0);

    let garbage = ImageBuffer::from_encoded(vec![0xde, 0xad, 0xbe, 0xef]);
    assert!(garbage.is_empty());
}

#[test]
fn test_codec_with_interior_state() {
    let mut buffer = ImageBuffer::with_codec(RememberingCodec::default());
    buffer.set_matrix(&gradient(3, 2));

    let bytes = buffer.encoded().to_vec();
    assert!(!bytes.is_empty());

    let copy = ImageBuffer::from_encoded(bytes);
    assert_eq!(copy.matrix(), &gradient(3, 2));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_rgba_round_trip(width in 1u32..24, height in 1u32..24, seed in any::<u8>()) {
        let pixels = RgbaImage::from_fn(width, height, |x, y| {
            let v = (x as u8).wrapping_mul(31) ^ (y as u8).wrapping_mul(17) ^ seed;
            Rgba([v, v.wrapping_add(1), v.wrapping_mul(3), 255 - v])
        });
        let original = DynamicImage::ImageRgba8(pixels);

        let mut buffer = ImageBuffer::new();
        buffer.set_matrix(&original);
        let mut copy = ImageBuffer::new();
        prop_assert_eq!(copy.set_encoded(buffer.encoded().to_vec()), DecodeStatus::Decoded);
        prop_assert_eq!(copy.matrix(), &original);
    }
}
