use image::{ColorType, DynamicImage};

use crate::codec::{ColorMode, ImageCodec, PngCodec};
use crate::error::CodecError;

/// Outcome of [`ImageBuffer::set_encoded`].
///
/// The buffer ends up in the same empty state for both `Empty` and
/// `Malformed`; the status only tells the caller which one happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// The bytes decoded into a non-empty matrix and were kept as the cache.
    Decoded,
    /// No bytes were given, or they decoded into a zero-pixel matrix.
    Empty,
    /// The bytes were not a readable image; nothing was kept.
    Malformed,
}

/// An image held both as a decoded pixel matrix and as an encoded byte stream.
///
/// The matrix is the source of truth. The encoded cache is derived from it
/// lazily: `set_matrix` only marks the cache stale, and the first call to
/// [`encoded`](Self::encoded) or [`encoded_size`](Self::encoded_size) after
/// that re-encodes once. `set_encoded` goes the other way, decoding
/// immediately and keeping the given bytes as an up-to-date cache.
///
/// # Thread Safety
///
/// Not synchronized. Reading the encoded form mutates the cache, so those
/// accessors take `&mut self`; share a buffer across threads only behind a lock.
///
/// # Examples
///
/// ```
/// use image::{DynamicImage, Rgb, RgbImage};
/// use pixlog::ImageBuffer;
///
/// let frame = DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 3, Rgb([0, 128, 255])));
/// let mut buffer = ImageBuffer::from_matrix(frame);
/// assert_eq!((buffer.width(), buffer.height()), (4, 3));
///
/// let png = buffer.encoded().to_vec();
/// let mut copy = ImageBuffer::new();
/// copy.set_encoded(png);
/// assert_eq!(copy.matrix(), buffer.matrix());
/// ```
pub struct ImageBuffer<C: ImageCodec = PngCodec> {
    image: DynamicImage,
    encoded_cache: Vec<u8>,
    dirty: bool,
    color_mode: ColorMode,
    codec: C,
}

impl ImageBuffer<PngCodec> {
    /// Creates an empty buffer using the PNG codec.
    pub fn new() -> Self {
        Self::with_codec(PngCodec)
    }

    /// Creates a buffer holding `image`; the encoded form is produced on first read.
    pub fn from_matrix(image: DynamicImage) -> Self {
        let mut buffer = Self::new();
        buffer.image = image;
        buffer
    }

    /// Creates a buffer by decoding `bytes` right away.
    ///
    /// Check [`is_empty`](Self::is_empty) afterwards: undecodable input leaves
    /// the buffer empty.
    pub fn from_encoded(bytes: Vec<u8>) -> Self {
        let mut buffer = Self::new();
        buffer.set_encoded(bytes);
        buffer
    }
}

impl Default for ImageBuffer<PngCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ImageCodec> ImageBuffer<C> {
    /// Creates an empty buffer that encodes and decodes through `codec`.
    pub fn with_codec(codec: C) -> Self {
        Self {
            image: empty_matrix(),
            encoded_cache: Vec::new(),
            dirty: true,
            color_mode: ColorMode::default(),
            codec,
        }
    }

    /// True when the decoded matrix has no pixels.
    pub fn is_empty(&self) -> bool {
        self.image.width() == 0 || self.image.height() == 0
    }

    /// Releases both representations.
    pub fn clear(&mut self) {
        self.image = empty_matrix();
        self.encoded_cache = Vec::new();
        self.dirty = true;
    }

    /// Address of the first pixel, or null when the buffer is empty.
    ///
    /// The pointer is valid until the next mutation of the buffer.
    pub fn raw_ptr(&self) -> *const u8 {
        if self.is_empty() {
            std::ptr::null()
        } else {
            self.image.as_bytes().as_ptr()
        }
    }

    /// The decoded pixels as raw bytes in the matrix's native layout.
    pub fn raw_data(&self) -> &[u8] {
        self.image.as_bytes()
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn channels(&self) -> u8 {
        self.image.color().channel_count()
    }

    pub fn pixel_type(&self) -> ColorType {
        self.image.color()
    }

    /// The encoded byte stream, re-encoding first if the matrix changed.
    pub fn encoded(&mut self) -> &[u8] {
        self.sync_encoded();
        &self.encoded_cache
    }

    /// Length of the encoded byte stream, re-encoding first if the matrix changed.
    pub fn encoded_size(&mut self) -> usize {
        self.sync_encoded();
        self.encoded_cache.len()
    }

    /// Read-only view of the decoded matrix. Never encodes.
    pub fn matrix(&self) -> &DynamicImage {
        &self.image
    }

    /// Write access to the decoded matrix. The encoded cache is marked stale.
    pub fn matrix_mut(&mut self) -> &mut DynamicImage {
        self.dirty = true;
        &mut self.image
    }

    /// Consumes the buffer, returning the decoded matrix.
    pub fn into_matrix(self) -> DynamicImage {
        self.image
    }

    /// Replaces the matrix with a deep copy of `image` and marks the cache stale.
    pub fn set_matrix(&mut self, image: &DynamicImage) {
        self.dirty = true;
        self.image = image.clone();
    }

    /// Replaces the buffer's content by decoding `bytes`.
    ///
    /// On success the bytes are kept verbatim as the encoded cache, so a later
    /// [`encoded`](Self::encoded) returns them without re-encoding. On failure
    /// both representations are left empty.
    pub fn set_encoded(&mut self, bytes: Vec<u8>) -> DecodeStatus {
        match self.codec.decode(&bytes, self.color_mode) {
            Ok(image) if image.width() > 0 && image.height() > 0 => {
                self.image = image;
                self.encoded_cache = bytes;
                self.dirty = false;
                DecodeStatus::Decoded
            }
            Ok(_) | Err(CodecError::Empty) => {
                self.reset_clean();
                DecodeStatus::Empty
            }
            Err(err) => {
                tracing::warn!(error = %err, len = bytes.len(), "discarding undecodable image bytes");
                self.reset_clean();
                DecodeStatus::Malformed
            }
        }
    }

    /// True when the next encoded read will run the codec.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// Sets the layout applied by later `set_encoded` calls.
    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.color_mode = mode;
    }

    /// Builder form of [`set_color_mode`](Self::set_color_mode).
    pub fn with_color_mode(mut self, mode: ColorMode) -> Self {
        self.color_mode = mode;
        self
    }

    fn reset_clean(&mut self) {
        self.image = empty_matrix();
        self.encoded_cache = Vec::new();
        self.dirty = false;
    }

    fn sync_encoded(&mut self) {
        if !self.dirty {
            return;
        }

        if self.is_empty() {
            self.encoded_cache.clear();
        } else {
            match self.codec.encode(&self.image) {
                Ok(bytes) => self.encoded_cache = bytes,
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        width = self.image.width(),
                        height = self.image.height(),
                        "image could not be encoded, exposing empty cache"
                    );
                    self.encoded_cache.clear();
                }
            }
        }
        self.dirty = false;
    }
}

fn empty_matrix() -> DynamicImage {
    DynamicImage::new_rgb8(0, 0)
}
