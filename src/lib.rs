//! # pixlog
//!
//! Two small primitives shared by capture and automation pipelines:
//!
//! * **[`ImageBuffer`]**: an image kept both as a decoded pixel matrix and as
//!   an encoded (PNG) byte stream. The encoded form is rebuilt lazily, only
//!   when it is read after the matrix changed.
//! * **[`LogRecord`]**: a single structured log line built field by field and
//!   written to a shared [`LogSink`] exactly once, when the record goes out of
//!   scope. Lines from concurrent threads never interleave.
//!
//! ## Main Components
//!
//! * `image_buffer`: the dual-representation buffer and its dirty-flag cache
//! * `codec`: the decode/encode seam, with a PNG implementation on `image`
//! * `log_record`: the scoped record builder, separators and `log_*!` macros
//! * `log_sink`: the shared file/stdout destination and its lock
//! * `loggable`: rendering of arbitrary `Serialize` values into a line
//! * `level`, `clock`, `config`: severity levels, header metadata, settings
//!
//! ## Quick Start
//!
//! ```
//! use image::{DynamicImage, Rgb, RgbImage};
//! use pixlog::{log_info, ImageBuffer, Level, LogSink};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let sink = LogSink::builder()
//!     .threshold(Level::Debug)
//!     .open(dir.path().join("pipeline.log"))
//!     .unwrap();
//!
//! let mut frame = ImageBuffer::from_matrix(DynamicImage::ImageRgb8(RgbImage::new(64, 48)));
//! let png_len = frame.encoded_size();
//!
//! log_info!(sink; "frame", frame.width(), frame.height(), png_len);
//! sink.record(Level::Debug, &[&"capture"]).field("done");
//! ```

pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod image_buffer;
pub mod level;
pub mod log_record;
pub mod log_sink;
pub mod loggable;

pub use codec::{ColorMode, ImageCodec, PngCodec};
pub use config::LogConfig;
pub use error::{CodecError, ConfigError};
pub use image_buffer::{DecodeStatus, ImageBuffer};
pub use level::Level;
pub use log_record::{LogRecord, Separator};
pub use log_sink::{LogSink, LogSinkBuilder};
pub use loggable::Loggable;
