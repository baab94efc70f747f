use thiserror::Error;

/// Failures reported by an [`ImageCodec`](crate::codec::ImageCodec).
///
/// These never escape the [`ImageBuffer`](crate::ImageBuffer) API: the buffer
/// turns them into an empty matrix or an empty encoded cache.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The byte sequence handed to `decode` was empty.
    #[error("no encoded bytes to decode")]
    Empty,

    /// The byte sequence could not be decoded as any supported container.
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// The matrix could not be encoded into the target container.
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
}

/// Failures while reading a [`LogConfig`](crate::config::LogConfig) from its sources.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown log level `{0}`")]
    UnknownLevel(String),

    #[error("invalid boolean `{value}` for {key}")]
    InvalidFlag { key: &'static str, value: String },
}
