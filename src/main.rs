use std::env;
use std::fs;
use std::process::ExitCode;

use pixlog::{log_error, log_info, DecodeStatus, ImageBuffer, LogConfig, LogSink};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = match LogConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };
    let sink = match LogSink::from_config(&config) {
        Ok(sink) => sink,
        Err(err) => {
            eprintln!("cannot open {}: {err}", config.path.display());
            return ExitCode::FAILURE;
        }
    };

    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: pixlog <image-file>");
        return ExitCode::FAILURE;
    };

    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(err) => {
            log_error!(sink; "read failed", path, err.to_string());
            return ExitCode::FAILURE;
        }
    };

    let mut buffer = ImageBuffer::new();
    match buffer.set_encoded(bytes) {
        DecodeStatus::Decoded => {}
        status => {
            log_error!(sink; "decode failed", path, format!("{status:?}"));
            return ExitCode::FAILURE;
        }
    }

    log_info!(
        sink;
        path,
        buffer.width(),
        buffer.height(),
        buffer.channels(),
        format!("{:?}", buffer.pixel_type()),
        buffer.encoded_size()
    );
    ExitCode::SUCCESS
}
