//! Optional tracing subscriber setup, enabled with the `log` feature.
//!
//! The fuzz targets install this once at startup. Events go to stderr next
//! to libFuzzer's own output; the default filter keeps only this crate's
//! warnings (unsupported operation kinds, scratch files that won't delete).

use tracing_subscriber::EnvFilter;

/// Filter used when none is given or the given one doesn't parse.
pub const DEFAULT_FILTER: &str = "sst_harness=warn";

#[derive(thiserror::Error, Debug)]
pub enum LogError {
    #[error(transparent)]
    SetLogger(#[from] tracing_subscriber::util::TryInitError),
}

pub type LogResult<T> = Result<T, LogError>;

fn build_filter(filter: &str) -> EnvFilter {
    EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a global subscriber writing compact lines to stderr.
///
/// `filter` uses `EnvFilter` syntax.
pub fn init(filter: impl AsRef<str>) -> LogResult<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(build_filter(filter.as_ref()))
        .with(
            fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_target(true),
        )
        .try_init()
        .map_err(Into::into)
}

/// [`init`] with the filter taken from `RUST_LOG`, or [`DEFAULT_FILTER`].
pub fn init_from_env() -> LogResult<()> {
    let filter = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    if filter.is_empty() {
        init(DEFAULT_FILTER)
    } else {
        init(filter)
    }
}
