use super::config::{LogFormat, LoggingConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Install the global subscriber. Logs go to stderr so command output on
/// stdout stays parseable.
///
/// `RUST_LOG` wins over everything; otherwise `--verbose` means `debug` and
/// the configured level applies.
pub fn initialize_tracing(config: &LoggingConfig, verbose: bool) {
    let filter = env_filter(config, verbose);

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(build_fmt_layer(config.format))
        .try_init();
}

fn env_filter(config: &LoggingConfig, verbose: bool) -> EnvFilter {
    if let Ok(filter) = std::env::var("RUST_LOG") {
        EnvFilter::new(filter)
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("warn"))
    }
}

fn build_fmt_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let base = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    match format {
        LogFormat::Json => Box::new(base.json()),
        LogFormat::Pretty => Box::new(base.compact()),
    }
}
