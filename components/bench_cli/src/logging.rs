//! Tracing subscriber setup for the binaries.

use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

/// Filter used when neither `--log`, `HOSTBENCH_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "warn";

/// Installs a stderr subscriber. Standard output is left to the commands.
///
/// `filter` comes from `--log`/`HOSTBENCH_LOG`; `RUST_LOG` is consulted
/// next. An unparsable expression falls back to [`DEFAULT_FILTER`].
pub fn init(filter: Option<&str>) {
    let filter_expr = filter
        .map(str::to_string)
        .or_else(|| std::env::var("RUST_LOG").ok());

    let builder = fmt().with_writer(std::io::stderr).with_target(false);

    let builder = match filter_expr.and_then(|expr| EnvFilter::try_new(expr).ok()) {
        Some(filter) => builder.with_env_filter(filter),
        None => builder.with_env_filter(DEFAULT_FILTER),
    };

    let _ = builder.try_init();
}
