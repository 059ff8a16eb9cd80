use std::sync::Once;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static LOG_INIT: Once = Once::new();

/// Filter used when neither `RUST_LOG` nor an explicit filter is given
pub const DEFAULT_FILTER: &str = "info,cosmian_pkcs11_sys=debug,cosmian_pkcs11_params=debug";

/// Install the global tracing subscriber, once per process.
///
/// `RUST_LOG` always wins over `filter`, which itself wins over [`DEFAULT_FILTER`].
/// Subsequent calls are no-ops, so every test may call this first thing.
pub fn log_init(filter: Option<&str>) {
    LOG_INIT.call_once(|| {
        let env_filter = std::env::var("RUST_LOG").map_or_else(
            |_| EnvFilter::new(filter.unwrap_or(DEFAULT_FILTER)),
            EnvFilter::new,
        );
        tracing_setup(env_filter);
    });
}

fn tracing_setup(env_filter: EnvFilter) {
    let format = tracing_subscriber::fmt::layer()
        .with_level(true)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true)
        .with_test_writer()
        .compact();

    // another subscriber may already be installed by the host application
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(format)
        .try_init();
}
