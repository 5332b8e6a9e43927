use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_DIRECTIVES: &str = "info,quill_server=debug";

/// JSON logs on stdout with UTC timestamps. `RUST_LOG` overrides the
/// default directives.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .json()
        .finish();

    // a test harness may have installed its own subscriber already
    let _ = tracing::subscriber::set_global_default(subscriber);
}
