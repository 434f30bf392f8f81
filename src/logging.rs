use tracing_subscriber::EnvFilter;

/// Install a stderr tracing subscriber; stdout is reserved for the HTML document.
///
/// Uses `RUST_LOG` for filtering if present, `warn` otherwise. Safe to call more than once.
pub fn init_tracing_subscriber() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
