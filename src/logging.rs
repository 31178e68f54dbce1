use tracing_subscriber::EnvFilter;

/// Send diagnostics to stderr, keeping stdout for the prompts. Only warnings
/// are shown unless `RUST_LOG` asks for more.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
