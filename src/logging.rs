use tracing_subscriber::EnvFilter;

/// Initializes tracing for the binary. The filter comes from RUST_LOG
/// (default `warn`), and output goes to stderr so evaluated values keep
/// stdout to themselves.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Initializes tracing specifically for tests.
/// Ensures it's only done once, sets a default trace level,
/// and captures output for the test runner.
#[cfg(test)]
pub fn init_test_logging() {
    static TRACING_INIT: std::sync::Once = std::sync::Once::new();
    TRACING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("trace")
            .with_test_writer()
            .try_init()
            .ok(); // Ignore error if already initialized by another test
    });
}
