use tracing_subscriber::EnvFilter;

/// Installs the global compact `fmt` subscriber.
///
/// The filter comes from `RUST_LOG` and falls back to `info`. Panics if a
/// global subscriber is already installed; see [`try_init_tracing`].
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .compact()
        .init();
}

/// Installs the global subscriber unless one is already set.
///
/// Returns `false` when another subscriber was installed first.
pub fn try_init_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
