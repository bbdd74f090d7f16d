use tracing_subscriber::{filter::{Directive, LevelFilter}, EnvFilter};

const DEFAULT_DIRECTIVE: &str = "carbon_service=info";

/// Installs the global fmt subscriber. `RUST_LOG`, when set, replaces the default filter.
pub fn init_tracing() {
    init_tracing_with(DEFAULT_DIRECTIVE);
}

pub fn init_tracing_with(default_directive: &str) {
    let directive: Directive = default_directive
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    let filter = EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy();

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
