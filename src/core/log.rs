use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

const CRATE_TARGET: &str = "resale";

fn default_filter(verbose: bool) -> (Targets, EnvFilter) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::OFF
    };
    let targets = Targets::new().with_target(CRATE_TARGET, level);
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));
    (targets, env)
}

/// Installs the global subscriber on stderr, leaving stdout for command
/// output. Silent unless `verbose` is set or `RUST_LOG` asks for it.
pub fn init_logging(verbose: bool) {
    let (targets, env) = default_filter(verbose);

    // Test harnesses may have installed one already.
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(targets)
        .with(env)
        .try_init();
}
