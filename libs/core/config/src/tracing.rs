use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Directive used when `RUST_LOG` is not set.
///
/// Quote computations log per-stage detail at `debug`, so development keeps
/// it visible while production only reports summaries and failures.
pub fn default_directive(environment: &Environment) -> &'static str {
    if environment.is_production() {
        "info,tower_http=warn"
    } else {
        "debug,tower_http=debug,hyper=info"
    }
}

/// Install color-eyre with location sections and without the env dump.
///
/// Call this first in `main()`. Safe to call more than once.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Initialize the global subscriber with span-trace capture.
///
/// - **Production** (`APP_ENV=production`): flattened JSON events, no targets.
/// - **Development**: pretty, human-readable output.
///
/// Both variants carry a `tracing_error::ErrorLayer` so `eyre` reports include
/// the active spans. `RUST_LOG` overrides [`default_directive`].
///
/// Calling this again (tests, CLI subcommands) is a no-op.
pub fn init_tracing(environment: &Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(environment)));

    let result = if environment.is_production() {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => info!(?environment, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
}

/// Initialize a compact subscriber on stderr for command-line tools.
///
/// Stdout stays free for command output. Only warnings are shown unless
/// `RUST_LOG` says otherwise. Calling this again is a no-op.
pub fn init_stderr_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(tracing_error::ErrorLayer::default())
        .with(filter)
        .try_init();
}
