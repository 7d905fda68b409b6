use shared_types::FeatureFlags;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: OnceLock<()> = OnceLock::new();

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info";

/// Install the global tracing subscriber.
///
/// Reads `RUST_LOG` for the filter. With `features.telemetry` on, events are
/// written as JSON lines; otherwise as plain text. Only the first call has
/// effect, and an already-installed subscriber is left in place.
pub fn init_tracing(flags: &FeatureFlags) {
    INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let result = if flags.telemetry {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_current_span(true))
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(false))
                .try_init()
        };

        if let Err(e) = result {
            eprintln!("[telemetry] Subscriber already set ({e}), keeping it");
        }
    });
}
