use std::sync::Once;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::LogLevel;

static INIT_TRACING: Once = Once::new();

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `level` when set. Only the first call has an effect,
/// so building several sessions never reconfigures logging.
pub fn init_logging(level: LogLevel) {
    INIT_TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{},hyper=warn,reqwest=warn", level.as_directive()))
        });

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .try_init();

        info!("dcnm tracing initialized level={}", level);
    });
}
