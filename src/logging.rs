use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

pub(crate) const LOG_ENV: &str = "EXPENSE_SAVVY_LOG";
const DEFAULT_FILTER: &str = "expense_savvy=warn";

static TRACING_INIT: Once = Once::new();

/// Install the stderr subscriber. Safe to call more than once.
pub(crate) fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        // Another subscriber may already be installed (tests); keep it.
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
