//! Tracing setup for hosts and tests.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Environment variable holding the filter directives.
const FILTER_ENV: &str = "FX_LOG";

/// Install a hierarchical tracing subscriber.
///
/// Does nothing unless `FX_LOG` is set, e.g. `FX_LOG=fx_bind=trace`. Safe to
/// call more than once, and leaves an already installed global subscriber
/// in place.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        let Ok(filter) = EnvFilter::try_from_env(FILTER_ENV) else {
            return;
        };
        let tree = tracing_tree::HierarchicalLayer::new(2)
            .with_targets(true)
            .with_bracketed_fields(true);
        if tracing_subscriber::registry()
            .with(tree)
            .with(filter)
            .try_init()
            .is_err()
        {
            tracing::debug!("global subscriber already installed");
        }
    });
}
