//! Tracing subscriber setup.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Environment variable read when `--log` is not given.
pub const LOG_ENV: &str = "KNOT_LOG";

/// Install a hierarchical stderr subscriber filtered by `filter`, or by
/// `KNOT_LOG` when `filter` is `None`.
///
/// Does nothing when neither is set. Safe to call multiple times.
/// Example filters: `knot_match=debug`, `knot_match::driver=trace`.
pub fn init_tracing(filter: Option<&str>) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};

        let directives = match filter {
            Some(filter) => filter.to_string(),
            None => match std::env::var(LOG_ENV) {
                Ok(filter) => filter,
                Err(_) => return,
            },
        };
        let filter = match EnvFilter::try_new(&directives) {
            Ok(filter) => filter,
            Err(err) => {
                eprintln!("warning: ignoring log filter '{directives}': {err}");
                return;
            }
        };
        tracing_subscriber::registry()
            .with(
                tracing_tree::HierarchicalLayer::new(2)
                    .with_writer(std::io::stderr)
                    .with_targets(true),
            )
            .with(filter)
            .init();
    });
}
