//! Structured logging bootstrap using `tracing`.

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Map the CLI verbosity counter to a default filter directive.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "medsafe=debug,info",
        _ => "trace",
    }
}

/// Install a global subscriber. `RUST_LOG` wins over the verbosity default.
pub fn init_tracing(verbosity: u8) -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let fallback = default_directive(verbosity);
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(fallback))?;

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_level(true)
        .with_line_number(true)
        .with_file(true)
        .with_thread_ids(false)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(fmt_layer).try_init()?;

    tracing::debug!(%fallback, "tracing initialised");
    Ok(())
}
