//! CLI entry-point for serving the prediction form.

use std::sync::Arc;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{api, config::Settings, context::AppContext, predict::Predictor};

/// Run the Axum server.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Port to bind (default 7860).
    #[arg(long, default_value_t = 7860)]
    pub port: u16,
    /// Host address, defaults to localhost.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let ctx = AppContext::load(&settings)?;
    let limits = settings.session_limits();
    api::serve(Predictor::new(Arc::new(ctx)), args.host, args.port, limits).await
}
