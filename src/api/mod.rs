//! HTTP layer exposing the prediction form and its JSON API.

pub mod routes;
pub mod types;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::{
    predict::Predictor,
    session::{SessionLimits, SessionStore},
};

#[derive(Clone)]
pub struct AppState {
    pub predictor: Predictor,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(predictor: Predictor) -> Self {
        Self::with_limits(predictor, SessionLimits::default())
    }

    pub fn with_limits(predictor: Predictor, limits: SessionLimits) -> Self {
        Self {
            predictor,
            sessions: Arc::new(SessionStore::with_limits(limits)),
        }
    }
}

/// Assemble the router; split from [`serve`] so tests can drive it directly.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/drugs", get(routes::list_drugs))
        .route("/api/predict", post(routes::predict))
        .route("/api/sessions", post(routes::create_session))
        .route(
            "/api/sessions/:id",
            get(routes::get_session).delete(routes::delete_session),
        )
        .route("/api/sessions/:id/selection", put(routes::update_selection))
        .route("/api/sessions/:id/predict", post(routes::submit_session))
        .route("/api/sessions/:id/clear", post(routes::clear_session));

    #[cfg(feature = "askama")]
    let api = api.route("/", get(crate::ui::index));

    api.layer(TraceLayer::new_for_http()).with_state(state)
}

pub async fn serve(
    predictor: Predictor,
    host: String,
    port: u16,
    limits: SessionLimits,
) -> Result<()> {
    let state = AppState::with_limits(predictor, limits);
    let sweeper = tokio::spawn(sweep_sessions(state.sessions.clone()));
    let router = router(state);
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!(%addr, ttl_secs = limits.ttl.as_secs(), capacity = limits.capacity, "serving medsafe");
    let listener = TcpListener::bind(addr).await?;
    let served = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await;
    sweeper.abort();
    served?;
    Ok(())
}

/// Periodically drop idle sessions so abandoned pages do not pile up.
async fn sweep_sessions(sessions: Arc<SessionStore>) {
    let period = (sessions.limits().ttl / 4).max(Duration::from_secs(1));
    let mut ticker = tokio::time::interval(period);
    loop {
        ticker.tick().await;
        let expired = sessions.purge_expired().await;
        debug!(expired, "session sweep");
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
