//! Server-rendered prediction form.

use askama::Template;
use axum::{extract::State, http::StatusCode, response::Html};
use tracing::error;

use crate::{api::AppState, predict::SAFETY_NOTICE};

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub drugs: Vec<String>,
    pub notice: &'static str,
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, (StatusCode, String)> {
    let page = IndexTemplate {
        drugs: state.predictor.context().drug_names(),
        notice: SAFETY_NOTICE,
    };
    page.render().map(Html).map_err(|err| {
        error!(error = %err, "rendering index page");
        (StatusCode::INTERNAL_SERVER_ERROR, "failed to render page".to_string())
    })
}
