//! Request and response bodies for the JSON API.

use serde::{Deserialize, Serialize};

use crate::session::{SessionId, SessionView};

#[derive(Debug, Clone, Deserialize)]
pub struct DrugQuery {
    /// Case-insensitive substring filter.
    pub q: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectionRequest {
    #[serde(default)]
    pub drugs: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionDto {
    pub id: SessionId,
    #[serde(flatten)]
    pub view: SessionView,
}
