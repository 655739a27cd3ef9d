//! MedSafe: predicts whether a drug combination is likely to interact
//! adversely, using a fitted multi-label encoder and classifier.

pub mod api;
pub mod cli;
pub mod config;
pub mod context;
pub mod data;
pub mod explain;
pub mod logging;
pub mod model;
pub mod predict;
pub mod session;
#[cfg(feature = "askama")]
pub mod ui;
