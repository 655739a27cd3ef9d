//! Runtime configuration utilities for medsafe.

use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;

use crate::session::{SessionLimits, DEFAULT_SESSION_CAPACITY, DEFAULT_SESSION_TTL};

/// Seed used to shuffle the merged interaction dataset.
pub const DEFAULT_SHUFFLE_SEED: u64 = 42;

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Root folder holding the dictionary and interaction tables.
    pub data_dir: PathBuf,
    /// Root folder holding the fitted classifier and encoder.
    pub model_dir: PathBuf,
    /// Drug reference table, relative to `data_dir`.
    pub dictionary_file: PathBuf,
    /// Positive interaction table, relative to `data_dir`.
    pub positive_file: PathBuf,
    /// Negative interaction table, relative to `data_dir`.
    pub negative_file: PathBuf,
    /// Seed for the reproducible dataset shuffle.
    pub shuffle_seed: u64,
    /// Idle seconds before a form session is dropped.
    pub session_ttl_secs: u64,
    /// Upper bound on live form sessions.
    pub session_capacity: usize,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let model_dir = env::var("MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./modeldata"));
        let dictionary_file = env::var("DICTIONARY_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                PathBuf::from("dictionary/Drugbank_ID_SMILE_all_structure links.csv")
            });
        let positive_file = env::var("POSITIVE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("Merged_Dataset/pos.csv"));
        let negative_file = env::var("NEGATIVE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("Merged_Dataset/neg.csv"));
        let shuffle_seed = match env::var("SHUFFLE_SEED") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("parsing SHUFFLE_SEED={raw}"))?,
            Err(_) => DEFAULT_SHUFFLE_SEED,
        };
        let session_ttl_secs = match env::var("SESSION_TTL_SECS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("parsing SESSION_TTL_SECS={raw}"))?,
            Err(_) => DEFAULT_SESSION_TTL.as_secs(),
        };
        let session_capacity = match env::var("SESSION_CAPACITY") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("parsing SESSION_CAPACITY={raw}"))?,
            Err(_) => DEFAULT_SESSION_CAPACITY,
        };

        Ok(Self {
            data_dir,
            model_dir,
            dictionary_file,
            positive_file,
            negative_file,
            shuffle_seed,
            session_ttl_secs,
            session_capacity,
        })
    }

    /// Settings rooted at explicit directories with the default file layout.
    pub fn with_roots<P: Into<PathBuf>, Q: Into<PathBuf>>(data_dir: P, model_dir: Q) -> Self {
        Self {
            data_dir: data_dir.into(),
            model_dir: model_dir.into(),
            dictionary_file: PathBuf::from("dictionary/Drugbank_ID_SMILE_all_structure links.csv"),
            positive_file: PathBuf::from("Merged_Dataset/pos.csv"),
            negative_file: PathBuf::from("Merged_Dataset/neg.csv"),
            shuffle_seed: DEFAULT_SHUFFLE_SEED,
            session_ttl_secs: DEFAULT_SESSION_TTL.as_secs(),
            session_capacity: DEFAULT_SESSION_CAPACITY,
        }
    }

    /// Convenience helper for derived path segments.
    pub fn join_data<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.data_dir.join(path)
    }

    /// Convenience helper for artifact paths.
    pub fn join_model<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.model_dir.join(path)
    }

    pub fn dictionary_path(&self) -> PathBuf {
        self.join_data(&self.dictionary_file)
    }

    pub fn positive_path(&self) -> PathBuf {
        self.join_data(&self.positive_file)
    }

    pub fn negative_path(&self) -> PathBuf {
        self.join_data(&self.negative_file)
    }

    pub fn classifier_path(&self) -> PathBuf {
        self.join_model("model.json")
    }

    pub fn encoder_path(&self) -> PathBuf {
        self.join_model("mlb.json")
    }

    pub fn session_limits(&self) -> SessionLimits {
        SessionLimits {
            ttl: Duration::from_secs(self.session_ttl_secs),
            capacity: self.session_capacity,
        }
    }
}
