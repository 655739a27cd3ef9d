//! Labelled interaction dataset: positive and negative hyperedge tables merged
//! into one shuffled, cleaned collection.

use std::{collections::HashSet, io::Read, path::Path};

use once_cell::sync::Lazy;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{DataError, DataResult};

/// Identifiers the dictionary cannot resolve; records touching them are dropped.
pub const BLOCKED_IDENTIFIERS: &[&str] = &[
    "DB03862", "DB04482", "DB04920", "DB11050", "DB12366", "DB13151", "DB14693", "DB15270",
    "DB18046",
];

/// Raw marker the negative table uses for "no interaction".
pub const SENTINEL_NEGATIVE_LABEL: i64 = -1;

/// One labelled drug combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractionRecord {
    pub drug_identifiers: Vec<String>,
    /// 1 for an adverse interaction, 0 otherwise.
    pub label: u8,
}

/// Counters collected while loading, reported by `medsafe inspect`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub positive_rows: usize,
    pub negative_rows: usize,
    pub relabelled_rows: usize,
    pub blocked_rows: usize,
}

/// Cleaned, shuffled interaction records. Read-only after construction.
#[derive(Debug, Clone)]
pub struct InteractionDataset {
    records: Vec<InteractionRecord>,
    stats: LoadStats,
}

#[derive(Debug, Deserialize)]
struct RawInteractionRow {
    #[serde(rename = "DrugBankID")]
    drug_bank_id: Option<String>,
    hyperedge_label: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Polarity {
    Positive,
    Negative,
}

impl InteractionDataset {
    /// Read both tables from disk and clean them.
    pub fn load(positive: &Path, negative: &Path, seed: u64) -> DataResult<Self> {
        let open = |path: &Path| {
            csv::Reader::from_path(path).map_err(|source| DataError::Csv {
                path: path.to_path_buf(),
                source,
            })
        };
        let dataset = Self::from_readers(
            open(positive)?,
            positive,
            open(negative)?,
            negative,
            seed,
        )?;
        info!(
            records = dataset.records.len(),
            positive = dataset.stats.positive_rows,
            negative = dataset.stats.negative_rows,
            blocked = dataset.stats.blocked_rows,
            "loaded interaction dataset"
        );
        Ok(dataset)
    }

    /// Same as [`InteractionDataset::load`] over already-open CSV readers.
    pub fn from_readers<P: Read, N: Read>(
        positive: csv::Reader<P>,
        positive_origin: &Path,
        negative: csv::Reader<N>,
        negative_origin: &Path,
        seed: u64,
    ) -> DataResult<Self> {
        let mut stats = LoadStats::default();
        let mut records = read_table(positive, positive_origin, Polarity::Positive, &mut stats)?;
        records.extend(read_table(
            negative,
            negative_origin,
            Polarity::Negative,
            &mut stats,
        )?);

        let mut rng = StdRng::seed_from_u64(seed);
        records.shuffle(&mut rng);

        let before = records.len();
        records.retain(|record| !is_blocked(&record.drug_identifiers));
        stats.blocked_rows = before - records.len();

        Ok(Self { records, stats })
    }

    pub fn records(&self) -> &[InteractionRecord] {
        &self.records
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every identifier referenced by at least one record.
    pub fn identifiers(&self) -> HashSet<&str> {
        self.records
            .iter()
            .flat_map(|r| r.drug_identifiers.iter().map(String::as_str))
            .collect()
    }
}

fn read_table<R: Read>(
    mut reader: csv::Reader<R>,
    origin: &Path,
    polarity: Polarity,
    stats: &mut LoadStats,
) -> DataResult<Vec<InteractionRecord>> {
    let csv_err = |source: csv::Error| DataError::Csv {
        path: origin.to_path_buf(),
        source,
    };
    let mut out = Vec::new();
    for (idx, result) in reader.deserialize::<RawInteractionRow>().enumerate() {
        let row = idx + 1;
        let raw = result.map_err(csv_err)?;

        let mut label = raw.hyperedge_label;
        if polarity == Polarity::Negative && label == SENTINEL_NEGATIVE_LABEL {
            label = 0;
            stats.relabelled_rows += 1;
        }
        let label = match label {
            0 => 0,
            1 => 1,
            other => {
                return Err(DataError::UnexpectedLabel {
                    path: origin.to_path_buf(),
                    row,
                    label: other,
                })
            }
        };

        let field = raw.drug_bank_id.unwrap_or_default();
        let drug_identifiers =
            parse_identifier_list(&field).ok_or_else(|| DataError::MalformedIdentifierList {
                path: origin.to_path_buf(),
                row,
                raw: field.clone(),
            })?;

        out.push(InteractionRecord {
            drug_identifiers,
            label,
        });
    }
    match polarity {
        Polarity::Positive => stats.positive_rows = out.len(),
        Polarity::Negative => stats.negative_rows = out.len(),
    }
    debug!(path = %origin.display(), rows = out.len(), ?polarity, "read interaction table");
    Ok(out)
}

fn is_blocked(identifiers: &[String]) -> bool {
    identifiers
        .iter()
        .any(|id| BLOCKED_IDENTIFIERS.contains(&id.as_str()))
}

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?:'([^']*)'|"([^"]*)"|([A-Za-z0-9_.+-]+))$"#).expect("valid regex")
});

/// Parse a list literal such as `['DB00001', 'DB00002']` into identifiers.
///
/// A bare scalar literal (`'DB00001'` or `42`) becomes a one-element list.
/// Returns `None` for empty or malformed input.
pub fn parse_identifier_list(raw: &str) -> Option<Vec<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let Some(inner) = trimmed.strip_prefix('[') else {
        return parse_token(trimmed).map(|id| vec![id]);
    };
    let inner = inner.strip_suffix(']')?.trim();
    if inner.is_empty() {
        return Some(Vec::new());
    }
    // a single trailing comma is legal in a list literal
    let inner = inner.strip_suffix(',').unwrap_or(inner);
    inner.split(',').map(|item| parse_token(item.trim())).collect()
}

fn parse_token(token: &str) -> Option<String> {
    let caps = TOKEN.captures(token)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .map(|m| m.as_str().to_string())
}
