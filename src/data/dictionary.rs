//! DrugBank dictionary ingestion and the bidirectional name index.

use std::{
    collections::{HashMap, HashSet},
    io::Read,
    path::Path,
};

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use super::{DataError, DataResult};

/// One row of the reference table. Structure columns are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DrugRecord {
    #[serde(rename = "DrugBank ID", alias = "DrugBankID")]
    pub identifier: String,
    #[serde(rename = "Name")]
    pub name: String,
}

/// A selected name that is not part of the index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown drug name {0:?}")]
pub struct UnknownDrug(pub String);

/// Name ↔ identifier lookup restricted to drugs seen in the interaction data.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    name_to_id: IndexMap<String, String>,
    id_to_name: HashMap<String, String>,
}

/// Read every dictionary row from a CSV file.
pub fn read_dictionary(path: &Path) -> DataResult<Vec<DrugRecord>> {
    let reader = csv::Reader::from_path(path).map_err(|source| DataError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = read_records(reader, path)?;
    info!(path = %path.display(), rows = rows.len(), "loaded drug dictionary");
    Ok(rows)
}

/// Read dictionary rows from an open CSV reader; `origin` labels errors.
pub fn read_records<R: Read>(
    mut reader: csv::Reader<R>,
    origin: &Path,
) -> DataResult<Vec<DrugRecord>> {
    reader
        .deserialize::<DrugRecord>()
        .map(|row| {
            row.map_err(|source| DataError::Csv {
                path: origin.to_path_buf(),
                source,
            })
        })
        .collect()
}

impl NameIndex {
    /// Build the index over `records`, keeping only identifiers in `known`.
    ///
    /// Rows repeating an existing pair are skipped. A name bound to two
    /// identifiers, or an identifier bound to two names, is rejected.
    pub fn build<I>(records: I, known: &HashSet<&str>) -> DataResult<Self>
    where
        I: IntoIterator<Item = DrugRecord>,
    {
        let mut index = Self::default();
        let mut skipped = 0usize;
        for DrugRecord { identifier, name } in records {
            if !known.contains(identifier.as_str()) {
                skipped += 1;
                continue;
            }
            if let Some(existing) = index.name_to_id.get(&name) {
                if existing != &identifier {
                    return Err(DataError::AmbiguousName {
                        name,
                        first: existing.clone(),
                        second: identifier,
                    });
                }
                continue;
            }
            if let Some(existing) = index.id_to_name.get(&identifier) {
                return Err(DataError::AmbiguousIdentifier {
                    identifier,
                    first: existing.clone(),
                    second: name,
                });
            }
            index.id_to_name.insert(identifier.clone(), name.clone());
            index.name_to_id.insert(name, identifier);
        }
        debug!(kept = index.len(), skipped, "built name index");
        Ok(index)
    }

    pub fn id_for(&self, name: &str) -> Option<&str> {
        self.name_to_id.get(name).map(String::as_str)
    }

    pub fn name_for(&self, identifier: &str) -> Option<&str> {
        self.id_to_name.get(identifier).map(String::as_str)
    }

    /// Selectable names in dictionary order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.name_to_id.keys().map(String::as_str)
    }

    /// Map each name to its identifier, failing on the first unknown name.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<String>, UnknownDrug> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.id_for(name)
                    .map(str::to_string)
                    .ok_or_else(|| UnknownDrug(name.to_string()))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.name_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_to_id.is_empty()
    }
}
