//! The flat file catalog and its parent-indexed view.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use crate::error::SdsError;

/// One folder or file entry of the catalog.
///
/// Entries are parented implicitly: `parent_id` names the `remote_id` of the containing folder
/// and is absent for the dataset root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(alias = "id", deserialize_with = "deserialize_id")]
    pub remote_id: String,
    #[serde(
        default,
        alias = "parent",
        deserialize_with = "deserialize_optional_id"
    )]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub basename: String,
    #[serde(default)]
    pub dataset_relative_path: String,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    #[serde(default)]
    pub mimetype: String,
    #[serde(default)]
    pub timestamp_updated: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// External reference id, shared with the RDF description.
    #[serde(deserialize_with = "deserialize_id")]
    pub uri_api: String,
}

fn id_from_value(value: Value) -> Result<Option<String>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(format!("expected a string or number id, found {other}")),
    }
}

fn deserialize_id<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    id_from_value(Value::deserialize(de)?)
        .map_err(serde::de::Error::custom)?
        .ok_or_else(|| serde::de::Error::custom("id must not be null"))
}

fn deserialize_optional_id<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    id_from_value(Value::deserialize(de)?).map_err(serde::de::Error::custom)
}

pub fn parse_catalog(json: &str) -> Result<Vec<CatalogEntry>, SdsError> {
    let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
    Ok(entries)
}

/// Parent remote id → ordered children, plus lookups by `uri_api`.
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    roots: Vec<CatalogEntry>,
    children: HashMap<String, Vec<CatalogEntry>>,
    by_uri: HashMap<String, CatalogEntry>,
}

impl CatalogIndex {
    pub fn from_entries<I: IntoIterator<Item = CatalogEntry>>(entries: I) -> Self {
        let mut index = CatalogIndex::default();
        for entry in entries {
            if index
                .by_uri
                .insert(entry.uri_api.clone(), entry.clone())
                .is_some()
            {
                tracing::warn!(
                    "Catalog holds more than one entry for uri_api {}",
                    entry.uri_api
                );
            }
            match &entry.parent_id {
                Some(parent) => index
                    .children
                    .entry(parent.clone())
                    .or_default()
                    .push(entry),
                None => index.roots.push(entry),
            }
        }
        index
    }

    /// Entries without a parent. A well-formed catalog has exactly one: the dataset folder.
    pub fn roots(&self) -> &[CatalogEntry] {
        &self.roots
    }

    pub fn root(&self) -> Result<&CatalogEntry, SdsError> {
        match self.roots.as_slice() {
            [root] => Ok(root),
            [] => Err(SdsError::Catalog("catalog has no root entry".to_string())),
            many => Err(SdsError::Catalog(format!(
                "catalog has {} root entries, expected one",
                many.len()
            ))),
        }
    }

    pub fn children(&self, remote_id: &str) -> &[CatalogEntry] {
        self.children
            .get(remote_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn by_uri(&self, uri_api: &str) -> Option<&CatalogEntry> {
        self.by_uri.get(uri_api)
    }

    pub fn len(&self) -> usize {
        self.by_uri.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_uri.is_empty()
    }

    /// Hand the parent multimap over to a consumer that removes entries as it visits them.
    pub(crate) fn into_parent_map(self) -> (Vec<CatalogEntry>, ParentMap) {
        (self.roots, ParentMap(self.children.into_iter().collect()))
    }
}

/// Owned parent multimap. Each entry can be taken exactly once.
#[derive(Debug, Default)]
pub(crate) struct ParentMap(BTreeMap<String, Vec<CatalogEntry>>);

impl ParentMap {
    pub(crate) fn take(&mut self, remote_id: &str) -> Vec<CatalogEntry> {
        self.0.remove(remote_id).unwrap_or_default()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub(crate) fn remaining_parents(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}
