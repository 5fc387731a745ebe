//! Public stemcell catalog.
//!
//! The index is a YAML mapping from stemcell name to its location, size,
//! expected SHA-1 and tags. Records tagged `stable` form the stable subset.

use anyhow::{Context, bail};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, info};
use url::Url;

pub const DEFAULT_INDEX_URL: &str =
    "https://s3.amazonaws.com/blob.cfblob.com/stemcells/public_stemcells_index.yml";

/// The index lists itself; that entry is not a stemcell.
const INDEX_SELF_ENTRY: &str = "public_stemcells_index.yml";
const STABLE_TAG: &str = "stable";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StemcellRecord {
    pub name: String,
    pub url: Url,
    pub size: u64,
    pub sha1: String,
    pub tags: Vec<String>,
}

impl StemcellRecord {
    pub fn tagged(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_stable(&self) -> bool {
        self.tagged(STABLE_TAG)
    }
}

/// Read-only queries over a stemcell catalog.
pub trait StemcellIndex {
    fn has_stemcell(&self, name: &str) -> bool;
    /// Every stemcell name, in index order.
    fn names(&self) -> Vec<&str>;
    fn all(&self) -> Vec<&StemcellRecord>;
    /// Order-preserving subset of `all`.
    fn stable(&self) -> Vec<&StemcellRecord>;
    fn find(&self, name: &str) -> Option<&StemcellRecord>;
}

#[derive(Debug, Deserialize)]
struct IndexEntry {
    url: Url,
    size: u64,
    sha1: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Default)]
pub struct PublicStemcellIndex {
    records: BTreeMap<String, StemcellRecord>,
}

impl PublicStemcellIndex {
    pub fn from_yaml(document: &str) -> anyhow::Result<Self> {
        if document.trim().is_empty() {
            return Ok(Self::default());
        }
        let entries: Option<BTreeMap<String, IndexEntry>> = serde_yaml::from_str(document)?;
        let records = entries
            .unwrap_or_default()
            .into_iter()
            .filter(|(name, _)| name != INDEX_SELF_ENTRY)
            .map(|(name, entry)| {
                let record = StemcellRecord {
                    name: name.clone(),
                    url: entry.url,
                    size: entry.size,
                    sha1: entry.sha1,
                    tags: entry.tags,
                };
                (name, record)
            })
            .collect();
        Ok(Self { records })
    }

    /// Fetches and parses the index. Blocking.
    pub fn download(index_url: &Url) -> anyhow::Result<Self> {
        info!(%index_url, "fetching public stemcell index");
        let response = reqwest::blocking::get(index_url.clone())
            .with_context(|| format!("request {}", index_url))?;
        if !response.status().is_success() {
            bail!(
                "Received HTTP {} from {}.",
                response.status().as_u16(),
                index_url
            );
        }
        let body = response
            .text()
            .with_context(|| format!("read {}", index_url))?;
        let index = Self::from_yaml(&body)
            .with_context(|| format!("parse stemcell index from {}", index_url))?;
        debug!(stemcells = index.records.len(), "stemcell index loaded");
        Ok(index)
    }
}

impl StemcellIndex for PublicStemcellIndex {
    fn has_stemcell(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    fn names(&self) -> Vec<&str> {
        self.records.keys().map(String::as_str).collect()
    }

    fn all(&self) -> Vec<&StemcellRecord> {
        self.records.values().collect()
    }

    fn stable(&self) -> Vec<&StemcellRecord> {
        self.records.values().filter(|r| r.is_stable()).collect()
    }

    fn find(&self, name: &str) -> Option<&StemcellRecord> {
        self.records.get(name)
    }
}
