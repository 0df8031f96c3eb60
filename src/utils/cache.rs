use crate::error::{Result, TaxaError};
use crate::types::{Lineage, TaxonId};
use crate::vendor::TaxonomyClient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Lineages retrieved so far, keyed by taxon.
///
/// The cache is append-only and is never invalidated: taxonomy data is treated as immutable
/// for the lifetime of the owner. Callers own the cache and pass it to every step that needs
/// lineages, so separate runs can use separate caches.
#[derive(Debug, Default)]
pub struct LineageCache {
    lineages: HashMap<TaxonId, Lineage>,
}

#[derive(Serialize, Deserialize)]
struct CacheSnapshot {
    saved_at: DateTime<Utc>,
    lineages: HashMap<TaxonId, Lineage>,
}

impl LineageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lineages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lineages.is_empty()
    }

    pub fn get(&self, taxon: TaxonId) -> Option<&Lineage> {
        self.lineages.get(&taxon)
    }

    pub fn insert(&mut self, taxon: TaxonId, lineage: Lineage) {
        self.lineages.entry(taxon).or_insert(lineage);
    }

    /// Returns the lineage of every taxon in `taxa`, fetching the ones not cached yet in a
    /// single client call.
    ///
    /// Fails with [`TaxaError::MissingLineage`] if the client does not return a lineage for
    /// one of the requested taxa; nothing is substituted for a gap.
    pub fn resolve<C>(&mut self, client: &C, taxa: &BTreeSet<TaxonId>) -> Result<HashMap<TaxonId, Lineage>>
    where
        C: TaxonomyClient + ?Sized,
    {
        let to_request: Vec<TaxonId> = taxa
            .iter()
            .copied()
            .filter(|taxon| !self.lineages.contains_key(taxon))
            .collect();

        if !to_request.is_empty() {
            debug!(
                "Fetching {} lineages ({} already cached)",
                to_request.len(),
                taxa.len() - to_request.len()
            );
            let fetched = client.get_lineages(&to_request)?;
            for (taxon, lineage) in fetched {
                self.insert(taxon, lineage);
            }
        }

        taxa.iter()
            .map(|&taxon| {
                self.lineages
                    .get(&taxon)
                    .cloned()
                    .map(|lineage| (taxon, lineage))
                    .ok_or(TaxaError::MissingLineage(taxon))
            })
            .collect()
    }

    /// Reads a snapshot written by [`LineageCache::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let snapshot: CacheSnapshot = serde_json::from_str(&contents)?;
        info!(
            "Loaded {} cached lineages from {} (saved {})",
            snapshot.lineages.len(),
            path.display(),
            snapshot.saved_at.to_rfc3339()
        );
        Ok(LineageCache {
            lineages: snapshot.lineages,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let snapshot = CacheSnapshot {
            saved_at: Utc::now(),
            lineages: self.lineages.clone(),
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string(&snapshot)?)?;
        Ok(())
    }
}
