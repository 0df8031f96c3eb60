use crate::types::Rank;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_download_timeout")]
    pub download_timeout: u64,
    #[serde(default = "default_unipept_url")]
    pub unipept_url: String,
    #[serde(default = "default_taxonomy_batch_size")]
    pub taxonomy_batch_size: usize,
    #[serde(default = "default_peptides_batch_size")]
    pub peptides_batch_size: usize,
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
    #[serde(default = "default_max_taxa")]
    pub max_taxa: usize,
    #[serde(default = "default_taxa_rank")]
    pub taxa_rank: Rank,
    #[serde(default = "default_rbo_persistence")]
    pub rbo_persistence: f64,
}

fn default_download_timeout() -> u64 {
    300
}

fn default_unipept_url() -> String {
    "https://api.unipept.ugent.be".to_string()
}

fn default_taxonomy_batch_size() -> usize {
    100
}

fn default_peptides_batch_size() -> usize {
    2000
}

fn default_sample_size() -> usize {
    crate::weighting::DEFAULT_SAMPLE_SIZE
}

fn default_max_taxa() -> usize {
    250
}

fn default_taxa_rank() -> Rank {
    Rank::Species
}

fn default_rbo_persistence() -> f64 {
    crate::grid_search::DEFAULT_RBO_PERSISTENCE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            download_timeout: default_download_timeout(),
            unipept_url: default_unipept_url(),
            taxonomy_batch_size: default_taxonomy_batch_size(),
            peptides_batch_size: default_peptides_batch_size(),
            sample_size: default_sample_size(),
            max_taxa: default_max_taxa(),
            taxa_rank: default_taxa_rank(),
            rbo_persistence: default_rbo_persistence(),
        }
    }
}

impl Config {
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "taxaweigh", "taxaweigh")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.toml"))
    }

    /// Loads `config.toml` from the platform config directory, falling back to defaults.
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Reads `path`; a missing, unreadable or malformed file yields the defaults.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            if let Ok(content) = fs::read_to_string(path) {
                match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("Ignoring malformed config {}: {}", path.display(), e),
                }
            }
        }
        Config::default()
    }

    /// Writes to the platform config file and returns its path.
    pub fn save(&self) -> anyhow::Result<Option<PathBuf>> {
        match Self::config_path() {
            Some(path) => {
                self.save_to(&path)?;
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(config_dir) = path.parent() {
            fs::create_dir_all(config_dir)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
