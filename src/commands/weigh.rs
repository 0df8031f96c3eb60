use crate::config::Config;
use crate::io::evidence::{read_evidence_file, read_peptide_taxa_file};
use crate::io::tables::{write_peptide_table_file, write_taxa_table_file};
use crate::utils::cache::LineageCache;
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use crate::vendor::unipept::UnipeptClient;
use crate::vendor::TaxonomyClient;
use crate::weighting::{perform_taxa_weighing, WeighingOptions, WeightTables};
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub struct WeighPaths<'a> {
    pub evidence_file: &'a Path,
    pub peptide_taxa_file: &'a Path,
    pub peptides_output: &'a Path,
    pub taxa_output: &'a Path,
    pub lineage_cache: Option<&'a Path>,
}

pub fn run(config: &Config, paths: &WeighPaths, seed: Option<u64>) -> Result<()> {
    let client = UnipeptClient::new(config)?;
    run_with_client(config, paths, seed, &client).map(|_| ())
}

pub fn run_with_client<C>(config: &Config, paths: &WeighPaths, seed: Option<u64>, client: &C) -> Result<WeightTables>
where
    C: TaxonomyClient + ?Sized,
{
    let evidence = read_evidence_file(paths.evidence_file)
        .with_context(|| format!("Failed to read peptide evidence from {}", paths.evidence_file.display()))?;
    let mut peptide_taxa = read_peptide_taxa_file(paths.peptide_taxa_file)
        .with_context(|| format!("Failed to read peptide taxa from {}", paths.peptide_taxa_file.display()))?;
    info!(
        "Loaded {} peptides with evidence and {} peptides with taxa",
        evidence.len(),
        peptide_taxa.len()
    );

    let mut cache = match paths.lineage_cache {
        Some(path) if path.exists() => LineageCache::load(path)
            .with_context(|| format!("Failed to load lineage cache {}", path.display()))?,
        _ => LineageCache::new(),
    };

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let options = WeighingOptions::new(config.taxa_rank, config.max_taxa).with_sample_size(config.sample_size);

    let progress = ProgressBarBuilder::new(format!("Weighing taxa at rank {}...", options.taxa_rank))
        .with_tick(Duration::from_millis(200))
        .build()?;
    let weighed = perform_taxa_weighing(&mut peptide_taxa, &evidence, &options, &mut cache, client, &mut rng);

    // Lineages fetched before a failure are still worth keeping.
    if let Some(path) = paths.lineage_cache {
        cache
            .save(path)
            .with_context(|| format!("Failed to save lineage cache {}", path.display()))?;
    }

    let tables = weighed.context("Taxon weighing failed")?;
    progress.finish_with_message(format!(
        "Selected {} taxa from {} peptide-taxon pairs",
        tables.taxa.len(),
        tables.peptides.len()
    ));

    write_peptide_table_file(paths.peptides_output, &tables.peptides)
        .with_context(|| format!("Failed to write {}", paths.peptides_output.display()))?;
    write_taxa_table_file(paths.taxa_output, &tables.taxa)
        .with_context(|| format!("Failed to write {}", paths.taxa_output.display()))?;

    Ok(tables)
}
