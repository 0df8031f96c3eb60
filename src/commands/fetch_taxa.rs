use crate::config::Config;
use crate::io::evidence::{read_evidence_file, write_peptide_taxa_file};
use crate::types::{PeptideTaxa, Rank, TaxonId};
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use crate::vendor::unipept::UnipeptClient;
use crate::vendor::TaxonomyClient;
use crate::weighting::fetch_peptides_and_filter_taxa;
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub fn run(config: &Config, evidence_file: &Path, output_file: &Path, taxa: &[TaxonId], rank: Rank) -> Result<()> {
    let client = UnipeptClient::new(config)?;
    let peptide_taxa = run_with_client(&client, evidence_file, taxa, rank)?;

    write_peptide_taxa_file(output_file, &peptide_taxa)
        .with_context(|| format!("Failed to write {}", output_file.display()))?;
    info!(
        "Wrote taxa for {} peptides to {}",
        peptide_taxa.len(),
        output_file.display()
    );
    Ok(())
}

pub fn run_with_client<C>(client: &C, evidence_file: &Path, taxa: &[TaxonId], rank: Rank) -> Result<PeptideTaxa>
where
    C: TaxonomyClient + ?Sized,
{
    let evidence = read_evidence_file(evidence_file)
        .with_context(|| format!("Failed to read peptide evidence from {}", evidence_file.display()))?;
    let peptides: Vec<String> = evidence.into_keys().collect();

    let progress = ProgressBarBuilder::new(format!("Retrieving taxa for {} peptides...", peptides.len()))
        .with_tick(Duration::from_millis(200))
        .build()?;

    let peptide_taxa = fetch_peptides_and_filter_taxa(&peptides, taxa, rank, client)
        .context("Failed to retrieve peptide taxa")?;

    progress.finish_with_message("Peptide taxa retrieved");
    Ok(peptide_taxa)
}
