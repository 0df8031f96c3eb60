use crate::config::Config;
use crate::grid_search::{check_persistence, select_best_parameters, ParameterSet};
use crate::io::grid::{load_grid_results, write_best_parameters, write_ranked_scores};
use crate::io::tables::read_taxa_table_file;
use crate::types::TaxonId;
use crate::vendor::unipept::UnipeptClient;
use crate::vendor::TaxonomyClient;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

pub struct BestParameterPaths<'a> {
    pub taxa_weights_file: &'a Path,
    pub results_folder: &'a Path,
    pub params_output: &'a Path,
    pub result_output: &'a Path,
}

pub fn run(config: &Config, paths: &BestParameterPaths, with_names: bool) -> Result<()> {
    if with_names {
        let client = UnipeptClient::new(config)?;
        run_with_client(config, paths, Some(&client)).map(|_| ())
    } else {
        run_with_client::<UnipeptClient>(config, paths, None).map(|_| ())
    }
}

/// Picks the best parameter set and writes it together with the matching solver output.
/// Taxon names are added to that output when a client is given.
pub fn run_with_client<C>(config: &Config, paths: &BestParameterPaths, client: Option<&C>) -> Result<ParameterSet>
where
    C: TaxonomyClient + ?Sized,
{
    check_persistence(config.rbo_persistence)?;

    let reference: Vec<TaxonId> = read_taxa_table_file(paths.taxa_weights_file)
        .with_context(|| format!("Failed to read taxon weights from {}", paths.taxa_weights_file.display()))?
        .into_iter()
        .map(|t| t.taxon)
        .collect();

    let results = load_grid_results(paths.results_folder)
        .with_context(|| format!("Failed to load solver results from {}", paths.results_folder.display()))?;
    info!(
        "Comparing {} solver outputs against {} weighted taxa",
        results.len(),
        reference.len()
    );

    let grid: Vec<_> = results.iter().map(|(_, result)| result.clone()).collect();
    let best = select_best_parameters(&grid, &reference, config.rbo_persistence)?;

    let (best_path, best_result) = results
        .iter()
        .find(|(_, result)| result.params == best)
        .context("Best parameter set has no matching solver output")?;
    info!("Best solver output: {}", best_path.display());

    let params_file = File::create(paths.params_output)
        .with_context(|| format!("Failed to create {}", paths.params_output.display()))?;
    write_best_parameters(BufWriter::new(params_file), &best)?;

    let names = match client {
        Some(client) => {
            let taxa: Vec<TaxonId> = best_result.taxon_scores.keys().copied().collect();
            Some(client.get_names(&taxa).context("Failed to retrieve taxon names")?)
        }
        None => None,
    };

    let result_file = File::create(paths.result_output)
        .with_context(|| format!("Failed to create {}", paths.result_output.display()))?;
    write_ranked_scores(BufWriter::new(result_file), &best_result.taxon_scores, names.as_ref())?;

    Ok(best)
}
