use crate::types::{Rank, TaxonId};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Retrieve candidate taxa for every peptide from Unipept
    FetchTaxa {
        /// CSV file with sequence,score,psms columns
        evidence_file: PathBuf,
        /// Output JSON file mapping peptides onto taxon IDs
        #[arg(short = 'o', long = "output", default_value = "peptide_taxa.json")]
        output_file: PathBuf,
        /// Only keep taxa descending from these taxon IDs (comma separated)
        #[arg(long, value_delimiter = ',', default_value = "1")]
        taxa: Vec<TaxonId>,
        /// Lowest rank at which descendants are considered (default: from config)
        #[arg(long)]
        rank: Option<Rank>,
    },

    /// Weight taxa by their peptide evidence and select the taxa for the graphical model
    Weigh {
        /// CSV file with sequence,score,psms columns
        evidence_file: PathBuf,
        /// JSON file mapping peptides onto taxon IDs
        peptide_taxa_file: PathBuf,
        /// Output file for the peptide-taxon table
        #[arg(long, default_value = "sequences.csv")]
        peptides_output: PathBuf,
        /// Output file for the taxon weight table
        #[arg(long, default_value = "taxa_weights.csv")]
        taxa_output: PathBuf,
        /// Maximum number of taxa kept by weight (default: from config)
        #[arg(long)]
        max_taxa: Option<usize>,
        /// Rank onto which all taxa are mapped (default: from config)
        #[arg(long)]
        rank: Option<Rank>,
        /// Maximum number of peptides sampled (default: from config)
        #[arg(long)]
        sample_size: Option<usize>,
        /// Seed for peptide sampling
        #[arg(long)]
        seed: Option<u64>,
        /// JSON file used to persist retrieved lineages between runs
        #[arg(long)]
        lineage_cache: Option<PathBuf>,
    },

    /// Select the parameter set whose solver output best matches the taxon weights
    BestParameters {
        /// Taxon weight table written by `weigh`
        taxa_weights_file: PathBuf,
        /// Folder searched recursively for pepgm_results_a<alpha>_b<beta>_p<prior>.csv files
        results_folder: PathBuf,
        /// Output file for the best parameter set
        #[arg(long, default_value = "best_parameters.csv")]
        params_output: PathBuf,
        /// Output file for the taxon scores of the best run
        #[arg(long, default_value = "best_result.csv")]
        result_output: PathBuf,
        /// RBO persistence in (0, 1] (default: from config)
        #[arg(long)]
        rbo_persistence: Option<f64>,
        /// Add taxon names retrieved from Unipept to the best result
        #[arg(long)]
        with_names: bool,
    },

    /// Print the effective configuration
    Config {
        /// Write it to the platform config file, filling in all defaults
        #[arg(long)]
        save: bool,
    },
}
