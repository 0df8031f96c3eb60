use clap::Parser;
use std::io;
use taxaweigh::cli::{Args, Commands};
use taxaweigh::commands::{best_parameters, fetch_taxa, show_config, weigh};
use taxaweigh::config::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn configure_log() {
    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .compact()
            .with_timer(fmt::time::ChronoLocal::rfc_3339())
            .with_writer(io::stderr)
            .with_filter(
                EnvFilter::builder()
                    .with_default_directive(tracing::Level::INFO.into())
                    .from_env_lossy(),
            ),
    );

    subscriber.init();
}

fn main() {
    configure_log();

    let args = Args::parse();
    let mut config = Config::load();

    let result = match args.command {
        Commands::FetchTaxa {
            evidence_file,
            output_file,
            taxa,
            rank,
        } => {
            let rank = rank.unwrap_or(config.taxa_rank);
            fetch_taxa::run(&config, &evidence_file, &output_file, &taxa, rank)
        }
        Commands::Weigh {
            evidence_file,
            peptide_taxa_file,
            peptides_output,
            taxa_output,
            max_taxa,
            rank,
            sample_size,
            seed,
            lineage_cache,
        } => {
            if let Some(max_taxa) = max_taxa {
                config.max_taxa = max_taxa;
            }
            if let Some(rank) = rank {
                config.taxa_rank = rank;
            }
            if let Some(sample_size) = sample_size {
                config.sample_size = sample_size;
            }
            let paths = weigh::WeighPaths {
                evidence_file: &evidence_file,
                peptide_taxa_file: &peptide_taxa_file,
                peptides_output: &peptides_output,
                taxa_output: &taxa_output,
                lineage_cache: lineage_cache.as_deref(),
            };
            weigh::run(&config, &paths, seed)
        }
        Commands::BestParameters {
            taxa_weights_file,
            results_folder,
            params_output,
            result_output,
            rbo_persistence,
            with_names,
        } => {
            if let Some(persistence) = rbo_persistence {
                config.rbo_persistence = persistence;
            }
            let paths = best_parameters::BestParameterPaths {
                taxa_weights_file: &taxa_weights_file,
                results_folder: &results_folder,
                params_output: &params_output,
                result_output: &result_output,
            };
            best_parameters::run(&config, &paths, with_names)
        }
        Commands::Config { save } => show_config::run(&config, save),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
