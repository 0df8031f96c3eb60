use crate::error::{Result, TaxaError};
use crate::grid_search::{rank_by_score, GridResult, ParameterSet};
use crate::types::TaxonId;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

/// Marker that every solver output file name contains.
pub const RESULT_FILE_MARKER: &str = "pepgm_results";

/// Extracts `(alpha, beta, prior)` from a file name such as `pepgm_results_a0.8_b0.6_p0.5.csv`.
pub fn parse_parameters(path: &Path) -> Result<ParameterSet> {
    let invalid = || TaxaError::InvalidParameterFile(path.to_path_buf());
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(invalid)?;

    let parts: Vec<&str> = stem.split('_').collect();
    parts
        .windows(3)
        .rev()
        .find_map(|w| {
            let alpha = w[0].strip_prefix('a')?.parse().ok()?;
            let beta = w[1].strip_prefix('b')?.parse().ok()?;
            let prior = w[2].strip_prefix('p')?.parse().ok()?;
            Some(ParameterSet::new(alpha, beta, prior))
        })
        .ok_or_else(invalid)
}

/// Recursively lists every `.csv` file below `folder` whose name contains
/// [`RESULT_FILE_MARKER`], sorted by path.
pub fn find_result_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_result_files(folder, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_result_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_result_files(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "csv")
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.contains(RESULT_FILE_MARKER))
        {
            files.push(path);
        }
    }
    Ok(())
}

/// Reads headerless `ID,score,type` rows of a solver output.
///
/// Rows with a `type` other than `taxon` are skipped, as is a leading `ID,…` header row.
pub fn read_taxon_scores<R: Read>(reader: R) -> Result<HashMap<TaxonId, f64>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut scores = HashMap::new();
    for (idx, record) in rdr.records().enumerate() {
        let record = record?;
        let id = record.get(0).unwrap_or_default();
        if idx == 0 && id.eq_ignore_ascii_case("id") {
            continue;
        }
        if let Some(kind) = record.get(2) {
            if !kind.is_empty() && kind != "taxon" {
                continue;
            }
        }

        let taxon: TaxonId = id
            .parse()
            .map_err(|_| TaxaError::InvalidRecord(format!("taxon ID '{}' in row {}", id, idx + 1)))?;
        let score: f64 = record
            .get(1)
            .unwrap_or_default()
            .parse()
            .map_err(|_| TaxaError::InvalidRecord(format!("score of taxon {} in row {}", taxon, idx + 1)))?;
        scores.insert(taxon, score);
    }
    Ok(scores)
}

/// Loads every solver output below `folder`, returning each result with its source file.
pub fn load_grid_results(folder: &Path) -> Result<Vec<(PathBuf, GridResult)>> {
    find_result_files(folder)?
        .into_iter()
        .map(|path| -> Result<(PathBuf, GridResult)> {
            let params = parse_parameters(&path)?;
            let taxon_scores = read_taxon_scores(BufReader::new(File::open(&path)?))?;
            Ok((path, GridResult { taxon_scores, params }))
        })
        .collect()
}

pub fn write_best_parameters<W: Write>(mut writer: W, params: &ParameterSet) -> Result<()> {
    writeln!(writer, "alpha,beta,prior")?;
    writeln!(writer, "{},{},{}", params.alpha, params.beta, params.prior)?;
    Ok(())
}

/// Writes `taxon,score[,name]` rows by descending score.
pub fn write_ranked_scores<W: Write>(
    writer: W,
    taxon_scores: &HashMap<TaxonId, f64>,
    names: Option<&HashMap<TaxonId, String>>,
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    match names {
        Some(_) => wtr.write_record(["taxon", "score", "name"])?,
        None => wtr.write_record(["taxon", "score"])?,
    }

    for (taxon, score) in rank_by_score(taxon_scores) {
        let mut record = vec![taxon.to_string(), score.to_string()];
        if let Some(names) = names {
            record.push(names.get(&taxon).cloned().unwrap_or_default());
        }
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}
