use crate::error::Result;
use crate::types::{Evidence, PeptideEvidence, PeptideTaxa};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

#[derive(Deserialize)]
struct EvidenceRecord {
    sequence: String,
    score: f64,
    psms: u32,
}

/// Reads a `sequence,score,psms` CSV. A repeated sequence overrides earlier rows.
pub fn read_evidence<R: Read>(reader: R) -> Result<PeptideEvidence> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut evidence = PeptideEvidence::new();
    for record in rdr.deserialize::<EvidenceRecord>() {
        let record = record?;
        evidence.insert(
            record.sequence,
            Evidence {
                score: record.score,
                psm_count: record.psms,
            },
        );
    }
    Ok(evidence)
}

pub fn read_evidence_file(path: &Path) -> Result<PeptideEvidence> {
    read_evidence(BufReader::new(File::open(path)?))
}

/// Reads a JSON object mapping peptide sequences onto lists of taxon IDs.
pub fn read_peptide_taxa<R: Read>(reader: R) -> Result<PeptideTaxa> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn read_peptide_taxa_file(path: &Path) -> Result<PeptideTaxa> {
    read_peptide_taxa(BufReader::new(File::open(path)?))
}

pub fn write_peptide_taxa<W: Write>(writer: W, peptide_taxa: &PeptideTaxa) -> Result<()> {
    serde_json::to_writer_pretty(writer, peptide_taxa)?;
    Ok(())
}

pub fn write_peptide_taxa_file(path: &Path, peptide_taxa: &PeptideTaxa) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_peptide_taxa(&mut writer, peptide_taxa)?;
    writer.flush()?;
    Ok(())
}
